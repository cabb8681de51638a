//! File labels and the rotating label-position counter.
//!
//! Label stock has a fixed number of positions per sheet. Each generated label
//! takes the current position and advances the counter, wrapping back to 1.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, info, warn};

use crate::model::{FieldKey, FieldMap};
use crate::names::format_name;

pub const DEFAULT_TEMPLATE: &str = "File Label for: {{FOLDER_NAME}}\n\
Client: {{CLIENT_NAME}}\n\
Property Address: {{PROPERTY_ADDRESS}}\n\
Label Position: {{LABEL_INDEX}}\n";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder regex"));

/// Persistence for the counter value.
pub trait CounterStore {
    fn read(&self) -> Result<Option<u32>>;
    fn write(&mut self, value: u32) -> Result<()>;
}

/// Keeps the counter as one `key = value` line in a small text file. Other
/// lines in the file are preserved on write.
#[derive(Debug, Clone)]
pub struct FileCounterStore {
    path: PathBuf,
    key: String,
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn line_value<'a>(&self, line: &'a str) -> Option<&'a str> {
        let (key, value) = line.split_once('=')?;
        (key.trim() == self.key).then(|| value.trim())
    }
}

impl CounterStore for FileCounterStore {
    fn read(&self) -> Result<Option<u32>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "label counter file does not exist");
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).with_context(|| {
            format!("failed to read label counter: {}", self.path.display())
        })?;

        let Some(value) = raw.lines().find_map(|line| self.line_value(line)) else {
            return Ok(None);
        };

        match value.parse::<u32>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                warn!(
                    path = %self.path.display(),
                    value,
                    "label counter value is not a number; restarting at 1"
                );
                Ok(None)
            }
        }
    }

    /// Written to a sibling temp file, then renamed over the original.
    fn write(&mut self, value: u32) -> Result<()> {
        let existing = if self.path.exists() {
            fs::read_to_string(&self.path).with_context(|| {
                format!("failed to read label counter: {}", self.path.display())
            })?
        } else {
            String::new()
        };

        let entry = format!("{} = {}", self.key, value);
        let mut replaced = false;
        let mut lines = Vec::new();
        for line in existing.lines() {
            if !replaced && self.line_value(line).is_some() {
                lines.push(entry.clone());
                replaced = true;
            } else {
                lines.push(line.to_string());
            }
        }
        if !replaced {
            lines.push(entry);
        }

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create label counter directory: {}", parent.display())
            })?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, format!("{}\n", lines.join("\n")))
            .with_context(|| format!("failed to write label counter: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| {
            format!("failed to replace label counter: {}", self.path.display())
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCounterStore {
    value: Option<u32>,
}

impl MemoryCounterStore {
    pub fn new(value: Option<u32>) -> Self {
        Self { value }
    }
}

impl CounterStore for MemoryCounterStore {
    fn read(&self) -> Result<Option<u32>> {
        Ok(self.value)
    }

    fn write(&mut self, value: u32) -> Result<()> {
        self.value = Some(value);
        Ok(())
    }
}

/// Cycling 1-based index over a counter store.
#[derive(Debug)]
pub struct LabelCounter<S> {
    store: S,
    cycle_len: u32,
}

impl<S: CounterStore> LabelCounter<S> {
    pub fn new(store: S, cycle_len: u32) -> Self {
        Self {
            store,
            cycle_len: cycle_len.max(1),
        }
    }

    /// Current index; missing or out-of-range stored values read as 1.
    pub fn current(&self) -> Result<u32> {
        let index = match self.store.read()? {
            Some(value) if (1..=self.cycle_len).contains(&value) => value,
            Some(value) => {
                warn!(value, cycle_len = self.cycle_len, "label index out of range; restarting at 1");
                1
            }
            None => 1,
        };
        Ok(index)
    }

    /// Runs `generate` with the current index and advances the counter only if
    /// it succeeds.
    pub fn with_next<T>(&mut self, generate: impl FnOnce(u32) -> Result<T>) -> Result<T> {
        let index = self.current()?;
        let output = generate(index)?;
        let next = index % self.cycle_len + 1;
        self.store.write(next)?;
        debug!(index, next, "label counter advanced");
        Ok(output)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Values available to a label template.
#[derive(Debug)]
pub struct LabelContext<'a> {
    pub fields: &'a FieldMap,
    pub folder_name: &'a str,
    pub label_index: u32,
}

impl LabelContext<'_> {
    pub fn client_name(&self) -> String {
        format_name(
            self.fields.get(FieldKey::Byr1Nam1).unwrap_or_default(),
            self.fields.get(FieldKey::Byr1Nam2),
        )
    }

    fn values(&self) -> HashMap<String, String> {
        let mut values = self
            .fields
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), value.unwrap_or_default().to_string()))
            .collect::<HashMap<String, String>>();
        values.insert("CLIENT_NAME".to_string(), self.client_name());
        values.insert(
            "PROPERTY_ADDRESS".to_string(),
            self.fields
                .get(FieldKey::PropStre)
                .unwrap_or_default()
                .to_string(),
        );
        values.insert("FOLDER_NAME".to_string(), self.folder_name.to_string());
        values.insert("LABEL_INDEX".to_string(), self.label_index.to_string());
        values
    }
}

/// Substitutes `{{NAME}}` placeholders. Unknown names render empty.
pub fn render_label(template: &str, context: &LabelContext<'_>) -> String {
    let values = context.values();
    PLACEHOLDER
        .replace_all(template, |captures: &Captures<'_>| {
            let name = captures[1].to_uppercase();
            match values.get(&name) {
                Some(value) => value.clone(),
                None => {
                    debug!(placeholder = name.as_str(), "unknown label placeholder");
                    String::new()
                }
            }
        })
        .into_owned()
}

pub fn load_template(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read label template: {}", path.display())),
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}

/// Renders the label into `output`, consuming one counter position.
pub fn generate_label<S: CounterStore>(
    counter: &mut LabelCounter<S>,
    template: &str,
    fields: &FieldMap,
    folder_name: &str,
    output: &Path,
) -> Result<u32> {
    counter.with_next(|label_index| {
        let context = LabelContext {
            fields,
            folder_name,
            label_index,
        };
        fs::write(output, render_label(template, &context))
            .with_context(|| format!("failed to write label: {}", output.display()))?;
        info!(path = %output.display(), label_index, "label written");
        Ok(label_index)
    })
}
