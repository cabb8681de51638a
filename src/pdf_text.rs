use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

const PAGE_BREAK: char = '\u{000C}';

/// Turns a document path into raw positional text.
pub trait TextSource {
    fn acquire(&self, path: &Path) -> Result<String>;

    /// Backend version string for run manifests, when one is known.
    fn version(&self) -> Option<String> {
        None
    }
}

/// Runs `pdftotext` in layout mode so inter-word spacing survives.
#[derive(Debug, Clone)]
pub struct PdftotextSource {
    program: String,
}

impl Default for PdftotextSource {
    fn default() -> Self {
        Self {
            program: "pdftotext".to_string(),
        }
    }
}

impl PdftotextSource {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn extract_pages(&self, pdf_path: &Path) -> Result<Vec<String>> {
        let output = Command::new(&self.program)
            .arg("-layout")
            .arg("-enc")
            .arg("UTF-8")
            .arg(pdf_path)
            .arg("-")
            .output()
            .with_context(|| {
                format!(
                    "failed to execute {} for {}",
                    self.program,
                    pdf_path.display()
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} returned non-zero exit status for {}: {}",
                self.program,
                pdf_path.display(),
                stderr.trim()
            );
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        let mut pages: Vec<String> = raw
            .split(PAGE_BREAK)
            .map(|chunk| chunk.replace('\u{0000}', ""))
            .collect();

        while let Some(last_page) = pages.last() {
            if last_page.trim().is_empty() {
                pages.pop();
                continue;
            }
            break;
        }

        Ok(pages)
    }
}

impl TextSource for PdftotextSource {
    fn acquire(&self, path: &Path) -> Result<String> {
        let pages = self.extract_pages(path)?;
        debug!(path = %path.display(), pages = pages.len(), "pdf text extracted");
        join_pages(pages, path)
    }

    fn version(&self) -> Option<String> {
        command_version_optional(&self.program, &["-v"])
    }
}

/// Reads text that was already extracted, e.g. a saved `pdftotext` dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    fn acquire(&self, path: &Path) -> Result<String> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read text file: {}", path.display()))?;
        let pages = raw
            .split(PAGE_BREAK)
            .map(|chunk| chunk.replace('\u{0000}', ""))
            .collect();
        join_pages(pages, path)
    }
}

/// Pages are rejoined with form feeds; the extractor treats them as page
/// boundaries.
fn join_pages(pages: Vec<String>, path: &Path) -> Result<String> {
    if pages.iter().all(|page| page.trim().is_empty()) {
        bail!("no text could be extracted from {}", path.display());
    }
    Ok(pages.join(&PAGE_BREAK.to_string()))
}

fn command_version_optional(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}
