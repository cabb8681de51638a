//! Client folder layout: overlay data file, working subfolders, a copy of the
//! contract, and the optional label and setup sheets.
//!
//! Creation is best-effort. A failure part way through leaves whatever was
//! already written in place.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::OutputConfig;
use crate::label::{CounterStore, LabelCounter, generate_label};
use crate::model::{FieldKey, FieldMap};
use crate::names::format_name;
use crate::overlay::{format_table, write_overlay};
use crate::util::ensure_directory;

pub const MANIFEST_FILE_NAME: &str = "process_manifest.json";

const SETUP_SHEET_ROWS: &[(&str, FieldKey)] = &[
    ("Buyer", FieldKey::Byr1Nam1),
    ("Co-Buyer", FieldKey::Byr1Nam2),
    ("Buyer Address", FieldKey::Byr1Adr1),
    ("", FieldKey::Byr1Adr2),
    ("Buyer Phone", FieldKey::Byr1Cell1),
    ("Buyer Email", FieldKey::Byr1Email),
    ("Seller", FieldKey::Slr1Nam1),
    ("Lot", FieldKey::LotUnit),
    ("Subdivision", FieldKey::Subdivn),
    ("Property", FieldKey::PropStre),
    ("City", FieldKey::PropCity),
    ("State", FieldKey::StateLet),
    ("Zip", FieldKey::PropZip),
    ("County", FieldKey::County),
    ("Sale Price", FieldKey::SalePric),
    ("Deposit", FieldKey::Deposit),
    ("Settlement Date", FieldKey::SettDate),
    ("Commission", FieldKey::CompCt),
    ("Listing Agent", FieldKey::Ag701Nam),
    ("Selling Firm", FieldKey::Ag702Frm),
    ("Selling Agent", FieldKey::Ag702Nam),
    ("Selling Agent Phone", FieldKey::Ag702Mo),
    ("Selling Agent Email", FieldKey::Ag702Email),
    ("Underwriter", FieldKey::UndName),
];

/// Label settings for one run; `None` in [`FolderPlan::label`] skips the label.
#[derive(Debug, Clone)]
pub struct LabelPlan {
    pub template: String,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct FolderPlan {
    pub folder_path: PathBuf,
    pub folder_name: String,
    pub source_pdf: PathBuf,
    pub label: Option<LabelPlan>,
    pub setup_docs: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MaterializedFolder {
    pub folder_path: PathBuf,
    pub overlay_path: PathBuf,
    pub pdf_copy_path: Option<PathBuf>,
    pub label_path: Option<PathBuf>,
    pub label_index: Option<u32>,
    pub setup_docs_path: Option<PathBuf>,
    pub warnings: Vec<String>,
}

pub fn materialize<S: CounterStore>(
    plan: &FolderPlan,
    output: &OutputConfig,
    fields: &FieldMap,
    counter: &mut LabelCounter<S>,
) -> Result<MaterializedFolder> {
    let folder = &plan.folder_path;
    ensure_directory(folder)?;

    let overlay_path = folder.join(&output.overlay_file_name);
    write_overlay(&overlay_path, fields)?;

    for subfolder in &output.subfolders {
        ensure_directory(&folder.join(subfolder))?;
    }

    let mut result = MaterializedFolder {
        folder_path: folder.clone(),
        overlay_path,
        ..MaterializedFolder::default()
    };

    result.pdf_copy_path = copy_source_pdf(&plan.source_pdf, folder, &mut result.warnings)?;

    if let Some(label) = &plan.label {
        let label_path = folder.join(&label.file_name);
        let index = generate_label(counter, &label.template, fields, &plan.folder_name, &label_path)?;
        result.label_path = Some(label_path);
        result.label_index = Some(index);
    }

    if plan.setup_docs {
        let setup_path = folder.join(&output.setup_docs_file_name);
        fs::write(&setup_path, render_setup_docs(&plan.folder_name, fields))
            .with_context(|| format!("failed to write setup sheet: {}", setup_path.display()))?;
        result.setup_docs_path = Some(setup_path);
    }

    info!(folder = %folder.display(), "client folder materialized");
    Ok(result)
}

fn copy_source_pdf(
    source: &Path,
    folder: &Path,
    warnings: &mut Vec<String>,
) -> Result<Option<PathBuf>> {
    let Some(file_name) = source.file_name() else {
        let message = format!("source has no file name: {}", source.display());
        warn!(source = %source.display(), "source has no file name; not copied");
        warnings.push(message);
        return Ok(None);
    };

    let destination = folder.join(file_name);
    if destination == source {
        return Ok(Some(destination));
    }

    fs::copy(source, &destination).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    Ok(Some(destination))
}

/// Plain-text summary sheet for opening the file.
pub fn render_setup_docs(folder_name: &str, fields: &FieldMap) -> String {
    let client = format_name(
        fields.get(FieldKey::Byr1Nam1).unwrap_or_default(),
        fields.get(FieldKey::Byr1Nam2),
    );

    let mut out = format!("Setup Documents for: {folder_name}\nClient: {client}\n\n");
    out.push_str(&format_table(SETUP_SHEET_ROWS.iter().filter_map(
        |(label, key)| fields.get(*key).map(|value| (*label, value)),
    )));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::label::MemoryCounterStore;
    use crate::overlay::read_overlay;

    fn sample_fields() -> FieldMap {
        let mut fields = FieldMap::new();
        fields.set_str(FieldKey::Byr1Nam1, "John Smith");
        fields.set_str(FieldKey::PropStre, "1234 Maple Cove");
        fields.set_str(FieldKey::SalePric, "350000.00");
        fields
    }

    fn plan_in(root: &Path, source_pdf: PathBuf, label: bool, setup_docs: bool) -> FolderPlan {
        FolderPlan {
            folder_path: root.join("out").join("Smith, John  25-"),
            folder_name: "Smith, John  25-".to_string(),
            source_pdf,
            label: label.then(|| LabelPlan {
                template: "{{CLIENT_NAME}} #{{LABEL_INDEX}}".to_string(),
                file_name: "file label.txt".to_string(),
            }),
            setup_docs,
        }
    }

    #[test]
    fn writes_full_folder_layout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pdf = dir.path().join("contract.pdf");
        fs::write(&pdf, b"%PDF-1.4 fake").expect("write pdf");

        let plan = plan_in(dir.path(), pdf, true, true);
        let mut counter = LabelCounter::new(MemoryCounterStore::new(Some(20)), 20);
        let fields = sample_fields();

        let result = materialize(&plan, &OutputConfig::default(), &fields, &mut counter)
            .expect("folder should be materialized");

        let folder = &plan.folder_path;
        assert!(folder.join("Setup").is_dir());
        assert!(folder.join("TitleSearch").is_dir());
        assert_eq!(result.overlay_path, folder.join("overlay.pxt"));
        assert_eq!(
            fs::read(folder.join("contract.pdf")).expect("copied pdf"),
            b"%PDF-1.4 fake"
        );

        let entries = read_overlay(&result.overlay_path).expect("overlay");
        assert_eq!(entries.len(), FieldKey::ALL.len());

        assert_eq!(result.label_index, Some(20));
        let label = fs::read_to_string(folder.join("file label.txt")).expect("label");
        assert_eq!(label, "SMITH, John #20");
        assert_eq!(counter.current().expect("current"), 1);

        let setup = fs::read_to_string(folder.join("setup docs.txt")).expect("setup sheet");
        assert!(setup.starts_with("Setup Documents for: Smith, John  25-\nClient: SMITH, John\n"));
        assert!(setup.contains("Sale Price"));
        assert!(!setup.contains("Deposit"));
    }

    #[test]
    fn optional_documents_can_be_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pdf = dir.path().join("contract.pdf");
        fs::write(&pdf, b"pdf").expect("write pdf");

        let plan = plan_in(dir.path(), pdf, false, false);
        let mut counter = LabelCounter::new(MemoryCounterStore::new(Some(4)), 20);
        let result = materialize(&plan, &OutputConfig::default(), &sample_fields(), &mut counter)
            .expect("folder should be materialized");

        assert_eq!(result.label_path, None);
        assert_eq!(result.setup_docs_path, None);
        assert!(!plan.folder_path.join("file label.txt").exists());
        assert_eq!(counter.current().expect("current"), 4);
    }

    #[test]
    fn failure_leaves_partial_folder_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let plan = plan_in(dir.path(), dir.path().join("missing.pdf"), true, true);
        let mut counter = LabelCounter::new(MemoryCounterStore::default(), 20);

        let result = materialize(&plan, &OutputConfig::default(), &sample_fields(), &mut counter);
        assert!(result.is_err());
        assert!(plan.folder_path.join("overlay.pxt").exists());
        assert!(plan.folder_path.join("Setup").is_dir());
        assert_eq!(counter.current().expect("current"), 1);
    }
}
