//! One contract in, one client folder out.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::extract::FieldExtractor;
use crate::label::{CounterStore, LabelCounter, load_template};
use crate::materialize::{FolderPlan, LabelPlan, MANIFEST_FILE_NAME, MaterializedFolder, materialize};
use crate::model::{
    FieldKey, FieldMap, ProcessCounts, ProcessPaths, ProcessRunManifest, ToolVersions,
};
use crate::names::{generate_folder_name, strip_path_illegal};
use crate::pdf_text::TextSource;
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

/// A buyer name is required before a client folder can be named.
pub const ESSENTIAL_FIELD: FieldKey = FieldKey::Byr1Nam1;

#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub pdf: PathBuf,
    pub output_dir: PathBuf,
    pub folder_name: Option<String>,
    pub overwrite: bool,
    pub write_label: bool,
    pub write_setup_docs: bool,
}

#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub folder_name: String,
    pub fields: FieldMap,
    pub folder: MaterializedFolder,
    pub manifest_path: PathBuf,
    pub manifest: ProcessRunManifest,
}

pub struct Pipeline<T> {
    config: AppConfig,
    source: T,
    extractor: FieldExtractor,
}

impl<T: TextSource> Pipeline<T> {
    pub fn new(config: AppConfig, source: T) -> Result<Self> {
        let extractor = FieldExtractor::new(&config.firm)?;
        Ok(Self {
            config,
            source,
            extractor,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Text acquisition and extraction only. A missing buyer name is not an
    /// error here.
    pub fn extract(&self, path: &Path) -> Result<FieldMap, PipelineError> {
        info!(path = %path.display(), "acquiring contract text");
        let raw_text = self
            .source
            .acquire(path)
            .map_err(|source| PipelineError::TextAcquisition {
                path: path.to_path_buf(),
                source,
            })?;

        let fields = self.extractor.extract_fields(&raw_text);
        info!(
            populated = fields.populated_count(),
            total = fields.len(),
            "fields extracted"
        );
        Ok(fields)
    }

    pub fn proposed_folder_name(&self, fields: &FieldMap) -> String {
        generate_folder_name(fields, &self.config.firm.folder_suffix)
    }

    pub fn process<S: CounterStore>(
        &self,
        request: &ProcessRequest,
        counter: &mut LabelCounter<S>,
    ) -> Result<ProcessOutcome, PipelineError> {
        let started_ts = Utc::now();
        let started_at = now_utc_string();
        let run_id = format!("process-{}", utc_compact_string(started_ts));

        let fields = self.extract(&request.pdf)?;
        require_essential(&fields)?;

        let source_sha256 =
            sha256_file(&request.pdf).map_err(|source| PipelineError::TextAcquisition {
                path: request.pdf.clone(),
                source,
            })?;

        let folder_name = self.resolve_folder_name(request, &fields);
        let folder_path = request.output_dir.join(&folder_name);
        if folder_path.exists() {
            if !request.overwrite {
                return Err(PipelineError::FolderExists { path: folder_path });
            }
            warn!(folder = %folder_path.display(), "writing into existing folder");
        }

        info!(run_id = %run_id, folder = %folder_path.display(), "materializing client folder");
        let materialization_error = |source: anyhow::Error| PipelineError::Materialization {
            folder: folder_path.clone(),
            source,
        };

        let label = if request.write_label {
            let template = load_template(self.config.label.template_path.as_deref())
                .map_err(materialization_error)?;
            Some(LabelPlan {
                template,
                file_name: self.config.label.file_name.clone(),
            })
        } else {
            None
        };

        let plan = FolderPlan {
            folder_path: folder_path.clone(),
            folder_name: folder_name.clone(),
            source_pdf: request.pdf.clone(),
            label,
            setup_docs: request.write_setup_docs,
        };
        let folder = materialize(&plan, &self.config.output, &fields, counter)
            .map_err(materialization_error)?;

        let manifest = ProcessRunManifest {
            manifest_version: 1,
            run_id,
            started_at,
            updated_at: now_utc_string(),
            folder_name: folder_name.clone(),
            source_sha256,
            label_index: folder.label_index,
            tool_versions: ToolVersions {
                pdftotext: self.source.version(),
            },
            paths: ProcessPaths {
                source_pdf: request.pdf.display().to_string(),
                output_dir: request.output_dir.display().to_string(),
                folder_path: folder_path.display().to_string(),
                overlay_path: folder.overlay_path.display().to_string(),
                label_path: folder
                    .label_path
                    .as_ref()
                    .map(|path| path.display().to_string()),
                setup_docs_path: folder
                    .setup_docs_path
                    .as_ref()
                    .map(|path| path.display().to_string()),
            },
            counts: ProcessCounts {
                field_count: fields.len(),
                populated_field_count: fields.populated_count(),
                absent_field_count: fields.len() - fields.populated_count(),
            },
            absent_fields: fields
                .absent_keys()
                .into_iter()
                .map(|key| key.as_str().to_string())
                .collect(),
            warnings: folder.warnings.clone(),
        };

        let manifest_path = folder_path.join(MANIFEST_FILE_NAME);
        write_json_pretty(&manifest_path, &manifest).map_err(materialization_error)?;

        info!(
            folder = %folder_path.display(),
            label_index = ?folder.label_index,
            "contract processed"
        );

        Ok(ProcessOutcome {
            folder_name,
            fields,
            folder,
            manifest_path,
            manifest,
        })
    }

    fn resolve_folder_name(&self, request: &ProcessRequest, fields: &FieldMap) -> String {
        let proposed = self.proposed_folder_name(fields);
        match request.folder_name.as_deref().map(strip_path_illegal) {
            Some(name) if !name.is_empty() => {
                info!(proposed = %proposed, chosen = %name, "folder name overridden");
                name
            }
            Some(_) => {
                warn!(proposed = %proposed, "folder name override is empty; using proposed name");
                proposed
            }
            None => proposed,
        }
    }
}

/// Fails with the partial map when the buyer name was not found.
pub fn require_essential(fields: &FieldMap) -> Result<(), PipelineError> {
    if fields.get(ESSENTIAL_FIELD).is_some() {
        return Ok(());
    }

    Err(PipelineError::EssentialFieldMissing {
        field: ESSENTIAL_FIELD,
        partial: Box::new(fields.clone()),
    })
}
