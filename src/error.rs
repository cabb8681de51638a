use std::path::PathBuf;

use thiserror::Error;

use crate::model::{FieldKey, FieldMap};

/// Failures that cross the extraction or materialization boundary.
///
/// Rule misses inside the extractor never surface here; they become absent
/// field values.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not acquire text from {path}")]
    TextAcquisition {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("essential field {field} was not found in the contract")]
    EssentialFieldMissing {
        field: FieldKey,
        partial: Box<FieldMap>,
    },

    #[error("folder already exists: {path} (pass --overwrite or --folder-name)")]
    FolderExists { path: PathBuf },

    /// Partially created folders are left in place; their state is unknown.
    #[error("failed to materialize client folder {folder}")]
    Materialization {
        folder: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    pub fn partial_fields(&self) -> Option<&FieldMap> {
        match self {
            Self::EssentialFieldMissing { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
