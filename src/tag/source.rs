use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::parse::{parse_label_tree, parse_prediction_paths};
use super::reformat::{FlatRecord, flatten_label_tree, merge_prediction_paths};

/// How the document at a path is interpreted. The variant is chosen by
/// the caller up front; the payload shape is never sniffed.
#[derive(Clone, Debug)]
pub enum DocumentSource {
    LabelTree(PathBuf),
    PredictionPaths(PathBuf),
}

impl DocumentSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::LabelTree(path) | Self::PredictionPaths(path) => path,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Self::LabelTree(_))
    }

    /// Reads the document and reformats it into flat parent-pointer
    /// records. I/O and parse failures carry the offending path.
    pub fn load(&self) -> Result<Vec<FlatRecord>> {
        let raw = fs::read_to_string(self.path())
            .with_context(|| format!("failed to read {}", self.path().display()))?;

        let records = match self {
            Self::LabelTree(_) => flatten_label_tree(&parse_label_tree(&raw)?),
            Self::PredictionPaths(_) => merge_prediction_paths(&parse_prediction_paths(&raw)?),
        };

        log::info!(
            "reformatted {} into {} records",
            self.path().display(),
            records.len()
        );
        Ok(records)
    }
}
