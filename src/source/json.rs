use super::{ItemSource, SourceError};
use crate::model::RawItem;
use std::path::PathBuf;

/// Reads a JSON array of raw items from a file, e.g. a saved tracker export.
///
/// Array elements that do not decode as items are skipped with a warning;
/// a file that is not a JSON array at all is an error.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ItemSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&mut self) -> Result<Vec<RawItem>, SourceError> {
        let content = std::fs::read_to_string(&self.path)?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&content)?;

        let mut items = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<RawItem>(value) {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed item record");
                }
            }
        }
        tracing::debug!(path = %self.path.display(), count = items.len(), "Read items");
        Ok(items)
    }
}
