use std::path::Path;

use crate::errors::ExtractionError;
use crate::file_utils::FileManager;

use super::{DocumentExtractor, ExtractOptions};

/// Reads an already extracted UTF-8 text file verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path, _options: &ExtractOptions) -> Result<String, ExtractionError> {
        FileManager::read_to_string(path).map_err(|e| ExtractionError::Open {
            path: path.display().to_string(),
            message: format!("{:#}", e),
        })
    }
}
