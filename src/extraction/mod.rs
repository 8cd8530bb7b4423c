/*!
 * Source document extraction.
 *
 * Extractors turn an input file into the raw text consumed by the
 * translation pipeline: one line per paragraph, images as
 * `----media/imageN.ext----` tokens, and, in html mode, font sizes as
 * `<span style="font-size:Npt">` wrappers.
 */

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::errors::ExtractionError;
use crate::file_utils::{FileManager, FileType};

pub mod docx;
pub mod text;

pub use docx::DocxExtractor;
pub use text::PlainTextExtractor;

/// Options of one extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Where embedded images are written, if anywhere
    pub image_dir: Option<PathBuf>,
    /// Keep run formatting as inline markup
    pub html: bool,
}

impl ExtractOptions {
    /// Plain text without images
    pub fn plain() -> Self {
        Self::default()
    }

    /// Markup-preserving extraction writing images into `image_dir`
    pub fn html_with_images(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: Some(image_dir.into()),
            html: true,
        }
    }
}

/// Reads an input document into raw text
pub trait DocumentExtractor: Send + Sync + Debug {
    /// Extract the raw text of `path`
    fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<String, ExtractionError>;
}

/// Pick the extractor for a path based on its extension
pub fn extractor_for(path: &Path) -> Result<Box<dyn DocumentExtractor>, ExtractionError> {
    match FileManager::detect_file_type(path) {
        FileType::WordDocument => Ok(Box::new(DocxExtractor)),
        FileType::Text => Ok(Box::new(PlainTextExtractor)),
        FileType::Unknown => Err(ExtractionError::Unsupported(path.display().to_string())),
    }
}
