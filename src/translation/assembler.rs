/*!
 * Wrapping of the processed body into an HTML page bound to an output file.
 */

use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

/// Plain-text render or image/font-preserving render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Paragraph text only
    Simple,
    /// Markup, images and font sizes kept
    #[default]
    Complex,
}

impl RenderMode {
    /// Suffix appended to the output file stem
    pub fn file_suffix(&self) -> &'static str {
        match self {
            RenderMode::Simple => "",
            RenderMode::Complex => "_complex",
        }
    }
}

/// HTML page ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Destination file
    pub path: PathBuf,
    /// Complete document
    pub contents: String,
}

impl Artifact {
    /// Write the document, creating parent directories
    pub fn write(&self) -> Result<&Path> {
        FileManager::write_to_file(&self.path, &self.contents)?;
        info!("Wrote {}", self.path.display());
        Ok(&self.path)
    }
}

/// Builds artifacts for one output directory
#[derive(Debug, Clone)]
pub struct Assembler {
    output_dir: PathBuf,
    lang: String,
    title: String,
}

impl Assembler {
    pub fn new(output_dir: impl Into<PathBuf>, lang: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            lang: lang.into(),
            title: title.into(),
        }
    }

    /// Output path for an input document
    pub fn output_path(&self, input_file: &Path, mode: RenderMode) -> PathBuf {
        FileManager::generate_output_path(input_file, &self.output_dir, mode.file_suffix(), "html")
    }

    /// Wrap the body into a page bound to the derived file name
    pub fn assemble(&self, body: &str, input_file: &Path, mode: RenderMode) -> Artifact {
        Artifact {
            path: self.output_path(input_file, mode),
            contents: html_document(body, &self.lang, &self.title),
        }
    }
}

/// Minimal HTML shell around a body
pub fn html_document(body: &str, lang: &str, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html lang="{}"><head><meta charset="UTF-8"><title>{}</title></head><body>{}</body></html>"#,
        escape_html(lang),
        escape_html(title),
        body
    )
}

/// Escape text for use inside HTML content or attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
