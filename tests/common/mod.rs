/*!
 * Common test utilities for the doctrans test suite
 */

use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use doctrans::app_config::Config;
use doctrans::language_utils::LanguagePair;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route library logs through env_logger, once per test binary
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The language pair used across the suite
pub fn uk_en() -> LanguagePair {
    LanguagePair::new("uk", "en")
}

/// Default configuration writing everything below `root`
pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.rendering.output_dir = root.join("output");
    config.rendering.media_dir = root.join("output").join("media");
    config.translation.concurrent_requests = 2;
    config.translation.timeout_secs = 5;
    config
}

/// Wrap paragraph XML into a `word/document.xml` part
pub fn document_xml(paragraphs: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
            r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
            r#"xmlns:v="urn:schemas-microsoft-com:vml">"#,
            r#"<w:body>{}</w:body></w:document>"#
        ),
        paragraphs
    )
}

/// One paragraph with a single sized run
pub fn sized_paragraph(text: &str, half_points: u32) -> String {
    format!(
        r#"<w:p><w:r><w:rPr><w:sz w:val="{}"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        half_points, text
    )
}

/// One paragraph whose size comes from the document styles
pub fn plain_paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

/// One paragraph holding a DrawingML image
pub fn image_paragraph(relationship_id: &str) -> String {
    format!(
        r#"<w:p><w:r><w:drawing><a:graphic><a:graphicData><a:blip r:embed="{}"/></a:graphicData></a:graphic></w:drawing></w:r></w:p>"#,
        relationship_id
    )
}

/// Write a minimal `.docx` package with the given body and images
///
/// Images are `(relationship id, file name, bytes)`; they are stored under
/// `word/media/` and registered in the document relationships.
pub fn build_test_docx(
    dir: &Path,
    filename: &str,
    body: &str,
    images: &[(&str, &str, &[u8])],
) -> Result<PathBuf> {
    let path = dir.join(filename);
    let mut zip = ZipWriter::new(File::create(&path)?);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#,
    )?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml(body).as_bytes())?;

    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, name, _) in images {
        rels.push_str(&format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{}"/>"#,
            id, name
        ));
    }
    rels.push_str("</Relationships>");
    zip.start_file("word/_rels/document.xml.rels", options)?;
    zip.write_all(rels.as_bytes())?;

    for (_, name, data) in images {
        zip.start_file(format!("word/media/{}", name), options)?;
        zip.write_all(data)?;
    }

    zip.finish()?;
    Ok(path)
}
