/*!
 * Tests for document extraction
 */

use anyhow::Result;
use doctrans::errors::ExtractionError;
use doctrans::extraction::{DocumentExtractor, DocxExtractor, ExtractOptions, PlainTextExtractor, extractor_for};
use std::fs;

use crate::common;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Test plain extraction returns one line per paragraph
#[test]
fn test_docx_plain_withParagraphs_shouldReturnLines() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = format!(
        "{}{}",
        common::sized_paragraph("Привіт, світ", 28),
        common::sized_paragraph("Друге", 24)
    );
    let path = common::build_test_docx(temp_dir.path(), "plain.docx", &body, &[])?;

    let text = DocxExtractor.extract(&path, &ExtractOptions::plain())?;

    assert_eq!(text, "Привіт, світ\nДруге");
    Ok(())
}

/// Test html extraction keeps the doubled font sizes as inline style
#[test]
fn test_docx_html_withSizedRuns_shouldWrapInStyledSpans() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = common::sized_paragraph("a &amp; b", 28);
    let path = common::build_test_docx(temp_dir.path(), "styled.docx", &body, &[])?;

    let options = ExtractOptions {
        image_dir: None,
        html: true,
    };
    let text = DocxExtractor.extract(&path, &options)?;

    assert_eq!(text, r#"<span style="font-size:28pt">a &amp; b</span>"#);
    Ok(())
}

/// Test images become tokens and are written to the image directory
#[test]
fn test_docx_withImage_shouldEmitTokenAndWriteFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = format!(
        "{}{}",
        common::sized_paragraph("Рисунок", 28),
        common::image_paragraph("rId7")
    );
    let path = common::build_test_docx(
        temp_dir.path(),
        "figure.docx",
        &body,
        &[("rId7", "image1.png", PNG_BYTES)],
    )?;
    let media_dir = temp_dir.path().join("media");

    let text = DocxExtractor.extract(&path, &ExtractOptions::html_with_images(&media_dir))?;

    assert!(text.contains("----media/image1.png----"));
    assert_eq!(fs::read(media_dir.join("image1.png"))?, PNG_BYTES);
    Ok(())
}

/// Test a file that is not a zip package fails to open
#[test]
fn test_docx_withInvalidPackage_shouldFailToOpen() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.docx", "not a zip")?;

    let result = DocxExtractor.extract(&path, &ExtractOptions::plain());

    assert!(matches!(result, Err(ExtractionError::Open { .. })));
    Ok(())
}

/// Test plain text files are read verbatim
#[test]
fn test_plain_text_shouldReturnContentVerbatim() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "dump.txt", "Привіт\n----media/image1.png----")?;

    let text = PlainTextExtractor.extract(&path, &ExtractOptions::plain())?;

    assert_eq!(text, "Привіт\n----media/image1.png----");
    Ok(())
}

/// Test the extractor is chosen by extension
#[test]
fn test_extractor_for_shouldDispatchOnExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "dump.txt", "Так")?;

    let extractor = extractor_for(&path)?;
    assert_eq!(extractor.extract(&path, &ExtractOptions::plain())?, "Так");

    assert!(matches!(
        extractor_for(&temp_dir.path().join("deck.pptx")),
        Err(ExtractionError::Unsupported(_))
    ));
    Ok(())
}

/// Test a missing text file fails to open
#[test]
fn test_plain_text_withMissingFile_shouldFailToOpen() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let result = PlainTextExtractor.extract(&temp_dir.path().join("absent.txt"), &ExtractOptions::plain());

    assert!(matches!(result, Err(ExtractionError::Open { .. })));
    Ok(())
}

/// Test html extraction wraps paragraphs that carry no explicit size
#[test]
fn test_docx_html_withUnsizedParagraphs_shouldWrapEachParagraph() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let body = format!("{}{}", common::plain_paragraph("Привіт"), common::plain_paragraph("Світ"));
    let path = common::build_test_docx(temp_dir.path(), "unstyled.docx", &body, &[])?;

    let text = DocxExtractor.extract(&path, &ExtractOptions::html_with_images(temp_dir.path().join("media")))?;

    assert_eq!(text, "<span>Привіт</span>\n<span>Світ</span>");
    Ok(())
}
