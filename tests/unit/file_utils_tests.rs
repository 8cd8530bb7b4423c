/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use doctrans::file_utils::{FileManager, FileType};
use std::fs;
use std::path::Path;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.txt", "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path appends the suffix to the stem
#[test]
fn test_generate_output_path_withSuffix_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/report.docx"),
        Path::new("/tmp/output"),
        "_complex",
        ".html",
    );

    assert_eq!(output_path, Path::new("/tmp/output/report_complex.html"));
}

/// Test that ensure_dir creates nested directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

/// Test that write_to_file creates missing parents
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = temp_dir.path().join("out").join("page.html");

    FileManager::write_to_file(&test_file, "<p>x</p>")?;

    assert_eq!(fs::read_to_string(&test_file)?, "<p>x</p>");
    assert_eq!(FileManager::read_to_string(&test_file)?, "<p>x</p>");
    Ok(())
}

/// Test that find_files walks subdirectories and skips Word lock files
#[test]
fn test_find_files_withNestedDocuments_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    fs::create_dir_all(&nested)?;

    common::create_test_file(temp_dir.path(), "b.docx", "")?;
    common::create_test_file(&nested, "a.DOCX", "")?;
    common::create_test_file(temp_dir.path(), "~$b.docx", "")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "")?;

    let found = FileManager::find_files(temp_dir.path(), "docx")?;

    assert_eq!(found.len(), 2);
    assert!(found.contains(&temp_dir.path().join("b.docx")));
    assert!(found.contains(&nested.join("a.DOCX")));
    let mut sorted = found.clone();
    sorted.sort();
    assert_eq!(found, sorted);
    Ok(())
}

/// Test file type detection by extension
#[test]
fn test_detect_file_type_withKnownExtensions_shouldClassify() {
    assert_eq!(FileManager::detect_file_type("report.docx"), FileType::WordDocument);
    assert_eq!(FileManager::detect_file_type("REPORT.DOCX"), FileType::WordDocument);
    assert_eq!(FileManager::detect_file_type("dump.txt"), FileType::Text);
    assert_eq!(FileManager::detect_file_type("page.htm"), FileType::Text);
    assert_eq!(FileManager::detect_file_type("slides.pptx"), FileType::Unknown);
    assert_eq!(FileManager::detect_file_type("no_extension"), FileType::Unknown);
}
