/*!
 * Tests for substitution of translations into the text
 */

use doctrans::translation::substitution::{apply_pairs, apply_table, strip_layout_whitespace};
use doctrans::translation::table::TranslationTable;

/// Test untranslated text and padding survive substitution
#[test]
fn test_apply_table_withPartialTable_shouldKeepRemainderAndPadding() {
    let table = TranslationTable::from_padded(vec![("Привіт", " Hello ")]);
    assert_eq!(apply_table("Привіт, світ", &table), " Hello , світ");
}

/// Test line breaks and tabs are removed before substitution
#[test]
fn test_apply_table_withLayoutWhitespace_shouldStripItFirst() {
    let table = TranslationTable::from_translations(vec![("Один", "One"), ("Два", "Two")]);
    assert_eq!(apply_table("Один\nДва\t\r", &table), " One  Two ");
}

/// Test an empty table only strips layout whitespace
#[test]
fn test_apply_table_withEmptyTable_shouldOnlyStrip() {
    assert_eq!(apply_table("a\nb\tc", &TranslationTable::new()), "abc");
    assert_eq!(strip_layout_whitespace("\r\n\t"), "");
}

/// Test longest-first order keeps a long segment whole when it contains a shorter one
#[test]
fn test_apply_table_withNestedSegments_shouldApplyLongestFirst() {
    let table = TranslationTable::from_translations(vec![
        ("Привіт", "Hi"),
        ("Привіт світ", "Hello world"),
    ]);

    assert_eq!(apply_table("Привіт світ", &table), " Hello world ");
}

/// Test the reversed order breaks the nested segment, guarding the ordering
#[test]
fn test_apply_pairs_withShortestFirst_shouldCorruptNestedSegment() {
    let shortest_first = vec![("Привіт", " Hi "), ("Привіт світ", " Hello world ")];
    let result = apply_pairs("Привіт світ", shortest_first);

    assert_eq!(result, " Hi  світ");
    assert_ne!(result, " Hello world ");
}

/// Test every occurrence of a segment is replaced
#[test]
fn test_apply_pairs_withRepeatedSegment_shouldReplaceAll() {
    assert_eq!(apply_pairs("Так і так Так", vec![("Так", "Yes")]), "Yes і так Yes");
}
