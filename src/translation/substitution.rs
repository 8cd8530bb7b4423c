/*!
 * Substitution of translated segments back into the extracted text.
 */

use super::table::TranslationTable;

/// Remove line breaks and tabs left over by the extraction step
pub fn strip_layout_whitespace(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Apply replacement pairs strictly in the given order.
///
/// Each pair is a literal, non-overlapping, left-to-right replacement over the
/// whole current text. Not idempotent: a translation may itself contain a key.
pub fn apply_pairs<'a, I>(text: &str, pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut result = text.to_string();
    for (source, translation) in pairs {
        if source.is_empty() || !result.contains(source) {
            continue;
        }
        result = result.replace(source, translation);
    }
    result
}

/// Strip layout whitespace, then apply the table longest segment first
pub fn apply_table(text: &str, table: &TranslationTable) -> String {
    let stripped = strip_layout_whitespace(text);
    apply_pairs(
        &stripped,
        table.iter().map(|e| (e.source.as_str(), e.translation.as_str())),
    )
}
