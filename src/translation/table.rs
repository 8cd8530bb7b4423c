/*!
 * Ordered translation table.
 *
 * The table keeps its entries in descending order of source length. Applying
 * it in that order guarantees a short segment never rewrites part of a longer
 * segment that contains it before the longer one had its turn.
 */

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One substitution: a source segment and its padded translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Segment as found in the raw text
    pub source: String,
    /// Replacement text, padded with one space on each side
    pub translation: String,
}

/// Mapping from segment to translated segment, longest segment first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationTable {
    entries: Vec<TableEntry>,
}

/// Pad a translation so it does not merge with neighbouring text once substituted
pub fn pad_translation(translated: &str) -> String {
    format!(" {} ", translated)
}

/// Length of a segment as used for ordering
fn segment_len(segment: &str) -> usize {
    segment.chars().count()
}

/// Deduplicate and order segments by descending length.
///
/// Segments of equal length are ordered lexicographically so the result does
/// not depend on the iteration order of the input collection.
pub fn order_by_length<I>(segments: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let unique: HashSet<String> = segments.into_iter().collect();
    let mut ordered: Vec<String> = unique.into_iter().collect();
    ordered.sort_by(|a, b| {
        segment_len(b)
            .cmp(&segment_len(a))
            .then_with(|| a.cmp(b))
    });
    ordered
}

impl TranslationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw (unpadded) translations, padding and ordering them
    pub fn from_translations<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: AsRef<str>,
    {
        Self::from_padded(
            pairs
                .into_iter()
                .map(|(source, translated)| (source.into(), pad_translation(translated.as_ref()))),
        )
    }

    /// Build a table from already padded replacements, ordering them by source length.
    ///
    /// When the same source appears twice, the first replacement wins.
    pub fn from_padded<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut entries: Vec<TableEntry> = Vec::new();
        let mut seen = HashSet::new();
        for (source, translation) in pairs {
            let source = source.into();
            if seen.insert(source.clone()) {
                entries.push(TableEntry {
                    source,
                    translation: translation.into(),
                });
            }
        }
        entries.sort_by(|a, b| {
            segment_len(&b.source)
                .cmp(&segment_len(&a.source))
                .then_with(|| a.source.cmp(&b.source))
        });
        Self { entries }
    }

    /// Freeze entries that are already in application order
    pub(crate) fn from_ordered_entries(entries: Vec<TableEntry>) -> Self {
        Self { entries }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in application order
    pub fn iter(&self) -> impl Iterator<Item = &TableEntry> {
        self.entries.iter()
    }

    /// Source segments in application order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.source.as_str())
    }

    /// Replacement for a segment
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.source == source)
            .map(|e| e.translation.as_str())
    }

    /// Write the table as pretty JSON, preserving application order
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize translation table")?;
        crate::file_utils::FileManager::write_to_file(path, &json)
            .with_context(|| format!("Failed to write translation table: {}", path.display()))
    }
}

impl<'a> IntoIterator for &'a TranslationTable {
    type Item = &'a TableEntry;
    type IntoIter = std::slice::Iter<'a, TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
