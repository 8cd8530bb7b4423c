/*!
 * Segmentation of extracted text into translatable units.
 *
 * A unit is kept only when it carries non-ASCII text: pure ASCII lines are
 * assumed to be punctuation, numbers or text already in the target language.
 * Media tokens are never sent for translation.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Delimiter around media references inside extracted text
pub const MEDIA_DELIMITER: &str = "----";

/// Opening of a media token
pub const MEDIA_PREFIX: &str = "----media/";

/// Marker identifying the inside of a media token
const MEDIA_MARKER: &str = "media/image";

/// Any markup tag
static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Size of the units sent for translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One unit per line
    Paragraph,
    /// Lines further split on `.`
    #[default]
    Sentence,
}

/// Splits raw text into a deduplicated set of segments
#[derive(Debug, Clone)]
pub struct Segmenter {
    granularity: Granularity,
    strip_markup: bool,
}

impl Segmenter {
    /// Create a segmenter for plain text
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            strip_markup: false,
        }
    }

    /// Treat markup tags as unit boundaries, for html-mode extraction output
    pub fn with_markup(mut self, strip_markup: bool) -> Self {
        self.strip_markup = strip_markup;
        self
    }

    /// Segment the raw text
    pub fn segment(&self, raw_text: &str) -> HashSet<String> {
        let visible = if self.strip_markup {
            MARKUP_TAG.replace_all(raw_text, "\n")
        } else {
            raw_text.into()
        };

        let blocks = clean_from_media_tokens(break_into_paragraphs(&visible));

        match self.granularity {
            Granularity::Paragraph => blocks,
            Granularity::Sentence => break_into_sentences(blocks),
        }
    }
}

/// Segment plain raw text with the given granularity
pub fn segment(raw_text: &str, granularity: Granularity) -> HashSet<String> {
    Segmenter::new(granularity).segment(raw_text)
}

/// Whether a candidate unit is worth a provider call
pub fn is_translatable(unit: &str) -> bool {
    !unit.trim().is_empty() && !unit.is_ascii()
}

/// Lines of the text, tabs counting as line boundaries; empty lines dropped
fn break_into_paragraphs(text: &str) -> Vec<&str> {
    text.split(['\n', '\r', '\t'])
        .filter(|line| !line.is_empty())
        .collect()
}

fn clean_from_media_tokens(paragraphs: Vec<&str>) -> HashSet<String> {
    let mut blocks = HashSet::new();
    for paragraph in paragraphs {
        if paragraph.contains(MEDIA_PREFIX) {
            blocks.extend(
                paragraph
                    .split(MEDIA_DELIMITER)
                    .filter(|part| !part.contains(MEDIA_MARKER) && is_translatable(part))
                    .map(str::to_string),
            );
        } else if is_translatable(paragraph) {
            blocks.insert(paragraph.to_string());
        }
    }
    blocks
}

fn break_into_sentences(blocks: HashSet<String>) -> HashSet<String> {
    blocks
        .iter()
        .flat_map(|block| block.split('.'))
        .filter(|sentence| is_translatable(sentence))
        .map(str::to_string)
        .collect()
}
