use anyhow::{Result, anyhow};
use isolang::Language;
use serde::{Deserialize, Serialize};

/// Language utilities for ISO language code handling
///
/// Translation providers accept ISO 639-1 codes, optionally followed by a
/// region subtag (`zh-CN`, `pt-BR`). Validation and comparison only look at
/// the primary subtag.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// Source and target language of one translation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Language of the document
    pub source: String,
    /// Language to translate into
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Lowercased primary subtag of a code (`zh-CN` -> `zh`)
fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let primary = primary_subtag(code);

    if primary.len() == 2 && Language::from_639_1(&primary).is_some() {
        return Ok(LanguageCodeType::Part1);
    }

    if primary.len() == 3 {
        if Language::from_639_3(&primary).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }
        if bibliographic_to_terminology(&primary).is_some() {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let primary = primary_subtag(code);

    match validate_language_code(code)? {
        LanguageCodeType::Part1 => Language::from_639_1(&primary)
            .map(|lang| lang.to_639_3().to_string())
            .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code)),
        LanguageCodeType::Part2T => Ok(primary),
        LanguageCodeType::Part2B => bibliographic_to_terminology(&primary)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code)),
    }
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
