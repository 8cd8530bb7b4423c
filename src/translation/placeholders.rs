/*!
 * Resolution of image and font placeholders left by the extraction step.
 *
 * Extracted html-mode text carries two kinds of inline tokens:
 *
 * - media tokens, `----media/image<N>.<ext>----`, standing in for pictures;
 * - style tokens, `font-size:<N>pt`, inside the attributes of the generic
 *   inline tag that wraps every paragraph.
 *
 * Resolution runs in three passes over the substituted text:
 *
 * 1. the generic inline tag is rewritten to a block paragraph tag;
 * 2. every distinct image placeholder is rewritten by the first applicable
 *    [`ImageRule`]. Rules introduce inline `<span>` wrappers, which is why the
 *    tag pass must come first;
 * 3. every style token is rewritten once according to the [`FontPolicy`].
 *
 * Tokens that do not follow the grammar are left in place and reported.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::errors::PlaceholderError;

/// A well-formed media token
static IMAGE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"----media/image(\d+)\.([A-Za-z0-9]{3,4})----").unwrap());

/// A well-formed media token and nothing else
static IMAGE_TOKEN_EXACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^----media/image(\d+)\.([A-Za-z0-9]{3,4})----$").unwrap());

/// A well-formed style token
static STYLE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"font-size:(\d+)pt").unwrap());

/// Anything that looks like a media token
static LOOSE_MEDIA: Lazy<Regex> = Lazy::new(|| Regex::new(r"----media/[^\n]*?----").unwrap());

/// Anything that looks like a style declaration
static LOOSE_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"font-size:\s*([^;"'>]*)"#).unwrap());

static STYLE_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+pt$").unwrap());

/// Extension of vector images used for formulas
const FORMULA_EXTENSION: &str = "wmf";

/// Parsed media token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    /// Number of the image in the package
    pub index: u32,
    /// File extension without the dot
    pub extension: String,
}

impl Placeholder {
    /// Parse a complete media token
    pub fn parse(token: &str) -> Result<Self, PlaceholderError> {
        IMAGE_TOKEN_EXACT
            .captures(token)
            .and_then(|caps| Self::from_captures(&caps))
            .ok_or_else(|| PlaceholderError::MalformedMedia(token.to_string()))
    }

    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let index = caps.get(1)?.as_str().parse().ok()?;
        let extension = caps.get(2)?.as_str().to_string();
        Some(Self { index, extension })
    }

    /// File name written by the extraction step, e.g. `image3.png`
    pub fn file_name(&self) -> String {
        format!("image{}.{}", self.index, self.extension)
    }

    /// Token as it appears in the text
    pub fn token(&self) -> String {
        format!("----media/{}----", self.file_name())
    }

    /// Whether the image is a formula rendered inline with text
    pub fn is_formula(&self) -> bool {
        self.extension.eq_ignore_ascii_case(FORMULA_EXTENSION)
    }

    fn img_tag(&self, image_base: &str) -> String {
        let file_name = self.file_name();
        let base = image_base.trim_end_matches('/');
        let src = if base.is_empty() {
            file_name.clone()
        } else {
            format!("{}/{}", base, file_name)
        };
        format!(r#"<img src="{}" alt="{}">"#, src, file_name)
    }
}

/// Parsed style token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontToken {
    /// Size as written by the extraction step (twice the real size)
    pub declared_size: u32,
}

impl FontToken {
    /// Size to emit under the given policy
    pub fn corrected(&self, policy: &FontPolicy) -> u32 {
        policy.apply(self.declared_size)
    }
}

/// Floor division by two, undoing the doubling of the extraction step
pub fn halve(size: u32) -> u32 {
    size / 2
}

/// Correction applied to every style token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum FontPolicy {
    /// Halve every declared size
    #[default]
    Halve,
    /// Use one size for every style token
    Fixed {
        /// Size in points
        size: u32,
    },
    /// Keep declared sizes
    Preserve,
}

impl FontPolicy {
    /// Size to emit for a declared size
    pub fn apply(&self, declared: u32) -> u32 {
        match self {
            FontPolicy::Halve => halve(declared),
            FontPolicy::Fixed { size } => *size,
            FontPolicy::Preserve => declared,
        }
    }
}

/// Rewrite rules for an image placeholder, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRule {
    /// Formula between a paragraph close and a paragraph open carrying
    /// `font_size`: the two paragraphs are fused around an inline image
    InlineFormula {
        /// Declared size of the following paragraph
        font_size: u32,
    },
    /// Any non-formula image becomes its own paragraph
    StandaloneFigure,
    /// Formula right after a paragraph close: moved inside that paragraph
    TrailingFormula,
    /// Any other occurrence becomes a bare inline image
    Fallback,
}

impl ImageRule {
    /// First rule applicable to the placeholder in the current text.
    ///
    /// Returns `None` once the token no longer occurs in the text.
    pub fn classify(html: &str, placeholder: &Placeholder, font_sizes: &[u32]) -> Option<Self> {
        let token = placeholder.token();
        if !html.contains(&token) {
            return None;
        }

        if placeholder.is_formula() {
            for &font_size in font_sizes {
                let rule = ImageRule::InlineFormula { font_size };
                if html.contains(&rule.pattern(placeholder)) {
                    return Some(rule);
                }
            }
        }

        if !placeholder.is_formula() {
            return Some(ImageRule::StandaloneFigure);
        }

        if html.contains(&ImageRule::TrailingFormula.pattern(placeholder)) {
            return Some(ImageRule::TrailingFormula);
        }

        Some(ImageRule::Fallback)
    }

    /// Text matched by this rule
    pub fn pattern(&self, placeholder: &Placeholder) -> String {
        let token = placeholder.token();
        match self {
            ImageRule::InlineFormula { font_size } => {
                format!(r#"</p>{}<p style="font-size:{}pt">"#, token, font_size)
            }
            ImageRule::TrailingFormula => format!("</p>{}", token),
            ImageRule::StandaloneFigure | ImageRule::Fallback => token,
        }
    }

    /// Text replacing every match of this rule
    pub fn replacement(&self, placeholder: &Placeholder, image_base: &str) -> String {
        let img = placeholder.img_tag(image_base);
        match self {
            ImageRule::InlineFormula { .. } | ImageRule::Fallback => format!("<span>{}</span>", img),
            ImageRule::StandaloneFigure => format!("<p>{}</p>", img),
            ImageRule::TrailingFormula => format!("<span>{}</span></p>", img),
        }
    }

    /// Apply the rule to every match in the text
    pub fn apply(&self, html: &str, placeholder: &Placeholder, image_base: &str) -> String {
        html.replace(&self.pattern(placeholder), &self.replacement(placeholder, image_base))
    }
}

/// Rewrite the generic inline tag of the extraction step to a paragraph tag
pub fn normalize_paragraph_tags(text: &str) -> String {
    text.replace("<span", "<p").replace("span>", "p>")
}

/// Distinct placeholders in order of first appearance
pub fn find_placeholders(text: &str) -> Vec<Placeholder> {
    let mut seen = HashSet::new();
    IMAGE_TOKEN
        .captures_iter(text)
        .filter_map(|caps| Placeholder::from_captures(&caps))
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Distinct style tokens, smallest first
pub fn find_font_tokens(text: &str) -> Vec<FontToken> {
    STYLE_TOKEN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .map(|declared_size| FontToken { declared_size })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Outcome of a resolution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved body
    pub html: String,
    /// Tokens left in place because they do not follow the grammar
    pub unresolved: Vec<PlaceholderError>,
}

/// Rewrites media and style tokens into final HTML
#[derive(Debug, Clone)]
pub struct PlaceholderResolver {
    image_base: String,
    font_policy: FontPolicy,
}

impl Default for PlaceholderResolver {
    fn default() -> Self {
        Self::new("media", FontPolicy::default())
    }
}

impl PlaceholderResolver {
    pub fn new(image_base: impl Into<String>, font_policy: FontPolicy) -> Self {
        Self {
            image_base: image_base.into(),
            font_policy,
        }
    }

    /// Resolve every placeholder of the text
    pub fn resolve(&self, text: &str) -> Resolution {
        let mut html = normalize_paragraph_tags(text);

        let font_sizes: Vec<u32> = find_font_tokens(&html)
            .into_iter()
            .map(|t| t.declared_size)
            .collect();

        for placeholder in find_placeholders(&html) {
            while let Some(rule) = ImageRule::classify(&html, &placeholder, &font_sizes) {
                debug!("Resolving {} with {:?}", placeholder.file_name(), rule);
                html = rule.apply(&html, &placeholder, &self.image_base);
            }
        }

        let html = self.correct_font_sizes(&html);
        let unresolved = find_malformed(&html);
        for problem in &unresolved {
            warn!("{}; left unresolved", problem);
        }

        Resolution { html, unresolved }
    }

    /// Rewrite each style token exactly once
    pub fn correct_font_sizes(&self, html: &str) -> String {
        STYLE_TOKEN
            .replace_all(html, |caps: &Captures<'_>| match caps[1].parse::<u32>() {
                Ok(declared_size) => {
                    let token = FontToken { declared_size };
                    format!("font-size:{}pt", token.corrected(&self.font_policy))
                }
                Err(_) => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Resolve with the default image base and the halving font policy
pub fn resolve_images_and_fonts(text: &str) -> String {
    PlaceholderResolver::default().resolve(text).html
}

/// Media and style tokens that survived resolution
fn find_malformed(html: &str) -> Vec<PlaceholderError> {
    let media = LOOSE_MEDIA
        .find_iter(html)
        .map(|m| PlaceholderError::MalformedMedia(m.as_str().to_string()));

    let styles = LOOSE_STYLE
        .captures_iter(html)
        .filter(|caps| !STYLE_VALUE.is_match(caps[1].trim()))
        .map(|caps| PlaceholderError::MalformedStyle(caps[0].to_string()));

    media.chain(styles).collect()
}
