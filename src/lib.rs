/*!
 * # doctrans - Word document translation to HTML
 *
 * A Rust library that translates the text of Word documents through a
 * machine-translation endpoint and renders the result as an HTML page.
 *
 * ## Features
 *
 * - Extract paragraphs, font sizes and images from `.docx` packages
 * - Translate every unique segment once, with bounded concurrency
 * - Substitute translations longest segment first
 * - Resolve image and font placeholders into HTML
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `extraction`: Document readers producing raw text
 * - `translation`: The translation pipeline:
 *   - `translation::segmenter`: Translatable unit extraction
 *   - `translation::batch`: Concurrent table building
 *   - `translation::substitution`: Table application
 *   - `translation::placeholders`: Image and font resolution
 *   - `translation::assembler`: HTML page assembly
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Translation endpoint clients
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ExtractionError, PlaceholderError, ProviderError, TranslationError};
pub use language_utils::{LanguagePair, get_language_name, language_codes_match, normalize_to_part2t};
pub use translation::{TranslationPipeline, TranslationTable};
