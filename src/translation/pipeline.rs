/*!
 * End-to-end text pipeline of one run.
 *
 * Raw extracted text goes through segmentation, table building,
 * substitution and, in complex mode, placeholder resolution. The result is
 * the HTML body handed to the assembler.
 */

use log::info;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, EmptyResponsePolicy};
use crate::errors::{PlaceholderError, TranslationError};
use crate::language_utils::LanguagePair;
use crate::providers::Provider;

use super::assembler::{RenderMode, escape_html};
use super::batch::TableBuilder;
use super::placeholders::{FontPolicy, PlaceholderResolver};
use super::segmenter::{Granularity, Segmenter};
use super::substitution::apply_table;
use super::table::TranslationTable;

/// Settings of one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Source and target language
    pub languages: LanguagePair,
    /// Unit size sent to the provider
    pub granularity: Granularity,
    /// Output flavour
    pub render_mode: RenderMode,
    /// Provider calls in flight at most
    pub concurrent_requests: usize,
    /// Timeout of each provider call
    pub call_timeout: Duration,
    /// Prefix of image sources
    pub image_base: String,
    /// Style token correction
    pub font_policy: FontPolicy,
    /// Handling of empty provider answers
    pub empty_response: EmptyResponsePolicy,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            languages: config.language_pair(),
            granularity: config.granularity,
            render_mode: config.render_mode,
            concurrent_requests: config.translation.concurrent_requests,
            call_timeout: config.translation.timeout(),
            image_base: config.rendering.image_base.clone(),
            font_policy: config.rendering.font_policy,
            empty_response: config.translation.empty_response,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// HTML body
    pub body: String,
    /// Table used for substitution
    pub table: TranslationTable,
    /// Placeholders left in the body
    pub unresolved: Vec<PlaceholderError>,
}

/// Runs the text stages with one provider
pub struct TranslationPipeline {
    provider: Arc<dyn Provider>,
    options: RunOptions,
}

impl TranslationPipeline {
    pub fn new(provider: Arc<dyn Provider>, options: RunOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Unique segments of the raw text for the configured mode
    pub fn segment(&self, raw_text: &str) -> HashSet<String> {
        Segmenter::new(self.options.granularity)
            .with_markup(self.options.render_mode == RenderMode::Complex)
            .segment(raw_text)
    }

    /// Translate raw text into an HTML body
    pub async fn translate_text(&self, raw_text: &str) -> Result<RunOutput, TranslationError> {
        self.translate_text_with_progress(raw_text, |_, _| {}).await
    }

    /// Translate raw text, reporting `(done, total)` provider calls
    pub async fn translate_text_with_progress(
        &self,
        raw_text: &str,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<RunOutput, TranslationError> {
        let start_time = Instant::now();
        let segments = self.segment(raw_text);
        info!("Segmented text into {} unique units", segments.len());

        let table = TableBuilder::new(Arc::clone(&self.provider))
            .max_concurrent_requests(self.options.concurrent_requests)
            .call_timeout(self.options.call_timeout)
            .empty_response(self.options.empty_response)
            .build_table_with_progress(segments, &self.options.languages, progress_callback)
            .await?;

        let (body, unresolved) = self.render(raw_text, &table);
        info!("Pipeline finished in {:.2?}", start_time.elapsed());

        Ok(RunOutput {
            body,
            table,
            unresolved,
        })
    }

    /// Substitute and render the body with a finished table
    pub fn render(&self, raw_text: &str, table: &TranslationTable) -> (String, Vec<PlaceholderError>) {
        match self.options.render_mode {
            RenderMode::Simple => (render_paragraphs(raw_text, table), Vec::new()),
            RenderMode::Complex => {
                let substituted = apply_table(raw_text, table);
                let resolution = PlaceholderResolver::new(&self.options.image_base, self.options.font_policy)
                    .resolve(&substituted);
                (resolution.html, resolution.unresolved)
            }
        }
    }
}

/// Simple mode: one escaped `<p>` per non-empty translated line
pub fn render_paragraphs(raw_text: &str, table: &TranslationTable) -> String {
    raw_text
        .lines()
        .map(|line| apply_table(line, table))
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("<p>{}</p>", escape_html(&line)))
        .collect()
}
