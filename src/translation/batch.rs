/*!
 * Translation table construction.
 *
 * This module fans provider calls out over the unique segments of a run,
 * with bounded concurrency and a per-call timeout, and freezes the results
 * into a [`TranslationTable`] once every call has succeeded.
 */

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use crate::app_config::EmptyResponsePolicy;
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils::LanguagePair;
use crate::providers::Provider;

use super::table::{TableEntry, TranslationTable, order_by_length, pad_translation};

/// Builds translation tables with a provider
pub struct TableBuilder {
    /// Provider used for every segment
    provider: Arc<dyn Provider>,

    /// Maximum number of concurrent requests
    max_concurrent_requests: usize,

    /// Timeout applied to each provider call
    call_timeout: Duration,

    /// Handling of answers without translated text
    empty_response: EmptyResponsePolicy,
}

impl TableBuilder {
    /// Create a new table builder
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            max_concurrent_requests: 4,
            call_timeout: Duration::from_secs(30),
            empty_response: EmptyResponsePolicy::default(),
        }
    }

    /// Set the maximum number of requests in flight
    pub fn max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max.max(1);
        self
    }

    /// Set the timeout of each provider call
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the handling of empty answers
    pub fn empty_response(mut self, policy: EmptyResponsePolicy) -> Self {
        self.empty_response = policy;
        self
    }

    /// Build a table without progress reporting
    pub async fn build_table<I>(
        &self,
        segments: I,
        languages: &LanguagePair,
    ) -> Result<TranslationTable, TranslationError>
    where
        I: IntoIterator<Item = String>,
    {
        self.build_table_with_progress(segments, languages, |_, _| {}).await
    }

    /// Translate every segment and return the table, longest segment first.
    ///
    /// The first provider failure aborts the build; no partial table is returned.
    pub async fn build_table_with_progress<I>(
        &self,
        segments: I,
        languages: &LanguagePair,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<TranslationTable, TranslationError>
    where
        I: IntoIterator<Item = String>,
    {
        let ordered = order_by_length(segments);
        let total = ordered.len();
        if total == 0 {
            return Ok(TranslationTable::new());
        }

        info!(
            "Translating {} segments ({}) with {}",
            total,
            languages,
            self.provider.name()
        );

        let start_time = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_requests));
        let processed = Arc::new(AtomicUsize::new(0));
        let timeout_secs = self.call_timeout.as_secs();

        let results = stream::iter(ordered.iter().enumerate())
            .map(|(index, segment)| {
                let provider = Arc::clone(&self.provider);
                let semaphore = Arc::clone(&semaphore);
                let processed = Arc::clone(&processed);
                let progress_callback = progress_callback.clone();
                let call_timeout = self.call_timeout;
                let empty_response = self.empty_response;

                async move {
                    let _permit = match semaphore.acquire().await {
                        Ok(permit) => permit,
                        Err(e) => return Err(ProviderError::RequestFailed(e.to_string())),
                    };

                    let result =
                        tokio::time::timeout(call_timeout, provider.translate_one(segment, languages))
                            .await
                            .unwrap_or(Err(ProviderError::Timeout(timeout_secs)))
                            .and_then(|translated| check_empty(segment, translated, empty_response));

                    let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total);

                    match &result {
                        Ok(translated) => debug!("Segment {} translated: '{}'", index + 1, translated),
                        Err(e) => error!("Segment {} failed: {}", index + 1, e),
                    }

                    result.map(|translated| (index, translated))
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .try_collect::<Vec<(usize, String)>>()
            .await;

        // Calls still in flight are dropped with the stream on the first failure
        let mut translated = results?;

        // Key results by position so the table never depends on completion order
        translated.sort_by_key(|(index, _)| *index);

        let entries = translated
            .into_iter()
            .map(|(index, text)| TableEntry {
                source: ordered[index].clone(),
                translation: pad_translation(&text),
            })
            .collect();

        let elapsed = start_time.elapsed();
        info!(
            "Translation table built in {:.2?} ({:.2?} per segment)",
            elapsed,
            elapsed / total as u32
        );

        Ok(TranslationTable::from_ordered_entries(entries))
    }
}

/// Apply the empty-answer policy to one provider result
fn check_empty(
    segment: &str,
    translated: String,
    policy: EmptyResponsePolicy,
) -> Result<String, ProviderError> {
    if !translated.trim().is_empty() {
        return Ok(translated);
    }
    match policy {
        EmptyResponsePolicy::Accept => {
            warn!("Empty translation for '{}', keeping an empty string", segment);
            Ok(translated)
        }
        EmptyResponsePolicy::Reject => Err(ProviderError::EmptyTranslation(segment.to_string())),
    }
}
