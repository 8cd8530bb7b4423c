/*!
 * Provider implementations for translation services.
 *
 * This module contains client implementations for translation providers:
 * - Google: the public `translate_a/single` endpoint
 * - Mock: scripted provider used by tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::language_utils::LanguagePair;

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the table builder.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Translate one segment
    ///
    /// # Arguments
    /// * `text` - The segment to translate
    /// * `languages` - Source and target language of the run
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate_one(&self, text: &str, languages: &LanguagePair) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self, languages: &LanguagePair) -> Result<(), ProviderError>;
}

pub mod google;
pub mod mock;
