/*!
 * Tests for provider implementations
 *
 * None of these tests reach the network: the Google client is exercised
 * through its payload parser and an unreachable endpoint.
 */

use doctrans::app_config::TranslationConfig;
use doctrans::errors::ProviderError;
use doctrans::providers::Provider;
use doctrans::providers::google::{GoogleTranslate, parse_translation_payload};
use doctrans::providers::mock::MockProvider;
use std::time::Duration;

use crate::common;

/// Test chunks of the first sub-list are concatenated
#[test]
fn test_parse_translation_payload_withSeveralChunks_shouldConcatenate() {
    let body = r#"[[["Hello, ","Привіт, ",null,null,10],["world","світ",null,null,10]],null,"uk"]"#;

    let response = parse_translation_payload(body).unwrap();

    assert_eq!(GoogleTranslate::extract_text(&response), "Hello, world");
}

/// Test a null or missing first element yields an empty translation
#[test]
fn test_parse_translation_payload_withNoChunks_shouldBeEmpty() {
    assert!(parse_translation_payload("[null]").unwrap().chunks.is_empty());
    assert!(parse_translation_payload("[]").unwrap().chunks.is_empty());
    assert!(parse_translation_payload("[[]]").unwrap().chunks.is_empty());
}

/// Test chunks without text are skipped
#[test]
fn test_parse_translation_payload_withNullChunkText_shouldSkipIt() {
    let response = parse_translation_payload(r#"[[[null,"x"],["Hi","Привіт"]]]"#).unwrap();
    assert_eq!(response.chunks, vec!["Hi".to_string()]);
}

/// Test payloads of the wrong shape are parse errors
#[test]
fn test_parse_translation_payload_withUnexpectedShape_shouldFail() {
    for body in [r#"{"a":1}"#, "not json", r#"["text"]"#, r#"[["flat"]]"#, r#"[[[42]]]"#] {
        let result = parse_translation_payload(body);
        assert!(
            matches!(result, Err(ProviderError::ParseError(_))),
            "{} should be rejected",
            body
        );
    }
}

/// Test a closed port surfaces as a provider error, never a panic
#[tokio::test]
async fn test_google_withUnreachableEndpoint_shouldReturnError() {
    let config = TranslationConfig {
        endpoint: "http://127.0.0.1:9/translate_a/single".to_string(),
        timeout_secs: 2,
        ..TranslationConfig::default()
    };
    let provider = GoogleTranslate::from_config(&config);

    let result = provider.translate_one("Привіт", &common::uk_en()).await;

    assert!(matches!(
        result,
        Err(ProviderError::ConnectionError(_)) | Err(ProviderError::RequestFailed(_)) | Err(ProviderError::Timeout(_))
    ));
    assert_eq!(provider.name(), "google");
}

/// Test the mock echoes unknown text and answers known text
#[tokio::test]
async fn test_mock_withDictionary_shouldAnswerKnownText() {
    let provider = MockProvider::working().with_dictionary([("Привіт", "Hello")]);
    let languages = common::uk_en();

    assert_eq!(provider.translate_one("Привіт", &languages).await.unwrap(), "Hello");
    assert_eq!(
        provider.translate_one("Світ", &languages).await.unwrap(),
        "[TRANSLATED to en] Світ"
    );
    assert_eq!(provider.call_count(), 2);
}

/// Test the mock failure modes
#[tokio::test]
async fn test_mock_failureModes_shouldBehaveAsConfigured() {
    let languages = common::uk_en();

    assert!(MockProvider::failing().translate_one("a", &languages).await.is_err());
    assert!(MockProvider::failing().test_connection(&languages).await.is_err());
    assert_eq!(MockProvider::empty().translate_one("a", &languages).await.unwrap(), "");

    let slow = MockProvider::slow(200);
    let timed = tokio::time::timeout(Duration::from_millis(20), slow.translate_one("a", &languages)).await;
    assert!(timed.is_err(), "slow mock should outlast a short timeout");
}

/// Test custom generators receive the language pair
#[tokio::test]
async fn test_mock_withCustomResponse_shouldUseGenerator() {
    let provider = MockProvider::working()
        .with_custom_response(|text, languages| format!("{}:{}", languages.target, text.len()));

    let text = provider.translate_one("abc", &common::uk_en()).await.unwrap();
    assert_eq!(text, "en:3");
}
