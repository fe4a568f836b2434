/*!
 * Integration tests for the HTTP provider against a local stub server
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use jp2subs::app_config::ProviderSettings;
use jp2subs::errors::{ProviderError, TranslationError};
use jp2subs::providers::{BlockRequest, GenericApiProvider, ProviderHooks, TranslationProvider};
use jp2subs::{Glossary, ProviderRegistry, TranslationOptions, Translator};

use crate::common::http_stub::{spawn_http_stub, spawn_slow_http_stub};
use crate::common::sample_document;

#[tokio::test]
async fn test_apiProvider_shouldPostBlockWithBearerToken() {
    let server = spawn_http_stub(vec![(200, r#"{"translations": ["2\tthanks", "1\thello"]}"#)]).await;
    let provider = GenericApiProvider::new(server.endpoint.clone(), Some("secret".to_string()), Duration::from_secs(5));
    let lines = vec!["1\tこんにちは".to_string(), "2\tありがとう".to_string()];
    let glossary: Glossary = [("先輩", "senpai")].into_iter().collect();
    let request = BlockRequest {
        prompt: "Translate.",
        lines: &lines,
        source_lang: "ja",
        target_lang: "en",
        glossary: Some(&glossary),
    };

    let out = provider.translate_block(&request, &ProviderHooks::default()).await.unwrap();

    assert_eq!(out, vec!["2\tthanks", "1\thello"]);
    let captured = server.requests();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].path, "/v1/translate");
    assert_eq!(captured[0].header("authorization"), Some("Bearer secret"));
    assert_eq!(
        *captured[0].json(),
        serde_json::json!({
            "source_lang": "ja",
            "target_lang": "en",
            "lines": ["1\tこんにちは", "2\tありがとう"],
            "prompt": "Translate.",
            "glossary": {"先輩": "senpai"}
        })
    );
}

#[tokio::test]
async fn test_apiProvider_withoutKey_shouldOmitAuthorization() {
    let server = spawn_http_stub(vec![(200, r#"{"translations": []}"#)]).await;
    let provider = GenericApiProvider::new(server.endpoint.clone(), None, Duration::from_secs(5));
    let lines = vec!["1\ta".to_string()];
    let request = BlockRequest {
        prompt: "P",
        lines: &lines,
        source_lang: "ja",
        target_lang: "en",
        glossary: None,
    };

    let out = provider.translate_block(&request, &ProviderHooks::default()).await.unwrap();

    assert!(out.is_empty());
    let captured = server.requests();
    assert_eq!(captured[0].header("authorization"), None);
    assert_eq!(captured[0].json()["glossary"], serde_json::json!({}));
}

#[tokio::test]
async fn test_apiProvider_withErrorStatus_shouldReturnApiError() {
    let server = spawn_http_stub(vec![(503, r#"{"error": "model loading"}"#)]).await;
    let provider = GenericApiProvider::new(server.endpoint.clone(), None, Duration::from_secs(5));
    let lines = vec!["1\ta".to_string()];
    let request = BlockRequest {
        prompt: "P",
        lines: &lines,
        source_lang: "ja",
        target_lang: "en",
        glossary: None,
    };

    let err = provider.translate_block(&request, &ProviderHooks::default()).await.unwrap_err();

    match err {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(status_code, 503);
            assert!(message.contains("model loading"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_apiProvider_withMalformedBody_shouldReturnParseError() {
    let server = spawn_http_stub(vec![(200, "not json")]).await;
    let provider = GenericApiProvider::new(server.endpoint.clone(), None, Duration::from_secs(5));
    let lines = vec!["1\ta".to_string()];
    let request = BlockRequest {
        prompt: "P",
        lines: &lines,
        source_lang: "ja",
        target_lang: "en",
        glossary: None,
    };

    let err = provider.translate_block(&request, &ProviderHooks::default()).await.unwrap_err();

    assert!(matches!(err, ProviderError::ParseError(_)), "{:?}", err);
}

#[tokio::test]
async fn test_apiProvider_throughOrchestrator_shouldTranslateEveryBlock() {
    let server = spawn_http_stub(vec![
        (200, r#"{"translations": ["1\tgood morning", "2\tsenpai"]}"#),
        (200, r#"{"translations": ["3\tsee you"]}"#),
    ])
    .await;
    let mut settings = ProviderSettings::default();
    settings.api.endpoint = server.endpoint.clone();
    settings.api.api_key = Some("k".to_string());
    let translator = Translator::new(ProviderRegistry::new(settings));
    let mut doc = sample_document(&["おはよう", "先輩", "またね"]);

    let options = TranslationOptions::new(["en"]).with_provider("api").with_block_size(2);
    let summary = translator.translate_document(&mut doc, &options, None).await.unwrap();

    assert_eq!(
        doc.translations_for("en"),
        vec![Some("good morning"), Some("senpai"), Some("see you")]
    );
    assert_eq!(summary.provider_calls, 2);
    let captured = server.requests();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[1].json()["lines"], serde_json::json!(["3\tまたね"]));
}

#[tokio::test]
async fn test_apiProvider_withServerError_shouldAbortTranslation() {
    let server = spawn_http_stub(vec![(500, "{}")]).await;
    let mut settings = ProviderSettings::default();
    settings.api.endpoint = server.endpoint.clone();
    let translator = Translator::new(ProviderRegistry::new(settings));
    let mut doc = sample_document(&["一"]);

    let options = TranslationOptions::new(["en"]).with_provider("api");
    let err = translator.translate_document(&mut doc, &options, None).await.unwrap_err();

    assert!(matches!(
        err,
        TranslationError::Provider(ProviderError::ApiError { status_code: 500, .. })
    ));
    assert_eq!(doc.translations_for("en"), vec![None]);
}

#[tokio::test]
async fn test_apiProvider_whenCancelledInFlight_shouldReturnWithoutWaitingForReply() {
    let server =
        spawn_slow_http_stub(vec![(200, r#"{"translations": ["1\tlate"]}"#)], Duration::from_secs(30)).await;
    let provider = GenericApiProvider::new(server.endpoint.clone(), None, Duration::from_secs(120));
    let log = server.request_log();
    let hooks = ProviderHooks::new().with_cancel_check(Arc::new(move || !log.lock().unwrap().is_empty()));
    let started = Instant::now();
    let lines = vec!["1\ta".to_string()];
    let request = BlockRequest {
        prompt: "P",
        lines: &lines,
        source_lang: "ja",
        target_lang: "en",
        glossary: None,
    };

    let err = provider.translate_block(&request, &hooks).await.unwrap_err();

    assert!(matches!(err, ProviderError::Cancelled), "{:?}", err);
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(server.requests().len(), 1);
}
