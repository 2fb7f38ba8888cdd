use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interface::{TranslateError, Translation, Translator};

/// LibreTranslate client
#[derive(Debug, Clone)]
pub struct LibreTranslator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreResponse {
    translated_text: String,
    detected_language: Option<DetectedLanguage>,
}

#[derive(Debug, Deserialize)]
struct DetectedLanguage {
    language: String,
}

#[derive(Debug, Deserialize)]
struct LibreErrorBody {
    error: String,
}

impl LibreTranslator {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl Translator for LibreTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Translation, TranslateError> {
        let url = format!("{}/translate", self.base_url);
        debug!("LibreTranslate request: {} -> {}", source, target);

        let request = LibreRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<LibreErrorBody>(&raw)
                .map(|body| body.error)
                .unwrap_or(raw);
            return Err(TranslateError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: LibreResponse = response.json().await?;
        Ok(Translation {
            text: body.translated_text,
            source_language: body
                .detected_language
                .map(|d| d.language)
                .unwrap_or_else(|| source.to_string()),
        })
    }

    fn name(&self) -> &str {
        "libre"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    use crate::translate::test_support::serve;

    /// Stub LibreTranslate that records every request body
    async fn recording_server(seen: Arc<Mutex<Vec<Value>>>) -> String {
        let app = Router::new().route(
            "/translate",
            post(move |Json(body): Json<Value>| {
                let seen = seen.clone();
                async move {
                    let translated = format!(
                        "[{}] {}",
                        body["target"].as_str().unwrap_or(""),
                        body["q"].as_str().unwrap_or("")
                    );
                    let reply = json!({
                        "translatedText": translated,
                        "detectedLanguage": {"confidence": 92.0, "language": "de"}
                    });
                    seen.lock().unwrap().push(body);
                    Json(reply)
                }
            }),
        );
        serve(app).await
    }

    #[tokio::test]
    async fn reads_translation_and_detected_language() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base_url = recording_server(seen.clone()).await;
        let translator = LibreTranslator::new(Client::new(), format!("{}/", base_url), None);

        let translation = translator.translate("Hallo", "auto", "en").await.unwrap();

        assert_eq!(translation.text, "[en] Hallo");
        assert_eq!(translation.source_language, "de");

        let requests = seen.lock().unwrap();
        assert_eq!(
            requests[0],
            json!({"q": "Hallo", "source": "auto", "target": "en", "format": "text"})
        );
    }

    #[tokio::test]
    async fn sends_api_key_when_configured() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base_url = recording_server(seen.clone()).await;
        let translator =
            LibreTranslator::new(Client::new(), base_url, Some("secret".to_string()));

        translator.translate("Hello", "en", "fr").await.unwrap();

        assert_eq!(seen.lock().unwrap()[0]["api_key"], "secret");
    }

    #[tokio::test]
    async fn missing_detection_keeps_requested_source() {
        let app = Router::new().route(
            "/translate",
            post(|| async { Json(json!({"translatedText": "Bonjour"})) }),
        );
        let translator = LibreTranslator::new(Client::new(), serve(app).await, None);

        let translation = translator.translate("Hello", "en", "fr").await.unwrap();
        assert_eq!(translation.text, "Bonjour");
        assert_eq!(translation.source_language, "en");
    }

    #[tokio::test]
    async fn error_status_uses_provider_message() {
        let app = Router::new().route(
            "/translate",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "xx is not supported"})),
                )
            }),
        );
        let translator = LibreTranslator::new(Client::new(), serve(app).await, None);

        match translator.translate("Hello", "en", "xx").await {
            Err(TranslateError::Status { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "xx is not supported");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn error_status_without_json_keeps_raw_body() {
        let app = Router::new().route(
            "/translate",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let translator = LibreTranslator::new(Client::new(), serve(app).await, None);

        match translator.translate("Hello", "en", "fr").await {
            Err(TranslateError::Status { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }
}
