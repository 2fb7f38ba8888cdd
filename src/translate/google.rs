use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::interface::{TranslateError, Translation, Translator};

pub const DEFAULT_GOOGLE_URL: &str = "https://translate.googleapis.com";

/// Client for the public Google Translate `translate_a/single` endpoint
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Translation, TranslateError> {
        let url = format!("{}/translate_a/single", self.base_url);
        debug!("Google translate request: {} -> {}, {} chars", source, target, text.chars().count());

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: Value = response.json().await?;
        parse_response(&body, source)
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// Extract the translation from the nested array body:
/// `[[["translated", "original", ...], ...], null, "detected", ...]`
pub fn parse_response(body: &Value, requested_source: &str) -> Result<Translation, TranslateError> {
    let sentences = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::UnexpectedResponse(body.to_string()))?;

    let mut text = String::new();
    for sentence in sentences {
        match sentence.get(0) {
            Some(Value::String(phrase)) => text.push_str(phrase),
            // Transliteration rows carry a null translation
            Some(Value::Null) => {}
            _ => return Err(TranslateError::UnexpectedResponse(body.to_string())),
        }
    }

    let source_language = body
        .get(2)
        .and_then(|v| v.as_str())
        .unwrap_or(requested_source)
        .to_string();

    Ok(Translation {
        text,
        source_language,
    })
}
