use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::config::TranslatorConfig;
use crate::error::ApiError;
use crate::translate::{TranslateError, Translator};

/// Progress is logged once every this many batch items
const PROGRESS_INTERVAL: usize = 10;

/// Length of the text preview written to logs
const LOG_PREVIEW_CHARS: usize = 50;

/// Shape of the `text` field
#[derive(Debug, Clone, PartialEq)]
pub enum TextInput {
    Single(String),
    /// Items are kept as raw JSON so non-string entries can be skipped in place
    Batch(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub text: TextInput,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleResult {
    pub translated_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub translations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TranslationResponse {
    Single(SingleResult),
    Batch(BatchResult),
}

impl SingleResult {
    fn empty() -> Self {
        Self {
            translated_text: String::new(),
            source_language: None,
            target_language: None,
        }
    }
}

/// Parse and validate a raw `/translate` body
pub fn validate(body: &[u8], defaults: &TranslatorConfig) -> Result<TranslationRequest, ApiError> {
    let no_data = || ApiError::BadRequest("No JSON data provided".to_string());

    let data: Value = serde_json::from_slice(body).map_err(|_| no_data())?;
    let mut data: Map<String, Value> = match data {
        Value::Object(map) if !map.is_empty() => map,
        _ => return Err(no_data()),
    };

    let text = match data.remove("text") {
        None | Some(Value::Null) => {
            return Err(ApiError::BadRequest("Missing 'text' field".to_string()))
        }
        Some(Value::String(s)) => TextInput::Single(s),
        Some(Value::Array(items)) => TextInput::Batch(items),
        Some(_) => {
            return Err(ApiError::BadRequest(
                "'text' must be string or array".to_string(),
            ))
        }
    };

    let lang = |key: &str, default: &str| {
        data.get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    Ok(TranslationRequest {
        text,
        source: lang("source", &defaults.default_source),
        target: lang("target", &defaults.default_target),
    })
}

/// Validate the body and run the matching translation path
pub async fn handle_translate(
    translator: &dyn Translator,
    config: &TranslatorConfig,
    body: &[u8],
) -> Result<TranslationResponse, ApiError> {
    let request = validate(body, config)?;
    info!(
        "Translation request - Source: {}, Target: {}",
        request.source, request.target
    );

    match request.text {
        TextInput::Single(text) => {
            let result =
                translate_single(translator, &text, &request.source, &request.target).await?;
            Ok(TranslationResponse::Single(result))
        }
        TextInput::Batch(items) => {
            let translations = translate_batch(
                translator,
                &items,
                &request.source,
                &request.target,
                config.batch_concurrency,
            )
            .await;
            Ok(TranslationResponse::Batch(BatchResult { translations }))
        }
    }
}

/// Translate one string. Provider errors are returned to the caller.
pub async fn translate_single(
    translator: &dyn Translator,
    text: &str,
    source: &str,
    target: &str,
) -> Result<SingleResult, TranslateError> {
    if text.trim().is_empty() {
        return Ok(SingleResult::empty());
    }

    info!("Translating single text: '{}...'", preview(text));
    let translation = translator.translate(text, source, target).await?;

    Ok(SingleResult {
        translated_text: translation.text,
        source_language: Some(translation.source_language),
        target_language: Some(target.to_string()),
    })
}

/// Translate every item, keeping the output aligned with the input by index.
///
/// Null, empty and non-string items become `""` without a provider call.
/// An item whose translation fails is returned untranslated. With
/// `concurrency > 1` several provider calls may be in flight, but results
/// are still yielded in input order.
pub async fn translate_batch(
    translator: &dyn Translator,
    items: &[Value],
    source: &str,
    target: &str,
    concurrency: usize,
) -> Vec<String> {
    if items.is_empty() {
        return Vec::new();
    }

    let total = items.len();
    info!("Batch translating {} texts", total);

    // Futures are built eagerly; `buffered` then polls at most `concurrency`
    // of them and yields in index order
    let pending: Vec<_> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| translate_item(translator, idx, total, item, source, target))
        .collect();

    let translations: Vec<String> = stream::iter(pending)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    info!("Batch translation complete: {} texts", translations.len());
    translations
}

async fn translate_item(
    translator: &dyn Translator,
    idx: usize,
    total: usize,
    item: &Value,
    source: &str,
    target: &str,
) -> String {
    let text = match item.as_str() {
        Some(text) if !text.is_empty() => text,
        _ => {
            debug!("Skipping batch item {}: not a non-empty string", idx);
            return String::new();
        }
    };

    match translator.translate(text, source, target).await {
        Ok(translation) => {
            if idx % PROGRESS_INTERVAL == 0 {
                info!("Translated {}/{} items", idx + 1, total);
            }
            translation.text
        }
        Err(e) => {
            error!("Error translating item {}: {}", idx, e);
            text.to_string()
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
