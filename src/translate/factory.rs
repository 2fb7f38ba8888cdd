use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use reqwest::Client;
use tracing::info;

use crate::config::TranslatorConfig;
use super::google::GoogleTranslator;
use super::interface::Translator;
use super::libre::LibreTranslator;

/// Factory for creating translation providers
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create a translator based on configuration
    ///
    /// # Arguments
    /// * `config` - Translator section of the service configuration
    ///
    /// # Returns
    /// Shared Translator implementation
    pub fn create_translator(config: &TranslatorConfig) -> Result<Arc<dyn Translator>> {
        info!("Initializing translator: {}", config.provider);

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        match config.provider.as_str() {
            "google" | "googletrans" => {
                Ok(Arc::new(GoogleTranslator::new(client, config.base_url.clone())))
            }
            "libre" | "libretranslate" => {
                Ok(Arc::new(LibreTranslator::new(
                    client,
                    config.base_url.clone(),
                    config.api_key.clone(),
                )))
            }
            other => Err(anyhow::anyhow!("Unsupported translation provider: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_known_providers() {
        let mut config = TranslatorConfig::default();
        let translator = TranslatorFactory::create_translator(&config).unwrap();
        assert_eq!(translator.name(), "google");

        config.provider = "libre".to_string();
        config.base_url = "http://localhost:5000".to_string();
        let translator = TranslatorFactory::create_translator(&config).unwrap();
        assert_eq!(translator.name(), "libre");
    }

    #[test]
    fn rejects_unknown_provider() {
        let config = TranslatorConfig {
            provider: "babelfish".to_string(),
            ..TranslatorConfig::default()
        };
        assert!(TranslatorFactory::create_translator(&config).is_err());
    }
}
