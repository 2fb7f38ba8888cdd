use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::translate::google::DEFAULT_GOOGLE_URL;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server_config: ServerConfig,
    #[serde(default)]
    pub translator_config: TranslatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request body cap in bytes, unlimited when unset
    #[serde(default)]
    pub max_body_bytes: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Whole-request timeout for provider calls, none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_source")]
    pub default_source: String,
    #[serde(default = "default_target")]
    pub default_target: String,
    /// Provider calls allowed in flight for one batch request
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

// Hugging Face Spaces expects 7860
fn default_port() -> u16 {
    7860
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_base_url() -> String {
    DEFAULT_GOOGLE_URL.to_string()
}

fn default_source() -> String {
    "en".to_string()
}

fn default_target() -> String {
    "hi".to_string()
}

fn default_batch_concurrency() -> usize {
    1
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: None,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: None,
            default_source: default_source(),
            default_target: default_target(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML or JSON file, picked by extension
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let content = fs::read_to_string(path)?;
        let content = substitute_env_vars(&content, |name| std::env::var(name).ok())?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &str) -> Result<Self> {
        let path_lower = path.to_lowercase();
        let config = if path_lower.ends_with(".json") {
            serde_json::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };
        Ok(config)
    }

    /// Try the usual config locations, falling back to built-in defaults,
    /// then apply `HOST`/`PORT` from the environment
    pub fn discover() -> Result<Self> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        let explicit = std::env::var("CONFIG_PATH").ok();
        if let Some(path) = &explicit {
            if !Path::new(path).exists() {
                anyhow::bail!("CONFIG_PATH points to a missing file: {}", path);
            }
        }

        let config_paths: Vec<String> = vec![
            explicit,
            Some("conf.yaml".to_string()),
            Some("conf.json".to_string()),
            exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut config = Self::load_first(&config_paths)?.unwrap_or_else(|| {
            info!("No config file found, using defaults. Tried: {:?}", config_paths);
            Self::default()
        });
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load the first candidate that exists. Missing files are skipped, but a
    /// file that exists and fails to read or parse is an error.
    pub fn load_first(paths: &[String]) -> Result<Option<Self>> {
        for path in paths {
            if !Path::new(path).exists() {
                debug!("No config file at {}", path);
                continue;
            }
            let config = Self::load(path)
                .with_context(|| format!("Failed to load config from {}", path))?;
            info!("Loaded configuration from: {}", path);
            return Ok(Some(config));
        }
        Ok(None)
    }

    /// Overlay `HOST` and `PORT` onto the server section
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server_config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server_config.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        Ok(())
    }
}

/// Replace `${VAR_NAME}` with its value; unknown variables are left as-is
pub fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}
