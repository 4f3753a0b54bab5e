//! Runtime configuration.
//! Layered as: built-in defaults, then an optional TOML file named by
//! `XSLGPT_CONFIG`, then environment variables (a `.env` file is honoured).

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Parameters of the outbound chat-completions call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 200,
            temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory served as static panel assets.
    pub public_dir: PathBuf,
    /// Add-in manifest served at `/manifest.xml`.
    pub manifest_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            public_dir: PathBuf::from("public"),
            manifest_path: PathBuf::from("manifest.xml"),
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Credential for the completion service. Only ever read from the
    /// environment, never from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
    pub generation: GenerationConfig,
    pub server: ServerConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("generation", &self.generation)
            .field("server", &self.server)
            .finish()
    }
}

impl Config {
    /// Loads the full layered configuration for the running process.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = match std::env::var("XSLGPT_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Overlays environment values. `lookup` stands in for `std::env::var`
    /// so callers can feed a fixed map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = non_empty("OPENAI_API_URL") {
            self.generation.api_url = url.trim().to_string();
        }
        if let Some(model) = non_empty("OPENAI_MODEL") {
            self.generation.model = model.trim().to_string();
        }
        if let Some(port) = non_empty("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                reason: format!("'{}' is not a valid port number", port),
            })?;
        }
        if let Some(dir) = non_empty("XSLGPT_PUBLIC_DIR") {
            self.server.public_dir = PathBuf::from(dir);
        }
        if let Some(manifest) = non_empty("XSLGPT_MANIFEST") {
            self.server.manifest_path = PathBuf::from(manifest);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.generation.api_url).map_err(|e| ConfigError::InvalidValue {
            key: "generation.api_url",
            reason: e.to_string(),
        })?;

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::InvalidValue {
                key: "generation.temperature",
                reason: format!("{} is outside 0.0..=2.0", self.generation.temperature),
            });
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: "generation.max_tokens",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_upstream_contract() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.generation.model, "gpt-3.5-turbo");
        assert_eq!(config.generation.max_tokens, 200);
        assert!((config.generation.temperature - 0.3).abs() < f32::EPSILON);
        assert!(!config.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_defaults() {
        let mut config = Config::default();
        config
            .apply_env(env_of(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("PORT", "9090"),
                ("OPENAI_MODEL", "gpt-4o-mini"),
            ]))
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.generation.model, "gpt-4o-mini");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut config = Config::default();
        config.apply_env(env_of(&[("OPENAI_API_KEY", "   ")])).unwrap();
        assert!(!config.is_configured());
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut config = Config::default();
        let err = config.apply_env(env_of(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn toml_file_layer_is_partial() {
        let config = Config::from_toml_str(
            r#"
            [generation]
            max_tokens = 120

            [server]
            public_dir = "assets"
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.max_tokens, 120);
        assert_eq!(config.generation.model, DEFAULT_MODEL);
        assert_eq!(config.server.public_dir, PathBuf::from("assets"));
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn validate_rejects_bad_url_and_temperature() {
        let mut config = Config::default();
        config.generation.api_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.generation.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_key() {
        let mut config = Config::default();
        config.api_key = Some("sk-secret".to_string());
        let shown = format!("{:?}", config);
        assert!(!shown.contains("sk-secret"));
        assert!(shown.contains("<redacted>"));
    }
}
