// src/config.rs
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::persona::Persona;
use crate::services::providers::CompletionParams;
use crate::services::providers::openai::OpenAiConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ORIGINS: &str = "https://egshiglen.xyz,https://*.vercel.app";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot read persona file {path}: {source}")]
    PersonaFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("persona file {0} is empty")]
    EmptyPersona(String),

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub provider_timeout: Duration,
    pub persona_file: Option<PathBuf>,
    /// Abort startup instead of serving 503s when the key is missing.
    pub require_api_key: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let max_tokens = parse_or(&get, "OPENAI_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            return Err(invalid("OPENAI_MAX_TOKENS", "0", "must be greater than zero"));
        }

        let temperature = parse_or(&get, "OPENAI_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid(
                "OPENAI_TEMPERATURE",
                &temperature.to_string(),
                "must be between 0.0 and 2.0",
            ));
        }

        let timeout_secs = parse_or(&get, "PROVIDER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(invalid("PROVIDER_TIMEOUT_SECS", "0", "must be greater than zero"));
        }

        let require_api_key = match get("REQUIRE_API_KEY") {
            None => false,
            Some(v) => parse_flag(&v).ok_or_else(|| invalid("REQUIRE_API_KEY", &v, "expected true or false"))?,
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            api_key: get("OPENAI_API_KEY"),
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            allowed_origins,
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
            temperature,
            provider_timeout: Duration::from_secs(timeout_secs),
            persona_file: get("PERSONA_FILE").map(PathBuf::from),
            require_api_key,
        })
    }

    /// Checks that the relay can actually serve chats. The caller decides
    /// whether a failure aborts startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(ConfigError::MissingApiKey),
        }
    }

    /// Applies the missing-key policy. `Ok(Some(_))` means serve degraded
    /// (every chat answers 503); `Err(_)` means abort startup.
    pub fn startup_check(&self) -> Result<Option<ConfigError>, ConfigError> {
        match self.validate() {
            Ok(()) => Ok(None),
            Err(e) if self.require_api_key => Err(e),
            Err(e) => Ok(Some(e)),
        }
    }

    pub fn load_persona(&self) -> Result<Persona, ConfigError> {
        match &self.persona_file {
            Some(path) => Persona::from_file(path),
            None => Ok(Persona::default()),
        }
    }

    pub fn completion_params(&self) -> CompletionParams {
        CompletionParams {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout: self.provider_timeout,
        }
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| invalid(var, &raw, &e.to_string())),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.model, "gpt-3.5-turbo");
        assert_eq!(cfg.allowed_origins, vec!["https://egshiglen.xyz", "https://*.vercel.app"]);
        assert_eq!(cfg.provider_timeout, Duration::from_secs(30));
        assert!(cfg.api_key.is_none());
        assert!(!cfg.require_api_key);
    }

    #[test]
    fn missing_or_blank_key_fails_validation() {
        assert!(matches!(load(&[]).unwrap().validate(), Err(ConfigError::MissingApiKey)));
        assert!(load(&[("OPENAI_API_KEY", "   ")]).unwrap().validate().is_err());
        assert!(load(&[("OPENAI_API_KEY", "sk-test")]).unwrap().validate().is_ok());
    }

    #[test]
    fn missing_key_degrades_unless_required() {
        let degraded = load(&[]).unwrap().startup_check().unwrap();
        assert!(matches!(degraded, Some(ConfigError::MissingApiKey)));

        let strict = load(&[("REQUIRE_API_KEY", "true")]).unwrap();
        assert!(matches!(strict.startup_check(), Err(ConfigError::MissingApiKey)));

        let ready = load(&[("REQUIRE_API_KEY", "true"), ("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert!(matches!(ready.startup_check(), Ok(None)));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = load(&[
            ("PORT", "8080"),
            ("ALLOWED_ORIGINS", " https://a.example , ,https://*.netlify.app"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("OPENAI_MAX_TOKENS", "128"),
            ("OPENAI_TEMPERATURE", "0.2"),
            ("REQUIRE_API_KEY", "true"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.allowed_origins, vec!["https://a.example", "https://*.netlify.app"]);
        assert_eq!(
            cfg.completion_params(),
            CompletionParams { model: "gpt-4o-mini".into(), max_tokens: 128, temperature: 0.2 }
        );
        assert!(cfg.require_api_key);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(load(&[("PORT", "http")]), Err(ConfigError::Invalid { var: "PORT", .. })));
        assert!(load(&[("OPENAI_TEMPERATURE", "3.5")]).is_err());
        assert!(load(&[("OPENAI_MAX_TOKENS", "0")]).is_err());
        assert!(load(&[("PROVIDER_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("REQUIRE_API_KEY", "maybe")]).is_err());
    }
}
