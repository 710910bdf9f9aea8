use thiserror::Error;
use tracing::info;

pub const MODEL: &str = "gemini-2.5-flash";
pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const BIND_ADDR: &str = "127.0.0.1:8000";
pub const ALLOWED_ORIGIN: &str = "http://localhost:4200";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY not found. Please set it in your .env file")]
    MissingApiKey,
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub tools_enabled: bool,
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = match lookup("GEMINI_API_KEY") {
            Some(key) if !key.trim().is_empty() => {
                info!("Gemini API key loaded successfully");
                key.trim().to_string()
            }
            _ => return Err(ConfigError::MissingApiKey),
        };

        let tools_enabled = match lookup("CHATBOT_TOOLS_ENABLED") {
            None => true,
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                name: "CHATBOT_TOOLS_ENABLED",
                value: raw,
            })?,
        };

        Ok(Self {
            api_key,
            tools_enabled,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn key_alone_is_enough() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", " test-key ")])).unwrap();
        assert_eq!(config.api_key, "test-key");
        assert!(config.tools_enabled);
    }

    #[test]
    fn missing_or_blank_key_is_rejected() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[])),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn model_and_endpoint_are_not_configurable() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_API_BASE", "http://localhost:9000/v1"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(MODEL, "gemini-2.5-flash");
        assert!(!API_BASE.ends_with('/'));
        assert!(BIND_ADDR.parse::<std::net::SocketAddr>().is_ok());
    }

    #[test]
    fn tool_switch_is_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("CHATBOT_TOOLS_ENABLED", "no"),
        ]))
        .unwrap();
        assert!(!config.tools_enabled);

        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("CHATBOT_TOOLS_ENABLED", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "CHATBOT_TOOLS_ENABLED", .. }));
    }
}
