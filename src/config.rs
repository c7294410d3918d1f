//! Configuration for the Telegram API and the responder rule
//!
//! Loads configuration from config.yml file

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default constants (fallback if config.yml not found)
pub const SESSION_NAME: &str = "autoreply_session";
pub const LOCK_FILE: &str = "autoreply_session.lock";
pub const DEFAULT_REPLY_DELAY_SECS: u64 = 1;

/// YAML config structures
#[derive(Debug, Deserialize)]
struct YamlConfig {
    telegram: Option<TelegramConfig>,
    responder: Option<ResponderConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TelegramConfig {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    api_id: Option<String>,
    api_hash: Option<String>,
    phone: Option<String>,
    session_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ResponderConfig {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    target_user_id: Option<String>,
    reply_text: Option<String>,
    delay_seconds: Option<u64>,
}

/// Deserialize a value that can be either a string or a number
fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub phone: String,
    pub api_id: i32,
    pub api_hash: String,
    pub session_name: String,
    pub lock_file: String,
    /// The one sender id the responder reacts to
    pub target_user_id: i64,
    /// Fixed text sent as the reply
    pub reply_text: String,
    /// Pause after each successful reply, in seconds
    pub reply_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from config.yml or use defaults.
    /// Environment variables take precedence over config.yml values.
    pub fn new() -> Self {
        Self::load_from_file("config.yml")
            .or_else(|_| Self::load_from_file("../config.yml"))
            .unwrap_or_else(|_| Self::defaults())
    }

    /// Resolve a string value: ${VAR} placeholders and the explicit env key
    /// win over the literal YAML value.
    fn resolve_string(value: Option<String>, env_key: &str) -> String {
        if let Some(from_env) = Self::resolve_placeholder(&value) {
            return from_env;
        }
        if let Ok(env_val) = std::env::var(env_key) {
            return env_val;
        }
        value.unwrap_or_default()
    }

    /// Resolve a numeric value. An explicit number in YAML wins; placeholders
    /// and the env key are consulted otherwise.
    fn resolve_number<T: std::str::FromStr>(value: Option<String>, env_key: &str) -> Option<T> {
        if let Some(from_env) = Self::resolve_placeholder(&value) {
            if let Ok(parsed) = from_env.parse::<T>() {
                return Some(parsed);
            }
        }
        if let Some(ref v) = value {
            if let Ok(parsed) = v.parse::<T>() {
                return Some(parsed);
            }
        }
        std::env::var(env_key).ok().and_then(|v| v.parse::<T>().ok())
    }

    /// If the YAML value looks like ${VAR_NAME}, read VAR_NAME from the environment.
    fn resolve_placeholder(value: &Option<String>) -> Option<String> {
        let v = value.as_ref()?;
        if v.starts_with("${") && v.ends_with('}') {
            let var_name = &v[2..v.len() - 1];
            return std::env::var(var_name).ok();
        }
        None
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        // Try to load from current directory first, then parent
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        // Load .env file first
        Self::load_dotenv();

        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let yaml: YamlConfig = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        let telegram = yaml.telegram.unwrap_or_default();
        let responder = yaml.responder.unwrap_or_default();

        let api_id = Self::resolve_number(telegram.api_id, "TELEGRAM_API_ID").unwrap_or(0);
        let api_hash = Self::resolve_string(telegram.api_hash, "TELEGRAM_API_HASH");
        let phone = Self::resolve_string(telegram.phone, "TELEGRAM_PHONE");
        let target_user_id =
            Self::resolve_number(responder.target_user_id, "TARGET_USER_ID").unwrap_or(0);
        let reply_text = Self::resolve_string(responder.reply_text, "REPLY_TEXT");

        Ok(Self {
            phone,
            api_id,
            api_hash,
            session_name: telegram
                .session_name
                .unwrap_or_else(|| SESSION_NAME.to_string()),
            lock_file: LOCK_FILE.to_string(),
            target_user_id,
            reply_text,
            reply_delay_secs: responder.delay_seconds.unwrap_or(DEFAULT_REPLY_DELAY_SECS),
        })
    }

    /// Create config with empty defaults (fallback).
    /// User MUST provide config.yml or environment with actual credentials.
    fn defaults() -> Self {
        Self {
            phone: String::new(),
            api_id: 0,
            api_hash: String::new(),
            session_name: SESSION_NAME.to_string(),
            lock_file: LOCK_FILE.to_string(),
            target_user_id: 0,
            reply_text: String::new(),
            reply_delay_secs: DEFAULT_REPLY_DELAY_SECS,
        }
    }
}
