use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::roster::DaySuffixStyle;

const HOSTED_BACKEND_URL: &str = "https://backend-4xju.onrender.com";
const LOCAL_BACKEND_URL: &str = "http://127.0.0.1:8000";

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub display: DisplayConfig,
    pub features: FeatureFlags,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// Настройки внешнего бэкенда (хранилище, счета, долги)
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

// Доступ оператора: код доступа и подписанная сессия
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// SHA-256 (hex) кода доступа. Сам код в конфиге не хранится.
    pub access_code_sha256: String,
    pub secret: String,
    pub ttl_hours: i64,
}

// Отображение меток мест
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub day_suffix_style: DaySuffixStyle,
}

// Feature flags для включения/выключения функциональности
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_auth: bool,
    pub enable_cors: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

fn var_or(var: &'static str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    parse_value(var, env::var(var).ok(), default)
}

fn parse_value<T: FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

const SESSION_TTL_VAR: &str = "SESSION_TTL_HOURS";
// Не больше года
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

fn session_ttl_hours(raw: Option<String>) -> Result<i64, ConfigError> {
    let hours = parse_value(SESSION_TTL_VAR, raw, 12)?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::Invalid { var: SESSION_TTL_VAR, value: hours.to_string() });
    }
    Ok(hours)
}

fn required_if(enabled: bool, var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ if enabled => Err(ConfigError::Missing(var)),
        _ => Ok(String::new()),
    }
}

impl LogFormat {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "pretty" | "text" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = var_or("ENVIRONMENT", "development");
        let default_backend = if environment == "development" {
            LOCAL_BACKEND_URL
        } else {
            HOSTED_BACKEND_URL
        };

        let log_format_raw = var_or("LOG_FORMAT", "pretty");
        let log_format = LogFormat::from_env_value(&log_format_raw).ok_or(ConfigError::Invalid {
            var: "LOG_FORMAT",
            value: log_format_raw,
        })?;

        let features = FeatureFlags {
            enable_auth: parsed_or("ENABLE_AUTH", true)?,
            enable_cors: parsed_or("ENABLE_CORS", true)?,
        };

        Ok(Config {
            app: AppConfig {
                host: var_or("HOST", "0.0.0.0"),
                port: parsed_or("PORT", 8080)?,
                environment,
                rust_log: var_or("RUST_LOG", "seat_desk=debug,tower_http=debug"),
                log_format,
            },
            backend: BackendConfig {
                base_url: var_or("BACKEND_URL", default_backend)
                    .trim_end_matches('/')
                    .to_string(),
                timeout_seconds: parsed_or("BACKEND_TIMEOUT_SECONDS", 30)?,
            },
            session: SessionConfig {
                access_code_sha256: required_if(features.enable_auth, "ACCESS_CODE_SHA256")?
                    .to_lowercase(),
                secret: required_if(features.enable_auth, "SESSION_SECRET")?,
                ttl_hours: session_ttl_hours(env::var(SESSION_TTL_VAR).ok())?,
            },
            display: DisplayConfig {
                day_suffix_style: parsed_or("DAY_SUFFIX_STYLE", DaySuffixStyle::default())?,
            },
            features,
        })
    }

    /// Конфигурация без авторизации, указывающая на заданный бэкенд.
    pub fn for_backend(base_url: impl Into<String>) -> Self {
        Config {
            app: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
                rust_log: "seat_desk=debug".to_string(),
                log_format: LogFormat::Pretty,
            },
            backend: BackendConfig {
                base_url: base_url.into().trim_end_matches('/').to_string(),
                timeout_seconds: 5,
            },
            session: SessionConfig {
                access_code_sha256: String::new(),
                secret: String::new(),
                ttl_hours: 12,
            },
            display: DisplayConfig { day_suffix_style: DaySuffixStyle::default() },
            features: FeatureFlags { enable_auth: false, enable_cors: false },
        }
    }
}
