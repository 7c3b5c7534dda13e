use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;
const DEFAULT_NARRATIVE_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_NARRATIVE_MODEL: &str = "gpt-4o-mini";
const DEFAULT_NARRATIVE_TIMEOUT_MS: u64 = 8_000;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub narrative: NarrativeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let body_limit_bytes = match optional_var("APP_BODY_LIMIT_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidBodyLimit)?,
            None => DEFAULT_BODY_LIMIT_BYTES,
        };

        let cors_origin = optional_var("APP_CORS_ORIGIN");
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                body_limit_bytes,
                cors_origin,
            },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            narrative: NarrativeConfig::load()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
    /// `*` or an exact origin; `None` leaves cross-origin headers off.
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Colored output is only wanted on a developer terminal.
    pub ansi: bool,
}

/// Toggle and connection settings for the narrative explanation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_ms: u64,
}

impl NarrativeConfig {
    fn load() -> Result<Self, ConfigError> {
        let enabled = optional_var("NARRATIVE_ENABLED")
            .map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        let api_key = optional_var("NARRATIVE_API_KEY");
        if enabled && api_key.is_none() {
            return Err(ConfigError::MissingNarrativeKey);
        }

        let timeout_ms = match optional_var("NARRATIVE_TIMEOUT_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|timeout| *timeout > 0)
                .ok_or(ConfigError::InvalidNarrativeTimeout)?,
            None => DEFAULT_NARRATIVE_TIMEOUT_MS,
        };

        Ok(Self {
            enabled,
            endpoint: optional_var("NARRATIVE_API_URL")
                .unwrap_or_else(|| DEFAULT_NARRATIVE_ENDPOINT.to_string()),
            api_key,
            model: optional_var("NARRATIVE_MODEL")
                .unwrap_or_else(|| DEFAULT_NARRATIVE_MODEL.to_string()),
            timeout_ms,
        })
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_NARRATIVE_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_NARRATIVE_MODEL.to_string(),
            timeout_ms: DEFAULT_NARRATIVE_TIMEOUT_MS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBodyLimit,
    InvalidNarrativeTimeout,
    MissingNarrativeKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBodyLimit => {
                write!(f, "APP_BODY_LIMIT_BYTES must be a positive integer")
            }
            ConfigError::InvalidNarrativeTimeout => {
                write!(f, "NARRATIVE_TIMEOUT_MS must be a positive integer")
            }
            ConfigError::MissingNarrativeKey => {
                write!(f, "NARRATIVE_API_KEY is required when NARRATIVE_ENABLED is set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidBodyLimit
            | ConfigError::InvalidNarrativeTimeout
            | ConfigError::MissingNarrativeKey => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const VARS: &[&str] = &[
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_BODY_LIMIT_BYTES",
        "APP_CORS_ORIGIN",
        "NARRATIVE_ENABLED",
        "NARRATIVE_API_URL",
        "NARRATIVE_API_KEY",
        "NARRATIVE_MODEL",
        "NARRATIVE_TIMEOUT_MS",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in VARS {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
        assert!(config.server.cors_origin.is_none());
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.telemetry.ansi);
        assert_eq!(config.narrative, NarrativeConfig::disabled());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn enabling_narrative_requires_a_key() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("NARRATIVE_ENABLED", "true");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::MissingNarrativeKey)
        ));

        env::set_var("NARRATIVE_API_KEY", "sk-test");
        env::set_var("NARRATIVE_TIMEOUT_MS", "250");
        let config = AppConfig::load().expect("config loads");
        assert!(config.narrative.enabled);
        assert_eq!(config.narrative.timeout(), Duration::from_millis(250));
        reset_env();
    }

    #[test]
    fn rejects_zero_body_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_BODY_LIMIT_BYTES", "0");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidBodyLimit)));
        reset_env();
    }
}
