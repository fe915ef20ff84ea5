use crate::workflows::wait_times::QueueSeed;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_RANDOM_BACKLOG_MINUTES: u32 = 120;

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
    pub catalogs: CatalogConfig,
    pub queue: QueueConfig,
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

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let catalogs = CatalogConfig {
            condition_csv: optional_path("MEDI_CONDITION_CSV"),
            treatment_csv: optional_path("MEDI_TREATMENT_CSV"),
        };

        let queue = QueueConfig {
            seed: queue_seed_from_env()?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalogs,
            queue,
        })
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn queue_seed_from_env() -> Result<QueueSeed, ConfigError> {
    let baseline = match env::var("MEDI_QUEUE_BASELINE") {
        Ok(raw) => Some(
            raw.trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidQueueBaseline)?,
        ),
        Err(_) => None,
    };

    let policy = env::var("MEDI_QUEUE_SEED").unwrap_or_else(|_| "fixed".to_string());
    match policy.trim().to_ascii_lowercase().as_str() {
        "fixed" => Ok(QueueSeed::Fixed {
            minutes: baseline.unwrap_or(0),
        }),
        "random" => Ok(QueueSeed::Random {
            max_minutes: baseline.unwrap_or(DEFAULT_RANDOM_BACKLOG_MINUTES),
        }),
        _ => Err(ConfigError::InvalidQueueSeed(policy)),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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
}

/// Optional overrides for the built-in reference datasets.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub condition_csv: Option<PathBuf>,
    pub treatment_csv: Option<PathBuf>,
}

/// Initial backlog policy for the shared queue store.
#[derive(Debug, Clone, Default)]
pub struct QueueConfig {
    pub seed: QueueSeed,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidQueueSeed(String),
    InvalidQueueBaseline,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidQueueSeed(value) => write!(
                f,
                "MEDI_QUEUE_SEED must be 'fixed' or 'random' (got '{}')",
                value
            ),
            ConfigError::InvalidQueueBaseline => {
                write!(f, "MEDI_QUEUE_BASELINE must be a whole number of minutes")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidQueueSeed(_)
            | ConfigError::InvalidQueueBaseline => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "MEDI_CONDITION_CSV",
            "MEDI_TREATMENT_CSV",
            "MEDI_QUEUE_SEED",
            "MEDI_QUEUE_BASELINE",
        ] {
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
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.catalogs.condition_csv.is_none());
        assert_eq!(config.queue.seed, QueueSeed::Fixed { minutes: 0 });
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
    fn queue_seed_policy_reads_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();

        env::set_var("MEDI_QUEUE_SEED", "random");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.queue.seed,
            QueueSeed::Random {
                max_minutes: DEFAULT_RANDOM_BACKLOG_MINUTES
            }
        );

        env::set_var("MEDI_QUEUE_SEED", "Fixed");
        env::set_var("MEDI_QUEUE_BASELINE", "45");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.queue.seed, QueueSeed::Fixed { minutes: 45 });

        env::set_var("MEDI_QUEUE_SEED", "sometimes");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidQueueSeed(value)) if value == "sometimes"
        ));

        env::set_var("MEDI_QUEUE_SEED", "fixed");
        env::set_var("MEDI_QUEUE_BASELINE", "-3");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidQueueBaseline)
        ));
        reset_env();
    }

    #[test]
    fn catalog_paths_ignore_blank_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MEDI_CONDITION_CSV", "  ");
        env::set_var("MEDI_TREATMENT_CSV", "data/treatments.csv");
        let config = AppConfig::load().expect("config loads");
        assert!(config.catalogs.condition_csv.is_none());
        assert_eq!(
            config.catalogs.treatment_csv,
            Some(PathBuf::from("data/treatments.csv"))
        );
        reset_env();
    }
}
