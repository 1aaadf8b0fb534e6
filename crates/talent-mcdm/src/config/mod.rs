use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::selection::{
    CriteriaWeights, DiscordanceRule, ElectreParams, RankingConfig, SelectionError,
    DEFAULT_STRATEGY_WEIGHT,
};

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
    pub ranking: RankingConfig,
    pub data: DataConfig,
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

        let weights = match env::var("APP_CRITERIA_WEIGHTS") {
            Ok(raw) => parse_weights(&raw)?,
            Err(_) => CriteriaWeights::default(),
        };
        let vikor_v = match env::var("APP_VIKOR_V") {
            Ok(raw) => parse_strategy_weight(&raw)?,
            Err(_) => DEFAULT_STRATEGY_WEIGHT,
        };
        let discordance_rule = match env::var("APP_ELECTRE_DISCORDANCE") {
            Ok(raw) => parse_discordance_rule(&raw)?,
            Err(_) => DiscordanceRule::default(),
        };

        let candidates_csv = env::var("APP_CANDIDATES_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("dataset.csv"));
        let job_positions_csv = env::var("APP_JOB_POSITIONS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            ranking: RankingConfig {
                weights,
                vikor_v,
                electre: ElectreParams {
                    discordance_rule,
                    ..ElectreParams::default()
                },
            },
            data: DataConfig {
                candidates_csv,
                job_positions_csv,
            },
        })
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Locations of the tabular exports read by the CLI.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub candidates_csv: PathBuf,
    /// Falls back to the built-in positions when unset.
    pub job_positions_csv: Option<PathBuf>,
}

/// Parses a comma separated list of five criteria weights.
pub fn parse_weights(raw: &str) -> Result<CriteriaWeights, ConfigError> {
    let values = raw
        .split(',')
        .map(|value| value.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConfigError::InvalidWeights {
            value: raw.to_string(),
            source: None,
        })?;

    let invalid = |source| ConfigError::InvalidWeights {
        value: raw.to_string(),
        source: Some(source),
    };
    let weights = CriteriaWeights::try_from(values).map_err(invalid)?;
    weights.ensure_normalized().map_err(invalid)?;
    Ok(weights)
}

pub fn parse_strategy_weight(raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=1.0).contains(v))
        .ok_or_else(|| ConfigError::InvalidStrategyWeight(raw.to_string()))
}

pub fn parse_discordance_rule(raw: &str) -> Result<DiscordanceRule, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "at_most" | "at-most" | "le" => Ok(DiscordanceRule::AtMostThreshold),
        "at_least" | "at-least" | "ge" => Ok(DiscordanceRule::AtLeastThreshold),
        _ => Err(ConfigError::InvalidDiscordanceRule(raw.to_string())),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidWeights {
        value: String,
        source: Option<SelectionError>,
    },
    InvalidStrategyWeight(String),
    InvalidDiscordanceRule(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWeights { value, .. } => write!(
                f,
                "APP_CRITERIA_WEIGHTS must hold five comma separated weights summing to 1 (got '{}')",
                value
            ),
            ConfigError::InvalidStrategyWeight(value) => {
                write!(f, "APP_VIKOR_V must be a number in [0, 1] (got '{}')", value)
            }
            ConfigError::InvalidDiscordanceRule(value) => write!(
                f,
                "APP_ELECTRE_DISCORDANCE must be 'at_most' or 'at_least' (got '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidWeights {
                source: Some(source),
                ..
            } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidWeights { source: None, .. }
            | ConfigError::InvalidStrategyWeight(_)
            | ConfigError::InvalidDiscordanceRule(_) => None,
        }
    }
}
