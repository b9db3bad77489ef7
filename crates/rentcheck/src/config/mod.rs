use crate::workflows::investment::features::{
    FeatureError, FeatureSchema, UnsupportedZipPolicy, DEFAULT_SUPPORTED_ZIPCODES,
};
use crate::workflows::investment::financials::{AssumptionError, FinancialAssumptions};
use crate::workflows::listings::DEFAULT_HASDATA_ENDPOINT;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub scoring: ScoringConfig,
    pub retrieval: RetrievalConfig,
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
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat(raw))?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            scoring: ScoringConfig::from_env()?,
            retrieval: RetrievalConfig::from_env(),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Model artifact, zip enumeration, and napkin-math constants.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub model_path: Option<PathBuf>,
    pub zipcodes: Vec<String>,
    pub unsupported_zip: UnsupportedZipPolicy,
    pub assumptions: FinancialAssumptions,
}

impl ScoringConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let model_path = env::var("RENTCHECK_MODEL_PATH")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        let zipcodes = match env::var("RENTCHECK_ZIPCODES") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|zip| !zip.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => DEFAULT_SUPPORTED_ZIPCODES
                .iter()
                .map(|zip| zip.to_string())
                .collect(),
        };

        let unsupported_zip = match env::var("RENTCHECK_UNSUPPORTED_ZIP") {
            Ok(raw) => {
                UnsupportedZipPolicy::parse(&raw).ok_or(ConfigError::InvalidZipPolicy(raw))?
            }
            Err(_) => UnsupportedZipPolicy::default(),
        };

        let defaults = FinancialAssumptions::default();
        let assumptions = FinancialAssumptions {
            rent_yield_rate: env_f64("RENTCHECK_RENT_YIELD_RATE", defaults.rent_yield_rate)?,
            expense_ratio: env_f64("RENTCHECK_EXPENSE_RATIO", defaults.expense_ratio)?,
            loan_to_value: env_f64("RENTCHECK_LOAN_TO_VALUE", defaults.loan_to_value)?,
            rate_per_100k: env_f64("RENTCHECK_RATE_PER_100K", defaults.rate_per_100k)?,
        };
        assumptions.validate().map_err(ConfigError::InvalidAssumptions)?;

        let config = Self {
            model_path,
            zipcodes,
            unsupported_zip,
            assumptions,
        };
        config.schema()?;
        Ok(config)
    }

    /// Feature schema described by the configured zip codes and policy.
    pub fn schema(&self) -> Result<FeatureSchema, ConfigError> {
        let schema = FeatureSchema::new(&self.zipcodes).map_err(ConfigError::InvalidZipCodes)?;
        Ok(schema.with_policy(self.unsupported_zip))
    }
}

/// Credentials and endpoint for the listing lookup service.
#[derive(Clone)]
pub struct RetrievalConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl RetrievalConfig {
    fn from_env() -> Self {
        let endpoint = env::var("RENTCHECK_API_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_HASDATA_ENDPOINT.to_string());
        let api_key = env::var("RENTCHECK_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self { endpoint, api_key }
    }
}

impl fmt::Debug for RetrievalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrievalConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn env_f64(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidNumber { name: &'static str, value: String },
    InvalidZipPolicy(String),
    InvalidZipCodes(FeatureError),
    InvalidAssumptions(AssumptionError),
    MissingModelPath,
    MissingApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'pretty' (got '{}')", value)
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{} must be a number (got '{}')", name, value)
            }
            ConfigError::InvalidZipPolicy(value) => write!(
                f,
                "RENTCHECK_UNSUPPORTED_ZIP must be 'zero' or 'reject' (got '{}')",
                value
            ),
            ConfigError::InvalidZipCodes(err) => write!(f, "RENTCHECK_ZIPCODES is invalid: {}", err),
            ConfigError::InvalidAssumptions(err) => {
                write!(f, "financial assumptions are invalid: {}", err)
            }
            ConfigError::MissingModelPath => write!(
                f,
                "no classifier model configured; set RENTCHECK_MODEL_PATH or pass --model"
            ),
            ConfigError::MissingApiKey => {
                write!(f, "RENTCHECK_API_KEY must be set to look up listings by URL")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidZipCodes(err) => Some(err),
            ConfigError::InvalidAssumptions(err) => Some(err),
            _ => None,
        }
    }
}
