use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }

    fn from_env() -> Self {
        Self::parse(&env::var("LOG_FORMAT").unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Nodes whose last_seen is older than this are reported OFFLINE
    pub node_offline_after_minutes: i64,

    // Rate limiting
    pub disable_rate_limiting: bool,
    pub rate_limit_ingest_per_second: u64,
    pub rate_limit_ingest_burst: u32,
    pub rate_limit_query_per_second: u64,
    pub rate_limit_query_burst: u32,

    // Application metadata
    pub deployment: Deployment,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            api_host: "0.0.0.0".to_string(),
            api_port: 8000,
            node_offline_after_minutes: 15,
            disable_rate_limiting: false,
            rate_limit_ingest_per_second: 20,
            rate_limit_ingest_burst: 100,
            rate_limit_query_per_second: 10,
            rate_limit_query_burst: 60,
            deployment: Deployment::Local,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `DATABASE_URL` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,

            api_host: env::var("API_HOST").unwrap_or(defaults.api_host),
            api_port: env_or("API_PORT", defaults.api_port),

            node_offline_after_minutes: env_or(
                "NODE_OFFLINE_AFTER_MINUTES",
                defaults.node_offline_after_minutes,
            ),

            disable_rate_limiting: env_or("DISABLE_RATE_LIMITING", defaults.disable_rate_limiting),
            rate_limit_ingest_per_second: env_or(
                "RATE_LIMIT_INGEST_PER_SECOND",
                defaults.rate_limit_ingest_per_second,
            ),
            rate_limit_ingest_burst: env_or("RATE_LIMIT_INGEST_BURST", defaults.rate_limit_ingest_burst),
            rate_limit_query_per_second: env_or(
                "RATE_LIMIT_QUERY_PER_SECOND",
                defaults.rate_limit_query_per_second,
            ),
            rate_limit_query_burst: env_or("RATE_LIMIT_QUERY_BURST", defaults.rate_limit_query_burst),

            deployment: Deployment::parse(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
            log_format: LogFormat::from_env(),
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

/// Settings for the `sample-feeder` binary.
#[derive(Debug, Clone)]
pub struct FeederConfig {
    pub backend_url: String,
    pub interval_seconds: u64,
    pub request_timeout_seconds: u64,
    pub nodes: Vec<String>,
    pub alert_probability: f64,
    pub error_probability: f64,
    pub log_format: LogFormat,
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            interval_seconds: 5,
            request_timeout_seconds: 5,
            nodes: ["living_room", "master_bedroom", "bathroom"]
                .into_iter()
                .map(String::from)
                .collect(),
            alert_probability: 0.3,
            error_probability: 0.2,
            log_format: LogFormat::Text,
        }
    }
}

impl FeederConfig {
    /// Load feeder configuration. Every variable is optional.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `FEEDER_NODES` is set but names no node,
    /// or a probability lies outside `[0, 1]`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let nodes = match env::var("FEEDER_NODES") {
            Ok(raw) => parse_node_list(&raw)?,
            Err(_) => defaults.nodes,
        };

        let alert_probability = env_or("FEEDER_ALERT_PROBABILITY", defaults.alert_probability);
        let error_probability = env_or("FEEDER_ERROR_PROBABILITY", defaults.error_probability);
        for (name, p) in [
            ("FEEDER_ALERT_PROBABILITY", alert_probability),
            ("FEEDER_ERROR_PROBABILITY", error_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(name, format!("{p} is not within [0, 1]")));
            }
        }

        Ok(Self {
            backend_url: env::var("BACKEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_url),
            interval_seconds: env_or("FEEDER_INTERVAL_SECONDS", defaults.interval_seconds).max(1),
            request_timeout_seconds: env_or(
                "FEEDER_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            )
            .max(1),
            nodes,
            alert_probability,
            error_probability,
            log_format: LogFormat::from_env(),
        })
    }
}

/// Split a comma separated node list, dropping blanks.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` when no node name remains.
pub fn parse_node_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let nodes: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if nodes.is_empty() {
        return Err(ConfigError::Invalid(
            "FEEDER_NODES",
            "no node names given".to_string(),
        ));
    }
    Ok(nodes)
}

/// Read and parse an environment variable, falling back to `default` when it is
/// unset or unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
