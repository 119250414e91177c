//! HTTP server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Settings for the HTTP/WebSocket server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (default: 0.0.0.0)
    pub host: String,
    /// Bind port (default: 8000)
    pub port: u16,
    /// Delay between WebSocket pushes (default: 30 s)
    pub push_interval: Duration,
    /// Concurrent bucket fetches per hourly query (default: 4)
    pub fetch_concurrency: usize,
    /// Allowed CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
    /// Longest range a single query may cover, in hours (default: 8784, one leap year)
    pub max_range_hours: u32,
}

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8000;
    pub const DEFAULT_PUSH_INTERVAL_SECS: u64 = 30;
    pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;
    pub const DEFAULT_MAX_RANGE_HOURS: u32 = 366 * 24;

    /// Load from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` (optional, default: 0.0.0.0)
    /// - `PORT` (optional, default: 8000)
    /// - `PUSH_INTERVAL_SECS` (optional, default: 30)
    /// - `FETCH_CONCURRENCY` (optional, default: 4)
    /// - `ALLOWED_ORIGINS` (optional): comma-separated origins, `*` for any
    /// - `MAX_RANGE_HOURS` (optional, default: 8784)
    ///
    /// # Errors
    /// Returns an error if a numeric variable is set but malformed.
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| Self::DEFAULT_HOST.to_string());
        let port = parse_var("PORT", Self::DEFAULT_PORT)?;
        let push_interval_secs = parse_var("PUSH_INTERVAL_SECS", Self::DEFAULT_PUSH_INTERVAL_SECS)?;
        if push_interval_secs == 0 {
            return Err("PUSH_INTERVAL_SECS must be greater than zero".to_string());
        }
        let fetch_concurrency = parse_var("FETCH_CONCURRENCY", Self::DEFAULT_FETCH_CONCURRENCY)?;
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        let max_range_hours = parse_var("MAX_RANGE_HOURS", Self::DEFAULT_MAX_RANGE_HOURS)?;
        if max_range_hours == 0 {
            return Err("MAX_RANGE_HOURS must be greater than zero".to_string());
        }

        Ok(Self {
            host,
            port,
            push_interval: Duration::from_secs(push_interval_secs),
            fetch_concurrency: fetch_concurrency.max(1),
            allowed_origins,
            max_range_hours,
        })
    }

    /// Longest accepted query range.
    pub fn max_range(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.max_range_hours))
    }

    /// `host:port` string to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            push_interval: Duration::from_secs(Self::DEFAULT_PUSH_INTERVAL_SECS),
            fetch_concurrency: Self::DEFAULT_FETCH_CONCURRENCY,
            allowed_origins: Vec::new(),
            max_range_hours: Self::DEFAULT_MAX_RANGE_HOURS,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| format!("{} has an invalid value: {}", key, value)),
        Err(_) => Ok(default),
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}
