//! Configuration module
//!
//! Server, upload and processing settings loaded from the environment (with `.env`
//! support). Every value has a default so the service starts with no configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const MAX_UPLOAD_SIZE_MB: usize = 5;
const PROCESSING_TIMEOUT_SECS: u64 = 30;
const MAX_OUTPUT_DIMENSION: u32 = 8192;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: String,
    /// Per-file upload cap, enforced before any handler runs
    pub max_upload_size_bytes: usize,
    pub processing_timeout_secs: u64,
    /// Number of engine jobs allowed on the blocking pool at once
    pub max_concurrent_jobs: usize,
    /// Upper bound for requiredWidth / requiredHeight
    pub max_output_dimension: u32,
    pub http_concurrency_limit: usize,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: "development".to_string(),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            processing_timeout_secs: PROCESSING_TIMEOUT_SECS,
            max_concurrent_jobs: default_concurrent_jobs(),
            max_output_dimension: MAX_OUTPUT_DIMENSION,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            cors_origins: vec!["*".to_string()],
        }
    }
}

fn default_concurrent_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.environment);

        let port = parse_number(&lookup, "PORT", defaults.port)?;
        let max_upload_size_mb = parse_number(&lookup, "MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB)?;
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            environment,
            max_upload_size_bytes,
            processing_timeout_secs: parse_number(
                &lookup,
                "PROCESSING_TIMEOUT_SECS",
                defaults.processing_timeout_secs,
            )?,
            max_concurrent_jobs: parse_number(
                &lookup,
                "MAX_CONCURRENT_JOBS",
                defaults.max_concurrent_jobs,
            )?,
            max_output_dimension: parse_number(
                &lookup,
                "MAX_OUTPUT_DIMENSION",
                defaults.max_output_dimension,
            )?,
            http_concurrency_limit: parse_number(
                &lookup,
                "HTTP_CONCURRENCY_LIMIT",
                defaults.http_concurrency_limit,
            )?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.cors_origins),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }
        if self.processing_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "PROCESSING_TIMEOUT_SECS must be greater than 0"
            ));
        }
        if self.max_concurrent_jobs == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_JOBS must be greater than 0"));
        }
        if self.max_output_dimension == 0 {
            return Err(anyhow::anyhow!(
                "MAX_OUTPUT_DIMENSION must be greater than 0"
            ));
        }
        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than 0"
            ));
        }
        Ok(())
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn processing_timeout(&self) -> Duration {
        Duration::from_secs(self.processing_timeout_secs)
    }
}

/// Parse a numeric variable; unset means the default, anything unparsable is an error.
fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
