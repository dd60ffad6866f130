use anyhow::Context;
use log::{info, warn};
use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://researchify.db?mode=rwc";
pub const DEFAULT_SCHOLAR_BASE_URL: &str = "https://scholar.google.com.sg/";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_access_secret: String,
    pub jwt_refresh_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub twitter_bearer_token: Option<String>,
    pub github_client_id: Option<String>,
    pub github_client_secret: Option<String>,
    pub deploy_service_url: String,
    pub scholar: ScholarConfig,
    pub outbound_proxy: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Scraping knobs for Google Scholar profile pages.
#[derive(Clone, Debug)]
pub struct ScholarConfig {
    pub base_url: String,
    pub page_size: usize,
    pub threads: usize,
}

impl Default for ScholarConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SCHOLAR_BASE_URL.to_string(),
            page_size: 10,
            threads: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            port: try_load("PORT", "5000")?,
            database_url: try_load("DATABASE_URL", DEFAULT_DATABASE_URL)?,
            database_max_connections: try_load("DATABASE_MAX_CONNECTIONS", "10")?,
            jwt_access_secret: try_load("JWT_SECRET_1", "JWT_SECRET_1")?,
            jwt_refresh_secret: try_load("JWT_SECRET_2", "JWT_SECRET_2")?,
            access_token_ttl: Duration::from_secs(try_load("ACCESS_TOKEN_TTL_SECS", "900")?),
            refresh_token_ttl: Duration::from_secs(try_load(
                "REFRESH_TOKEN_TTL_SECS",
                "31536000",
            )?),
            twitter_bearer_token: optional("TWITTER_BEARER_TOKEN"),
            github_client_id: optional("GITHUB_CLIENT_ID"),
            github_client_secret: optional("GITHUB_CLIENT_SECRET"),
            deploy_service_url: try_load("DEPLOY_SERVICE_URL", "http://localhost:5001")?,
            scholar: ScholarConfig {
                base_url: try_load("SCHOLAR_BASE_URL", DEFAULT_SCHOLAR_BASE_URL)?,
                page_size: try_load("SCHOLAR_PAGE_SIZE", "10")?,
                threads: try_load("SCHOLAR_THREADS", "10")?,
            },
            outbound_proxy: optional("OUTBOUND_PROXY"),
            log_dir: Self::log_dir_from_env(),
        })
    }

    /// Read on its own so logging can start before the rest is loaded.
    pub fn log_dir_from_env() -> Option<PathBuf> {
        optional("LOG_DIR").map(PathBuf::from)
    }

    /// Configuration for tests and local tooling: in-memory store, fixed secrets.
    pub fn in_memory() -> Self {
        Self {
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            jwt_access_secret: "test-access-secret".to_string(),
            jwt_refresh_secret: "test-refresh-secret".to_string(),
            access_token_ttl: Duration::from_secs(900),
            refresh_token_ttl: Duration::from_secs(31_536_000),
            twitter_bearer_token: None,
            github_client_id: None,
            github_client_secret: None,
            deploy_service_url: "http://localhost:5001".to_string(),
            scholar: ScholarConfig::default(),
            outbound_proxy: None,
            log_dir: None,
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = optional(key).unwrap_or_else(|| {
        if key.starts_with("JWT_SECRET") {
            warn!("{key} not set, falling back to an insecure default");
        } else {
            info!("{key} not set, using default: {default}");
        }
        default.to_string()
    });

    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("invalid value for {key}: {raw}"))
}
