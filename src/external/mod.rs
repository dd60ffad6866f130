pub mod deploy;
pub mod github;
pub mod scholar;
pub mod twitter;
pub mod urls;

pub use deploy::{DeployBundle, DeployClient, HttpDeployClient};
pub use github::{GithubApi, GithubClient};
pub use scholar::{ScholarScraper, ScholarSource, ScrapedPage, ScrapedPublication};
pub use twitter::{TwitterApi, TwitterClient, TwitterUser};

use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ExternalError {
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),
    #[error("twitter handle not found: {0}")]
    HandleNotFound(String),
    #[error("github user not found: {0}")]
    UserNotFound(String),
    #[error("github repository not found: {0}")]
    RepoNotFound(String),
    #[error("oauth exchange failed: {0}")]
    OAuth(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ExternalError {
    fn from(e: reqwest::Error) -> Self {
        ExternalError::Http(e.to_string())
    }
}

/// Shared outbound client. `proxy` without a scheme is treated as socks5h.
pub fn build_http_client(proxy: Option<&str>) -> Result<reqwest::Client, ExternalError> {
    let mut builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("researchify/0.1");

    if let Some(raw) = proxy {
        let t = raw.trim();
        if !t.is_empty() {
            let url = if t.contains("://") {
                t.to_string()
            } else {
                format!("socks5h://{}", t)
            };
            let proxy = reqwest::Proxy::all(&url).map_err(|e| ExternalError::Http(e.to_string()))?;
            builder = builder.proxy(proxy);
        }
    }

    builder.build().map_err(|e| ExternalError::Http(e.to_string()))
}
