use crate::auth::TokenSigner;
use crate::config::Config;
use crate::external::{
    build_http_client, DeployClient, ExternalError, GithubApi, GithubClient, HttpDeployClient,
    ScholarScraper, ScholarSource, TwitterApi, TwitterClient,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub type SharedState = Arc<AppState>;

/// Third-party services the handlers talk to.
#[derive(Clone)]
pub struct ExternalClients {
    pub twitter: Arc<dyn TwitterApi>,
    pub github: Arc<dyn GithubApi>,
    pub scholar: Arc<dyn ScholarSource>,
    pub deployer: Arc<dyn DeployClient>,
}

impl ExternalClients {
    /// Real HTTP clients sharing one connection pool.
    pub fn from_config(config: &Config) -> Result<Self, ExternalError> {
        let http = build_http_client(config.outbound_proxy.as_deref())?;
        Ok(Self {
            twitter: Arc::new(TwitterClient::new(
                http.clone(),
                config.twitter_bearer_token.clone(),
            )),
            github: Arc::new(GithubClient::new(
                http.clone(),
                config.github_client_id.clone(),
                config.github_client_secret.clone(),
            )),
            scholar: Arc::new(ScholarScraper::new(http.clone(), config.scholar.clone())),
            deployer: Arc::new(HttpDeployClient::new(
                http,
                config.deploy_service_url.clone(),
            )),
        })
    }
}

pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Config,
    pub access_tokens: TokenSigner,
    pub refresh_tokens: TokenSigner,
    pub clients: ExternalClients,
}

impl AppState {
    pub fn new(config: Config, db: Arc<DatabaseConnection>, clients: ExternalClients) -> Self {
        Self {
            access_tokens: TokenSigner::new(&config.jwt_access_secret, config.access_token_ttl),
            refresh_tokens: TokenSigner::new(&config.jwt_refresh_secret, config.refresh_token_ttl),
            db,
            config,
            clients,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
