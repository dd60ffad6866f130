use super::urls::url_deploy;
use super::ExternalError;
use async_trait::async_trait;
use log::info;
use serde::Serialize;
use serde_json::Value;

/// Everything the static-site build needs, keyed by the environment
/// variable names the builder exposes to the React base app.
#[derive(Debug, Clone, Serialize)]
pub struct DeployBundle {
    #[serde(rename = "ghToken")]
    pub gh_token: String,
    #[serde(rename = "REACT_APP_TEAM_INFO")]
    pub team_info: Value,
    #[serde(rename = "REACT_APP_TEAM_MEMBERS")]
    pub team_members: Value,
    #[serde(rename = "REACT_APP_TEAM_PUBLICATIONS")]
    pub team_publications: Value,
    #[serde(rename = "REACT_APP_TEAM_ACHIEVEMENTS")]
    pub team_achievements: Value,
    #[serde(rename = "REACT_APP_TEAM_HOMEPAGE")]
    pub team_homepage: Value,
    #[serde(rename = "REACT_APP_WEB_METADATA")]
    pub web_metadata: Value,
}

#[async_trait]
pub trait DeployClient: Send + Sync {
    async fn trigger(&self, team_id: &str, bundle: &DeployBundle) -> Result<(), ExternalError>;
}

pub struct HttpDeployClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDeployClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl DeployClient for HttpDeployClient {
    async fn trigger(&self, team_id: &str, bundle: &DeployBundle) -> Result<(), ExternalError> {
        let url = url_deploy(&self.base_url, team_id);
        let resp = self.client.post(&url).json(bundle).send().await?;
        let status = resp.status();
        info!("trigger({}) [{}] {}", team_id, url, status);

        if status.is_success() {
            Ok(())
        } else {
            let raw = resp.text().await.unwrap_or_default();
            Err(ExternalError::Http(format!("{} {}", status.as_u16(), raw)))
        }
    }
}
