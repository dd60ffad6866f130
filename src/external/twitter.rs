use super::urls::url_twitter_user_by_username;
use super::ExternalError;
use async_trait::async_trait;
use log::info;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TwitterUser {
    pub id: String,
    pub name: String,
    pub username: String,
}

#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// Resolves a handle, failing with [`ExternalError::HandleNotFound`]
    /// when Twitter reports it unknown.
    async fn lookup_user(&self, handle: &str) -> Result<TwitterUser, ExternalError>;
}

pub struct TwitterClient {
    client: reqwest::Client,
    bearer_token: Option<String>,
}

impl TwitterClient {
    pub fn new(client: reqwest::Client, bearer_token: Option<String>) -> Self {
        Self {
            client,
            bearer_token,
        }
    }
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn lookup_user(&self, handle: &str) -> Result<TwitterUser, ExternalError> {
        let token = self
            .bearer_token
            .as_deref()
            .ok_or(ExternalError::MissingCredentials("TWITTER_BEARER_TOKEN"))?;

        let url = url_twitter_user_by_username(handle);
        let resp = self.client.get(&url).bearer_auth(token).send().await?;
        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| ExternalError::InvalidResponse(e.to_string()))?;
        info!("lookup_user({}) [{}] {}", handle, url, status);

        parse_lookup(body)
    }
}

/// Twitter answers unknown handles with 200 and an `errors` array.
fn parse_lookup(body: Value) -> Result<TwitterUser, ExternalError> {
    if let Some(detail) = body
        .get("errors")
        .and_then(|e| e.get(0))
        .map(|e| {
            e.get("detail")
                .and_then(|d| d.as_str())
                .unwrap_or("unknown user")
                .to_string()
        })
    {
        return Err(ExternalError::HandleNotFound(detail));
    }

    let data = body
        .get("data")
        .cloned()
        .ok_or_else(|| ExternalError::InvalidResponse(body.to_string()))?;
    serde_json::from_value(data).map_err(|e| ExternalError::InvalidResponse(e.to_string()))
}
