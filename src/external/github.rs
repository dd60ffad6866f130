use super::urls::{
    pages_repo_name, url_github_pages_branch_ref, url_github_pages_repo, URL_GITHUB_OAUTH_TOKEN,
    URL_GITHUB_USER,
};
use super::ExternalError;
use async_trait::async_trait;
use log::{info, warn};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Exchanges an OAuth `code` for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, ExternalError>;

    /// Login of the account owning `token`.
    async fn resolve_login(&self, token: &str) -> Result<String, ExternalError>;

    /// Succeeds when `<login>/<login>.github.io` exists and is visible to `token`.
    async fn ensure_pages_repo(&self, token: &str, login: &str) -> Result<(), ExternalError>;

    async fn delete_pages_branch(&self, token: &str, login: &str) -> Result<(), ExternalError>;
}

pub struct GithubClient {
    client: reqwest::Client,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl GithubClient {
    pub fn new(
        client: reqwest::Client,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            client,
            client_id,
            client_secret,
        }
    }

    fn authorized(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder
            .header("Authorization", format!("token {}", token))
            .header("Accept", "application/vnd.github.v3+json")
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn exchange_code(&self, code: &str) -> Result<String, ExternalError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(ExternalError::MissingCredentials("GITHUB_CLIENT_ID"))?;
        let client_secret = self
            .client_secret
            .as_deref()
            .ok_or(ExternalError::MissingCredentials("GITHUB_CLIENT_SECRET"))?;

        let body = serde_json::json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "code": code,
        });
        let resp = self
            .client
            .post(URL_GITHUB_OAUTH_TOKEN)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;
        let data: Value = resp
            .json()
            .await
            .map_err(|e| ExternalError::InvalidResponse(e.to_string()))?;
        info!("exchange_code(...) [{}]", URL_GITHUB_OAUTH_TOKEN);

        parse_token_exchange(&data)
    }

    async fn resolve_login(&self, token: &str) -> Result<String, ExternalError> {
        let resp = self
            .authorized(self.client.get(URL_GITHUB_USER), token)
            .send()
            .await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ExternalError::UserNotFound(format!("github answered {}", status)));
        }
        let data: Value = resp
            .json()
            .await
            .map_err(|e| ExternalError::InvalidResponse(e.to_string()))?;
        data.get("login")
            .and_then(|l| l.as_str())
            .map(str::to_string)
            .ok_or_else(|| ExternalError::UserNotFound(data.to_string()))
    }

    async fn ensure_pages_repo(&self, token: &str, login: &str) -> Result<(), ExternalError> {
        let url = url_github_pages_repo(login);
        let resp = self.authorized(self.client.get(&url), token).send().await?;
        info!("ensure_pages_repo({}) [{}] {}", login, url, resp.status());
        if resp.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(ExternalError::RepoNotFound(pages_repo_name(login)))
        }
    }

    async fn delete_pages_branch(&self, token: &str, login: &str) -> Result<(), ExternalError> {
        let url = url_github_pages_branch_ref(login);
        let resp = self.authorized(self.client.delete(&url), token).send().await?;
        let status = resp.status();
        info!("delete_pages_branch({}) [{}] {}", login, url, status);
        match status {
            s if s.is_success() => Ok(()),
            // branch already gone, nothing left to tear down
            StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                warn!("gh-pages branch for {} was already absent", login);
                Ok(())
            }
            s => Err(ExternalError::Http(format!("github answered {}", s))),
        }
    }
}

fn parse_token_exchange(data: &Value) -> Result<String, ExternalError> {
    if let Some(token) = data.get("access_token").and_then(|t| t.as_str()) {
        return Ok(token.to_string());
    }
    let detail = data
        .get("error_description")
        .or_else(|| data.get("error"))
        .and_then(|d| d.as_str())
        .unwrap_or("no access_token in response");
    Err(ExternalError::OAuth(detail.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_exchange_reads_access_token() {
        let data = json!({ "access_token": "gho_123", "token_type": "bearer" });
        assert_eq!(parse_token_exchange(&data).unwrap(), "gho_123");
    }

    #[test]
    fn token_exchange_surfaces_error_description() {
        let data = json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        });
        match parse_token_exchange(&data) {
            Err(ExternalError::OAuth(d)) => assert!(d.contains("incorrect or expired")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
