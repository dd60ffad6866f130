#![allow(dead_code)]

use async_trait::async_trait;
use researchify::config::Config;
use researchify::external::{
    DeployBundle, DeployClient, ExternalError, GithubApi, ScholarSource, ScrapedPage,
    ScrapedPublication, TwitterApi, TwitterUser,
};
use researchify::publication::{Category, CategoryType};
use researchify::routes::build_router;
use researchify::state::{AppState, ExternalClients, SharedState};
use researchify::storage::establish_connection;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const PASSWORD: &str = "correct horse";
pub const GH_CODE: &str = "good-code";
pub const GH_TOKEN: &str = "gho_test_token";
pub const GH_LOGIN: &str = "octolab";

pub struct FakeTwitter;

#[async_trait]
impl TwitterApi for FakeTwitter {
    async fn lookup_user(&self, handle: &str) -> Result<TwitterUser, ExternalError> {
        if handle == "ghost" {
            return Err(ExternalError::HandleNotFound(format!(
                "Could not find user with username: [{handle}]."
            )));
        }
        Ok(TwitterUser {
            id: "42".to_string(),
            name: handle.to_uppercase(),
            username: handle.to_string(),
        })
    }
}

#[derive(Default)]
pub struct FakeGithub {
    pub cleared: Mutex<Vec<String>>,
}

#[async_trait]
impl GithubApi for FakeGithub {
    async fn exchange_code(&self, code: &str) -> Result<String, ExternalError> {
        if code == GH_CODE {
            Ok(GH_TOKEN.to_string())
        } else {
            Err(ExternalError::OAuth("bad_verification_code".to_string()))
        }
    }

    async fn resolve_login(&self, token: &str) -> Result<String, ExternalError> {
        match token {
            GH_TOKEN => Ok(GH_LOGIN.to_string()),
            "gho_no_repo" => Ok("norepo".to_string()),
            _ => Err(ExternalError::UserNotFound("Bad credentials".to_string())),
        }
    }

    async fn ensure_pages_repo(&self, _token: &str, login: &str) -> Result<(), ExternalError> {
        if login == GH_LOGIN {
            Ok(())
        } else {
            Err(ExternalError::RepoNotFound(format!("{login}.github.io")))
        }
    }

    async fn delete_pages_branch(&self, _token: &str, login: &str) -> Result<(), ExternalError> {
        self.cleared.lock().unwrap().push(login.to_string());
        Ok(())
    }
}

pub struct FakeScholar;

#[async_trait]
impl ScholarSource for FakeScholar {
    async fn fetch_page(&self, _author_id: &str, start: usize) -> Result<ScrapedPage, ExternalError> {
        let publications = if start == 0 {
            vec![ScrapedPublication {
                title: "Deep Things".to_string(),
                authors: vec!["A Author".to_string(), "B Author".to_string()],
                description: "About deep things.".to_string(),
                link: Some("https://example.org/deep".to_string()),
                year_published: Some(2020),
                cited_by: Some(12),
                category: Category {
                    category_type: CategoryType::Journal,
                    category_title: Some("Journal of Things".to_string()),
                    ..Default::default()
                },
            }]
        } else {
            Vec::new()
        };
        Ok(ScrapedPage {
            retrieved: publications.len(),
            end: publications.is_empty(),
            publications,
        })
    }
}

#[derive(Default)]
pub struct FakeDeployer {
    pub calls: Mutex<Vec<(String, Value)>>,
}

#[async_trait]
impl DeployClient for FakeDeployer {
    async fn trigger(&self, team_id: &str, bundle: &DeployBundle) -> Result<(), ExternalError> {
        let body = serde_json::to_value(bundle).map_err(|e| ExternalError::Http(e.to_string()))?;
        self.calls.lock().unwrap().push((team_id.to_string(), body));
        Ok(())
    }
}

pub struct TestApp {
    pub base: String,
    pub http: reqwest::Client,
    pub state: SharedState,
    pub github: Arc<FakeGithub>,
    pub deployer: Arc<FakeDeployer>,
}

/// Cookies issued by `/auth/login`.
#[derive(Debug, Clone)]
pub struct Session {
    pub team_id: String,
    pub access: String,
    pub refresh: String,
}

impl Session {
    pub fn cookie(&self) -> String {
        format!("accessToken={}", self.access)
    }

    pub fn refresh_cookie(&self) -> String {
        format!("refreshToken={}", self.refresh)
    }
}

pub async fn spawn_app() -> TestApp {
    let config = Config::in_memory();
    let db = establish_connection(&config.database_url, config.database_max_connections)
        .await
        .expect("in-memory database");

    let github = Arc::new(FakeGithub::default());
    let deployer = Arc::new(FakeDeployer::default());
    let clients = ExternalClients {
        twitter: Arc::new(FakeTwitter),
        github: github.clone(),
        scholar: Arc::new(FakeScholar),
        deployer: deployer.clone(),
    };
    let state = AppState::new(config, Arc::new(db), clients).shared();

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    TestApp {
        base: format!("http://{addr}"),
        http: reqwest::Client::new(),
        state,
        github,
        deployer,
    }
}

/// Value of cookie `name` among the response's `set-cookie` headers.
pub fn set_cookie(resp: &Response, name: &str) -> Option<String> {
    resp.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| {
            let first = raw.split(';').next()?;
            let (k, v) = first.split_once('=')?;
            (k.trim() == name).then(|| v.trim().to_string())
        })
}

pub fn team_body(name: &str, email: &str) -> Value {
    json!({
        "teamName": name,
        "orgName": "University Y",
        "email": email,
        "password": PASSWORD,
    })
}

pub fn publication_body(team_id: &str, title: &str) -> Value {
    json!({
        "teamId": team_id,
        "authors": ["Ada Lovelace"],
        "title": title,
        "description": "A long enough description",
        "yearPublished": 2021,
        "category": { "type": "CONFERENCE", "categoryTitle": "ICSE" },
    })
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    pub fn authed(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        self.request(method, path)
            .header(reqwest::header::COOKIE, session.cookie())
    }

    pub async fn create_team(&self, name: &str, email: &str) -> String {
        let resp = self
            .request(Method::POST, "/team")
            .json(&team_body(name, email))
            .send()
            .await
            .expect("create team");
        assert_eq!(resp.status(), 201, "team creation failed");
        resp.json::<String>().await.expect("team id")
    }

    pub async fn login(&self, email: &str) -> Session {
        let resp = self
            .request(Method::POST, "/auth/login")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await
            .expect("login");
        assert_eq!(resp.status(), 200, "login failed");
        let access = set_cookie(&resp, "accessToken").expect("access cookie");
        let refresh = set_cookie(&resp, "refreshToken").expect("refresh cookie");
        let body: Value = resp.json().await.expect("login body");
        Session {
            team_id: body["teamId"].as_str().expect("teamId").to_string(),
            access,
            refresh,
        }
    }

    /// Registers a team and logs it in.
    pub async fn team_session(&self, name: &str, email: &str) -> Session {
        self.create_team(name, email).await;
        self.login(email).await
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.request(Method::GET, path).send().await.expect("get");
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    pub async fn send_json(&self, method: Method, path: &str, body: &Value) -> (u16, Value) {
        let resp = self
            .request(method, path)
            .json(body)
            .send()
            .await
            .expect("send");
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }
}
