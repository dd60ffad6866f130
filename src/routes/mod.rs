pub mod achievements;
pub mod auth;
pub mod publications;
pub mod team;
pub mod theme;
pub mod website;

use crate::error::AppError;
use crate::state::SharedState;
use axum::extract::Request;
use axum::http::header::{CONTENT_TYPE, IF_MATCH};
use axum::http::{HeaderMap, Method};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::info;
use serde::Serialize;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const WELCOME: &str = "You have reached the Researchify API";

/// `{ "message": ... }` body for endpoints with nothing else to return.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn build_router(state: SharedState) -> Router {
    // the client sends cookies, so the origin is echoed rather than `*`
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, IF_MATCH])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(welcome))
        .nest("/auth", auth::router())
        .nest("/team", team::router())
        .nest("/publications", publications::router())
        .nest("/achievements", achievements::router())
        .nest("/clientWebsite", website::website_router())
        .nest("/homepage", website::homepage_router())
        .nest("/theme", theme::router())
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(state)
}

async fn welcome() -> &'static str {
    WELCOME
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// Record ids are UUIDs; anything else is rejected before touching the store.
pub fn ensure_id(raw: &str) -> Result<(), AppError> {
    match uuid::Uuid::parse_str(raw) {
        Ok(_) => Ok(()),
        Err(_) => Err(AppError::BadRequest(format!("Error: {raw} is not a valid id."))),
    }
}

/// Optional `If-Match: <version>` pinning the team revision a member edit
/// was based on. ETag-style quotes are accepted.
pub fn expected_version(headers: &HeaderMap) -> Result<Option<i64>, AppError> {
    let Some(raw) = headers.get(IF_MATCH) else {
        return Ok(None);
    };
    raw.to_str()
        .ok()
        .map(|v| v.trim().trim_start_matches("W/").trim_matches('"'))
        .and_then(|v| v.parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| AppError::BadRequest("Error: If-Match must be a team version.".to_string()))
}
