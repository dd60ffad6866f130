use crate::auth::token::{Claims, TokenError};
use crate::error::AppError;
use crate::state::SharedState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use log::warn;
use std::time::Duration;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// The team whose access cookie accompanied the request.
#[derive(Debug, Clone)]
pub struct AuthTeam(pub Claims);

impl AuthTeam {
    pub fn team_id(&self) -> &str {
        &self.0.sub
    }

    /// Mutations under `/team/{teamId}` are limited to the team's own token.
    pub fn ensure_owns(&self, team_id: &str) -> Result<(), AppError> {
        if self.0.sub == team_id {
            Ok(())
        } else {
            warn!("team {} tried to act on team {}", self.0.sub, team_id);
            Err(AppError::Forbidden(
                "Token does not grant access to this team".to_string(),
            ))
        }
    }
}

impl FromRequestParts<SharedState> for AuthTeam {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ACCESS_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Missing access token".to_string()))?;

        state
            .access_tokens
            .verify(&token)
            .map(AuthTeam)
            .map_err(forbidden)
    }
}

pub fn forbidden(err: TokenError) -> AppError {
    AppError::Forbidden(format!("Invalid token: {err}"))
}

pub fn auth_cookie(name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::seconds(max_age.as_secs() as i64))
        .build()
}

/// Empty value and zero max-age, so the browser drops the cookie.
pub fn cleared_cookie(name: &'static str) -> Cookie<'static> {
    auth_cookie(name, String::new(), Duration::ZERO)
}
