use crate::auth::gate::{auth_cookie, cleared_cookie, forbidden};
use crate::auth::{ACCESS_COOKIE, REFRESH_COOKIE};
use crate::error::AppError;
use crate::state::SharedState;
use crate::storage::entity::team::Model as TeamModel;
use crate::storage::repository::TeamRepository;
use crate::team::model::LoginRequest;
use crate::team::TeamService;
use crate::validation::Valid;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use log::info;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub team_id: String,
}

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh))
}

fn access_token_for(state: &SharedState, team: &TeamModel) -> String {
    state
        .access_tokens
        .sign(&team.id, &team.team_name, &team.org_name, &team.email)
}

async fn login(
    State(state): State<SharedState>,
    jar: CookieJar,
    Valid(payload): Valid<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let team = TeamService::from_state(&state).login(&payload).await?;

    let access = access_token_for(&state, &team);
    let refresh = state
        .refresh_tokens
        .sign(&team.id, &team.team_name, &team.org_name, &team.email);
    info!("team {} logged in", team.id);

    let jar = jar
        .add(auth_cookie(ACCESS_COOKIE, access.clone(), state.access_tokens.ttl()))
        .add(auth_cookie(REFRESH_COOKIE, refresh, state.refresh_tokens.ttl()));
    Ok((
        jar,
        Json(TokenResponse {
            access_token: access,
            team_id: team.id,
        }),
    ))
}

async fn logout(jar: CookieJar) -> (CookieJar, Json<&'static str>) {
    let jar = jar
        .add(cleared_cookie(ACCESS_COOKIE))
        .add(cleared_cookie(REFRESH_COOKIE));
    (jar, Json("Logout Successfully"))
}

/// Trades a valid refresh cookie for a new access cookie. The team is
/// re-read so renamed teams get current claims.
async fn refresh(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing refresh token".to_string()))?;
    let claims = state.refresh_tokens.verify(&token).map_err(forbidden)?;

    let team = TeamRepository::find_by_id(&state.db, &claims.sub)
        .await?
        .ok_or_else(AppError::team_not_found)?;

    let access = access_token_for(&state, &team);
    let jar = jar.add(auth_cookie(ACCESS_COOKIE, access.clone(), state.access_tokens.ttl()));
    Ok((
        jar,
        Json(TokenResponse {
            access_token: access,
            team_id: team.id,
        }),
    ))
}
