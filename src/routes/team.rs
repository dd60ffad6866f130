use crate::auth::AuthTeam;
use crate::error::AppError;
use crate::routes::{ensure_id, expected_version, Message};
use crate::state::SharedState;
use crate::team::{
    GhToken, MemberIds, NewMember, NewTeam, TeamDto, TeamMember, TeamService, TeamUpdate,
    TwitterHandleUpdate,
};
use crate::validation::Valid;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Serialize;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(create_team).get(read_own_team))
        .route("/{teamId}", patch(update_team).delete(delete_team))
        .route("/{teamId}/resetTeamData", delete(reset_team_data))
        .route(
            "/{teamId}/member",
            post(create_member).get(list_members).patch(replace_member),
        )
        .route("/{teamId}/member/{memberId}", delete(delete_member))
        .route("/{teamId}/members", patch(delete_members))
        .route("/{teamId}/reset-members", delete(reset_members))
        .route("/{teamId}/twitter-handle", patch(store_twitter_handle))
        .route("/{teamId}/gh_auth/{code}", get(github_access_token))
        .route("/{teamId}/pages-deploy", post(deploy_pages))
        .route("/{teamId}/pages-clear", delete(clear_pages))
}

/// Id format, then ownership: the order the gate reports them in.
fn authorize(auth: &AuthTeam, team_id: &str) -> Result<(), AppError> {
    ensure_id(team_id)?;
    auth.ensure_owns(team_id)
}

async fn create_team(
    State(state): State<SharedState>,
    Valid(payload): Valid<NewTeam>,
) -> Result<(StatusCode, Json<String>), AppError> {
    let team = TeamService::from_state(&state).create(payload).await?;
    Ok((StatusCode::CREATED, Json(team.id)))
}

async fn read_own_team(
    State(state): State<SharedState>,
    auth: AuthTeam,
) -> Result<Json<TeamDto>, AppError> {
    let team = TeamService::from_state(&state).find(auth.team_id()).await?;
    Ok(Json(team.into()))
}

async fn update_team(
    State(state): State<SharedState>,
    auth: AuthTeam,
    Path(team_id): Path<String>,
    Valid(payload): Valid<TeamUpdate>,
) -> Result<Json<TeamDto>, AppError> {
    authorize(&auth, &team_id)?;
    let team = TeamService::from_state(&state).update(&team_id, payload).await?;
    Ok(Json(team))
}

async fn delete_team(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
) -> Result<Json<Message>, AppError> {
    ensure_id(&team_id)?;
    TeamService::from_state(&state).delete(&team_id).await?;
    Ok(Json(Message::new("Team deleted successfully.")))
}

async fn reset_team_data(
    State(state): State<SharedState>,
    auth: AuthTeam,
    Path(team_id): Path<String>,
) -> Result<Json<TeamDto>, AppError> {
    authorize(&auth, &team_id)?;
    let team = TeamService::from_state(&state).reset_data(&team_id).await?;
    Ok(Json(team))
}

async fn create_member(
    State(state): State<SharedState>,
    auth: AuthTeam,
    Path(team_id): Path<String>,
    headers: HeaderMap,
    Valid(payload): Valid<NewMember>,
) -> Result<(StatusCode, Json<TeamMember>), AppError> {
    authorize(&auth, &team_id)?;
    let member = TeamService::from_state(&state)
        .add_member(&team_id, expected_version(&headers)?, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

async fn list_members(
    State(state): State<SharedState>,
    auth: AuthTeam,
    Path(team_id): Path<String>,
) -> Result<Json<Vec<TeamMember>>, AppError> {
    authorize(&auth, &team_id)?;
    let members = TeamService::from_state(&state).members(&team_id).await?;
    Ok(Json(members))
}

async fn replace_member(
    State(state): State<SharedState>,
    auth: AuthTeam,
    Path(team_id): Path<String>,
    headers: HeaderMap,
    Valid(member): Valid<TeamMember>,
) -> Result<Json<TeamMember>, AppError> {
    authorize(&auth, &team_id)?;
    let member = TeamService::from_state(&state)
        .replace_member(&team_id, expected_version(&headers)?, member)
        .await?;
    Ok(Json(member))
}

async fn delete_member(
    State(state): State<SharedState>,
    auth: AuthTeam,
    Path((team_id, member_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Message>, AppError> {
    authorize(&auth, &team_id)?;
    ensure_id(&member_id)?;
    TeamService::from_state(&state)
        .remove_member(&team_id, expected_version(&headers)?, &member_id)
        .await?;
    Ok(Json(Message::new("Team member deleted successfully.")))
}

async fn delete_members(
    State(state): State<SharedState>,
    auth: AuthTeam,
    Path(team_id): Path<String>,
    headers: HeaderMap,
    Valid(MemberIds(ids)): Valid<MemberIds>,
) -> Result<Json<Message>, AppError> {
    authorize(&auth, &team_id)?;
    let removed = TeamService::from_state(&state)
        .remove_members(&team_id, expected_version(&headers)?, ids)
        .await?;
    Ok(Json(Message::new(format!("{removed} team members deleted successfully."))))
}

async fn reset_members(
    State(state): State<SharedState>,
    auth: AuthTeam,
    Path(team_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Message>, AppError> {
    authorize(&auth, &team_id)?;
    TeamService::from_state(&state)
        .clear_members(&team_id, expected_version(&headers)?)
        .await?;
    Ok(Json(Message::new("Team members reset successfully.")))
}

async fn store_twitter_handle(
    State(state): State<SharedState>,
    auth: AuthTeam,
    Path(team_id): Path<String>,
    Valid(payload): Valid<TwitterHandleUpdate>,
) -> Result<Json<TeamDto>, AppError> {
    authorize(&auth, &team_id)?;
    let team = TeamService::from_state(&state)
        .set_twitter_handle(&team_id, &payload)
        .await?;
    Ok(Json(team))
}

async fn github_access_token(
    State(state): State<SharedState>,
    Path((team_id, code)): Path<(String, String)>,
) -> Result<Json<GhToken>, AppError> {
    ensure_id(&team_id)?;
    let gh_token = TeamService::from_state(&state)
        .github_access_token(&code)
        .await?;
    Ok(Json(GhToken { gh_token }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Deployed {
    message: String,
    github_username: String,
}

async fn deploy_pages(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
    Valid(payload): Valid<GhToken>,
) -> Result<Json<Deployed>, AppError> {
    ensure_id(&team_id)?;
    let login = TeamService::from_state(&state)
        .deploy(&team_id, payload.gh_token.trim())
        .await?;
    Ok(Json(Deployed {
        message: "Deployment started.".to_string(),
        github_username: login,
    }))
}

async fn clear_pages(
    State(state): State<SharedState>,
    auth: AuthTeam,
    Path(team_id): Path<String>,
    Valid(payload): Valid<GhToken>,
) -> Result<Json<Message>, AppError> {
    authorize(&auth, &team_id)?;
    TeamService::from_state(&state)
        .clear_pages(&team_id, payload.gh_token.trim())
        .await?;
    Ok(Json(Message::new("GitHub Pages deployment removed.")))
}
