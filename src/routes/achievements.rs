use crate::error::AppError;
use crate::routes::{ensure_id, Message};
use crate::state::SharedState;
use crate::storage::repository::{
    AchievementDto, AchievementRepository, AchievementUpdate, NewAchievement, TeamRepository,
};
use crate::validation::Valid;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use log::info;

const ACHIEVEMENT_NOT_FOUND_MSG: &str = "No achievement found with the given id";

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(create_achievement))
        .route("/team/{teamId}", get(achievements_by_team))
        .route("/{id}", patch(update_achievement).delete(delete_achievement))
}

async fn create_achievement(
    State(state): State<SharedState>,
    Valid(payload): Valid<NewAchievement>,
) -> Result<(StatusCode, Json<AchievementDto>), AppError> {
    if !TeamRepository::exists(&state.db, &payload.team_id).await? {
        return Err(AppError::team_not_found());
    }
    let created = AchievementRepository::insert(&state.db, payload).await?;
    info!("achievement {} created for team {}", created.id, created.team_id);
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn achievements_by_team(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
) -> Result<Json<Vec<AchievementDto>>, AppError> {
    ensure_id(&team_id)?;
    if !TeamRepository::exists(&state.db, &team_id).await? {
        return Err(AppError::team_not_found());
    }
    let list = AchievementRepository::find_by_team(&state.db, &team_id)
        .await?
        .into_iter()
        .map(AchievementDto::from)
        .collect();
    Ok(Json(list))
}

async fn update_achievement(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(changes): Valid<AchievementUpdate>,
) -> Result<Json<AchievementDto>, AppError> {
    ensure_id(&id)?;
    let updated = AchievementRepository::update(&state.db, &id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(ACHIEVEMENT_NOT_FOUND_MSG.to_string()))?;
    Ok(Json(updated.into()))
}

async fn delete_achievement(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    ensure_id(&id)?;
    if AchievementRepository::delete(&state.db, &id).await? == 0 {
        return Err(AppError::NotFound(ACHIEVEMENT_NOT_FOUND_MSG.to_string()));
    }
    Ok(Json(Message::new("Achievement deleted successfully.")))
}
