use crate::error::AppError;
use crate::routes::ensure_id;
use crate::state::SharedState;
use crate::storage::repository::{TeamRepository, ThemeDto, ThemeRepository, ThemeRequest};
use crate::validation::Valid;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(find_or_create_theme))
        .route("/{themeId}", get(read_theme))
}

/// Points the team at the palette, reusing an identical one when it exists.
async fn find_or_create_theme(
    State(state): State<SharedState>,
    Valid(payload): Valid<ThemeRequest>,
) -> Result<Json<ThemeDto>, AppError> {
    if !TeamRepository::exists(&state.db, &payload.team_id).await? {
        return Err(AppError::team_not_found());
    }
    let theme = ThemeRepository::find_or_create(
        &state.db,
        payload.primary.trim(),
        payload.secondary.trim(),
    )
    .await?;
    TeamRepository::set_theme(&state.db, &payload.team_id, theme.id.clone()).await?;
    Ok(Json(theme.into()))
}

async fn read_theme(
    State(state): State<SharedState>,
    Path(theme_id): Path<String>,
) -> Result<Json<ThemeDto>, AppError> {
    ensure_id(&theme_id)?;
    ThemeRepository::find_by_id(&state.db, &theme_id)
        .await?
        .map(|t| Json(t.into()))
        .ok_or_else(|| AppError::NotFound("No theme found with the given id".to_string()))
}
