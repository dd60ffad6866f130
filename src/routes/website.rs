//! `/clientWebsite` and `/homepage`: the per-team site records created
//! alongside the team.

use crate::error::AppError;
use crate::routes::ensure_id;
use crate::state::SharedState;
use crate::storage::entity::homepage::Model as HomepageModel;
use crate::storage::entity::website::Model as WebsiteModel;
use crate::storage::repository::{
    HomepageDto, HomepageRepository, HomepageUpdate, PageName, WebsiteDto, WebsiteRepository,
    WebsiteUpdate,
};
use crate::validation::Valid;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use sea_orm::DatabaseConnection;

pub fn website_router() -> Router<SharedState> {
    Router::new()
        .route("/{teamId}", get(read_website).patch(update_website))
        .route("/{teamId}/page", post(add_page).delete(remove_page))
}

pub fn homepage_router() -> Router<SharedState> {
    Router::new().route("/{teamId}", get(read_homepage).patch(update_homepage))
}

async fn website_of(db: &DatabaseConnection, team_id: &str) -> Result<WebsiteModel, AppError> {
    ensure_id(team_id)?;
    WebsiteRepository::find_by_team(db, team_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No website found for this team".to_string()))
}

async fn homepage_of(db: &DatabaseConnection, team_id: &str) -> Result<HomepageModel, AppError> {
    ensure_id(team_id)?;
    HomepageRepository::find_by_team(db, team_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No homepage found for this team".to_string()))
}

async fn read_website(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
) -> Result<Json<WebsiteDto>, AppError> {
    Ok(Json(website_of(&state.db, &team_id).await?.into()))
}

async fn update_website(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
    Valid(changes): Valid<WebsiteUpdate>,
) -> Result<Json<WebsiteDto>, AppError> {
    let current = website_of(&state.db, &team_id).await?;
    let updated = WebsiteRepository::update(&state.db, current, changes).await?;
    Ok(Json(updated.into()))
}

async fn add_page(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
    Valid(PageName { page_name }): Valid<PageName>,
) -> Result<(StatusCode, Json<WebsiteDto>), AppError> {
    let current = website_of(&state.db, &team_id).await?;
    let mut pages = WebsiteDto::from(current.clone()).pages;
    let page_name = page_name.trim().to_string();
    if pages.contains(&page_name) {
        return Err(AppError::BadRequest(format!(
            "Error: Page {page_name} already exists."
        )));
    }
    pages.push(page_name);
    let updated = WebsiteRepository::save_pages(&state.db, current, &pages).await?;
    Ok((StatusCode::CREATED, Json(updated.into())))
}

async fn remove_page(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
    Valid(PageName { page_name }): Valid<PageName>,
) -> Result<Json<WebsiteDto>, AppError> {
    let current = website_of(&state.db, &team_id).await?;
    let mut pages = WebsiteDto::from(current.clone()).pages;
    let page_name = page_name.trim();
    let before = pages.len();
    pages.retain(|p| p != page_name);
    if pages.len() == before {
        return Err(AppError::NotFound(format!("Page {page_name} not found.")));
    }
    let updated = WebsiteRepository::save_pages(&state.db, current, &pages).await?;
    Ok(Json(updated.into()))
}

async fn read_homepage(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
) -> Result<Json<HomepageDto>, AppError> {
    Ok(Json(homepage_of(&state.db, &team_id).await?.into()))
}

async fn update_homepage(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
    Valid(payload): Valid<HomepageUpdate>,
) -> Result<Json<HomepageDto>, AppError> {
    let current = homepage_of(&state.db, &team_id).await?;
    let updated = match payload.about_us {
        Some(about_us) => HomepageRepository::set_about_us(&state.db, current, about_us).await?,
        None => current,
    };
    Ok(Json(updated.into()))
}
