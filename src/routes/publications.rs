use crate::error::AppError;
use crate::external::ScrapedPage;
use crate::publication::{
    ImportedPublication, NewPublication, PublicationDto, PublicationService, PublicationUpdate,
};
use crate::routes::{ensure_id, Message};
use crate::state::SharedState;
use crate::validation::Valid;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(create_publication))
        .route(
            "/{id}",
            get(read_publication)
                .patch(update_publication)
                .delete(delete_publication),
        )
        .route("/team/{teamId}", get(publications_by_team))
        // the same segment is an author id for GET and a team id for POST
        .route("/import/{id}", get(scrape_scholar).post(import_publications))
}

async fn create_publication(
    State(state): State<SharedState>,
    Valid(payload): Valid<NewPublication>,
) -> Result<(StatusCode, Json<PublicationDto>), AppError> {
    let created = PublicationService::from_state(&state).create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read_publication(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<PublicationDto>, AppError> {
    ensure_id(&id)?;
    Ok(Json(PublicationService::from_state(&state).read(&id).await?))
}

async fn update_publication(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(changes): Valid<PublicationUpdate>,
) -> Result<Json<PublicationDto>, AppError> {
    ensure_id(&id)?;
    let updated = PublicationService::from_state(&state)
        .update(&id, changes)
        .await?;
    Ok(Json(updated))
}

async fn delete_publication(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    ensure_id(&id)?;
    PublicationService::from_state(&state).delete(&id).await?;
    Ok(Json(Message::new("Publication deleted successfully.")))
}

async fn publications_by_team(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
) -> Result<Json<Vec<PublicationDto>>, AppError> {
    ensure_id(&team_id)?;
    let list = PublicationService::from_state(&state)
        .list_by_team(&team_id)
        .await?;
    Ok(Json(list))
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeQuery {
    #[serde(default)]
    start: usize,
}

async fn scrape_scholar(
    State(state): State<SharedState>,
    Path(author_id): Path<String>,
    Query(query): Query<ScrapeQuery>,
) -> Result<Json<ScrapedPage>, AppError> {
    let page = PublicationService::from_state(&state)
        .scrape(&author_id, query.start)
        .await?;
    Ok(Json(page))
}

async fn import_publications(
    State(state): State<SharedState>,
    Path(team_id): Path<String>,
    Valid(items): Valid<Vec<ImportedPublication>>,
) -> Result<(StatusCode, Json<Vec<PublicationDto>>), AppError> {
    ensure_id(&team_id)?;
    let created = PublicationService::from_state(&state)
        .import(&team_id, items)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
