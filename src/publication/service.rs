use crate::error::AppError;
use crate::external::{ScholarSource, ScrapedPage};
use crate::publication::model::{
    ImportedPublication, NewPublication, PublicationDto, PublicationUpdate,
};
use crate::state::SharedState;
use crate::storage::repository::{PublicationRepository, TeamRepository};
use log::info;
use regex::Regex;
use sea_orm::DatabaseConnection;
use std::sync::{Arc, OnceLock};

pub const PUBLICATION_NOT_FOUND_MSG: &str = "No publication found with the given id";
pub const AUTHOR_ID_MSG: &str = "Error: Invalid Google Scholar author id.";

fn author_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{12}$").expect("author id pattern"))
}

pub fn is_scholar_author_id(value: &str) -> bool {
    author_id_regex().is_match(value)
}

pub struct PublicationService {
    db: Arc<DatabaseConnection>,
    scholar: Arc<dyn ScholarSource>,
}

impl PublicationService {
    pub fn new(db: Arc<DatabaseConnection>, scholar: Arc<dyn ScholarSource>) -> Self {
        Self { db, scholar }
    }

    pub fn from_state(state: &SharedState) -> Self {
        Self::new(state.db.clone(), state.clients.scholar.clone())
    }

    async fn ensure_team(&self, team_id: &str) -> Result<(), AppError> {
        if TeamRepository::exists(&self.db, team_id).await? {
            Ok(())
        } else {
            Err(AppError::team_not_found())
        }
    }

    pub async fn create(&self, payload: NewPublication) -> Result<PublicationDto, AppError> {
        self.ensure_team(&payload.team_id).await?;
        let model = PublicationRepository::insert(&self.db, &payload.team_id, payload.fields).await?;
        info!("publication {} created for team {}", model.id, model.team_id);
        Ok(model.into())
    }

    pub async fn read(&self, id: &str) -> Result<PublicationDto, AppError> {
        PublicationRepository::find_by_id(&self.db, id)
            .await?
            .map(PublicationDto::from)
            .ok_or_else(|| AppError::NotFound(PUBLICATION_NOT_FOUND_MSG.to_string()))
    }

    pub async fn list_by_team(&self, team_id: &str) -> Result<Vec<PublicationDto>, AppError> {
        self.ensure_team(team_id).await?;
        Ok(PublicationRepository::find_by_team(&self.db, team_id)
            .await?
            .into_iter()
            .map(PublicationDto::from)
            .collect())
    }

    pub async fn update(
        &self,
        id: &str,
        changes: PublicationUpdate,
    ) -> Result<PublicationDto, AppError> {
        PublicationRepository::update(&self.db, id, changes)
            .await?
            .map(PublicationDto::from)
            .ok_or_else(|| AppError::NotFound(PUBLICATION_NOT_FOUND_MSG.to_string()))
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if PublicationRepository::delete(&self.db, id).await? == 0 {
            return Err(AppError::NotFound(PUBLICATION_NOT_FOUND_MSG.to_string()));
        }
        Ok(())
    }

    /// One page of an author's Google Scholar profile.
    pub async fn scrape(&self, author_id: &str, start: usize) -> Result<ScrapedPage, AppError> {
        if !is_scholar_author_id(author_id) {
            return Err(AppError::BadRequest(AUTHOR_ID_MSG.to_string()));
        }
        let page = self.scholar.fetch_page(author_id, start).await?;
        info!(
            "scholar {} from {}: {} publications, end={}",
            author_id, start, page.retrieved, page.end
        );
        Ok(page)
    }

    /// The batch has already been validated item by item; it is stored in
    /// one transaction.
    pub async fn import(
        &self,
        team_id: &str,
        items: Vec<ImportedPublication>,
    ) -> Result<Vec<PublicationDto>, AppError> {
        self.ensure_team(team_id).await?;
        let count = items.len();
        let models = PublicationRepository::insert_batch(&self.db, team_id, items).await?;
        info!("imported {} publications for team {}", count, team_id);
        Ok(models.into_iter().map(PublicationDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scholar_author_ids_are_twelve_url_safe_chars() {
        assert!(is_scholar_author_id("SbUmSEAAAAAJ"));
        assert!(is_scholar_author_id("a-b_c1234567"));
        assert!(!is_scholar_author_id("short"));
        assert!(!is_scholar_author_id("SbUmSEAAAAAJX"));
        assert!(!is_scholar_author_id("SbUmSEAAAA/J"));
    }
}
