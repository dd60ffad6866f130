use crate::publication::model::{clean_authors, ImportedPublication, PublicationUpdate};
use crate::storage::entity::publication::{
    self, ActiveModel as PublicationActiveModel, Entity as Publication,
    Model as PublicationModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

pub struct PublicationRepository;

impl PublicationRepository {
    fn active_model(team_id: &str, p: ImportedPublication, now: i64) -> PublicationActiveModel {
        let authors = clean_authors(&p.authors);
        PublicationActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            team_id: Set(team_id.to_string()),
            authors_json: Set(serde_json::to_string(&authors).unwrap_or_else(|_| "[]".into())),
            title: Set(p.title.trim().to_string()),
            description: Set(p.description.trim().to_string()),
            summary: Set(p.summary),
            link: Set(p.link),
            year_published: Set(p.year_published),
            cited_by: Set(p.cited_by),
            category_type: Set(p.category.category_type.as_str().to_string()),
            category_title: Set(p.category.category_title),
            issue: Set(p.category.issue),
            volume: Set(p.category.volume),
            pages: Set(p.category.pages),
            publisher: Set(p.category.publisher),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    pub async fn insert(
        db: &DatabaseConnection,
        team_id: &str,
        p: ImportedPublication,
    ) -> Result<PublicationModel, DbErr> {
        Self::active_model(team_id, p, Utc::now().timestamp())
            .insert(db)
            .await
    }

    /// Inserts the whole batch in one transaction; either every row lands
    /// or none does.
    pub async fn insert_batch(
        db: &DatabaseConnection,
        team_id: &str,
        items: Vec<ImportedPublication>,
    ) -> Result<Vec<PublicationModel>, DbErr> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let now = Utc::now().timestamp();
        let txn = db.begin().await?;
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            inserted.push(Self::active_model(team_id, item, now).insert(&txn).await?);
        }
        txn.commit().await?;
        Ok(inserted)
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: &str,
    ) -> Result<Option<PublicationModel>, DbErr> {
        Publication::find_by_id(id.to_string()).one(db).await
    }

    pub async fn find_by_team(
        db: &DatabaseConnection,
        team_id: &str,
    ) -> Result<Vec<PublicationModel>, DbErr> {
        Publication::find()
            .filter(publication::Column::TeamId.eq(team_id))
            .order_by_asc(publication::Column::CreatedAt)
            .order_by_asc(publication::Column::Title)
            .all(db)
            .await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        changes: PublicationUpdate,
    ) -> Result<Option<PublicationModel>, DbErr> {
        let mut update = PublicationActiveModel {
            id: Set(id.to_string()),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(authors) = changes.authors {
            update.authors_json = Set(
                serde_json::to_string(&clean_authors(&authors)).unwrap_or_else(|_| "[]".into()),
            );
        }
        if let Some(v) = changes.title {
            update.title = Set(v.trim().to_string());
        }
        if let Some(v) = changes.description {
            update.description = Set(v.trim().to_string());
        }
        if let Some(v) = changes.summary {
            update.summary = Set(Some(v));
        }
        if let Some(v) = changes.link {
            update.link = Set(Some(v));
        }
        if let Some(v) = changes.year_published {
            update.year_published = Set(Some(v));
        }
        if let Some(v) = changes.cited_by {
            update.cited_by = Set(Some(v));
        }
        if let Some(c) = changes.category {
            update.category_type = Set(c.category_type.as_str().to_string());
            update.category_title = Set(c.category_title);
            update.issue = Set(c.issue);
            update.volume = Set(c.volume);
            update.pages = Set(c.pages);
            update.publisher = Set(c.publisher);
        }

        match update.update(db).await {
            Ok(model) => Ok(Some(model)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<u64, DbErr> {
        let res = Publication::delete_by_id(id.to_string()).exec(db).await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_by_team(db: &DatabaseConnection, team_id: &str) -> Result<u64, DbErr> {
        let res = Publication::delete_many()
            .filter(publication::Column::TeamId.eq(team_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}
