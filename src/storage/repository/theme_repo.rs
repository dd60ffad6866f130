use crate::storage::entity::theme::{
    self, ActiveModel as ThemeActiveModel, Entity as Theme, Model as ThemeModel,
};
use crate::validation::{Validate, ValidationErrors};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub primary: String,
    pub secondary: String,
}

impl From<ThemeModel> for ThemeDto {
    fn from(model: ThemeModel) -> Self {
        Self {
            id: model.id,
            primary: model.primary_color,
            secondary: model.secondary_color,
        }
    }
}

/// Body of `POST /theme`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRequest {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub primary: String,
    #[serde(default)]
    pub secondary: String,
}

impl Validate for ThemeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            uuid::Uuid::parse_str(&self.team_id).is_ok(),
            "teamId",
            "Error: teamId must be a valid id.",
        );
        errors.check(
            !self.primary.trim().is_empty(),
            "primary",
            "Error: primary colour must not be empty.",
        );
        errors.check(
            !self.secondary.trim().is_empty(),
            "secondary",
            "Error: secondary colour must not be empty.",
        );
        errors.into_result()
    }
}

pub struct ThemeRepository;

impl ThemeRepository {
    /// Palettes are shared: an identical one is reused instead of duplicated.
    pub async fn find_or_create(
        db: &DatabaseConnection,
        primary: &str,
        secondary: &str,
    ) -> Result<ThemeModel, DbErr> {
        let existing = Theme::find()
            .filter(theme::Column::PrimaryColor.eq(primary))
            .filter(theme::Column::SecondaryColor.eq(secondary))
            .one(db)
            .await?;
        if let Some(found) = existing {
            return Ok(found);
        }

        let now = Utc::now().timestamp();
        ThemeActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            primary_color: Set(primary.to_string()),
            secondary_color: Set(secondary.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<ThemeModel>, DbErr> {
        Theme::find_by_id(id.to_string()).one(db).await
    }
}
