use crate::storage::entity::achievement::{
    self, ActiveModel as AchievementActiveModel, Entity as Achievement,
    Model as AchievementModel,
};
use crate::validation::{min_len, Validate, ValidationErrors};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};

pub const ACHIEVEMENT_TITLE_MSG: &str = "Error: Title must be at least 3 characters.";
pub const ACHIEVEMENT_DESCRIPTION_MSG: &str = "Error: Description must be at least 5 characters.";
pub const YEAR_AWARDED_MSG: &str = "Error: yearAwarded must be a 4 digit year.";
pub const ACHIEVEMENT_TEAM_ID_MSG: &str = "Error: teamId must be a valid id.";

fn valid_year(year: i32) -> bool {
    (1000..=9999).contains(&year)
}

/// Body of `POST /achievements`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAchievement {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year_awarded: i32,
    #[serde(default)]
    pub description: String,
}

impl Validate for NewAchievement {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(min_len(&self.title, 3), "title", ACHIEVEMENT_TITLE_MSG);
        errors.check(valid_year(self.year_awarded), "yearAwarded", YEAR_AWARDED_MSG);
        errors.check(
            min_len(&self.description, 5),
            "description",
            ACHIEVEMENT_DESCRIPTION_MSG,
        );
        errors.check(
            uuid::Uuid::parse_str(&self.team_id).is_ok(),
            "teamId",
            ACHIEVEMENT_TEAM_ID_MSG,
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementUpdate {
    pub title: Option<String>,
    pub year_awarded: Option<i32>,
    pub description: Option<String>,
}

impl Validate for AchievementUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            errors.check(min_len(title, 3), "title", ACHIEVEMENT_TITLE_MSG);
        }
        if let Some(year) = self.year_awarded {
            errors.check(valid_year(year), "yearAwarded", YEAR_AWARDED_MSG);
        }
        if let Some(description) = &self.description {
            errors.check(
                min_len(description, 5),
                "description",
                ACHIEVEMENT_DESCRIPTION_MSG,
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub team_id: String,
    pub title: String,
    pub year_awarded: i32,
    pub description: String,
}

impl From<AchievementModel> for AchievementDto {
    fn from(model: AchievementModel) -> Self {
        Self {
            id: model.id,
            team_id: model.team_id,
            title: model.title,
            year_awarded: model.year_awarded,
            description: model.description,
        }
    }
}

pub struct AchievementRepository;

impl AchievementRepository {
    pub async fn insert(
        db: &DatabaseConnection,
        a: NewAchievement,
    ) -> Result<AchievementModel, DbErr> {
        let now = Utc::now().timestamp();
        AchievementActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            team_id: Set(a.team_id),
            title: Set(a.title.trim().to_string()),
            year_awarded: Set(a.year_awarded),
            description: Set(a.description.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn find_by_team(
        db: &DatabaseConnection,
        team_id: &str,
    ) -> Result<Vec<AchievementModel>, DbErr> {
        Achievement::find()
            .filter(achievement::Column::TeamId.eq(team_id))
            .order_by_desc(achievement::Column::YearAwarded)
            .order_by_asc(achievement::Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        changes: AchievementUpdate,
    ) -> Result<Option<AchievementModel>, DbErr> {
        let mut update = AchievementActiveModel {
            id: Set(id.to_string()),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(v) = changes.title {
            update.title = Set(v.trim().to_string());
        }
        if let Some(v) = changes.year_awarded {
            update.year_awarded = Set(v);
        }
        if let Some(v) = changes.description {
            update.description = Set(v.trim().to_string());
        }
        match update.update(db).await {
            Ok(model) => Ok(Some(model)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<u64, DbErr> {
        let res = Achievement::delete_by_id(id.to_string()).exec(db).await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_by_team(db: &DatabaseConnection, team_id: &str) -> Result<u64, DbErr> {
        let res = Achievement::delete_many()
            .filter(achievement::Column::TeamId.eq(team_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}
