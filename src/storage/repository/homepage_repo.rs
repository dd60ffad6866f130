use crate::storage::entity::homepage::{
    self, ActiveModel as HomepageActiveModel, Entity as Homepage, Model as HomepageModel,
};
use crate::validation::{Validate, ValidationErrors};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub team_id: String,
    pub about_us: String,
}

impl From<HomepageModel> for HomepageDto {
    fn from(model: HomepageModel) -> Self {
        Self {
            id: model.id,
            team_id: model.team_id,
            about_us: model.about_us,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageUpdate {
    pub about_us: Option<String>,
}

// free text, anything goes
impl Validate for HomepageUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

pub struct HomepageRepository;

impl HomepageRepository {
    pub async fn create_default(
        db: &DatabaseConnection,
        team_id: &str,
    ) -> Result<HomepageModel, DbErr> {
        let now = Utc::now().timestamp();
        HomepageActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            team_id: Set(team_id.to_string()),
            about_us: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn find_by_team(
        db: &DatabaseConnection,
        team_id: &str,
    ) -> Result<Option<HomepageModel>, DbErr> {
        Homepage::find()
            .filter(homepage::Column::TeamId.eq(team_id))
            .one(db)
            .await
    }

    pub async fn set_about_us(
        db: &DatabaseConnection,
        current: HomepageModel,
        about_us: String,
    ) -> Result<HomepageModel, DbErr> {
        let mut update: HomepageActiveModel = current.into();
        update.about_us = Set(about_us);
        update.updated_at = Set(Utc::now().timestamp());
        update.update(db).await
    }

    pub async fn reset(db: &DatabaseConnection, team_id: &str) -> Result<u64, DbErr> {
        let res = Homepage::update_many()
            .col_expr(homepage::Column::AboutUs, Expr::value(""))
            .col_expr(homepage::Column::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(homepage::Column::TeamId.eq(team_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_by_team(db: &DatabaseConnection, team_id: &str) -> Result<u64, DbErr> {
        let res = Homepage::delete_many()
            .filter(homepage::Column::TeamId.eq(team_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}
