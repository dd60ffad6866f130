use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub team_id: String,
    pub authors_json: String, // JSON array of author names
    pub title: String,
    pub description: String,
    #[sea_orm(nullable)]
    pub summary: Option<String>,
    #[sea_orm(nullable)]
    pub link: Option<String>,
    #[sea_orm(nullable)]
    pub year_published: Option<i32>,
    #[sea_orm(nullable)]
    pub cited_by: Option<i64>,
    pub category_type: String, // CONFERENCE / JOURNAL / BOOK / OTHER
    #[sea_orm(nullable)]
    pub category_title: Option<String>,
    #[sea_orm(nullable)]
    pub issue: Option<String>,
    #[sea_orm(nullable)]
    pub volume: Option<String>,
    #[sea_orm(nullable)]
    pub pages: Option<String>,
    #[sea_orm(nullable)]
    pub publisher: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// team_id is a plain foreign key; integrity is kept by the team lifecycle
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
