use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub team_name: String,
    pub org_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    #[sea_orm(nullable)]
    pub twitter_handle: Option<String>,
    #[sea_orm(nullable)]
    pub template_id: Option<String>,
    #[sea_orm(nullable)]
    pub theme_id: Option<String>,
    #[sea_orm(nullable)]
    pub github_username: Option<String>,
    #[sea_orm(nullable)]
    pub profile_pic: Option<String>,

    // embedded member array, JSON
    pub members_json: String,
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
