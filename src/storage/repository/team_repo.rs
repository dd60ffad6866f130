use crate::storage::entity::team::{
    self, ActiveModel as TeamActiveModel, Entity as Team, Model as TeamModel,
};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

/// Columns supplied when a team registers.
#[derive(Debug, Clone)]
pub struct TeamRecord {
    pub team_name: String,
    pub org_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Scalar profile columns; `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct TeamProfileChanges {
    pub team_name: Option<String>,
    pub org_name: Option<String>,
    pub email: Option<String>,
    pub template_id: Option<String>,
    pub profile_pic: Option<String>,
}

pub struct TeamRepository;

impl TeamRepository {
    pub async fn insert(db: &DatabaseConnection, record: TeamRecord) -> Result<TeamModel, DbErr> {
        let now = Utc::now().timestamp();
        let active_model = TeamActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            team_name: Set(record.team_name),
            org_name: Set(record.org_name),
            email: Set(record.email),
            password_hash: Set(record.password_hash),
            twitter_handle: Set(None),
            template_id: Set(None),
            theme_id: Set(None),
            github_username: Set(None),
            profile_pic: Set(None),
            members_json: Set("[]".to_string()),
            version: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };
        active_model.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<TeamModel>, DbErr> {
        Team::find_by_id(id.to_string()).one(db).await
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<TeamModel>, DbErr> {
        Team::find()
            .filter(team::Column::Email.eq(email))
            .one(db)
            .await
    }

    pub async fn exists(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
        Ok(Self::find_by_id(db, id).await?.is_some())
    }

    pub async fn update_profile(
        db: &DatabaseConnection,
        id: &str,
        changes: TeamProfileChanges,
    ) -> Result<Option<TeamModel>, DbErr> {
        let mut update = TeamActiveModel {
            id: Set(id.to_string()),
            ..Default::default()
        };
        if let Some(v) = changes.team_name {
            update.team_name = Set(v);
        }
        if let Some(v) = changes.org_name {
            update.org_name = Set(v);
        }
        if let Some(v) = changes.email {
            update.email = Set(v);
        }
        if let Some(v) = changes.template_id {
            update.template_id = Set(Some(v));
        }
        if let Some(v) = changes.profile_pic {
            update.profile_pic = Set(Some(v));
        }
        Self::apply(db, update).await
    }

    pub async fn set_twitter_handle(
        db: &DatabaseConnection,
        id: &str,
        handle: Option<String>,
    ) -> Result<Option<TeamModel>, DbErr> {
        let update = TeamActiveModel {
            id: Set(id.to_string()),
            twitter_handle: Set(handle),
            ..Default::default()
        };
        Self::apply(db, update).await
    }

    pub async fn set_github_username(
        db: &DatabaseConnection,
        id: &str,
        login: String,
    ) -> Result<Option<TeamModel>, DbErr> {
        let update = TeamActiveModel {
            id: Set(id.to_string()),
            github_username: Set(Some(login)),
            ..Default::default()
        };
        Self::apply(db, update).await
    }

    pub async fn set_theme(
        db: &DatabaseConnection,
        id: &str,
        theme_id: String,
    ) -> Result<Option<TeamModel>, DbErr> {
        let update = TeamActiveModel {
            id: Set(id.to_string()),
            theme_id: Set(Some(theme_id)),
            ..Default::default()
        };
        Self::apply(db, update).await
    }

    /// Writes the member roster only if nobody else wrote it since
    /// `expected_version` was read. Returns whether the write landed.
    pub async fn save_members(
        db: &DatabaseConnection,
        id: &str,
        expected_version: i64,
        members_json: String,
    ) -> Result<bool, DbErr> {
        let now = Utc::now().timestamp();
        let res = Team::update_many()
            .col_expr(team::Column::MembersJson, Expr::value(members_json))
            .col_expr(team::Column::Version, Expr::value(expected_version + 1))
            .col_expr(team::Column::UpdatedAt, Expr::value(now))
            .filter(team::Column::Id.eq(id))
            .filter(team::Column::Version.eq(expected_version))
            .exec(db)
            .await?;
        Ok(res.rows_affected == 1)
    }

    /// Drops everything but name, organisation and credentials.
    pub async fn reset_profile(db: &DatabaseConnection, id: &str) -> Result<u64, DbErr> {
        let now = Utc::now().timestamp();
        let res = Team::update_many()
            .col_expr(team::Column::MembersJson, Expr::value("[]"))
            .col_expr(team::Column::Version, Expr::col(team::Column::Version).add(1))
            .col_expr(team::Column::TwitterHandle, Expr::value(Option::<String>::None))
            .col_expr(team::Column::GithubUsername, Expr::value(Option::<String>::None))
            .col_expr(team::Column::ProfilePic, Expr::value(Option::<String>::None))
            .col_expr(team::Column::TemplateId, Expr::value(Option::<String>::None))
            .col_expr(team::Column::ThemeId, Expr::value(Option::<String>::None))
            .col_expr(team::Column::UpdatedAt, Expr::value(now))
            .filter(team::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<u64, DbErr> {
        let res = Team::delete_by_id(id.to_string()).exec(db).await?;
        Ok(res.rows_affected)
    }

    async fn apply(
        db: &DatabaseConnection,
        mut update: TeamActiveModel,
    ) -> Result<Option<TeamModel>, DbErr> {
        update.updated_at = Set(Utc::now().timestamp());
        match update.update(db).await {
            Ok(model) => Ok(Some(model)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
