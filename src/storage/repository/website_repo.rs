use crate::storage::entity::website::{
    self, ActiveModel as WebsiteActiveModel, Entity as Website, Model as WebsiteModel,
};
use crate::validation::{min_len, Validate, ValidationErrors};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LAYOUT: &str = "None";
pub const DEFAULT_SORT_BY: &str = "Title";
pub const DEFAULT_TEMPLATE_LAYOUT: &str = "1";
pub const DEFAULT_TEMPLATE_THEME: &str = "light";

const LAYOUTS: [&str; 2] = ["None", "Category"];
const SORT_BY: [&str; 4] = ["Title", "Author", "Year", "Category Title"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationOptions {
    pub layout: String,
    pub sort_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub layout: String,
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub team_id: String,
    pub title: Option<String>,
    pub pages: Vec<String>,
    pub publication_options: PublicationOptions,
    pub template: Template,
}

impl From<WebsiteModel> for WebsiteDto {
    fn from(model: WebsiteModel) -> Self {
        Self {
            id: model.id,
            team_id: model.team_id,
            title: model.title,
            pages: serde_json::from_str(&model.pages_json).unwrap_or_default(),
            publication_options: PublicationOptions {
                layout: model.publication_layout,
                sort_by: model.publication_sort_by,
            },
            template: Template {
                layout: model.template_layout,
                theme: model.template_theme,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationOptionsUpdate {
    pub layout: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateUpdate {
    pub layout: Option<String>,
    pub theme: Option<String>,
}

/// Body of `PATCH /clientWebsite/{teamId}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteUpdate {
    pub title: Option<String>,
    pub publication_options: Option<PublicationOptionsUpdate>,
    pub template: Option<TemplateUpdate>,
}

impl Validate for WebsiteUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(options) = &self.publication_options {
            if let Some(layout) = &options.layout {
                errors.check(
                    LAYOUTS.contains(&layout.as_str()),
                    "publicationOptions.layout",
                    "Error: layout must be one of None, Category.",
                );
            }
            if let Some(sort_by) = &options.sort_by {
                errors.check(
                    SORT_BY.contains(&sort_by.as_str()),
                    "publicationOptions.sortBy",
                    "Error: sortBy must be one of Title, Author, Year, Category Title.",
                );
            }
        }
        errors.into_result()
    }
}

/// Body of `POST`/`DELETE /clientWebsite/{teamId}/page`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageName {
    #[serde(default)]
    pub page_name: String,
}

impl Validate for PageName {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            min_len(&self.page_name, 1),
            "pageName",
            "Error: pageName must not be empty.",
        );
        errors.into_result()
    }
}

pub struct WebsiteRepository;

impl WebsiteRepository {
    pub async fn create_default(
        db: &DatabaseConnection,
        team_id: &str,
    ) -> Result<WebsiteModel, DbErr> {
        let now = Utc::now().timestamp();
        WebsiteActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            team_id: Set(team_id.to_string()),
            title: Set(None),
            pages_json: Set("[]".to_string()),
            publication_layout: Set(DEFAULT_LAYOUT.to_string()),
            publication_sort_by: Set(DEFAULT_SORT_BY.to_string()),
            template_layout: Set(DEFAULT_TEMPLATE_LAYOUT.to_string()),
            template_theme: Set(DEFAULT_TEMPLATE_THEME.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn find_by_team(
        db: &DatabaseConnection,
        team_id: &str,
    ) -> Result<Option<WebsiteModel>, DbErr> {
        Website::find()
            .filter(website::Column::TeamId.eq(team_id))
            .one(db)
            .await
    }

    pub async fn update(
        db: &DatabaseConnection,
        current: WebsiteModel,
        changes: WebsiteUpdate,
    ) -> Result<WebsiteModel, DbErr> {
        let mut update: WebsiteActiveModel = current.into();
        if let Some(title) = changes.title {
            update.title = Set(Some(title));
        }
        if let Some(options) = changes.publication_options {
            if let Some(layout) = options.layout {
                update.publication_layout = Set(layout);
            }
            if let Some(sort_by) = options.sort_by {
                update.publication_sort_by = Set(sort_by);
            }
        }
        if let Some(template) = changes.template {
            if let Some(layout) = template.layout {
                update.template_layout = Set(layout);
            }
            if let Some(theme) = template.theme {
                update.template_theme = Set(theme);
            }
        }
        update.updated_at = Set(Utc::now().timestamp());
        update.update(db).await
    }

    pub async fn save_pages(
        db: &DatabaseConnection,
        current: WebsiteModel,
        pages: &[String],
    ) -> Result<WebsiteModel, DbErr> {
        let mut update: WebsiteActiveModel = current.into();
        update.pages_json = Set(serde_json::to_string(pages).unwrap_or_else(|_| "[]".into()));
        update.updated_at = Set(Utc::now().timestamp());
        update.update(db).await
    }

    /// Puts every metadata column of the team's site back to its default.
    pub async fn reset(db: &DatabaseConnection, team_id: &str) -> Result<u64, DbErr> {
        let res = Website::update_many()
            .col_expr(website::Column::Title, Expr::value(Option::<String>::None))
            .col_expr(website::Column::PagesJson, Expr::value("[]"))
            .col_expr(
                website::Column::PublicationLayout,
                Expr::value(DEFAULT_LAYOUT),
            )
            .col_expr(
                website::Column::PublicationSortBy,
                Expr::value(DEFAULT_SORT_BY),
            )
            .col_expr(
                website::Column::TemplateLayout,
                Expr::value(DEFAULT_TEMPLATE_LAYOUT),
            )
            .col_expr(
                website::Column::TemplateTheme,
                Expr::value(DEFAULT_TEMPLATE_THEME),
            )
            .col_expr(
                website::Column::UpdatedAt,
                Expr::value(Utc::now().timestamp()),
            )
            .filter(website::Column::TeamId.eq(team_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_by_team(db: &DatabaseConnection, team_id: &str) -> Result<u64, DbErr> {
        let res = Website::delete_many()
            .filter(website::Column::TeamId.eq(team_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_publication_options_are_rejected() {
        let update: WebsiteUpdate = serde_json::from_value(json!({
            "publicationOptions": { "layout": "Grid", "sortBy": "Year" }
        }))
        .unwrap();
        assert_eq!(
            update.validate().unwrap_err().fields(),
            vec!["publicationOptions.layout"]
        );
    }

    #[test]
    fn dto_exposes_nested_options() {
        let dto = WebsiteDto::from(WebsiteModel {
            id: "w".into(),
            team_id: "t".into(),
            title: None,
            pages_json: r#"["Home","Publications"]"#.into(),
            publication_layout: DEFAULT_LAYOUT.into(),
            publication_sort_by: DEFAULT_SORT_BY.into(),
            template_layout: DEFAULT_TEMPLATE_LAYOUT.into(),
            template_theme: DEFAULT_TEMPLATE_THEME.into(),
            created_at: 0,
            updated_at: 0,
        });
        let value = serde_json::to_value(dto).unwrap();
        assert_eq!(value["publicationOptions"], json!({"layout": "None", "sortBy": "Title"}));
        assert_eq!(value["template"], json!({"layout": "1", "theme": "light"}));
        assert_eq!(value["pages"], json!(["Home", "Publications"]));
    }
}
