use crate::storage::entity::publication::Model as PublicationModel;
use crate::validation::{min_len, Validate, ValidationErrors};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const AUTHORS_MSG: &str = "Error: Authors must not be empty.";
pub const TITLE_MSG: &str = "Error: Title must be at least 3 characters.";
pub const DESCRIPTION_MSG: &str = "Error: Description must be at least 5 characters.";
pub const SUMMARY_MSG: &str = "Error: Summary must be at least 5 characters.";
pub const CITED_BY_MSG: &str =
    "Error: citedBy needs to be a number and have a value of 0 or greater.";
pub const TEAM_ID_MSG: &str = "Error: teamId must be a valid id.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Conference,
    Journal,
    Book,
    #[default]
    Other,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Conference => "CONFERENCE",
            CategoryType::Journal => "JOURNAL",
            CategoryType::Book => "BOOK",
            CategoryType::Other => "OTHER",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFERENCE" => Ok(CategoryType::Conference),
            "JOURNAL" => Ok(CategoryType::Journal),
            "BOOK" => Ok(CategoryType::Book),
            "OTHER" => Ok(CategoryType::Other),
            other => Err(format!("unknown category type {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "type", default)]
    pub category_type: CategoryType,
    pub category_title: Option<String>,
    pub issue: Option<String>,
    pub volume: Option<String>,
    pub pages: Option<String>,
    pub publisher: Option<String>,
}

/// Body of `POST /publications/import/{teamId}` items; the team comes from the path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedPublication {
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub year_published: Option<i32>,
    pub cited_by: Option<i64>,
    #[serde(default)]
    pub category: Category,
}

impl Validate for ImportedPublication {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.authors.iter().any(|a| !a.trim().is_empty()),
            "authors",
            AUTHORS_MSG,
        );
        errors.check(min_len(&self.title, 3), "title", TITLE_MSG);
        errors.check(min_len(&self.description, 5), "description", DESCRIPTION_MSG);
        if let Some(summary) = &self.summary {
            errors.check(min_len(summary, 5), "summary", SUMMARY_MSG);
        }
        if let Some(cited_by) = self.cited_by {
            errors.check(cited_by >= 0, "citedBy", CITED_BY_MSG);
        }
        errors.into_result()
    }
}

/// Body of `POST /publications`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPublication {
    #[serde(default)]
    pub team_id: String,
    #[serde(flatten)]
    pub fields: ImportedPublication,
}

impl Validate for NewPublication {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.fields.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };
        errors.check(
            uuid::Uuid::parse_str(&self.team_id).is_ok(),
            "teamId",
            TEAM_ID_MSG,
        );
        errors.into_result()
    }
}

/// Body of `PATCH /publications/{id}`; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationUpdate {
    pub authors: Option<Vec<String>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub year_published: Option<i32>,
    pub cited_by: Option<i64>,
    pub category: Option<Category>,
}

impl Validate for PublicationUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(authors) = &self.authors {
            errors.check(
                authors.iter().any(|a| !a.trim().is_empty()),
                "authors",
                AUTHORS_MSG,
            );
        }
        if let Some(title) = &self.title {
            errors.check(min_len(title, 3), "title", TITLE_MSG);
        }
        if let Some(description) = &self.description {
            errors.check(min_len(description, 5), "description", DESCRIPTION_MSG);
        }
        if let Some(summary) = &self.summary {
            errors.check(min_len(summary, 5), "summary", SUMMARY_MSG);
        }
        if let Some(cited_by) = self.cited_by {
            errors.check(cited_by >= 0, "citedBy", CITED_BY_MSG);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub team_id: String,
    pub authors: Vec<String>,
    pub title: String,
    pub description: String,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub year_published: Option<i32>,
    pub cited_by: Option<i64>,
    pub category: Category,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<PublicationModel> for PublicationDto {
    fn from(model: PublicationModel) -> Self {
        Self {
            id: model.id,
            team_id: model.team_id,
            authors: serde_json::from_str(&model.authors_json).unwrap_or_default(),
            title: model.title,
            description: model.description,
            summary: model.summary,
            link: model.link,
            year_published: model.year_published,
            cited_by: model.cited_by,
            category: Category {
                category_type: model.category_type.parse().unwrap_or_default(),
                category_title: model.category_title,
                issue: model.issue,
                volume: model.volume,
                pages: model.pages,
                publisher: model.publisher,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Normalizes author names: trimmed, blanks dropped.
pub fn clean_authors(authors: &[String]) -> Vec<String> {
    authors
        .iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_publication(value: serde_json::Value) -> NewPublication {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_authors_are_rejected() {
        let p = new_publication(json!({
            "teamId": uuid::Uuid::new_v4().to_string(),
            "authors": [],
            "title": "A title",
            "description": "A description"
        }));
        let errors = p.validate().unwrap_err();
        assert_eq!(errors.messages(), vec![AUTHORS_MSG.to_string()]);
    }

    #[test]
    fn every_violation_is_itemized() {
        let p = new_publication(json!({
            "teamId": "nope",
            "authors": ["  "],
            "title": " ab ",
            "description": "abcd",
            "summary": "tiny",
            "citedBy": -1
        }));
        let errors = p.validate().unwrap_err();
        assert_eq!(
            errors.fields(),
            vec!["authors", "title", "description", "summary", "citedBy", "teamId"]
        );
    }

    #[test]
    fn optional_fields_are_checked_only_when_present() {
        let p = new_publication(json!({
            "teamId": uuid::Uuid::new_v4().to_string(),
            "authors": ["A"],
            "title": "Title",
            "description": "Description",
            "citedBy": 0,
            "category": { "type": "JOURNAL", "categoryTitle": "Nature" }
        }));
        assert!(p.validate().is_ok());
        assert_eq!(p.fields.category.category_type, CategoryType::Journal);
    }

    #[test]
    fn unknown_category_type_does_not_deserialize() {
        let raw = json!({
            "teamId": uuid::Uuid::new_v4().to_string(),
            "authors": ["A"],
            "title": "Title",
            "description": "Description",
            "category": { "type": "BLOG" }
        });
        assert!(serde_json::from_value::<NewPublication>(raw).is_err());
    }
}
