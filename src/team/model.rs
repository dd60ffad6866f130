use crate::storage::entity::team::Model as TeamModel;
use crate::validation::{max_len, min_len, Validate, ValidationErrors};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const TEAM_NAME_MSG: &str = "Error: Team name must be at least 3 characters.";
pub const ORG_NAME_MSG: &str = "Error: Organization name must be at least 3 characters.";
pub const EMAIL_MSG: &str = "Error: Email must be a valid email address.";
pub const PASSWORD_MSG: &str = "Error: Password must not be empty.";
pub const FULL_NAME_MSG: &str = "Error: Full name must be at least 3 characters.";
pub const POSITION_MSG: &str = "Error: Position must be at most 25 characters.";
pub const MEMBER_SUMMARY_MSG: &str = "Error: Summary must be at most 200 characters.";
pub const MEMBER_ID_MSG: &str = "Error: Member id must be a valid id.";
pub const TWITTER_HANDLE_MSG: &str = "Error: Twitter handle must be between 0 and 15 characters.";
pub const TWITTER_HANDLE_CHARS_MSG: &str =
    "Error: Twitter handle may only contain letters, digits and underscores.";

pub const TWITTER_HANDLE_MAX: usize = 15;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

pub fn is_email(value: &str) -> bool {
    email_regex().is_match(value.trim())
}

// handles end up in a URL path segment
fn twitter_handle_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]*$").expect("twitter handle pattern"))
}

/// A roster entry embedded in its team; it has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub position: Option<String>,
    pub summary: Option<String>,
    pub member_pic: Option<String>,
}

fn check_member_fields(
    errors: &mut ValidationErrors,
    full_name: &str,
    position: Option<&str>,
    summary: Option<&str>,
) {
    errors.check(min_len(full_name, 3), "fullName", FULL_NAME_MSG);
    if let Some(position) = position {
        errors.check(max_len(position, 25), "position", POSITION_MSG);
    }
    if let Some(summary) = summary {
        errors.check(max_len(summary, 200), "summary", MEMBER_SUMMARY_MSG);
    }
}

impl Validate for TeamMember {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_member_fields(
            &mut errors,
            &self.full_name,
            self.position.as_deref(),
            self.summary.as_deref(),
        );
        errors.check(uuid::Uuid::parse_str(&self.id).is_ok(), "_id", MEMBER_ID_MSG);
        errors.into_result()
    }
}

/// Body of `POST /team/{teamId}/member`; the id is assigned on insert.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    #[serde(default)]
    pub full_name: String,
    pub position: Option<String>,
    pub summary: Option<String>,
    pub member_pic: Option<String>,
}

impl Validate for NewMember {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_member_fields(
            &mut errors,
            &self.full_name,
            self.position.as_deref(),
            self.summary.as_deref(),
        );
        errors.into_result()
    }
}

impl NewMember {
    pub fn into_member(self, id: String) -> TeamMember {
        TeamMember {
            id,
            full_name: self.full_name.trim().to_string(),
            position: self.position,
            summary: self.summary,
            member_pic: self.member_pic,
        }
    }
}

/// Body of `PATCH /team/{teamId}/members`: ids of the members to drop.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct MemberIds(pub Vec<String>);

impl Validate for MemberIds {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            !self.0.is_empty(),
            "memberIds",
            "Error: At least one member id is required.",
        );
        errors.check(
            self.0.iter().all(|id| uuid::Uuid::parse_str(id).is_ok()),
            "memberIds",
            MEMBER_ID_MSG,
        );
        errors.into_result()
    }
}

/// Body of `POST /team`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub org_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for NewTeam {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(min_len(&self.team_name, 3), "teamName", TEAM_NAME_MSG);
        errors.check(min_len(&self.org_name, 3), "orgName", ORG_NAME_MSG);
        errors.check(is_email(&self.email), "email", EMAIL_MSG);
        errors.check(!self.password.is_empty(), "password", PASSWORD_MSG);
        errors.into_result()
    }
}

/// Body of `PATCH /team/{teamId}`; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamUpdate {
    pub team_name: Option<String>,
    pub org_name: Option<String>,
    pub email: Option<String>,
    pub template_id: Option<String>,
    pub profile_pic: Option<String>,
}

impl Validate for TeamUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.team_name {
            errors.check(min_len(name, 3), "teamName", TEAM_NAME_MSG);
        }
        if let Some(org) = &self.org_name {
            errors.check(min_len(org, 3), "orgName", ORG_NAME_MSG);
        }
        if let Some(email) = &self.email {
            errors.check(is_email(email), "email", EMAIL_MSG);
        }
        errors.into_result()
    }
}

/// Body of `PATCH /team/{teamId}/twitter-handle`. An empty handle removes
/// the association.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterHandleUpdate {
    #[serde(default)]
    pub twitter_handle: String,
}

impl TwitterHandleUpdate {
    /// Trimmed handle with a leading `@` dropped.
    pub fn handle(&self) -> &str {
        let trimmed = self.twitter_handle.trim();
        trimmed.strip_prefix('@').unwrap_or(trimmed)
    }
}

impl Validate for TwitterHandleUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.handle().chars().count() <= TWITTER_HANDLE_MAX,
            "twitterHandle",
            TWITTER_HANDLE_MSG,
        );
        errors.check(
            twitter_handle_regex().is_match(self.handle()),
            "twitterHandle",
            TWITTER_HANDLE_CHARS_MSG,
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(is_email(&self.email), "email", EMAIL_MSG);
        errors.check(!self.password.is_empty(), "password", PASSWORD_MSG);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhToken {
    #[serde(default)]
    pub gh_token: String,
}

impl Validate for GhToken {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            !self.gh_token.trim().is_empty(),
            "ghToken",
            "Error: ghToken must not be empty.",
        );
        errors.into_result()
    }
}

/// Team as returned to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub team_name: String,
    pub org_name: String,
    pub email: String,
    pub twitter_handle: Option<String>,
    pub template_id: Option<String>,
    pub theme_id: Option<String>,
    pub github_username: Option<String>,
    pub profile_pic: Option<String>,
    pub team_members: Vec<TeamMember>,
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<TeamModel> for TeamDto {
    fn from(model: TeamModel) -> Self {
        Self {
            team_members: serde_json::from_str(&model.members_json).unwrap_or_default(),
            id: model.id,
            team_name: model.team_name,
            org_name: model.org_name,
            email: model.email,
            twitter_handle: model.twitter_handle,
            template_id: model.template_id,
            theme_id: model.theme_id,
            github_username: model.github_username,
            profile_pic: model.profile_pic,
            version: model.version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
