use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::error::AppError;
use crate::external::DeployBundle;
use crate::publication::PublicationDto;
use crate::state::{ExternalClients, SharedState};
use crate::storage::entity::team::Model as TeamModel;
use crate::storage::repository::{
    AchievementDto, AchievementRepository, HomepageDto, HomepageRepository,
    PublicationRepository, TeamProfileChanges, TeamRecord, TeamRepository, ThemeDto,
    ThemeRepository, WebsiteDto, WebsiteRepository,
};
use crate::team::lifecycle::TeamLifecycle;
use crate::team::members::TeamMembers;
use crate::team::model::{
    LoginRequest, NewMember, NewTeam, TeamDto, TeamMember, TeamUpdate, TwitterHandleUpdate,
};
use log::{info, warn};
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use serde_json::{json, Value};
use std::sync::Arc;

pub const EMAIL_TAKEN_MSG: &str = "Email had been registered";
pub const BAD_LOGIN_MSG: &str = "Incorrect email/password";
pub const STALE_TEAM_MSG: &str = "Team was modified by another request, reload and try again";

/// The email index catches registrations that race past the lookup.
fn email_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!("email uniqueness enforced by index: {}", detail);
            AppError::BadRequest(EMAIL_TAKEN_MSG.to_string())
        }
        _ => AppError::Database(err),
    }
}

pub struct TeamService {
    db: Arc<DatabaseConnection>,
    clients: ExternalClients,
}

impl TeamService {
    pub fn new(db: Arc<DatabaseConnection>, clients: ExternalClients) -> Self {
        Self { db, clients }
    }

    pub fn from_state(state: &SharedState) -> Self {
        Self::new(state.db.clone(), state.clients.clone())
    }

    pub async fn find(&self, team_id: &str) -> Result<TeamModel, AppError> {
        TeamRepository::find_by_id(&self.db, team_id)
            .await?
            .ok_or_else(AppError::team_not_found)
    }

    pub async fn create(&self, payload: NewTeam) -> Result<TeamModel, AppError> {
        let email = payload.email.trim().to_string();
        if TeamRepository::find_by_email(&self.db, &email).await?.is_some() {
            return Err(AppError::BadRequest(EMAIL_TAKEN_MSG.to_string()));
        }

        let password_hash = hash_password_blocking(payload.password).await?;
        let team = TeamRepository::insert(
            &self.db,
            TeamRecord {
                team_name: payload.team_name.trim().to_string(),
                org_name: payload.org_name.trim().to_string(),
                email,
                password_hash,
            },
        )
        .await
        .map_err(email_conflict)?;
        info!("team {} registered ({})", team.id, team.team_name);

        TeamLifecycle::on_team_created(&self.db, &team.id).await;
        Ok(team)
    }

    /// Unknown email is a 400, a wrong password a 403.
    pub async fn login(&self, payload: &LoginRequest) -> Result<TeamModel, AppError> {
        let Some(team) = TeamRepository::find_by_email(&self.db, payload.email.trim()).await? else {
            return Err(AppError::BadRequest(BAD_LOGIN_MSG.to_string()));
        };
        let matches =
            verify_password_blocking(payload.password.clone(), team.password_hash.clone()).await;
        if !matches {
            warn!("failed login for team {}", team.id);
            return Err(AppError::Forbidden(BAD_LOGIN_MSG.to_string()));
        }
        Ok(team)
    }

    pub async fn update(&self, team_id: &str, changes: TeamUpdate) -> Result<TeamDto, AppError> {
        self.find(team_id).await?;
        let email = changes.email.map(|e| e.trim().to_string());
        if let Some(email) = &email {
            if let Some(owner) = TeamRepository::find_by_email(&self.db, email).await? {
                if owner.id != team_id {
                    return Err(AppError::BadRequest(EMAIL_TAKEN_MSG.to_string()));
                }
            }
        }

        let updated = TeamRepository::update_profile(
            &self.db,
            team_id,
            TeamProfileChanges {
                team_name: changes.team_name.map(|v| v.trim().to_string()),
                org_name: changes.org_name.map(|v| v.trim().to_string()),
                email,
                template_id: changes.template_id,
                profile_pic: changes.profile_pic,
            },
        )
        .await
        .map_err(email_conflict)?
        .ok_or_else(AppError::team_not_found)?;
        Ok(updated.into())
    }

    pub async fn delete(&self, team_id: &str) -> Result<(), AppError> {
        if TeamRepository::delete(&self.db, team_id).await? == 0 {
            return Err(AppError::team_not_found());
        }
        info!("team {} deleted", team_id);
        TeamLifecycle::on_team_deleted(&self.db, team_id).await;
        Ok(())
    }

    pub async fn reset_data(&self, team_id: &str) -> Result<TeamDto, AppError> {
        self.find(team_id).await?;
        TeamLifecycle::reset_team_data(&self.db, team_id).await?;
        Ok(self.find(team_id).await?.into())
    }

    pub async fn members(&self, team_id: &str) -> Result<Vec<TeamMember>, AppError> {
        let team = self.find(team_id).await?;
        Ok(TeamMembers::from_json(&team.members_json)
            .map_err(anyhow::Error::from)?
            .into_vec())
    }

    /// Loads the roster, applies `edit` and writes it back under the
    /// version guard. `expected_version` lets a client insist on the
    /// revision it last saw.
    async fn edit_members<T>(
        &self,
        team_id: &str,
        expected_version: Option<i64>,
        edit: impl FnOnce(&mut TeamMembers) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let team = self.find(team_id).await?;
        if expected_version.is_some_and(|v| v != team.version) {
            return Err(AppError::Conflict(STALE_TEAM_MSG.to_string()));
        }

        let mut members =
            TeamMembers::from_json(&team.members_json).map_err(anyhow::Error::from)?;
        let out = edit(&mut members)?;
        let json = members.to_json().map_err(anyhow::Error::from)?;

        if !TeamRepository::save_members(&self.db, team_id, team.version, json).await? {
            warn!("stale member write on team {} (version {})", team_id, team.version);
            return Err(AppError::Conflict(STALE_TEAM_MSG.to_string()));
        }
        Ok(out)
    }

    pub async fn add_member(
        &self,
        team_id: &str,
        expected_version: Option<i64>,
        payload: NewMember,
    ) -> Result<TeamMember, AppError> {
        self.edit_members(team_id, expected_version, |members| {
            Ok(members.add(payload).clone())
        })
        .await
    }

    pub async fn replace_member(
        &self,
        team_id: &str,
        expected_version: Option<i64>,
        member: TeamMember,
    ) -> Result<TeamMember, AppError> {
        self.edit_members(team_id, expected_version, |members| {
            members.replace(member.clone())?;
            Ok(member)
        })
        .await
    }

    pub async fn remove_member(
        &self,
        team_id: &str,
        expected_version: Option<i64>,
        member_id: &str,
    ) -> Result<TeamMember, AppError> {
        self.edit_members(team_id, expected_version, |members| {
            Ok(members.remove(member_id)?)
        })
        .await
    }

    pub async fn remove_members(
        &self,
        team_id: &str,
        expected_version: Option<i64>,
        member_ids: Vec<String>,
    ) -> Result<usize, AppError> {
        self.edit_members(team_id, expected_version, |members| {
            Ok(members.remove_many(&member_ids)?)
        })
        .await
    }

    pub async fn clear_members(
        &self,
        team_id: &str,
        expected_version: Option<i64>,
    ) -> Result<(), AppError> {
        self.edit_members(team_id, expected_version, |members| {
            members.clear();
            Ok(())
        })
        .await
    }

    /// An empty handle drops the association; anything else must name an
    /// existing Twitter account.
    pub async fn set_twitter_handle(
        &self,
        team_id: &str,
        payload: &TwitterHandleUpdate,
    ) -> Result<TeamDto, AppError> {
        self.find(team_id).await?;
        let handle = payload.handle();
        let stored = if handle.is_empty() {
            None
        } else {
            let user = self.clients.twitter.lookup_user(handle).await?;
            info!("twitter handle {} resolved to user {}", handle, user.id);
            Some(handle.to_string())
        };

        let updated = TeamRepository::set_twitter_handle(&self.db, team_id, stored)
            .await?
            .ok_or_else(AppError::team_not_found)?;
        Ok(updated.into())
    }

    pub async fn github_access_token(&self, code: &str) -> Result<String, AppError> {
        Ok(self.clients.github.exchange_code(code).await?)
    }

    /// Resolves the token's GitHub login and checks its Pages repository.
    async fn pages_login(&self, gh_token: &str) -> Result<String, AppError> {
        let login = self.clients.github.resolve_login(gh_token).await?;
        self.clients.github.ensure_pages_repo(gh_token, &login).await?;
        Ok(login)
    }

    pub async fn deploy(&self, team_id: &str, gh_token: &str) -> Result<String, AppError> {
        let team = self.find(team_id).await?;
        let login = self.pages_login(gh_token).await?;

        let bundle = self.deploy_bundle(team, gh_token).await?;
        self.clients.deployer.trigger(team_id, &bundle).await?;

        TeamRepository::set_github_username(&self.db, team_id, login.clone()).await?;
        info!("deploy of team {} to {} triggered", team_id, login);
        Ok(login)
    }

    pub async fn clear_pages(&self, team_id: &str, gh_token: &str) -> Result<(), AppError> {
        self.find(team_id).await?;
        let login = self.pages_login(gh_token).await?;
        self.clients.github.delete_pages_branch(gh_token, &login).await?;
        info!("gh-pages of team {} cleared", team_id);
        Ok(())
    }

    async fn deploy_bundle(&self, team: TeamModel, gh_token: &str) -> Result<DeployBundle, AppError> {
        let publications: Vec<PublicationDto> =
            PublicationRepository::find_by_team(&self.db, &team.id)
                .await?
                .into_iter()
                .map(PublicationDto::from)
                .collect();
        let achievements: Vec<AchievementDto> =
            AchievementRepository::find_by_team(&self.db, &team.id)
                .await?
                .into_iter()
                .map(AchievementDto::from)
                .collect();
        let homepage = HomepageRepository::find_by_team(&self.db, &team.id)
            .await?
            .map(HomepageDto::from);
        let website = WebsiteRepository::find_by_team(&self.db, &team.id)
            .await?
            .map(WebsiteDto::from);
        let theme = match &team.theme_id {
            Some(id) => ThemeRepository::find_by_id(&self.db, id)
                .await?
                .map(ThemeDto::from),
            None => None,
        };

        let team = TeamDto::from(team);
        let team_info = json!({
            "teamName": team.team_name,
            "orgName": team.org_name,
            "email": team.email,
            "twitterHandle": team.twitter_handle,
            "profilePic": team.profile_pic,
            "theme": theme,
        });

        Ok(DeployBundle {
            gh_token: gh_token.to_string(),
            team_info,
            team_members: to_value(&team.team_members)?,
            team_publications: to_value(&publications)?,
            team_achievements: to_value(&achievements)?,
            team_homepage: to_value(&homepage)?,
            web_metadata: to_value(&website)?,
        })
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    Ok(serde_json::to_value(value).map_err(anyhow::Error::from)?)
}
