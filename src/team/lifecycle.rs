//! Side effects of team creation and deletion on the records a team owns.
//!
//! The hooks run after the team mutation has committed. They never fail the
//! request: errors are logged and the team mutation stands.

use crate::storage::repository::{
    AchievementRepository, HomepageRepository, PublicationRepository, TeamRepository,
    WebsiteRepository,
};
use log::{error, info};
use sea_orm::{DatabaseConnection, DbErr};

pub struct TeamLifecycle;

impl TeamLifecycle {
    /// Gives a new team its default website and an empty homepage.
    pub async fn on_team_created(db: &DatabaseConnection, team_id: &str) {
        if let Err(e) = WebsiteRepository::create_default(db, team_id).await {
            error!("could not create website for team {}: {}", team_id, e);
        }
        if let Err(e) = HomepageRepository::create_default(db, team_id).await {
            error!("could not create homepage for team {}: {}", team_id, e);
        }
    }

    /// Removes every record carrying `team_id`. Each kind is attempted even
    /// if an earlier one failed.
    pub async fn on_team_deleted(db: &DatabaseConnection, team_id: &str) {
        let results = [
            ("websites", WebsiteRepository::delete_by_team(db, team_id).await),
            ("homepages", HomepageRepository::delete_by_team(db, team_id).await),
            ("publications", PublicationRepository::delete_by_team(db, team_id).await),
            ("achievements", AchievementRepository::delete_by_team(db, team_id).await),
        ];
        for (kind, result) in results {
            match result {
                Ok(n) => info!("cascade: removed {} {} of team {}", n, kind, team_id),
                Err(e) => error!("cascade: failed to remove {} of team {}: {}", kind, team_id, e),
            }
        }
    }

    /// Wipes a team's content but keeps the team, its login and its
    /// website/homepage records (reset to defaults).
    pub async fn reset_team_data(db: &DatabaseConnection, team_id: &str) -> Result<(), DbErr> {
        PublicationRepository::delete_by_team(db, team_id).await?;
        AchievementRepository::delete_by_team(db, team_id).await?;
        TeamRepository::reset_profile(db, team_id).await?;

        if WebsiteRepository::reset(db, team_id).await? == 0 {
            WebsiteRepository::create_default(db, team_id).await?;
        }
        if HomepageRepository::reset(db, team_id).await? == 0 {
            HomepageRepository::create_default(db, team_id).await?;
        }
        info!("team {} data reset", team_id);
        Ok(())
    }
}
