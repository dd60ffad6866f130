pub mod achievement_repo;
pub mod homepage_repo;
pub mod publication_repo;
pub mod team_repo;
pub mod theme_repo;
pub mod website_repo;

pub use achievement_repo::{AchievementDto, AchievementRepository, AchievementUpdate, NewAchievement};
pub use homepage_repo::{HomepageDto, HomepageRepository, HomepageUpdate};
pub use publication_repo::PublicationRepository;
pub use team_repo::{TeamProfileChanges, TeamRecord, TeamRepository};
pub use theme_repo::{ThemeDto, ThemeRepository, ThemeRequest};
pub use website_repo::{PageName, WebsiteDto, WebsiteRepository, WebsiteUpdate};
