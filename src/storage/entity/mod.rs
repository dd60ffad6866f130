pub mod achievement;
pub mod homepage;
pub mod publication;
pub mod team;
pub mod theme;
pub mod website;

pub use achievement::Entity as Achievement;
pub use homepage::Entity as Homepage;
pub use publication::Entity as Publication;
pub use team::Entity as Team;
pub use theme::Entity as Theme;
pub use website::Entity as Website;
