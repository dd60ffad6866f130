pub mod lifecycle;
pub mod members;
pub mod model;
pub mod service;

pub use members::{MemberNotFound, TeamMembers};
pub use model::{
    GhToken, LoginRequest, MemberIds, NewMember, NewTeam, TeamDto, TeamMember, TeamUpdate,
    TwitterHandleUpdate,
};
pub use service::TeamService;
