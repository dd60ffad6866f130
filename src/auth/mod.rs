pub mod gate;
pub mod password;
pub mod token;

pub use gate::{AuthTeam, ACCESS_COOKIE, REFRESH_COOKIE};
pub use token::{Claims, TokenError, TokenSigner};
