pub mod auth;
pub mod auth_state;
pub mod people;
pub mod video;

pub use auth::*;
pub use auth_state::*;
pub use people::*;
pub use video::*;
