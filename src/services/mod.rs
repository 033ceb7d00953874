pub mod auth;
pub mod oauth;
pub mod profile_service;
pub mod session_service;
pub mod video_service;

pub use auth::*;
pub use oauth::*;
pub use profile_service::*;
pub use session_service::*;
pub use video_service::*;
