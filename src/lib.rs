pub mod api;
pub mod bootstrap;
pub mod config;
pub mod models;
pub mod services;
pub mod shared;

pub use api::*;
pub use config::*;
pub use models::*;
pub use services::*;
