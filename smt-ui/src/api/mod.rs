//! HTTP API handlers for smt-ui

pub mod auth;
pub mod buildinfo;
pub mod health;
pub mod members;
pub mod upload;

pub use auth::{auth_middleware, login};
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use members::{annotate_member, clear_members, delete_member, get_members, replace_members};
pub use upload::upload_roster;
