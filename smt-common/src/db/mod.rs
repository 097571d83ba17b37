//! SQLite data layer
//!
//! One database holds every location's roster plus the user accounts and
//! login sessions. Schema creation is idempotent and runs at startup.

pub mod init;
pub mod members;
pub mod sessions;
pub mod users;

pub use init::init_database;
pub use users::User;
