pub mod connection;
pub mod identity;
pub mod profile;
pub mod status;
pub mod user_summary;
