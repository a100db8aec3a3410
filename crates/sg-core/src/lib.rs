pub mod error;
pub mod models;
pub mod validation;


pub use error::{CoreError, Result};
pub use models::connection::{Connection, ConnectionKind};
pub use models::identity::Identity;
pub use models::profile::Profile;
pub use models::status::{ACTIVE_STATUS_LABEL, Status};
pub use models::user_summary::UserSummary;
pub use validation::{
    normalize_email, normalize_username, validate_email, validate_password, validate_username,
};
