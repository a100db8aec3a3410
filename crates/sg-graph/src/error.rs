use error_location::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Connection cannot reference its own profile {location}")]
    SelfReference { location: ErrorLocation },

    #[error("A block exists between the profiles {location}")]
    Blocked { location: ErrorLocation },

    #[error("Profile not found: {profile_id} {location}")]
    ProfileNotFound {
        profile_id: uuid::Uuid,
        location: ErrorLocation,
    },

    #[error("{source}")]
    Db {
        source: sg_db::DbError,
        location: ErrorLocation,
    },
}

impl From<sg_db::DbError> for GraphError {
    #[track_caller]
    fn from(source: sg_db::DbError) -> Self {
        Self::Db {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
