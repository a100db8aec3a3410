pub mod account_repository;
pub mod connection_repository;

use crate::{DbError, Result as DbErrorResult};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use uuid::Uuid;

#[track_caller]
pub(crate) fn parse_uuid(value: &str, column: &str) -> DbErrorResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode {
        message: format!("Invalid UUID in {column}: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
pub(crate) fn parse_timestamp(secs: i64, column: &str) -> DbErrorResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| DbError::Decode {
        message: format!("Invalid timestamp in {column}"),
        location: ErrorLocation::from(Location::caller()),
    })
}
