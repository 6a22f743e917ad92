mod conversions;
mod responses;

use bcrypt::BcryptError;
use diesel::result::Error as DieselError;
use thiserror::Error;

/// Every failure a handler can report. Each variant maps to exactly one
/// HTTP status in `responses.rs`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Not logged in")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Database error")]
    Database(DieselError),
    #[error("Database pool error")]
    Pool(r2d2::Error),
    #[error("Hashing error")]
    Hashing(BcryptError),
    #[error("Session error: {0}")]
    Session(String),
    #[error("Template error")]
    Template(tera::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}
