use axum::extract::rejection::JsonRejection;
use bcrypt::BcryptError;
use diesel::result::Error as DieselError;
use serde_json::Error as JsonError;
use tower_sessions::session::Error as SessionError;
use validator::ValidationErrors;

use super::ApiError;
use crate::features::quiz::QuizError;

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> Self {
        ApiError::Database(err)
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> Self {
        ApiError::Pool(err)
    }
}

impl From<BcryptError> for ApiError {
    fn from(err: BcryptError) -> Self {
        ApiError::Hashing(err)
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Session(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<tera::Error> for ApiError {
    fn from(err: tera::Error) -> Self {
        ApiError::Template(err)
    }
}

impl From<JsonError> for ApiError {
    fn from(err: JsonError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::NoQuestions => ApiError::NotFound("Words matching the quiz filters"),
            QuizError::AlreadyStarted | QuizError::NotAnswering => {
                ApiError::Validation(err.to_string())
            }
        }
    }
}
