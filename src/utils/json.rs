use axum::extract::FromRequest;

use crate::features::errors::ApiError;

/// `axum::Json` whose rejections come back in the API error format
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
