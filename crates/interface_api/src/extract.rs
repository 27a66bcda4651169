//! Request extractors that reject with [`ApiError`] bodies

use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::error::ApiError;

/// `axum::Json` whose rejections use the API error format
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Validation {
                field: None,
                message: rejection.body_text(),
            },
            _ => ApiError::BadRequest(rejection.body_text()),
        }
    }
}
