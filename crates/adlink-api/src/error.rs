use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use adlink_db::StoreError;
use adlink_types::UnknownTag;
use adlink_types::api::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("internal server error")]
    Internal,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<UnknownTag> for ApiError {
    fn from(err: UnknownTag) -> Self {
        Self::Validation(err.to_string())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::DuplicateHandle(_)) => StatusCode::CONFLICT,
            Self::Store(StoreError::OfferAlreadyDecided { .. }) => StatusCode::CONFLICT,
            Self::Store(StoreError::OfferNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Validation(_)) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "internal server error".to_string()
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
            self.to_string()
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
