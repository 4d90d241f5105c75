use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use grocery_common::store::StoreError;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::suggest::SuggestError;

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

/// Everything a handler can fail with. The `Display` text is what the client sees.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Item not found")]
    ItemNotFound,

    #[error("Failed to update grocery list")]
    Store(#[from] StoreError),

    #[error("Failed to save grocery list")]
    SaveFailed(#[source] std::io::Error),

    /// `message` is the generic text shown to users; `source` is only logged.
    #[error("{message}")]
    Suggestion {
        message: &'static str,
        #[source]
        source: SuggestError,
    },
}

impl ApiError {
    pub fn suggestion(message: &'static str) -> impl FnOnce(SuggestError) -> Self {
        move |source| Self::Suggestion { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ItemNotFound => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::SaveFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Suggestion {
                source: SuggestError::MissingKey,
                ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Suggestion { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Store(e) => error!("item store failed: {e}"),
            Self::SaveFailed(e) => error!("failed to write grocery list: {e}"),
            Self::Suggestion { message, source } => error!("{message} ({source})"),
            Self::ItemNotFound => {}
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
