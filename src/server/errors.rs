//! HTTP mapping for [`RagError`]

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::{error, warn};

use crate::RagError;

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl RagError {
    /// Message shown to HTTP clients
    #[inline]
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound(_) => "File not found".to_string(),
            other => other.to_string(),
        }
    }

    #[inline]
    pub fn log(&self) {
        match self {
            Self::NotFound(name) => warn!("Material not found: {}", name),
            Self::Service { .. } => error!("Downstream service failed: {}", self),
            _ => error!("Request failed: {}", self),
        }
    }
}

impl ResponseError for RagError {
    #[inline]
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[inline]
    fn error_response(&self) -> HttpResponse {
        self.log();
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.detail(),
        })
    }
}
