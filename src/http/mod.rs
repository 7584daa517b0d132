mod download;
mod health;
mod process_urls;
mod search;

pub(crate) use download::download;
pub(crate) use health::health_check;
pub(crate) use process_urls::process_urls;
pub(crate) use search::search;

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use request_processors::{BatchError, DownloadRequestError};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct UrlsRequest {
    #[serde(default)]
    pub(crate) urls: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Missing query")]
    MissingQuery,
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Download(#[from] DownloadRequestError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// Rejects undecodable JSON bodies with the API's own error shape.
pub(crate) fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error: JsonPayloadError, _: &HttpRequest| {
        debug!(%error, "Unable to decode request body");
        ApiError::InvalidBody.into()
    })
}
