pub mod duration;
mod lenient;
mod spotify;
mod youtube;

pub use spotify::*;
pub use youtube::*;

use reqwest::{Response, StatusCode};

/// Non-successful upstream response, with whatever body the server sent.
#[derive(Debug, thiserror::Error)]
#[error("Unexpected response status {status}: {body}")]
pub struct UnexpectedStatus {
    pub status: StatusCode,
    pub body: String,
}

pub(crate) async fn check_status(response: Response) -> Result<Response, UnexpectedStatus> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(UnexpectedStatus { status, body })
}
