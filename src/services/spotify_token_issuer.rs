use async_trait::async_trait;
use music_providers::SpotifyClient;
use request_processors::{CredentialError, CredentialIssuer, IssuedCredential};
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// Issues Spotify access tokens with the client-credentials flow.
pub(crate) struct SpotifyTokenIssuer {
    client: Arc<SpotifyClient>,
    client_id: String,
    client_secret: String,
}

impl SpotifyTokenIssuer {
    pub(crate) fn new(client: Arc<SpotifyClient>, client_id: String, client_secret: String) -> Self {
        Self {
            client,
            client_id,
            client_secret,
        }
    }
}

#[async_trait]
impl CredentialIssuer for SpotifyTokenIssuer {
    async fn issue(&self) -> Result<IssuedCredential, CredentialError> {
        let token = self
            .client
            .request_token(&self.client_id, &self.client_secret)
            .await
            .map_err(|error| {
                error!(%error, "Unable to obtain Spotify access token");
                CredentialError::IssuanceFailed(Box::new(error))
            })?;

        Ok(IssuedCredential {
            value: token.access_token,
            ttl: Duration::from_secs(token.expires_in),
        })
    }
}
