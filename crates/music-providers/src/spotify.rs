mod types;


pub use types::*;

use crate::{check_status, UnexpectedStatus};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub const SPOTIFY_API_ENDPOINT: &str = "https://api.spotify.com";
pub const SPOTIFY_ACCOUNTS_ENDPOINT: &str = "https://accounts.spotify.com";

#[derive(Debug, thiserror::Error)]
pub enum SpotifyClientError {
    #[error("Item not found")]
    NotFound,
    #[error(transparent)]
    UnexpectedStatus(#[from] UnexpectedStatus),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

pub type SpotifyClientResult<T> = Result<T, SpotifyClientError>;

pub struct SpotifyClient {
    client: Client,
    api_endpoint: String,
    accounts_endpoint: String,
}

impl SpotifyClient {
    pub fn create(api_endpoint: &str, accounts_endpoint: &str) -> SpotifyClientResult<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            accounts_endpoint: accounts_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Client-credentials exchange.
    pub async fn request_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> SpotifyClientResult<AccessToken> {
        let authorization = STANDARD.encode(format!("{}:{}", client_id, client_secret));

        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_endpoint))
            .header("Authorization", format!("Basic {}", authorization))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let token = check_status(response).await?.json::<AccessToken>().await?;

        debug!(expires_in = token.expires_in, "Spotify access token issued");

        Ok(token)
    }

    /// Fetches a single track, playlist, album or artist as raw JSON.
    pub async fn get_item(&self, token: &str, kind: &str, id: &str) -> SpotifyClientResult<Value> {
        let response = self
            .client
            .get(format!("{}/v1/{}s/{}", self.api_endpoint, kind, id))
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SpotifyClientError::NotFound);
        }

        Ok(check_status(response).await?.json().await?)
    }

    /// Searches one item type. Returns `None` when the response carries no
    /// paging object for that type. Other keys of the response are ignored.
    pub async fn search(
        &self,
        token: &str,
        query: &str,
        item_type: &str,
        limit: u32,
        offset: u32,
    ) -> SpotifyClientResult<Option<SpotifyPage>> {
        let response = self
            .client
            .get(format!("{}/v1/search", self.api_endpoint))
            .bearer_auth(token)
            .query(&[("q", query), ("type", item_type)])
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;

        let mut pages = check_status(response)
            .await?
            .json::<HashMap<String, Value>>()
            .await?;

        let page = pages
            .remove(&format!("{}s", item_type))
            .and_then(|page| serde_json::from_value::<SpotifyPage>(page).ok());

        Ok(page)
    }
}
