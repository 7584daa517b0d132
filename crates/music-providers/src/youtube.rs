mod types;


pub use types::*;

use crate::{check_status, UnexpectedStatus};
use reqwest::Client;

pub const YOUTUBE_API_ENDPOINT: &str = "https://www.googleapis.com";

const ITEM_PARTS: &str = "snippet,contentDetails";
const SEARCH_PARTS: &str = "snippet";

#[derive(Debug, thiserror::Error)]
pub enum YouTubeClientError {
    #[error(transparent)]
    UnexpectedStatus(#[from] UnexpectedStatus),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

pub type YouTubeClientResult<T> = Result<T, YouTubeClientError>;

/// Client of the YouTube Data API v3, authenticated with an API key.
pub struct YouTubeClient {
    client: Client,
    api_endpoint: String,
}

impl YouTubeClient {
    pub fn create(api_endpoint: &str) -> YouTubeClientResult<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_videos(&self, api_key: &str, id: &str) -> YouTubeClientResult<ListResponse> {
        self.list("videos", api_key, id).await
    }

    pub async fn get_playlists(
        &self,
        api_key: &str,
        id: &str,
    ) -> YouTubeClientResult<ListResponse> {
        self.list("playlists", api_key, id).await
    }

    pub async fn search(
        &self,
        api_key: &str,
        query: &str,
        item_type: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> YouTubeClientResult<SearchResponse> {
        let mut request = self
            .client
            .get(format!("{}/youtube/v3/search", self.api_endpoint))
            .query(&[
                ("part", SEARCH_PARTS),
                ("q", query),
                ("type", item_type),
                ("key", api_key),
            ])
            .query(&[("maxResults", max_results)]);

        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }

        let response = request.send().await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn list(
        &self,
        resource: &str,
        api_key: &str,
        id: &str,
    ) -> YouTubeClientResult<ListResponse> {
        let response = self
            .client
            .get(format!("{}/youtube/v3/{}", self.api_endpoint, resource))
            .query(&[("part", ITEM_PARTS), ("id", id), ("key", api_key)])
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}
