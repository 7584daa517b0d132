use async_trait::async_trait;
use music_providers::{SpotifyClient, YouTubeClient};
use request_processors::{
    Credential, CredentialCache, CredentialError, PageRequest, Platform, SearchBackend,
    SearchBackendError, SearchPage,
};
use std::sync::Arc;

pub(crate) struct SpotifySearchBackend {
    credentials: Arc<CredentialCache>,
    client: Arc<SpotifyClient>,
}

impl SpotifySearchBackend {
    pub(crate) fn new(credentials: Arc<CredentialCache>, client: Arc<SpotifyClient>) -> Self {
        Self {
            credentials,
            client,
        }
    }
}

#[async_trait]
impl SearchBackend for SpotifySearchBackend {
    async fn credential(&self) -> Result<Credential, CredentialError> {
        self.credentials.acquire(Platform::Spotify).await
    }

    async fn search(
        &self,
        credential: &Credential,
        page: &PageRequest<'_>,
    ) -> Result<Option<SearchPage>, SearchBackendError> {
        let result = self
            .client
            .search(
                &credential.value,
                page.query,
                page.subtype,
                page.limit,
                page.offset,
            )
            .await
            .map_err(|error| SearchBackendError(Box::new(error)))?;

        Ok(result.and_then(|result| {
            Some(SearchPage {
                items: result.items?,
                total: result.total,
                next: result.next,
                previous: result.previous,
                next_page_token: None,
            })
        }))
    }
}

pub(crate) struct YouTubeSearchBackend {
    credentials: Arc<CredentialCache>,
    client: Arc<YouTubeClient>,
}

impl YouTubeSearchBackend {
    pub(crate) fn new(credentials: Arc<CredentialCache>, client: Arc<YouTubeClient>) -> Self {
        Self {
            credentials,
            client,
        }
    }
}

#[async_trait]
impl SearchBackend for YouTubeSearchBackend {
    async fn credential(&self) -> Result<Credential, CredentialError> {
        self.credentials.acquire(Platform::YouTube).await
    }

    async fn search(
        &self,
        credential: &Credential,
        page: &PageRequest<'_>,
    ) -> Result<Option<SearchPage>, SearchBackendError> {
        let response = self
            .client
            .search(
                &credential.value,
                page.query,
                page.subtype,
                page.limit,
                page.page_token,
            )
            .await
            .map_err(|error| SearchBackendError(Box::new(error)))?;

        let Some(items) = response.items else {
            return Ok(None);
        };

        Ok(Some(SearchPage {
            items,
            total: response.page_info.total_results,
            next: response.next_page_token.clone(),
            previous: response.prev_page_token,
            next_page_token: response.next_page_token,
        }))
    }
}
