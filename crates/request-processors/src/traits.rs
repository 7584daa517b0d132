use crate::credentials::{Credential, IssuedCredential};
use crate::search::{PageRequest, SearchPage};
use crate::types::{ClassifiedReference, ItemMetadata, MediaKind, Platform};
use async_trait::async_trait;
use std::time::Instant;
use tokio::process::Command;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Credential for {0} is not configured")]
    MissingCredential(Platform),
    #[error("Unable to issue credential: {0}")]
    IssuanceFailed(BoxError),
    #[error("Credentials are not supported for {0}")]
    UnsupportedProvider(Platform),
}

#[async_trait]
pub trait CredentialIssuer {
    async fn issue(&self) -> Result<IssuedCredential, CredentialError>;
}

pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("Item not found")]
    NotFound,
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("Unable to resolve {kind} items of {platform}")]
    Unsupported { platform: Platform, kind: MediaKind },
    #[error("Upstream request failed: {0}")]
    Upstream(BoxError),
}

#[async_trait]
pub trait MetadataResolver {
    async fn resolve(
        &self,
        reference: &ClassifiedReference,
    ) -> Result<ItemMetadata, ResolutionError>;
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SearchBackendError(pub BoxError);

#[async_trait]
pub trait SearchBackend {
    async fn credential(&self) -> Result<Credential, CredentialError>;
    /// `Ok(None)` means the upstream answered without usable data for the subtype.
    async fn search(
        &self,
        credential: &Credential,
        page: &PageRequest<'_>,
    ) -> Result<Option<SearchPage>, SearchBackendError>;
}

pub trait DownloadCommandFactory {
    fn command(&self, url: &str) -> Command;
}
