use crate::traits::{Clock, CredentialError, CredentialIssuer};
use crate::types::Platform;
use async_lock::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub value: String,
    /// `None` for static credentials that never expire.
    pub expires_at: Option<Instant>,
}

impl Credential {
    pub fn is_valid_at(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

/// Credential as handed out by an issuer, with a relative lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCredential {
    pub value: String,
    pub ttl: Duration,
}

enum CredentialSource {
    Issued {
        issuer: Arc<dyn CredentialIssuer + Send + Sync>,
        slot: Mutex<Option<Credential>>,
    },
    Static(Option<String>),
}

/// Single-slot credential cache per platform.
///
/// Checking the slot and refreshing it happen under one lock, so concurrent
/// callers never trigger more than one issuance per expiry window.
pub struct CredentialCache {
    sources: HashMap<Platform, CredentialSource>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl CredentialCache {
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            sources: HashMap::new(),
            clock,
        }
    }

    pub fn with_issuer(
        mut self,
        platform: Platform,
        issuer: Arc<dyn CredentialIssuer + Send + Sync>,
    ) -> Self {
        self.sources.insert(
            platform,
            CredentialSource::Issued {
                issuer,
                slot: Mutex::new(None),
            },
        );
        self
    }

    /// Registers a pre-configured credential. `None` makes every acquisition
    /// fail with [`CredentialError::MissingCredential`].
    pub fn with_static(mut self, platform: Platform, value: Option<String>) -> Self {
        self.sources
            .insert(platform, CredentialSource::Static(value));
        self
    }

    pub async fn acquire(&self, platform: Platform) -> Result<Credential, CredentialError> {
        match self.sources.get(&platform) {
            Some(CredentialSource::Issued { issuer, slot }) => {
                self.acquire_issued(platform, issuer.as_ref(), slot).await
            }
            Some(CredentialSource::Static(Some(value))) => Ok(Credential {
                value: value.clone(),
                expires_at: None,
            }),
            Some(CredentialSource::Static(None)) => {
                Err(CredentialError::MissingCredential(platform))
            }
            None => Err(CredentialError::UnsupportedProvider(platform)),
        }
    }

    async fn acquire_issued(
        &self,
        platform: Platform,
        issuer: &(dyn CredentialIssuer + Send + Sync),
        slot: &Mutex<Option<Credential>>,
    ) -> Result<Credential, CredentialError> {
        let mut cached = slot.lock().await;

        if let Some(credential) = cached
            .as_ref()
            .filter(|credential| credential.is_valid_at(self.clock.now()))
        {
            return Ok(credential.clone());
        }

        debug!(%platform, "Cached credential is missing or expired, issuing a new one");

        let issued = issuer.issue().await?;
        let now = self.clock.now();
        let expires_at = now.checked_add(issued.ttl).ok_or_else(|| {
            CredentialError::IssuanceFailed("credential lifetime is out of range".into())
        })?;
        let credential = Credential {
            value: issued.value,
            expires_at: Some(expires_at),
        };

        if !credential.is_valid_at(now) {
            return Err(CredentialError::IssuanceFailed(
                "issued credential is already expired".into(),
            ));
        }

        info!(%platform, ttl_secs = issued.ttl.as_secs(), "Credential refreshed");

        cached.replace(credential.clone());

        Ok(credential)
    }
}
