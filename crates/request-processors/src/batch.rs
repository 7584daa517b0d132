use crate::classifier::classify;
use crate::traits::MetadataResolver;
use crate::types::{Category, CategoryBuckets, ItemMetadata};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("No URLs provided")]
    EmptyInput,
}

/// Four independently locked buckets, so appends to different categories
/// never contend.
#[derive(Default)]
struct SharedBuckets {
    tracks: Mutex<Vec<ItemMetadata>>,
    playlists: Mutex<Vec<ItemMetadata>>,
    albums: Mutex<Vec<ItemMetadata>>,
    artists: Mutex<Vec<ItemMetadata>>,
}

impl SharedBuckets {
    fn bucket(&self, category: Category) -> &Mutex<Vec<ItemMetadata>> {
        match category {
            Category::Tracks => &self.tracks,
            Category::Playlists => &self.playlists,
            Category::Albums => &self.albums,
            Category::Artists => &self.artists,
        }
    }

    fn push(&self, metadata: ItemMetadata) {
        self.bucket(metadata.kind.into())
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(metadata);
    }

    fn take(&self, category: Category) -> Vec<ItemMetadata> {
        std::mem::take(
            &mut *self
                .bucket(category)
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    fn drain(&self) -> CategoryBuckets {
        CategoryBuckets {
            tracks: self.take(Category::Tracks),
            playlists: self.take(Category::Playlists),
            albums: self.take(Category::Albums),
            artists: self.take(Category::Artists),
        }
    }
}

pub struct BatchAggregator {
    resolver: Arc<dyn MetadataResolver + Send + Sync>,
    max_in_flight: Option<usize>,
}

impl BatchAggregator {
    /// `max_in_flight` bounds the number of concurrently running lookups;
    /// `None` (or zero) launches one worker per URL at once.
    pub fn new(
        resolver: Arc<dyn MetadataResolver + Send + Sync>,
        max_in_flight: Option<usize>,
    ) -> Self {
        Self {
            resolver,
            max_in_flight: max_in_flight.filter(|limit| *limit > 0),
        }
    }

    /// Classifies and resolves every URL concurrently and returns once all
    /// workers have finished. URLs that cannot be classified or resolved are
    /// left out of the result.
    pub async fn aggregate(&self, urls: Vec<String>) -> Result<CategoryBuckets, BatchError> {
        if urls.is_empty() {
            return Err(BatchError::EmptyInput);
        }

        let urls_count = urls.len();
        let buckets = Arc::new(SharedBuckets::default());
        let limiter = self.max_in_flight.map(|limit| Arc::new(Semaphore::new(limit)));
        let mut workers = JoinSet::new();

        for url in urls {
            let permit = match &limiter {
                Some(limiter) => limiter.clone().acquire_owned().await.ok(),
                None => None,
            };
            let resolver = self.resolver.clone();
            let buckets = buckets.clone();

            workers.spawn(async move {
                let _permit = permit;
                resolve_into(resolver.as_ref(), &url, &buckets).await;
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(error) = joined {
                error!(?error, "Batch worker terminated abnormally");
            }
        }

        let result = buckets.drain();

        info!(
            urls = urls_count,
            resolved = result.len(),
            "Batch aggregation finished"
        );

        Ok(result)
    }
}

async fn resolve_into(
    resolver: &(dyn MetadataResolver + Send + Sync),
    url: &str,
    buckets: &SharedBuckets,
) {
    let reference = match classify(url) {
        Ok(reference) => reference,
        Err(error) if error.is_skip() => {
            debug!(%url, "Skipping URL of unsupported platform");
            return;
        }
        Err(error) => {
            warn!(%url, %error, "Unable to classify URL");
            return;
        }
    };

    match resolver.resolve(&reference).await {
        Ok(metadata) => {
            debug!(%url, kind = %metadata.kind, "Item metadata resolved");
            buckets.push(metadata);
        }
        Err(error) => {
            warn!(%url, %error, ?reference, "Unable to resolve item metadata");
        }
    }
}
