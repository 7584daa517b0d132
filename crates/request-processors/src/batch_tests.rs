use crate::{
    BatchAggregator, BatchError, ClassifiedReference, ItemMetadata, MediaKind, MetadataResolver,
    Platform, ResolutionError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn metadata(platform: Platform, kind: MediaKind, id: &str, title: &str) -> ItemMetadata {
    let mut metadata = ItemMetadata::new(format!("{}/{}/{}", platform, kind, id), platform, kind);
    metadata.title = title.into();
    metadata
}

struct MetadataResolverMock {
    items: HashMap<String, ItemMetadata>,
    calls: AtomicUsize,
}

impl MetadataResolverMock {
    fn new(items: Vec<ItemMetadata>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| {
                    let id = item.source_url.rsplit('/').next().unwrap().to_string();
                    (id, item)
                })
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MetadataResolver for MetadataResolverMock {
    async fn resolve(
        &self,
        reference: &ClassifiedReference,
    ) -> Result<ItemMetadata, ResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.items.get(&*reference.id) {
            Some(item) if item.platform == reference.platform => Ok(item.clone()),
            _ => Err(ResolutionError::NotFound),
        }
    }
}

#[actix_rt::test]
async fn test_mixed_batch_is_split_by_platform_and_kind() {
    let resolver = Arc::new(MetadataResolverMock::new(vec![
        metadata(Platform::Spotify, MediaKind::Track, "abc", "Children"),
        metadata(Platform::YouTube, MediaKind::Track, "xyz", "Children (Dream Version)"),
    ]));
    let aggregator = BatchAggregator::new(resolver.clone(), None);

    let buckets = aggregator
        .aggregate(vec![
            "open.spotify.com/track/abc".into(),
            "youtube.com/watch?v=xyz".into(),
            "not-a-url".into(),
        ])
        .await
        .unwrap();

    assert_eq!(2, buckets.tracks.len());
    assert!(buckets.playlists.is_empty());
    assert!(buckets.albums.is_empty());
    assert!(buckets.artists.is_empty());

    let mut platforms = buckets
        .tracks
        .iter()
        .map(|item| item.platform)
        .collect::<Vec<_>>();
    platforms.sort_by_key(|platform| platform.as_str());
    assert_eq!(vec![Platform::Spotify, Platform::YouTube], platforms);

    // The unsupported input never reaches the resolver.
    assert_eq!(2, resolver.calls.load(Ordering::SeqCst));
}

#[actix_rt::test]
async fn test_items_land_in_matching_buckets() {
    let resolver = Arc::new(MetadataResolverMock::new(vec![
        metadata(Platform::Spotify, MediaKind::Track, "t1", "Fable"),
        metadata(Platform::Spotify, MediaKind::Playlist, "p1", "Dream House"),
        metadata(Platform::Spotify, MediaKind::Album, "a1", "Dreamland"),
        metadata(Platform::Spotify, MediaKind::Artist, "r1", "Robert Miles"),
        metadata(Platform::YouTube, MediaKind::Playlist, "PL1", "Trance Classics"),
    ]));
    let aggregator = BatchAggregator::new(resolver, Some(4));

    let buckets = aggregator
        .aggregate(vec![
            "https://open.spotify.com/track/t1".into(),
            "https://open.spotify.com/playlist/p1".into(),
            "https://open.spotify.com/album/a1".into(),
            "https://open.spotify.com/artist/r1".into(),
            "https://www.youtube.com/playlist?list=PL1".into(),
        ])
        .await
        .unwrap();

    assert_eq!(1, buckets.tracks.len());
    assert_eq!(2, buckets.playlists.len());
    assert_eq!(vec!["Dreamland"], buckets.albums.iter().map(|i| i.title.as_str()).collect::<Vec<_>>());
    assert_eq!(vec!["Robert Miles"], buckets.artists.iter().map(|i| i.title.as_str()).collect::<Vec<_>>());
}

#[actix_rt::test]
async fn test_kind_without_own_bucket_is_reported_as_track() {
    let resolver = Arc::new(MetadataResolverMock::new(vec![metadata(
        Platform::YouTube,
        MediaKind::Video,
        "vid",
        "Live Set",
    )]));
    let aggregator = BatchAggregator::new(resolver, None);

    let buckets = aggregator
        .aggregate(vec!["https://youtu.be/vid".into()])
        .await
        .unwrap();

    assert_eq!(1, buckets.tracks.len());
    assert_eq!(MediaKind::Video, buckets.tracks[0].kind);
}

#[actix_rt::test]
async fn test_failed_items_are_dropped_silently() {
    let resolver = Arc::new(MetadataResolverMock::new(vec![metadata(
        Platform::Spotify,
        MediaKind::Album,
        "known",
        "Dreamland",
    )]));
    let aggregator = BatchAggregator::new(resolver, None);
    let urls: Vec<String> = vec![
        "https://open.spotify.com/album/known".into(),
        "https://open.spotify.com/album/missing".into(),
        "https://open.spotify.com/user/someone".into(),
        "https://www.youtube.com/watch?v=".into(),
        "https://example.com/track/known".into(),
    ];
    let urls_count = urls.len();

    let buckets = aggregator.aggregate(urls).await.unwrap();

    assert_eq!(1, buckets.len());
    assert!(buckets.len() <= urls_count);
    assert_eq!("Dreamland", buckets.albums[0].title);
}

#[actix_rt::test]
async fn test_every_url_resolved_fills_buckets_completely() {
    let ids = (0..20).map(|i| format!("id{}", i)).collect::<Vec<_>>();
    let resolver = Arc::new(MetadataResolverMock::new(
        ids.iter()
            .map(|id| metadata(Platform::Spotify, MediaKind::Track, id, id))
            .collect(),
    ));
    let aggregator = BatchAggregator::new(resolver, Some(3));

    let buckets = aggregator
        .aggregate(
            ids.iter()
                .map(|id| format!("https://open.spotify.com/track/{}", id))
                .collect(),
        )
        .await
        .unwrap();

    assert_eq!(ids.len(), buckets.len());
}

#[actix_rt::test]
async fn test_single_worker_preserves_input_order() {
    let resolver = Arc::new(MetadataResolverMock::new(vec![
        metadata(Platform::Spotify, MediaKind::Track, "first", "First"),
        metadata(Platform::Spotify, MediaKind::Track, "second", "Second"),
        metadata(Platform::Spotify, MediaKind::Track, "third", "Third"),
    ]));
    let aggregator = BatchAggregator::new(resolver, Some(1));

    let buckets = aggregator
        .aggregate(vec![
            "https://open.spotify.com/track/first".into(),
            "https://open.spotify.com/track/second".into(),
            "https://open.spotify.com/track/third".into(),
        ])
        .await
        .unwrap();

    assert_eq!(
        vec!["First", "Second", "Third"],
        buckets
            .tracks
            .iter()
            .map(|item| item.title.as_str())
            .collect::<Vec<_>>()
    );
}

#[actix_rt::test]
async fn test_empty_batch_is_rejected() {
    let aggregator = BatchAggregator::new(Arc::new(MetadataResolverMock::new(vec![])), None);

    assert!(matches!(
        aggregator.aggregate(vec![]).await,
        Err(BatchError::EmptyInput)
    ));
}

struct SlowResolverMock {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[async_trait]
impl MetadataResolver for SlowResolverMock {
    async fn resolve(
        &self,
        reference: &ClassifiedReference,
    ) -> Result<ItemMetadata, ResolutionError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(10)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        Ok(metadata(reference.platform, reference.kind, &reference.id, "Slow"))
    }
}

#[actix_rt::test]
async fn test_worker_pool_bound_is_respected() {
    let resolver = Arc::new(SlowResolverMock {
        in_flight: AtomicUsize::new(0),
        max_in_flight: AtomicUsize::new(0),
    });
    let aggregator = BatchAggregator::new(resolver.clone(), Some(2));

    let buckets = aggregator
        .aggregate(
            (0..8)
                .map(|i| format!("https://open.spotify.com/album/{}", i))
                .collect(),
        )
        .await
        .unwrap();

    assert_eq!(8, buckets.albums.len());
    assert!(resolver.max_in_flight.load(Ordering::SeqCst) <= 2);
}

#[actix_rt::test]
async fn test_unbounded_workers_run_concurrently() {
    let resolver = Arc::new(SlowResolverMock {
        in_flight: AtomicUsize::new(0),
        max_in_flight: AtomicUsize::new(0),
    });
    let aggregator = BatchAggregator::new(resolver.clone(), None);

    aggregator
        .aggregate(
            (0..5)
                .map(|i| format!("https://open.spotify.com/artist/{}", i))
                .collect(),
        )
        .await
        .unwrap();

    assert_eq!(5, resolver.max_in_flight.load(Ordering::SeqCst));
}
