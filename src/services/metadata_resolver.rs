use async_trait::async_trait;
use music_providers::duration::{format_iso8601, format_millis};
use music_providers::{SpotifyClient, SpotifyClientError, YouTubeClient};
use request_processors::{
    ClassifiedReference, CredentialCache, ItemMetadata, MediaKind, MetadataResolver, Platform,
    ResolutionError,
};
use serde_json::Value;
use std::sync::Arc;

/// Resolves classified references through the Spotify and YouTube APIs.
pub(crate) struct ProviderMetadataResolver {
    credentials: Arc<CredentialCache>,
    spotify: Arc<SpotifyClient>,
    youtube: Arc<YouTubeClient>,
}

impl ProviderMetadataResolver {
    pub(crate) fn new(
        credentials: Arc<CredentialCache>,
        spotify: Arc<SpotifyClient>,
        youtube: Arc<YouTubeClient>,
    ) -> Self {
        Self {
            credentials,
            spotify,
            youtube,
        }
    }

    async fn resolve_spotify(
        &self,
        kind: MediaKind,
        id: &str,
    ) -> Result<ItemMetadata, ResolutionError> {
        let credential = self.credentials.acquire(Platform::Spotify).await?;
        let item = self
            .spotify
            .get_item(&credential.value, kind.as_str(), id)
            .await
            .map_err(|error| match error {
                SpotifyClientError::NotFound => ResolutionError::NotFound,
                error => ResolutionError::Upstream(Box::new(error)),
            })?;

        Ok(spotify_metadata(kind, id, &item))
    }

    async fn resolve_youtube(
        &self,
        kind: MediaKind,
        id: &str,
    ) -> Result<ItemMetadata, ResolutionError> {
        let credential = self.credentials.acquire(Platform::YouTube).await?;
        let response = match kind {
            MediaKind::Playlist => self.youtube.get_playlists(&credential.value, id).await,
            _ => self.youtube.get_videos(&credential.value, id).await,
        }
        .map_err(|error| ResolutionError::Upstream(Box::new(error)))?;

        let item = response.items.first().ok_or(ResolutionError::NotFound)?;

        Ok(match kind {
            MediaKind::Playlist => youtube_playlist_metadata(id, item),
            _ => youtube_video_metadata(id, item),
        })
    }
}

#[async_trait]
impl MetadataResolver for ProviderMetadataResolver {
    async fn resolve(
        &self,
        reference: &ClassifiedReference,
    ) -> Result<ItemMetadata, ResolutionError> {
        match (reference.platform, reference.kind) {
            (Platform::Spotify, kind @ MediaKind::Track)
            | (Platform::Spotify, kind @ MediaKind::Playlist)
            | (Platform::Spotify, kind @ MediaKind::Album)
            | (Platform::Spotify, kind @ MediaKind::Artist) => {
                self.resolve_spotify(kind, &reference.id).await
            }
            (Platform::YouTube, kind @ MediaKind::Video)
            | (Platform::YouTube, kind @ MediaKind::Playlist) => {
                self.resolve_youtube(kind, &reference.id).await
            }
            (platform, kind) => Err(ResolutionError::Unsupported { platform, kind }),
        }
    }
}

fn string_at(item: &Value, pointer: &str) -> Option<String> {
    item.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn spotify_metadata(kind: MediaKind, id: &str, item: &Value) -> ItemMetadata {
    let mut metadata = ItemMetadata::new(
        format!("https://open.spotify.com/{}/{}", kind, id),
        Platform::Spotify,
        kind,
    );
    metadata.title = string_at(item, "/name").unwrap_or_default();

    match kind {
        MediaKind::Track => {
            metadata.duration = item
                .get("duration_ms")
                .and_then(Value::as_u64)
                .map(format_millis);
            metadata.thumbnail_url = string_at(item, "/album/images/0/url");
        }
        MediaKind::Playlist | MediaKind::Album => {
            metadata.item_count = item.pointer("/tracks/total").and_then(Value::as_u64);
            metadata.thumbnail_url = string_at(item, "/images/0/url");
        }
        _ => {
            metadata.thumbnail_url = string_at(item, "/images/0/url");
        }
    }

    metadata
}

fn youtube_video_metadata(id: &str, item: &Value) -> ItemMetadata {
    let mut metadata = ItemMetadata::new(
        format!("https://www.youtube.com/watch?v={}", id),
        Platform::YouTube,
        MediaKind::Track,
    );
    metadata.title = string_at(item, "/snippet/title").unwrap_or_default();
    metadata.thumbnail_url = string_at(item, "/snippet/thumbnails/medium/url");
    metadata.duration = item
        .pointer("/contentDetails/duration")
        .and_then(Value::as_str)
        .and_then(format_iso8601);

    metadata
}

fn youtube_playlist_metadata(id: &str, item: &Value) -> ItemMetadata {
    let mut metadata = ItemMetadata::new(
        format!("https://www.youtube.com/playlist?list={}", id),
        Platform::YouTube,
        MediaKind::Playlist,
    );
    metadata.title = string_at(item, "/snippet/title").unwrap_or_default();
    metadata.thumbnail_url = string_at(item, "/snippet/thumbnails/medium/url");
    metadata.item_count = item
        .pointer("/contentDetails/itemCount")
        .and_then(Value::as_u64);

    metadata
}
