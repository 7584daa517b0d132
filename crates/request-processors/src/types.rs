use crate::ItemId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Spotify,
    YouTube,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Spotify => "spotify",
            Platform::YouTube => "youtube",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Track,
    Playlist,
    Album,
    Artist,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Track => "track",
            MediaKind::Playlist => "playlist",
            MediaKind::Album => "album",
            MediaKind::Artist => "artist",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform, kind and identifier extracted from a user supplied URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassifiedReference {
    pub platform: Platform,
    pub kind: MediaKind,
    pub id: ItemId,
}

impl ClassifiedReference {
    pub fn new(platform: Platform, kind: MediaKind, id: impl Into<ItemId>) -> Self {
        Self {
            platform,
            kind,
            id: id.into(),
        }
    }
}

/// Normalized metadata of a single resolved item.
///
/// Optional fields are only set when the upstream record carried them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMetadata {
    #[serde(rename = "url")]
    pub source_url: String,
    pub title: String,
    pub platform: Platform,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(rename = "thumbnail", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "track_count", skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
}

impl ItemMetadata {
    pub fn new(source_url: String, platform: Platform, kind: MediaKind) -> Self {
        Self {
            source_url,
            title: String::new(),
            platform,
            kind,
            duration: None,
            thumbnail_url: None,
            item_count: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Tracks,
    Playlists,
    Albums,
    Artists,
}

impl From<MediaKind> for Category {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Playlist => Category::Playlists,
            MediaKind::Album => Category::Albums,
            MediaKind::Artist => Category::Artists,
            // Anything without a bucket of its own is reported as a track.
            _ => Category::Tracks,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryBuckets {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<ItemMetadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub playlists: Vec<ItemMetadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub albums: Vec<ItemMetadata>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<ItemMetadata>,
}

impl CategoryBuckets {
    pub fn len(&self) -> usize {
        self.tracks.len() + self.playlists.len() + self.albums.len() + self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
