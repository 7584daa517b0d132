use crate::types::{ClassifiedReference, MediaKind, Platform};

const SPOTIFY_DOMAIN: &str = "spotify.com";
const YOUTUBE_DOMAINS: [&str; 2] = ["youtube.com", "youtu.be"];
const YOUTUBE_SHORT_LINK: &str = "youtu.be/";
const YOUTUBE_PLAYLIST_MARKER: &str = "playlist";
const YOUTUBE_PLAYLIST_PARAM: &str = "list";
const YOUTUBE_VIDEO_PARAM: &str = "v";

const SPOTIFY_KIND_TOKENS: [(&str, MediaKind); 4] = [
    ("track", MediaKind::Track),
    ("playlist", MediaKind::Playlist),
    ("artist", MediaKind::Artist),
    ("album", MediaKind::Album),
];

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("URL does not belong to a supported platform")]
    Unsupported,
    #[error("Unable to extract {platform} item from URL")]
    UnrecognizedUrl { platform: Platform },
}

impl ClassificationError {
    /// Unsupported inputs are skipped rather than reported.
    pub fn is_skip(&self) -> bool {
        matches!(self, ClassificationError::Unsupported)
    }
}

pub fn classify(input: &str) -> Result<ClassifiedReference, ClassificationError> {
    let input = input.trim();

    if input.contains(SPOTIFY_DOMAIN) {
        classify_spotify(input)
    } else if YOUTUBE_DOMAINS.iter().any(|domain| input.contains(domain)) {
        classify_youtube(input)
    } else {
        Err(ClassificationError::Unsupported)
    }
}

fn classify_spotify(input: &str) -> Result<ClassifiedReference, ClassificationError> {
    let mut segments = input.split('/');

    while let Some(segment) = segments.next() {
        let kind = match SPOTIFY_KIND_TOKENS
            .iter()
            .find_map(|(token, kind)| (*token == segment).then_some(*kind))
        {
            Some(kind) => kind,
            None => continue,
        };

        return match segments.next().map(strip_query).filter(|id| !id.is_empty()) {
            Some(id) => Ok(ClassifiedReference::new(Platform::Spotify, kind, id)),
            None => Err(ClassificationError::UnrecognizedUrl {
                platform: Platform::Spotify,
            }),
        };
    }

    Err(ClassificationError::UnrecognizedUrl {
        platform: Platform::Spotify,
    })
}

fn classify_youtube(input: &str) -> Result<ClassifiedReference, ClassificationError> {
    let unrecognized = ClassificationError::UnrecognizedUrl {
        platform: Platform::YouTube,
    };

    if input.contains(YOUTUBE_PLAYLIST_MARKER) {
        return query_param(input, YOUTUBE_PLAYLIST_PARAM)
            .map(|id| ClassifiedReference::new(Platform::YouTube, MediaKind::Playlist, id))
            .ok_or(unrecognized);
    }

    short_link_id(input)
        .or_else(|| query_param(input, YOUTUBE_VIDEO_PARAM))
        .map(|id| ClassifiedReference::new(Platform::YouTube, MediaKind::Video, id))
        .ok_or(unrecognized)
}

fn short_link_id(input: &str) -> Option<String> {
    let (_, rest) = input.split_once(YOUTUBE_SHORT_LINK)?;
    let id = strip_query(rest.split('/').next()?);

    (!id.is_empty()).then(|| id.to_string())
}

fn query_param(input: &str, name: &str) -> Option<String> {
    let (_, query) = input.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn strip_query(segment: &str) -> &str {
    segment
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default()
}
