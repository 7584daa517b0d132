use music_providers::{SPOTIFY_ACCOUNTS_ENDPOINT, SPOTIFY_API_ENDPOINT, YOUTUBE_API_ENDPOINT};
use serde::Deserialize;

fn default_bind_address() -> String {
    "0.0.0.0:3333".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30u64
}

fn default_max_concurrent_lookups() -> usize {
    16
}

fn default_search_field_denylist() -> Vec<String> {
    vec!["available_markets".to_string()]
}

fn default_spotify_api_endpoint() -> String {
    SPOTIFY_API_ENDPOINT.to_string()
}

fn default_spotify_accounts_endpoint() -> String {
    SPOTIFY_ACCOUNTS_ENDPOINT.to_string()
}

fn default_youtube_api_endpoint() -> String {
    YOUTUBE_API_ENDPOINT.to_string()
}

fn default_docker_binary() -> String {
    "docker".to_string()
}

fn default_spotdl_container() -> String {
    "spotDL".to_string()
}

fn default_ytdlp_container() -> String {
    "yt-dlp".to_string()
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_output_template() -> String {
    "/downloads/%(title)s.%(ext)s".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SpotifyConfig {
    pub(crate) client_id: Option<String>,
    pub(crate) client_secret: Option<String>,
    #[serde(default = "default_spotify_api_endpoint")]
    pub(crate) api_endpoint: String,
    #[serde(default = "default_spotify_accounts_endpoint")]
    pub(crate) accounts_endpoint: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct YouTubeConfig {
    pub(crate) api_key: Option<String>,
    #[serde(default = "default_youtube_api_endpoint")]
    pub(crate) api_endpoint: String,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct DownloadConfig {
    #[serde(default = "default_docker_binary")]
    pub(crate) docker_binary: String,
    #[serde(default = "default_spotdl_container")]
    pub(crate) spotdl_container: String,
    #[serde(default = "default_ytdlp_container")]
    pub(crate) ytdlp_container: String,
    #[serde(default = "default_audio_format")]
    pub(crate) audio_format: String,
    #[serde(default = "default_output_template")]
    pub(crate) output_template: String,
    /// Seconds.
    pub(crate) timeout: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
struct ServerConfig {
    #[serde(default = "default_bind_address")]
    bind_address: String,
    #[serde(default = "default_shutdown_timeout")]
    shutdown_timeout: u64,
    #[serde(default = "default_max_concurrent_lookups")]
    max_concurrent_lookups: usize,
    #[serde(default = "default_search_field_denylist")]
    search_field_denylist: Vec<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) bind_address: String,
    pub(crate) shutdown_timeout: u64,
    pub(crate) max_concurrent_lookups: usize,
    pub(crate) search_field_denylist: Vec<String>,
    pub(crate) spotify: SpotifyConfig,
    pub(crate) youtube: YouTubeConfig,
    pub(crate) download: DownloadConfig,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars().collect())
    }

    fn from_vars(vars: Vec<(String, String)>) -> Result<Self, envy::Error> {
        let server = envy::from_iter::<_, ServerConfig>(vars.clone())?;

        Ok(Self {
            bind_address: server.bind_address,
            shutdown_timeout: server.shutdown_timeout,
            max_concurrent_lookups: server.max_concurrent_lookups,
            search_field_denylist: server.search_field_denylist,
            spotify: envy::prefixed("SPOTIFY_").from_iter(vars.clone())?,
            youtube: envy::prefixed("YOUTUBE_").from_iter(vars.clone())?,
            download: envy::prefixed("DOWNLOAD_").from_iter(vars)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vec![]).unwrap();

        assert_eq!("0.0.0.0:3333", config.bind_address);
        assert_eq!(30, config.shutdown_timeout);
        assert_eq!(16, config.max_concurrent_lookups);
        assert_eq!(vec!["available_markets"], config.search_field_denylist);
        assert_eq!(None, config.spotify.client_id);
        assert_eq!("https://api.spotify.com", config.spotify.api_endpoint);
        assert_eq!("https://accounts.spotify.com", config.spotify.accounts_endpoint);
        assert_eq!(None, config.youtube.api_key);
        assert_eq!("https://www.googleapis.com", config.youtube.api_endpoint);
        assert_eq!("docker", config.download.docker_binary);
        assert_eq!("spotDL", config.download.spotdl_container);
        assert_eq!("yt-dlp", config.download.ytdlp_container);
        assert_eq!("mp3", config.download.audio_format);
        assert_eq!("/downloads/%(title)s.%(ext)s", config.download.output_template);
        assert_eq!(None, config.download.timeout);
    }

    #[test]
    fn test_prefixed_groups() {
        let config = Config::from_vars(vars(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("MAX_CONCURRENT_LOOKUPS", "0"),
            ("SEARCH_FIELD_DENYLIST", "available_markets,external_ids"),
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
            ("YOUTUBE_API_KEY", "key"),
            ("DOWNLOAD_AUDIO_FORMAT", "opus"),
            ("DOWNLOAD_TIMEOUT", "600"),
        ]))
        .unwrap();

        assert_eq!("127.0.0.1:8080", config.bind_address);
        assert_eq!(0, config.max_concurrent_lookups);
        assert_eq!(
            vec!["available_markets", "external_ids"],
            config.search_field_denylist
        );
        assert_eq!(Some("id".to_string()), config.spotify.client_id);
        assert_eq!(Some("secret".to_string()), config.spotify.client_secret);
        assert_eq!(Some("key".to_string()), config.youtube.api_key);
        assert_eq!("opus", config.download.audio_format);
        assert_eq!(Some(600), config.download.timeout);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let result = Config::from_vars(vars(&[("SHUTDOWN_TIMEOUT", "soon")]));

        assert!(result.is_err());
    }
}
