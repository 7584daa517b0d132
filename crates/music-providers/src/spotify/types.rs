use crate::lenient::or_default;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

/// Paging object returned for every requested type of a search.
///
/// `items` is `None` unless the page carries an array of items.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpotifyPage {
    #[serde(default, deserialize_with = "or_default")]
    pub items: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "or_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub limit: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub offset: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub next: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub previous: Option<String>,
}
