use crate::lenient::or_default;
use serde::Deserialize;
use serde_json::Value;

/// Response of the `videos` and `playlists` list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default, deserialize_with = "or_default")]
    pub total_results: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub results_per_page: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "or_default")]
    pub items: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "or_default")]
    pub next_page_token: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub prev_page_token: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub page_info: PageInfo,
}
