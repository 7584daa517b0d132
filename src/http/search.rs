use crate::http::ApiError;
use actix_web::web::{Data, Query};
use actix_web::HttpResponse;
use request_processors::{SearchAggregator, SearchRequest};
use serde::Deserialize;

const DEFAULT_SPOTIFY_TYPES: &str = "track,artist,playlist,album";
const DEFAULT_YOUTUBE_TYPES: &str = "video,playlist";
const DEFAULT_LIMIT: u32 = 10;
const DEFAULT_OFFSET: u32 = 0;
const DEFAULT_MAX_RESULTS: u32 = 10;

/// Raw query string. Every value is optional text so that malformed numbers
/// fall back to defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    query: Option<String>,
    #[serde(rename = "type")]
    spotify_types: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
    youtube_type: Option<String>,
    #[serde(rename = "maxResults")]
    max_results: Option<String>,
    #[serde(rename = "pageToken")]
    page_token: Option<String>,
}

impl SearchParams {
    fn into_request(self) -> Result<SearchRequest, ApiError> {
        let query = self
            .query
            .filter(|query| !query.trim().is_empty())
            .ok_or(ApiError::MissingQuery)?;

        Ok(SearchRequest {
            query,
            spotify_types: split_types(self.spotify_types.as_deref(), DEFAULT_SPOTIFY_TYPES),
            youtube_types: split_types(self.youtube_type.as_deref(), DEFAULT_YOUTUBE_TYPES),
            limit: parse_positive(self.limit.as_deref(), DEFAULT_LIMIT),
            offset: self
                .offset
                .as_deref()
                .and_then(|offset| offset.trim().parse().ok())
                .unwrap_or(DEFAULT_OFFSET),
            max_results: parse_positive(self.max_results.as_deref(), DEFAULT_MAX_RESULTS),
            page_token: self.page_token.filter(|token| !token.is_empty()),
        })
    }
}

fn split_types(value: Option<&str>, default: &str) -> Vec<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default)
        .split(',')
        .map(str::trim)
        .filter(|subtype| !subtype.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value >= 1)
        .unwrap_or(default)
}

pub(crate) async fn search(
    search_aggregator: Data<SearchAggregator>,
    params: Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let request = params.into_inner().into_request()?;
    let results = search_aggregator.search(&request).await;

    Ok(HttpResponse::Ok().json(results))
}
