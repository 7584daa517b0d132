use crate::traits::SearchBackend;
use futures_lite::future;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Parsed search parameters shared by both providers.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub spotify_types: Vec<String>,
    pub youtube_types: Vec<String>,
    pub limit: u32,
    pub offset: u32,
    pub max_results: u32,
    pub page_token: Option<String>,
}

/// One upstream search call for a single subtype.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest<'a> {
    pub query: &'a str,
    pub subtype: &'a str,
    pub limit: u32,
    pub offset: u32,
    pub page_token: Option<&'a str>,
}

/// Raw items of one subtype together with the upstream paging markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub items: Vec<Value>,
    pub total: u64,
    /// Link or token pointing at the next page; empty means there is none.
    pub next: Option<String>,
    pub previous: Option<String>,
    /// Opaque continuation token exposed to the client as is.
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationCounters {
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_token: Option<String>,
}

impl From<&SearchPage> for PaginationCounters {
    fn from(page: &SearchPage) -> Self {
        fn present(link: &Option<String>) -> bool {
            link.as_deref().map_or(false, |link| !link.is_empty())
        }

        Self {
            total: page.total,
            has_next: present(&page.next),
            has_previous: present(&page.previous),
            next_page_token: page.next_page_token.clone().filter(|token| !token.is_empty()),
        }
    }
}

/// Pagination object of one provider. Serialized flat, with the per-subtype
/// counters suffixed by the subtype name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub subtypes: Vec<(String, PaginationCounters)>,
}

impl Pagination {
    pub fn counters(&self, subtype: &str) -> Option<&PaginationCounters> {
        self.subtypes
            .iter()
            .find_map(|(name, counters)| (name == subtype).then_some(counters))
    }

    fn counters_mut(&mut self, subtype: &str) -> Option<&mut PaginationCounters> {
        self.subtypes
            .iter_mut()
            .find_map(|(name, counters)| (name == subtype).then_some(counters))
    }
}

impl Serialize for Pagination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        if let Some(limit) = self.limit {
            map.serialize_entry("limit", &limit)?;
        }
        if let Some(offset) = self.offset {
            map.serialize_entry("offset", &offset)?;
        }

        for (subtype, counters) in &self.subtypes {
            map.serialize_entry(&format!("total_{}s", subtype), &counters.total)?;
            map.serialize_entry(&format!("has_next_{}", subtype), &counters.has_next)?;
            map.serialize_entry(&format!("has_previous_{}", subtype), &counters.has_previous)?;
            if let Some(token) = &counters.next_page_token {
                map.serialize_entry(&format!("next_page_token_{}", subtype), token)?;
            }
        }

        map.end()
    }
}

/// Result namespace of one provider. An unavailable provider has neither
/// items nor pagination and serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResults {
    pub items: Vec<(String, Vec<Value>)>,
    pub pagination: Option<Pagination>,
}

impl ProviderResults {
    pub fn items(&self, subtype: &str) -> Option<&[Value]> {
        self.items
            .iter()
            .find_map(|(name, items)| (name == subtype).then_some(items.as_slice()))
    }

    pub fn is_unavailable(&self) -> bool {
        self.items.is_empty() && self.pagination.is_none()
    }
}

impl Serialize for ProviderResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        for (subtype, items) in &self.items {
            map.serialize_entry(&format!("{}s", subtype), items)?;
        }
        if let Some(pagination) = &self.pagination {
            map.serialize_entry("pagination", pagination)?;
        }

        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResultSet {
    pub spotify: ProviderResults,
    pub youtube: ProviderResults,
}

pub struct SearchAggregator {
    spotify: Arc<dyn SearchBackend + Send + Sync>,
    youtube: Arc<dyn SearchBackend + Send + Sync>,
    denylist: Vec<String>,
}

impl SearchAggregator {
    /// `denylist` names fields removed, at any depth, from every Spotify item.
    pub fn new(
        spotify: Arc<dyn SearchBackend + Send + Sync>,
        youtube: Arc<dyn SearchBackend + Send + Sync>,
        denylist: Vec<String>,
    ) -> Self {
        Self {
            spotify,
            youtube,
            denylist,
        }
    }

    /// Searches both providers concurrently and waits for both to finish.
    /// Failures are isolated: a failed subtype is omitted, a provider without
    /// credential yields an empty namespace.
    pub async fn search(&self, request: &SearchRequest) -> SearchResultSet {
        let (spotify, youtube) =
            future::zip(self.search_spotify(request), self.search_youtube(request)).await;

        info!(
            query = %request.query,
            spotify_subtypes = spotify.items.len(),
            youtube_subtypes = youtube.items.len(),
            "Search finished"
        );

        SearchResultSet { spotify, youtube }
    }

    async fn search_spotify(&self, request: &SearchRequest) -> ProviderResults {
        let unit = ProviderUnit {
            provider: "spotify",
            backend: self.spotify.as_ref(),
            subtypes: &request.spotify_types,
            limit: request.limit,
            page_token: None,
        };
        let pagination = Pagination {
            limit: Some(request.limit),
            offset: Some(request.offset),
            subtypes: Vec::new(),
        };

        unit.run(request, pagination, |items| {
            items
                .into_iter()
                .filter(Value::is_object)
                .map(|mut item| {
                    strip_fields(&mut item, &self.denylist);
                    item
                })
                .collect()
        })
        .await
    }

    async fn search_youtube(&self, request: &SearchRequest) -> ProviderResults {
        let unit = ProviderUnit {
            provider: "youtube",
            backend: self.youtube.as_ref(),
            subtypes: &request.youtube_types,
            limit: request.max_results,
            page_token: request.page_token.as_deref(),
        };

        unit.run(request, Pagination::default(), |items| items).await
    }
}

struct ProviderUnit<'a> {
    provider: &'static str,
    backend: &'a (dyn SearchBackend + Send + Sync),
    subtypes: &'a [String],
    limit: u32,
    page_token: Option<&'a str>,
}

impl ProviderUnit<'_> {
    /// Runs the subtype searches of one provider one after another.
    async fn run(
        &self,
        request: &SearchRequest,
        mut pagination: Pagination,
        sanitize: impl Fn(Vec<Value>) -> Vec<Value>,
    ) -> ProviderResults {
        let provider = self.provider;
        let credential = match self.backend.credential().await {
            Ok(credential) => credential,
            Err(error) => {
                warn!(provider, %error, "Skipping search: no credential");
                return ProviderResults::default();
            }
        };

        let subtypes = unique(self.subtypes);
        pagination.subtypes = subtypes
            .iter()
            .map(|subtype| (subtype.to_string(), PaginationCounters::default()))
            .collect();

        let mut results = ProviderResults::default();

        for subtype in subtypes {
            let page_request = PageRequest {
                query: &request.query,
                subtype,
                limit: self.limit,
                offset: request.offset,
                page_token: self.page_token,
            };

            let page = match self.backend.search(&credential, &page_request).await {
                Ok(Some(page)) => page,
                Ok(None) => {
                    debug!(provider, subtype, "No usable search data for subtype");
                    continue;
                }
                Err(error) => {
                    warn!(provider, subtype, %error, "Search for subtype failed");
                    continue;
                }
            };

            if let Some(counters) = pagination.counters_mut(subtype) {
                *counters = PaginationCounters::from(&page);
            }

            results.items.push((subtype.to_string(), sanitize(page.items)));
        }

        results.pagination = Some(pagination);
        results
    }
}

fn unique(subtypes: &[String]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(subtypes.len());

    for subtype in subtypes.iter().map(|subtype| subtype.trim()) {
        if !subtype.is_empty() && !seen.contains(&subtype) {
            seen.push(subtype);
        }
    }

    seen
}

fn strip_fields(value: &mut Value, denylist: &[String]) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !denylist.iter().any(|field| field == key));
            map.values_mut()
                .for_each(|value| strip_fields(value, denylist));
        }
        Value::Array(values) => values
            .iter_mut()
            .for_each(|value| strip_fields(value, denylist)),
        _ => (),
    }
}
