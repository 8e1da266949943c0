use reqwest::Url;
use tracing::{debug, warn};

use super::search::{SearchFilters, SearchStore};

/// Only origin used to resolve relative hrefs; never shown to anyone.
const RESOLVE_BASE: &str = "http://storefront.local/";

/// Current browser location: path plus raw query string (no leading `?`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Parse an href like `/search?q=vay&category=bridal`.
    /// Anything unparseable becomes a location with an empty query.
    pub fn from_href(href: &str) -> Self {
        let resolved = Url::parse(RESOLVE_BASE).and_then(|base| base.join(href));
        match resolved {
            Ok(url) => Self {
                path: url.path().to_string(),
                query: url.query().unwrap_or_default().to_string(),
            },
            Err(e) => {
                warn!(href, error = %e, "unparseable location, ignoring query");
                let path = href.split('?').next().unwrap_or_default();
                Self::new(path, "")
            }
        }
    }

    /// `path?query`, the form compared between renders.
    pub fn serialized(&self) -> String {
        format!("{}?{}", self.path, self.query)
    }

    /// First decoded value for `name`, if present.
    pub fn param(&self, name: &str) -> Option<String> {
        let mut url = Url::parse(RESOLVE_BASE).ok()?;
        url.set_query(Some(&self.query));
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Non-empty value for `name`; empty and absent are the same thing.
    fn non_empty_param(&self, name: &str) -> Option<String> {
        self.param(name).filter(|v| !v.is_empty())
    }

    /// Filters carried by this location's query string.
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            category: self.non_empty_param("category"),
            subcategory: self.non_empty_param("subcategory"),
            sort: self.non_empty_param("sort"),
            end_time: (self.param("endTime").as_deref() == Some("desc")).then_some(true),
        }
    }

    /// Search text carried by `q`, empty when absent.
    pub fn search_query(&self) -> String {
        self.param("q").unwrap_or_default()
    }
}

/// One-way URL → store reconciler.
///
/// Applies the URL only when the location differs from the last one observed, so typing
/// into the search box (store changes, URL does not) is never overwritten.
#[derive(Debug, Default)]
pub struct SearchSync {
    last_seen: Option<String>,
}

impl SearchSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call on every render. Returns true if the store was written.
    pub fn observe(&mut self, location: &Location, store: &mut SearchStore) -> bool {
        let serialized = location.serialized();
        if self.last_seen.as_deref() == Some(serialized.as_str()) {
            return false;
        }

        store.set_search_query(location.search_query());
        store.set_filters(location.filters());
        debug!(location = %serialized, "search state synced from url");

        self.last_seen = Some(serialized);
        true
    }
}
