use reqwest::Url;

/// Filter set for the product listing. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub sort: Option<String>,
    /// Newest-ending first. Only ever `Some(true)` or `None` when derived from a URL.
    pub end_time: Option<bool>,
}

/// Partial filter update for [`SearchStore::update_filters`].
///
/// Outer `None` = key not given (existing value survives).
/// `Some(None)` = key given as unset (existing value cleared).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub category: Option<Option<String>>,
    pub subcategory: Option<Option<String>>,
    pub sort: Option<Option<String>>,
    pub end_time: Option<Option<bool>>,
}

impl FilterUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, value: impl Into<String>) -> Self {
        self.category = Some(Some(value.into()));
        self
    }

    pub fn subcategory(mut self, value: impl Into<String>) -> Self {
        self.subcategory = Some(Some(value.into()));
        self
    }

    pub fn sort(mut self, value: impl Into<String>) -> Self {
        self.sort = Some(Some(value.into()));
        self
    }

    pub fn end_time(mut self, value: bool) -> Self {
        self.end_time = Some(Some(value));
        self
    }

    pub fn clear_category(mut self) -> Self {
        self.category = Some(None);
        self
    }

    pub fn clear_subcategory(mut self) -> Self {
        self.subcategory = Some(None);
        self
    }

    pub fn clear_sort(mut self) -> Self {
        self.sort = Some(None);
        self
    }

    pub fn clear_end_time(mut self) -> Self {
        self.end_time = Some(None);
        self
    }

    fn apply(self, filters: &mut SearchFilters) {
        if let Some(v) = self.category {
            filters.category = v;
        }
        if let Some(v) = self.subcategory {
            filters.subcategory = v;
        }
        if let Some(v) = self.sort {
            filters.sort = v;
        }
        if let Some(v) = self.end_time {
            filters.end_time = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub search_query: String,
    pub filters: SearchFilters,
}

impl SearchState {
    /// Query string for outbound navigation (no leading `?`).
    /// Only non-empty values are emitted; `endTime=desc` only when the flag is set.
    pub fn to_query_string(&self) -> String {
        // Url handles the percent-encoding
        let mut url = match Url::parse("http://storefront.local/") {
            Ok(url) => url,
            Err(_) => return String::new(),
        };
        {
            let mut pairs = url.query_pairs_mut();
            if !self.search_query.is_empty() {
                pairs.append_pair("q", &self.search_query);
            }
            let optional = [
                ("category", &self.filters.category),
                ("subcategory", &self.filters.subcategory),
                ("sort", &self.filters.sort),
            ];
            for (key, value) in optional {
                if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                    pairs.append_pair(key, v);
                }
            }
            if self.filters.end_time == Some(true) {
                pairs.append_pair("endTime", "desc");
            }
        }
        url.query().unwrap_or_default().to_string()
    }

    /// Path plus query, e.g. `/search?q=ao+dai`.
    pub fn href(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        }
    }
}

/// Search state shared by the search bar, the overlay and the filter UI.
/// One instance per application session, passed by reference.
#[derive(Debug, Default)]
pub struct SearchStore {
    state: SearchState,
}

impl SearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn search_query(&self) -> &str {
        &self.state.search_query
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.state.filters
    }

    /// Replace the query verbatim.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
    }

    /// Replace the whole filter set (no merge).
    pub fn set_filters(&mut self, filters: SearchFilters) {
        self.state.filters = filters;
    }

    /// Merge the given keys over the current filters.
    pub fn update_filters(&mut self, update: FilterUpdate) {
        update.apply(&mut self.state.filters);
    }

    pub fn reset_filters(&mut self) {
        self.state.filters = SearchFilters::default();
    }
}
