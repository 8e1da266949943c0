use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::{Product, ProductSearch};
use crate::events::Event;
use crate::state::SearchStore;

/// Collapses bursts of keystrokes into one `SearchDue` per idle period.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Cancel any pending timer and start a new one for `query`.
    pub fn schedule(&mut self, query: String, tx: mpsc::Sender<Event>) {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Event::SearchDue { query }).await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Dismissible error banner with the query to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBanner {
    pub message: String,
    pub query: String,
}

/// Live type-ahead search panel.
#[derive(Debug)]
pub struct SearchOverlay {
    input: String,
    results: Vec<Product>,
    banner: Option<SearchBanner>,
    loading: bool,
    debouncer: Debouncer,
}

impl SearchOverlay {
    pub fn new(debounce: Duration) -> Self {
        Self {
            input: String::new(),
            results: Vec::new(),
            banner: None,
            loading: false,
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn results(&self) -> &[Product] {
        &self.results
    }

    pub fn banner(&self) -> Option<&SearchBanner> {
        self.banner.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Keystroke handler.
    pub fn on_input(&mut self, text: impl Into<String>, tx: mpsc::Sender<Event>) {
        self.input = text.into();
        if self.input.trim().is_empty() {
            self.debouncer.cancel();
            self.results.clear();
            self.loading = false;
            return;
        }
        self.debouncer.schedule(self.input.clone(), tx);
    }

    /// Run a search that came due. Stale queries (user kept typing) are skipped.
    pub async fn run<S: ProductSearch>(&mut self, api: &S, query: &str) {
        if query != self.input {
            debug!(query, current = %self.input, "skipping stale search");
            return;
        }

        self.loading = true;
        let result = api.search(query).await;
        self.loading = false;

        match result {
            Ok(products) => {
                debug!(query, hits = products.len(), "search finished");
                self.results = products;
                self.banner = None;
            }
            Err(e) => {
                warn!(query, error = %e, "search failed");
                self.results.clear();
                self.banner = Some(SearchBanner {
                    message: e.to_string(),
                    query: query.to_string(),
                });
            }
        }
    }

    /// Retry the query from the error banner, if any.
    pub async fn retry<S: ProductSearch>(&mut self, api: &S) {
        let Some(banner) = self.banner.clone() else {
            return;
        };
        self.input = banner.query.clone();
        self.run(api, &banner.query).await;
    }

    pub fn dismiss(&mut self) {
        self.banner = None;
    }

    /// Enter pressed: hand the typed query to the store and return where to navigate.
    pub fn submit(&mut self, store: &mut SearchStore) -> String {
        self.debouncer.cancel();
        store.set_search_query(self.input.trim());
        store.state().href("/search")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SearchError;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Flaky {
        fail: bool,
        calls: AtomicUsize,
    }

    impl ProductSearch for Flaky {
        async fn search(&self, query: &str) -> Result<Vec<Product>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchError::Status(503));
            }
            Ok(vec![Product {
                id: "d1".to_string(),
                name: query.to_string(),
                daily_rental_price: dec!(500000),
                purchase_price: dec!(5000000),
                images: vec![],
                avg_rating: None,
            }])
        }
    }

    fn flaky(fail: bool) -> Flaky {
        Flaky {
            fail,
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_collapses_burst() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut overlay = SearchOverlay::new(Duration::from_millis(500));

        for text in ["v", "va", "vay"] {
            overlay.on_input(text, tx.clone());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(
            rx.try_recv().unwrap(),
            Event::SearchDue {
                query: "vay".to_string()
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_waits_full_period() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule("ren".to_string(), tx);
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let (tx, mut rx) = mpsc::channel(8);
        {
            let mut overlay = SearchOverlay::new(Duration::from_millis(500));
            overlay.on_input("ren", tx);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        // Sender was moved into the aborted task, so the channel is closed and empty
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_clears_without_search() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut overlay = SearchOverlay::new(Duration::from_millis(500));
        let api = flaky(false);

        overlay.on_input("ren", tx.clone());
        overlay.run(&api, "ren").await;
        assert_eq!(overlay.results().len(), 1);

        overlay.on_input("   ", tx.clone());
        assert!(overlay.results().is_empty());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stale_query_skipped() {
        let (tx, _rx) = mpsc::channel(8);
        let mut overlay = SearchOverlay::new(Duration::from_millis(500));
        let api = flaky(false);

        overlay.on_input("ren phap", tx);
        overlay.run(&api, "ren").await;

        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert!(overlay.results().is_empty());
    }

    #[tokio::test]
    async fn test_error_clears_results_and_raises_banner() {
        let (tx, _rx) = mpsc::channel(8);
        let mut overlay = SearchOverlay::new(Duration::from_millis(500));

        overlay.on_input("ren", tx);
        overlay.run(&flaky(false), "ren").await;
        assert_eq!(overlay.results().len(), 1);

        overlay.run(&flaky(true), "ren").await;
        assert!(overlay.results().is_empty());
        let banner = overlay.banner().unwrap();
        assert_eq!(banner.query, "ren");
        assert!(banner.message.contains("503"));
        assert!(!overlay.is_loading());
    }

    #[tokio::test]
    async fn test_retry_and_dismiss() {
        let (tx, _rx) = mpsc::channel(8);
        let mut overlay = SearchOverlay::new(Duration::from_millis(500));

        overlay.on_input("ren", tx);
        overlay.run(&flaky(true), "ren").await;
        assert!(overlay.banner().is_some());

        let api = flaky(false);
        overlay.retry(&api).await;
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert!(overlay.banner().is_none());
        assert_eq!(overlay.results().len(), 1);

        overlay.run(&flaky(true), "ren").await;
        overlay.dismiss();
        assert!(overlay.banner().is_none());
        assert!(overlay.results().is_empty());
    }

    #[tokio::test]
    async fn test_retry_without_banner_is_noop() {
        let mut overlay = SearchOverlay::new(Duration::from_millis(500));
        let api = flaky(false);
        overlay.retry(&api).await;
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_writes_store() {
        let (tx, _rx) = mpsc::channel(8);
        let mut overlay = SearchOverlay::new(Duration::from_millis(500));
        let mut store = SearchStore::new();

        overlay.on_input(" ao dai ", tx);
        let href = overlay.submit(&mut store);

        assert_eq!(store.search_query(), "ao dai");
        assert_eq!(href, "/search?q=ao+dai");
    }
}
