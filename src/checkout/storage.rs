use std::collections::HashMap;
use tracing::debug;

/// Local-storage keys holding the in-progress order.
pub const ORDER_LOCAL_KEYS: [&str; 3] = [
    "currentOrder",
    "photography_cart_items",
    "photography_items_in_process",
];
/// Session-storage key holding the shipping address.
pub const SHIPPING_SESSION_KEY: &str = "shippingAddress";

/// Browser key/value storage: persistent (local) and per-tab (session).
pub trait BrowserStorage {
    fn local_get(&self, key: &str) -> Option<String>;
    fn local_set(&mut self, key: &str, value: String);
    fn local_remove(&mut self, key: &str);

    fn session_get(&self, key: &str) -> Option<String>;
    fn session_set(&mut self, key: &str, value: String);
    fn session_remove(&mut self, key: &str);
}

/// Forget the finished order. Missing keys are fine.
pub fn clear_completed_order(storage: &mut impl BrowserStorage) {
    for key in ORDER_LOCAL_KEYS {
        storage.local_remove(key);
    }
    storage.session_remove(SHIPPING_SESSION_KEY);
    debug!("cleared checkout storage");
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    local: HashMap<String, String>,
    session: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BrowserStorage for MemoryStorage {
    fn local_get(&self, key: &str) -> Option<String> {
        self.local.get(key).cloned()
    }

    fn local_set(&mut self, key: &str, value: String) {
        self.local.insert(key.to_string(), value);
    }

    fn local_remove(&mut self, key: &str) {
        self.local.remove(key);
    }

    fn session_get(&self, key: &str) -> Option<String> {
        self.session.get(key).cloned()
    }

    fn session_set(&mut self, key: &str, value: String) {
        self.session.insert(key.to_string(), value);
    }

    fn session_remove(&mut self, key: &str) {
        self.session.remove(key);
    }
}
