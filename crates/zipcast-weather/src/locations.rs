//! Registry of user-tracked postal-code locations.
//!
//! The authoritative list lives in a `tokio::sync::watch` channel, which
//! gives observers replay-latest semantics: every mutation publishes the
//! full current list, and a new subscriber sees the latest list
//! immediately via `borrow()`. The whole list is re-persisted after every
//! mutation; malformed persisted data falls back to an empty registry.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

use crate::storage::KeyValueStorage;
use crate::types::SavedLocation;

/// Storage key for the persisted location list.
const STORAGE_KEY: &str = "saved_locations";

/// Ordered, deduplicated list of saved locations with change
/// notifications.
pub struct LocationRegistry {
    storage: Arc<dyn KeyValueStorage>,
    tx: watch::Sender<Vec<SavedLocation>>,
}

impl LocationRegistry {
    /// Create a registry over `storage`, loading any persisted list.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let initial = Self::load(storage.as_ref());
        let (tx, _rx) = watch::channel(initial);
        Self { storage, tx }
    }

    /// Snapshot of all locations, insertion order preserved.
    pub fn all(&self) -> Vec<SavedLocation> {
        self.tx.borrow().clone()
    }

    /// Add a location. Returns false without mutating or notifying if
    /// the postal code (trimmed) is already present.
    pub fn add(&self, zip_code: &str, name: Option<&str>) -> bool {
        let zip_code = zip_code.trim();
        if self.exists(zip_code) {
            return false;
        }

        self.tx.send_modify(|locations| {
            locations.push(SavedLocation {
                zip_code: zip_code.to_string(),
                name: name.map(str::to_string),
                added_at: Utc::now(),
            });
        });
        self.persist();
        true
    }

    /// Remove a location by postal code. Returns whether anything was
    /// removed; persists and notifies only on removal.
    pub fn remove(&self, zip_code: &str) -> bool {
        let mut removed = false;
        self.tx.send_if_modified(|locations| {
            let before = locations.len();
            locations.retain(|loc| loc.zip_code != zip_code);
            removed = locations.len() < before;
            removed
        });
        if removed {
            self.persist();
        }
        removed
    }

    /// Trimmed-equality membership check.
    pub fn exists(&self, zip_code: &str) -> bool {
        let zip_code = zip_code.trim();
        self.tx.borrow().iter().any(|loc| loc.zip_code == zip_code)
    }

    /// Look up a single location by postal code.
    pub fn get(&self, zip_code: &str) -> Option<SavedLocation> {
        self.tx
            .borrow()
            .iter()
            .find(|loc| loc.zip_code == zip_code)
            .cloned()
    }

    /// Empty the registry. Always persists and notifies, even when the
    /// registry was already empty.
    pub fn clear_all(&self) {
        self.tx.send_modify(Vec::clear);
        self.persist();
    }

    /// Subscribe to changes. The receiver's `borrow()` always holds the
    /// current full list, so late subscribers see existing state without
    /// waiting for the next mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<SavedLocation>> {
        self.tx.subscribe()
    }

    fn persist(&self) {
        let locations = self.tx.borrow().clone();
        let serialized = match serde_json::to_string(&locations) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("Failed to serialize locations: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(STORAGE_KEY, &serialized) {
            tracing::error!("Failed to persist locations: {:#}", e);
        }
    }

    fn load(storage: &dyn KeyValueStorage) -> Vec<SavedLocation> {
        match storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(locations) => locations,
                Err(e) => {
                    tracing::warn!("Discarding corrupted location list: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to load locations: {:#}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::storage::MemoryStorage;

    fn memory_registry() -> (Arc<MemoryStorage>, LocationRegistry) {
        let storage = Arc::new(MemoryStorage::new());
        let registry = LocationRegistry::new(storage.clone());
        (storage, registry)
    }

    #[test]
    fn test_add_and_get() {
        let (_, registry) = memory_registry();

        assert!(registry.add("90210", Some("Beverly Hills")));
        let loc = registry.get("90210").unwrap();
        assert_eq!(loc.zip_code, "90210");
        assert_eq!(loc.name.as_deref(), Some("Beverly Hills"));
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let (_, registry) = memory_registry();

        assert!(registry.add("90210", Some("Beverly Hills")));
        assert!(!registry.add("90210", Some("Anything")));

        let all = registry.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name.as_deref(), Some("Beverly Hills"));
    }

    #[test]
    fn test_duplicate_check_trims_whitespace() {
        let (_, registry) = memory_registry();

        assert!(registry.add("10001", None));
        assert!(!registry.add(" 10001 ", Some("New York")));
        assert!(registry.exists("  10001"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (_, registry) = memory_registry();

        registry.add("10001", Some("New York"));
        registry.add("60601", Some("Chicago"));
        registry.add("90210", Some("Beverly Hills"));

        let zips: Vec<_> = registry.all().into_iter().map(|l| l.zip_code).collect();
        assert_eq!(zips, ["10001", "60601", "90210"]);
    }

    #[test]
    fn test_remove_reports_whether_anything_was_removed() {
        let (_, registry) = memory_registry();

        registry.add("10001", None);
        assert!(registry.remove("10001"));
        assert!(!registry.remove("10001"));
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_remove_does_not_notify_when_absent() {
        let (_, registry) = memory_registry();
        registry.add("10001", None);

        let mut rx = registry.subscribe();
        rx.mark_unchanged();

        registry.remove("99999");
        assert!(!rx.has_changed().unwrap());

        registry.remove("10001");
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_clear_all_always_notifies() {
        let (_, registry) = memory_registry();

        let mut rx = registry.subscribe();
        rx.mark_unchanged();

        // Already empty, but clear still emits
        registry.clear_all();
        assert!(rx.has_changed().unwrap());
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_late_subscriber_sees_current_list() {
        let (_, registry) = memory_registry();

        registry.add("10001", Some("New York"));
        registry.add("90210", Some("Beverly Hills"));

        // Subscribed after all mutations, yet sees the full list
        let rx = registry.subscribe();
        let list = rx.borrow().clone();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].zip_code, "10001");
    }

    #[test]
    fn test_persists_and_reloads() {
        let (storage, registry) = memory_registry();
        registry.add("10001", Some("New York"));

        let reopened = LocationRegistry::new(storage);
        let all = reopened.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].zip_code, "10001");
        assert_eq!(all[0].name.as_deref(), Some("New York"));
        // added_at survives the textual round trip
        assert_eq!(all[0].added_at, registry.all()[0].added_at);
    }

    #[test]
    fn test_malformed_persisted_data_falls_back_to_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(STORAGE_KEY, "not json at all").unwrap();

        let registry = LocationRegistry::new(storage);
        assert!(registry.all().is_empty());
    }
}
