use crate::cart::CartSelection;
use crate::storage::KeyValueStore;
use tracing::{debug, warn};

/// Key the serialized selection list lives under.
pub const CART_STORAGE_KEY: &str = "trading_cart";

/// Best-effort persistence of the raw selection list.
///
/// Neither `load` nor `save` ever fails: a store fault degrades to an empty
/// cart on read and to an in-memory-only cart on write.
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    store: S,
}

impl<S: KeyValueStore> CartStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Vec<CartSelection> {
        let raw = match self.store.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("Failed to read stored cart, starting empty: {:#}", err);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<CartSelection>>(&raw) {
            Ok(selections) => {
                let total = selections.len();
                let selections: Vec<CartSelection> =
                    selections.into_iter().filter(|s| s.is_valid()).collect();
                if selections.len() != total {
                    warn!(
                        "Dropped {} invalid selections from stored cart",
                        total - selections.len()
                    );
                }
                debug!("Loaded {} cart selections", selections.len());
                selections
            }
            Err(err) => {
                warn!("Stored cart is corrupt, discarding it: {}", err);
                if let Err(err) = self.store.remove(CART_STORAGE_KEY) {
                    warn!("Failed to delete corrupt cart record: {:#}", err);
                }
                Vec::new()
            }
        }
    }

    pub fn save(&self, selections: &[CartSelection]) {
        let encoded = match serde_json::to_string(selections) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!("Failed to encode cart: {}", err);
                return;
            }
        };

        if let Err(err) = self.store.set(CART_STORAGE_KEY, &encoded) {
            warn!("Failed to save cart: {:#}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartSelection;
    use crate::dto::GameType;
    use crate::storage::{FileStore, MemoryStore};
    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn selection(id: &str) -> CartSelection {
        CartSelection {
            id: id.to_string(),
            round_id: "r1".to_string(),
            game_type: GameType::Number,
            options: vec!["7".to_string(), "8".to_string()],
            amount: dec!(20),
            timestamp: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = CartStore::new(MemoryStore::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = CartStore::new(FileStore::new(dir.path()));
        let items = vec![selection("a"), selection("b")];

        store.save(&items);

        let reopened = CartStore::new(FileStore::new(dir.path()));
        assert_eq!(reopened.load(), items);
    }

    #[test]
    fn test_stored_format() {
        let memory = MemoryStore::new();
        CartStore::new(memory.clone()).save(&[selection("a")]);

        let raw = memory.get(CART_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "id": "a",
                "roundId": "r1",
                "gameType": "number",
                "options": ["7", "8"],
                "amount": 20,
                "timestamp": 1_700_000_000_123i64
            }])
        );
    }

    #[test]
    fn test_corrupt_record_is_deleted() {
        let memory = MemoryStore::new();
        memory.set(CART_STORAGE_KEY, "{not json").unwrap();

        let store = CartStore::new(memory.clone());
        assert!(store.load().is_empty());
        assert_eq!(memory.get(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_invalid_entries_are_dropped() {
        let memory = MemoryStore::new();
        let mut bad = selection("bad");
        bad.options.clear();
        CartStore::new(memory.clone()).save(&[selection("good"), bad]);

        let loaded = CartStore::new(memory).load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "good");
    }

    #[test]
    fn test_store_faults_are_swallowed() {
        let store = CartStore::new(BrokenStore);
        assert!(store.load().is_empty());
        store.save(&[selection("a")]);
    }
}
