//! PIN persistence capability
//!
//! The controller only needs a key-value get/set/remove surface; the storage
//! medium is the host's business. Ordering is the sole contract: a completed
//! `set` must be visible to a subsequent `get`.

use zeroize::Zeroizing;

use crate::error::StoreError;

/// Persistent storage for the PIN.
///
/// The PIN is stored in plain form; hashing and storage-layer rate limiting
/// are explicitly out of scope for this widget.
pub trait PinStore {
    /// Read the stored PIN, if any.
    fn get(&self) -> Result<Option<Zeroizing<String>>, StoreError>;

    /// Persist a new PIN, replacing any previous one.
    fn set(&mut self, pin: &str) -> Result<(), StoreError>;

    /// Erase the stored PIN. Removing an absent PIN is not an error.
    fn remove(&mut self) -> Result<(), StoreError>;
}

/// In-memory store for tests and for hosts that own persistence themselves.
#[derive(Default)]
pub struct MemoryStore {
    pin: Option<Zeroizing<String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a PIN
    pub fn with_pin(pin: &str) -> Self {
        Self {
            pin: Some(Zeroizing::new(pin.to_string())),
        }
    }
}

impl PinStore for MemoryStore {
    fn get(&self) -> Result<Option<Zeroizing<String>>, StoreError> {
        Ok(self.pin.clone())
    }

    fn set(&mut self, pin: &str) -> Result<(), StoreError> {
        self.pin = Some(Zeroizing::new(pin.to_string()));
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        self.pin = None;
        Ok(())
    }
}

/// Check whether a full-length PIN has been set.
pub fn has_pin<S: PinStore>(store: &S, pin_length: usize) -> Result<bool, StoreError> {
    Ok(store
        .get()?
        .map(|pin| pin.len() == pin_length)
        .unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get().unwrap().is_none());

        store.set("1234").unwrap();
        assert_eq!(store.get().unwrap().unwrap().as_str(), "1234");

        store.remove().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = MemoryStore::new();
        store.remove().unwrap();
        store.remove().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_has_pin_checks_length() {
        let store = MemoryStore::with_pin("1234");
        assert!(has_pin(&store, 4).unwrap());
        assert!(!has_pin(&store, 6).unwrap());
        assert!(!has_pin(&MemoryStore::new(), 4).unwrap());
    }
}
