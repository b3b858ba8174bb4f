//! Persistent Key-Value Storage
//!
//! Typed JSON values over the browser's `localStorage`. Every failure is
//! logged and turned into a sentinel (`false` / `None`); nothing is thrown
//! back at the caller.

use std::cell::RefCell;
use std::collections::HashMap;

use log::error;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SiteError;

/// Raw string store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SiteError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), SiteError>;
    fn remove_item(&self, key: &str) -> Result<(), SiteError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, SiteError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SiteError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), SiteError> {
        (**self).remove_item(key)
    }
}

/// Browser `localStorage`
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open(window: &web_sys::Window) -> Result<Self, SiteError> {
        let storage = window
            .local_storage()
            .map_err(SiteError::js)?
            .ok_or_else(|| SiteError::Storage("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SiteError> {
        self.storage.get_item(key).map_err(SiteError::js)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SiteError> {
        self.storage.set_item(key, value).map_err(SiteError::js)
    }

    fn remove_item(&self, key: &str) -> Result<(), SiteError> {
        self.storage.remove_item(key).map_err(SiteError::js)
    }
}

/// In-memory store, used when `localStorage` is blocked
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
    /// Total bytes of values allowed, like a browser storage quota
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SiteError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SiteError> {
        let mut items = self.items.borrow_mut();
        if let Some(quota) = self.quota {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if used + value.len() > quota {
                return Err(SiteError::Storage("quota exceeded".into()));
            }
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), SiteError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Typed JSON facade over a [`KeyValueStore`]
pub struct Storage<S: KeyValueStore> {
    store: S,
}

pub type SiteStorage = Storage<Box<dyn KeyValueStore>>;

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Serialize and store; `false` on any failure
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(SiteError::from)
            .and_then(|json| self.store.set_item(key, &json));
        match result {
            Ok(()) => true,
            Err(e) => {
                error!("[storage] set {}: {}", key, e);
                false
            }
        }
    }

    /// Load and deserialize; `None` when absent, empty or unreadable
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get_item(key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                error!("[storage] get {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("[storage] parse {}: {}", key, e);
                None
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.store.remove_item(key) {
            Ok(()) => true,
            Err(e) => {
                error!("[storage] remove {}: {}", key, e);
                false
            }
        }
    }

    /// Append to a stored list, keeping only the newest `cap` entries
    pub fn push_capped<T>(&self, key: &str, item: T, cap: usize) -> bool
    where
        T: Serialize + DeserializeOwned,
    {
        let mut list: Vec<T> = self.get(key).unwrap_or_default();
        list.push(item);
        if list.len() > cap {
            let excess = list.len() - cap;
            list.drain(..excess);
        }
        self.set(key, &list)
    }

    /// Append to a stored list unless already present; `true` if it was added
    pub fn push_unique<T>(&self, key: &str, item: T) -> bool
    where
        T: Serialize + DeserializeOwned + PartialEq,
    {
        let mut list: Vec<T> = self.get(key).unwrap_or_default();
        if list.contains(&item) {
            return false;
        }
        list.push(item);
        self.set(key, &list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        a: u32,
    }

    fn storage() -> Storage<MemoryStore> {
        Storage::new(MemoryStore::new())
    }

    #[test]
    fn test_round_trip_and_remove() {
        let storage = storage();
        assert!(storage.set("k", &Sample { a: 1 }));
        assert_eq!(storage.get::<Sample>("k"), Some(Sample { a: 1 }));

        assert!(storage.remove("k"));
        assert_eq!(storage.get::<Sample>("k"), None);
    }

    #[test]
    fn test_missing_key_is_none() {
        assert_eq!(storage().get::<String>("absent"), None);
    }

    #[test]
    fn test_unparseable_value_is_none() {
        let store = MemoryStore::new();
        store.set_item("broken", "{oops").unwrap();
        store.set_item("empty", "").unwrap();
        let storage = Storage::new(store);

        assert_eq!(storage.get::<Sample>("broken"), None);
        assert_eq!(storage.get::<Sample>("empty"), None);
    }

    #[test]
    fn test_quota_failure_returns_false() {
        let storage = Storage::new(MemoryStore::with_quota(8));
        assert!(storage.set("small", &1));
        assert!(!storage.set("big", &"a value that does not fit"));
        assert_eq!(storage.get::<String>("big"), None);
    }

    #[test]
    fn test_push_capped_keeps_newest() {
        let storage = storage();
        for i in 0..13u32 {
            assert!(storage.push_capped("404Errors", i, 10));
        }
        let list: Vec<u32> = storage.get("404Errors").unwrap();
        assert_eq!(list.len(), 10);
        assert_eq!(list.first(), Some(&3));
        assert_eq!(list.last(), Some(&12));
    }

    #[test]
    fn test_push_unique() {
        let storage = storage();
        assert!(storage.push_unique("solutionInterests", "Voice AI".to_string()));
        assert!(!storage.push_unique("solutionInterests", "Voice AI".to_string()));
        assert!(storage.push_unique("solutionInterests", "Workflow".to_string()));
        let list: Vec<String> = storage.get("solutionInterests").unwrap();
        assert_eq!(list, vec!["Voice AI", "Workflow"]);
    }

    #[test]
    fn test_boxed_store() {
        let storage: SiteStorage = Storage::new(Box::new(MemoryStore::new()));
        assert!(storage.set("flag", &true));
        assert_eq!(storage.get::<bool>("flag"), Some(true));
    }
}
