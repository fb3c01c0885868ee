// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use mockup_app_core::config::{ConfigError, ConfigStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// [`ConfigStore`] backed by a shared map. Clones see the same data.
///
/// ```
/// use mockup_dry_tests::InMemoryConfigStore;
/// use mockup_app_core::config::ConfigService;
/// use mockup_app_core::prefs::{BridgePrefs, BRIDGE_PREFS_KEY};
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
/// let prefs: BridgePrefs = service.load_or_init(BRIDGE_PREFS_KEY).unwrap();
/// assert_eq!(prefs, BridgePrefs::default());
/// assert!(store.contains_key(BRIDGE_PREFS_KEY));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    data: HashMap<String, Vec<u8>>,
    loads: usize,
    saves: usize,
    fail_load: bool,
    fail_save: bool,
}

impl InMemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `key` → `bytes` before any call is made.
    pub fn seeded(key: &str, bytes: &[u8]) -> Self {
        let store = Self::new();
        store.lock().data.insert(key.to_owned(), bytes.to_vec());
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every load fail with [`ConfigError::Other`].
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_load = fail;
    }

    /// Make every save fail with [`ConfigError::Other`].
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_save = fail;
    }

    /// Attempted loads, failed ones included.
    pub fn load_count(&self) -> usize {
        self.lock().loads
    }

    /// Attempted saves, failed ones included.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// True when `key` holds a blob.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    /// Raw blob stored under `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().data.get(key).cloned()
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut inner = self.lock();
        inner.loads += 1;
        if inner.fail_load {
            return Err(ConfigError::Other("simulated load failure".into()));
        }
        inner.data.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.saves += 1;
        if inner.fail_save {
            return Err(ConfigError::Other("simulated save failure".into()));
        }
        inner.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}
