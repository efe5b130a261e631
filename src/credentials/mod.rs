//! Client-held credentials.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bearer token lives in two places: a short-lived cookie visible to the
//! navigation guard, and a persistent key-value store read by the client.
//! `CredentialStore` is the only type that writes either of them.

pub mod cookie;
pub mod storage;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use time::Duration;

pub use cookie::{AUTH_COOKIE, CookieSlot};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CredentialError, CredentialStore, Credentials};

pub const COOKIE_FILE: &str = "cookies.json";
pub const STORAGE_FILE: &str = "storage.json";

const SECONDS_PER_DAY: i64 = 86_400;

/// Open the file-backed credential store rooted at `data_dir`. The cookie
/// lifetime saturates instead of overflowing.
#[must_use]
pub fn open_file_store(data_dir: &Path, cookie_days: i64) -> CredentialStore {
    CredentialStore::new(
        Arc::new(FileStore::new(data_dir.join(COOKIE_FILE))),
        Arc::new(FileStore::new(data_dir.join(STORAGE_FILE))),
        Duration::seconds(cookie_days.saturating_mul(SECONDS_PER_DAY)),
    )
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::storage::{KeyValueStore, MemoryStore, StorageError};

    /// Backend that refuses writes to one key while armed. Starts armed.
    pub struct FailingStore {
        inner: MemoryStore,
        fail_key: &'static str,
        armed: AtomicBool,
    }

    impl FailingStore {
        pub fn new(fail_key: &'static str) -> Self {
            Self { inner: MemoryStore::new(), fail_key, armed: AtomicBool::new(true) }
        }

        pub fn set_armed(&self, armed: bool) {
            self.armed.store(armed, Ordering::SeqCst);
        }
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.fail_key && self.armed.load(Ordering::SeqCst) {
                return Err(StorageError::Io { path: "mock".into(), source: std::io::Error::other("disk full") });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }
}
