//! Transient `blob:` URIs for materialized image data.
//!
//! A URI stays resolvable only while its [`ObjectUrl`] guard is alive.
//! Releasing the guard (explicitly or by dropping it) revokes the URI, so a
//! superseded preview or background cannot pile up in the registry.

use crate::Blob;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

const SCHEME_PREFIX: &str = "blob:aura/";

type Registry = Arc<Mutex<HashMap<String, Blob>>>;

#[derive(Clone, Default)]
pub struct ObjectUrls {
    entries: Registry,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `blob` under a fresh URI. The caller owns the returned guard.
    pub fn create(&self, blob: Blob) -> ObjectUrl {
        let url = format!("{}{}", SCHEME_PREFIX, uuid::Uuid::new_v4());
        self.entries.lock().unwrap().insert(url.clone(), blob);
        tracing::trace!(%url, "object url created");
        ObjectUrl {
            url,
            entries: Arc::clone(&self.entries),
            released: false,
        }
    }

    pub fn resolve(&self, url: &str) -> Option<Blob> {
        self.entries.lock().unwrap().get(url).cloned()
    }

    /// Revoke by URI. Returns false when it was not live.
    pub fn revoke(&self, url: &str) -> bool {
        self.entries.lock().unwrap().remove(url).is_some()
    }

    /// Number of URIs not yet released.
    pub fn live(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

/// Guard for one registered URI.
pub struct ObjectUrl {
    url: String,
    entries: Registry,
    released: bool,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn release(mut self) {
        self.revoke();
    }

    fn revoke(&mut self) {
        if !self.released {
            self.entries.lock().unwrap().remove(&self.url);
            self.released = true;
            tracing::trace!(url = %self.url, "object url released");
        }
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrl").field("url", &self.url).finish()
    }
}
