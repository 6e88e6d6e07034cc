//! In-memory store for uploaded audio, addressed by `blob:` URIs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const BLOB_SCHEME: &str = "blob:";
const BLOB_PREFIX: &str = "blob:jukon/";

/// Shared between the UI thread (register, probe) and the audio thread (load).
#[derive(Clone, Default)]
pub struct BlobStore {
    blobs: Arc<Mutex<HashMap<String, Arc<[u8]>>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<[u8]>>> {
        match self.blobs.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Store `bytes` under `id` and return the URI that addresses them.
    pub fn register(&self, id: &str, bytes: Vec<u8>) -> String {
        let uri = format!("{BLOB_PREFIX}{id}");
        self.lock().insert(uri.clone(), Arc::from(bytes));
        uri
    }

    pub fn get(&self, uri: &str) -> Option<Arc<[u8]>> {
        self.lock().get(uri).cloned()
    }

    /// Returns whether anything was stored under `uri`.
    pub fn release(&self, uri: &str) -> bool {
        self.lock().remove(uri).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

pub fn is_blob_uri(src: &str) -> bool {
    src.starts_with(BLOB_SCHEME)
}
