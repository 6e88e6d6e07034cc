//! Maps a track `src` to something the decoder can read.

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, Source};

use super::blob::{BlobStore, is_blob_uri};
use super::error::MediaError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// A resolved, re-openable audio source.
#[derive(Clone, Debug)]
pub enum MediaSource {
    File(PathBuf),
    Memory(Arc<[u8]>),
}

impl MediaSource {
    /// Open a fresh decoder positioned at the start.
    pub fn open(&self) -> Result<Box<dyn Source + Send>, MediaError> {
        match self {
            MediaSource::File(path) => {
                let file = File::open(path).map_err(|source| MediaError::Open {
                    path: path.clone(),
                    source,
                })?;
                let decoder = Decoder::new(BufReader::new(file))
                    .map_err(|e| MediaError::Decode(e.to_string()))?;
                Ok(Box::new(decoder))
            }
            MediaSource::Memory(bytes) => {
                let decoder = Decoder::new(Cursor::new(bytes.clone()))
                    .map_err(|e| MediaError::Decode(e.to_string()))?;
                Ok(Box::new(decoder))
            }
        }
    }
}

fn is_http(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

#[derive(Clone)]
pub struct MediaResolver {
    asset_root: PathBuf,
    blobs: BlobStore,
}

impl MediaResolver {
    pub fn new(asset_root: impl Into<PathBuf>, blobs: BlobStore) -> Self {
        Self {
            asset_root: asset_root.into(),
            blobs,
        }
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Filesystem location of a site-relative `src`. A leading `/` is relative
    /// to the asset root, never to the filesystem root.
    pub fn asset_path(&self, src: &str) -> PathBuf {
        self.asset_root.join(Path::new(src.trim_start_matches('/')))
    }

    pub fn resolve(&self, src: &str) -> Result<MediaSource, MediaError> {
        if is_blob_uri(src) {
            return self
                .blobs
                .get(src)
                .map(MediaSource::Memory)
                .ok_or_else(|| MediaError::UnknownBlob(src.to_string()));
        }
        if is_http(src) {
            return download(src).map(MediaSource::Memory);
        }
        Ok(MediaSource::File(self.asset_path(src)))
    }

    /// Whether `src` can be opened and decoded. Never fails.
    pub fn probe(&self, src: &str) -> bool {
        if is_http(src) {
            return match ureq::head(src).timeout(HTTP_TIMEOUT).call() {
                Ok(_) => true,
                Err(e) => {
                    log::debug!("probe {src}: {e}");
                    false
                }
            };
        }
        match self.resolve(src).and_then(|s| s.open().map(|_| ())) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("probe {src}: {e}");
                false
            }
        }
    }
}

fn download(url: &str) -> Result<Arc<[u8]>, MediaError> {
    let resp = ureq::get(url)
        .timeout(HTTP_TIMEOUT)
        .call()
        .map_err(|e| MediaError::Fetch(format!("{url}: {e}")))?;
    let mut bytes = Vec::new();
    resp.into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| MediaError::Fetch(format!("{url}: {e}")))?;
    Ok(Arc::from(bytes))
}
