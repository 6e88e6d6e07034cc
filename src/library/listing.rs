//! Remote directory listing: schema, fetch and mapping to tracks.
//!
//! The endpoint returns a JSON array of file descriptors (GitHub contents API
//! shape). Only `name` is required; anything malformed is rejected per entry.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::model::{Track, TrackList, TrackOrigin};

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("listing request failed: {0}")]
    Transport(String),

    #[error("listing endpoint answered with HTTP {0}")]
    Status(u16),

    #[error("could not read listing body: {0}")]
    Body(#[from] std::io::Error),

    #[error("listing is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("listing is not a JSON array")]
    NotAList,

    #[error("no listing URL configured")]
    NoUrl,
}

/// One validated listing entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ListingEntry {
    fn validate(self) -> Result<Self, String> {
        if self.name.trim().is_empty() {
            return Err("empty name".to_string());
        }
        if self.kind.as_deref() == Some("dir") {
            return Err(format!("{:?} is a directory", self.name));
        }
        Ok(self)
    }

    /// Final path segment of `name`.
    pub fn base_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

#[allow(async_fn_in_trait)]
pub trait ListingSource {
    async fn fetch(&self) -> Result<Vec<ListingEntry>, ListingError>;
}

/// Parse a listing body, keeping every entry that passes validation.
pub fn parse_listing(body: &str) -> Result<Vec<ListingEntry>, ListingError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let serde_json::Value::Array(items) = value else {
        return Err(ListingError::NotAList);
    };

    let mut entries = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<ListingEntry>(item)
            .map_err(|e| e.to_string())
            .and_then(ListingEntry::validate)
        {
            Ok(entry) => entries.push(entry),
            Err(reason) => log::warn!("rejecting listing entry #{i}: {reason}"),
        }
    }
    Ok(entries)
}

fn has_extension(name: &str, extensions: &[String]) -> bool {
    let lower = name.to_ascii_lowercase();
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .any(|e| lower.ends_with(&format!(".{e}")))
}

/// Map listing entries to tracks under `music_dir`, keeping recognized audio files only.
pub fn tracks_from_listing(entries: &[ListingEntry], music_dir: &str, extensions: &[String]) -> TrackList {
    let dir = music_dir.trim_end_matches('/');
    TrackList::from_tracks(
        entries
            .iter()
            .filter(|e| has_extension(&e.name, extensions))
            .map(|e| {
                let base = e.base_name();
                let name = base.rsplit_once('.').map_or(base, |(stem, _)| stem);
                Track::new(
                    format!("remote-{base}"),
                    name,
                    format!("{dir}/{base}"),
                    TrackOrigin::Remote,
                )
            }),
    )
}

/// Listing fetched over HTTP with `ureq`.
#[derive(Debug, Clone)]
pub struct HttpListing {
    url: Option<String>,
    timeout: Duration,
}

impl HttpListing {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(10),
        }
    }
}

impl ListingSource for HttpListing {
    async fn fetch(&self) -> Result<Vec<ListingEntry>, ListingError> {
        let url = self.url.as_deref().ok_or(ListingError::NoUrl)?;
        log::info!("fetching track listing from {url}");

        let response = ureq::get(url)
            .timeout(self.timeout)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => ListingError::Status(code),
                ureq::Error::Transport(t) => ListingError::Transport(t.to_string()),
            })?;

        let body = response.into_string()?;
        parse_listing(&body)
    }
}
