//! Catalog track records as delivered by the streaming service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A playable track from the service catalog.
///
/// Field names mirror the JSON payloads the catalog API returns, so a record
/// can be deserialized straight off the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist_name: String,
    pub album_name: String,
    pub cover_url: String,
    /// Duration in seconds as reported by the catalog. Treated as a hint;
    /// the decoded stream metadata wins once a track is loaded.
    #[serde(default)]
    pub duration: Option<f64>,
    pub stream_url: String,
}

impl Track {
    /// Catalog duration as a [`Duration`], dropping values a duration
    /// cannot represent (negative, NaN, infinite, too large).
    pub fn duration_hint(&self) -> Option<Duration> {
        self.duration
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// One-line label for logs and now-playing displays.
    pub fn display_label(&self) -> String {
        let artist = self.artist_name.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }
}
