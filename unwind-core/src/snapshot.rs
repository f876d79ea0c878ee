//! Snapshot files produced by the media library's data source.
//!
//! A snapshot is one JSON document holding the activity-filtered item list,
//! the unfiltered per-kind totals and an optional person thumbnail table:
//!
//! ```json
//! {
//!   "items": [{ "id": "1", "kind": "clip", "count_history": ["2024-03-01T10:00:00Z"] }],
//!   "totals": { "clips": 120, "stills": 40 },
//!   "person_images": { "p1": "https://library.local/performer/p1/image" }
//! }
//! ```
//!
//! Loading is fail-fast: unreadable files, invalid JSON and structural problems
//! (duplicate or empty item ids) are errors. Bad individual timestamps are not;
//! those are dropped later during event extraction.

use crate::analytics::PersonImageSource;
use crate::error::{Error, Result};
use crate::types::{KindTotals, MediaItem};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Naive layouts accepted when a timestamp carries no offset.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// In-memory copy of everything the engine needs for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Items with at least one recorded event
    #[serde(default)]
    pub items: Vec<MediaItem>,
    /// Unfiltered item counts per kind
    #[serde(default)]
    pub totals: Option<KindTotals>,
    /// Person id -> thumbnail reference
    #[serde(default)]
    pub person_images: HashMap<String, String>,
}

impl Snapshot {
    /// Load and validate a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&content)?;

        tracing::info!(
            path = %path.display(),
            items = snapshot.items.len(),
            "Loaded snapshot"
        );

        Ok(snapshot)
    }

    /// Parse and validate a snapshot from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject snapshots whose items cannot be told apart.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.id.trim().is_empty() {
                return Err(Error::Snapshot("item with empty id".to_string()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(Error::Snapshot(format!("duplicate item id: {}", item.id)));
            }
        }
        Ok(())
    }

    /// Totals supplied by the data source, or a count of `items` when absent.
    pub fn totals(&self) -> KindTotals {
        self.totals
            .unwrap_or_else(|| KindTotals::from_items(&self.items))
    }
}

impl PersonImageSource for Snapshot {
    fn person_images(&self, ids: &[&str]) -> Result<HashMap<String, String>> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.person_images
                    .get(*id)
                    .map(|path| (id.to_string(), path.clone()))
            })
            .collect())
    }
}

/// Parse a history timestamp into an absolute instant.
///
/// RFC 3339 values (with `Z` or a numeric offset) are taken as-is. Values
/// without an offset are wall-clock times in `tz`; an ambiguous local time
/// resolves to its earliest instant and a nonexistent one yields `None`.
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS.iter().find_map(|format| {
        let naive = NaiveDateTime::parse_from_str(raw, format).ok()?;
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}
