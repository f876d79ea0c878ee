//! Core domain types for unwind
//!
//! These types mirror what the media library's API hands back: media items with
//! their two timestamp histories and the people and tags attached to them.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Clip** | A playable media item; it has both a count-history and a play-history |
//! | **Still** | A non-playable media item; it only has a count-history |
//! | **Count-history** | Timestamps at which the tracked activity counter was incremented |
//! | **Play-history** | Timestamps at which playback started |
//! | **Person** | Someone associated with an item, ranked by id |
//! | **Tag** | A descriptive label associated with an item, ranked by id |
//!
//! Timestamps are kept as the raw ISO-8601 strings the API returned. Parsing
//! happens during event extraction so that one malformed value only drops that
//! event instead of the whole snapshot.

use serde::{Deserialize, Serialize};

// ============================================
// Media Items
// ============================================

/// Kind of media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Playable video; carries a play-history
    Clip,
    /// Still image; never has play events
    Still,
}

impl MediaKind {
    /// Returns the identifier used in snapshots and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Clip => "clip",
            MediaKind::Still => "still",
        }
    }

    /// Returns the display name for this kind (plural)
    pub fn display_name(&self) -> &'static str {
        match self {
            MediaKind::Clip => "Clips",
            MediaKind::Still => "Stills",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clip" => Ok(MediaKind::Clip),
            "still" => Ok(MediaKind::Still),
            _ => Err(format!("unknown media kind: {}", s)),
        }
    }
}

/// A person associated with a media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
}

/// A descriptive tag associated with a media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// A media item as returned by the library.
///
/// Missing collections deserialize as empty; the engine treats an item
/// without history as contributing nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    /// Stable identifier
    pub id: String,
    /// Display title (may be absent or empty)
    #[serde(default)]
    pub title: Option<String>,
    /// When the item was added to the library (raw ISO-8601)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Clip or still
    pub kind: MediaKind,
    /// Raw count-history timestamps
    #[serde(default)]
    pub count_history: Vec<String>,
    /// Raw play-history timestamps (clips only)
    #[serde(default)]
    pub play_history: Vec<String>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Screenshot or thumbnail reference
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl MediaItem {
    /// Create an item with no history, people or tags.
    pub fn new(id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            title: None,
            created_at: None,
            kind,
            count_history: Vec::new(),
            play_history: Vec::new(),
            people: Vec::new(),
            tags: Vec::new(),
            thumbnail: None,
        }
    }

    /// Title to show for this item, falling back to its id.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.id,
        }
    }

    /// Whether the item can have play events.
    pub fn is_playable(&self) -> bool {
        self.kind == MediaKind::Clip
    }
}

/// Unfiltered item counts per kind.
///
/// The activity-filtered item list cannot tell how many items exist overall,
/// so the caller supplies these separately for the distribution split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTotals {
    #[serde(default)]
    pub clips: u64,
    #[serde(default)]
    pub stills: u64,
}

impl KindTotals {
    /// Count items by kind.
    pub fn from_items(items: &[MediaItem]) -> Self {
        items.iter().fold(Self::default(), |mut totals, item| {
            match item.kind {
                MediaKind::Clip => totals.clips += 1,
                MediaKind::Still => totals.stills += 1,
            }
            totals
        })
    }

    /// Total for a single kind.
    pub fn for_kind(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Clip => self.clips,
            MediaKind::Still => self.stills,
        }
    }
}
