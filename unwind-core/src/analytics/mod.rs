//! Analytics module for unwind
//!
//! Computes the year-in-review statistics from an in-memory snapshot:
//! - Event extraction (count and play events for one year)
//! - Streaks and dry spells
//! - Play-to-count session pairing
//! - Top-N rankings over people, tags and media items
//! - Peak day and its hourly histogram
//! - All-time overview over whole histories ([`lifetime`])
//!
//! Every component is a pure function over the extracted events. The
//! [`year`] module runs them and merges their results into one
//! [`YearStatistics`] value.
//!
//! ## Data flow
//!
//! ```text
//!   items ──► events::extract_events ──► count_events ─┬─► streaks
//!                                        play_events ──┼─► sessions
//!                                                      ├─► rankings
//!                                                      └─► peak
//! ```

pub mod events;
pub mod lifetime;
pub mod peak;
pub mod rankings;
pub mod sessions;
pub mod streaks;
pub mod year;

use crate::types::{MediaItem, MediaKind};
use serde::Serialize;

pub use events::{available_years, extract_events, Event, YearEvents};
pub use lifetime::{
    compute_lifetime_overview, LifetimeItem, LifetimeOverview, PlayCountPoint,
};
pub use peak::{monthly_timeline, summarize_peak_day, PeakDay, PeakEvent};
pub use rankings::{
    EfficiencyEntry, EfficiencyRankings, KindSplit, MediaDistribution, MediaRanking,
    RankedEntry, TopItem,
};
pub use sessions::{pair_sessions, Session, SessionStats};
pub use streaks::{analyze_streaks, Run, StreakStats};
pub use year::{
    compute_year_statistics, GeneralTotals, PersonImageSource, YearOptions, YearStatistics,
};

/// Owned identity of a media item, carried by result records.
///
/// Results outlive the borrowed snapshot, so they copy what a renderer
/// needs instead of holding references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub id: String,
    pub title: String,
    pub kind: MediaKind,
    pub thumbnail: Option<String>,
}

impl From<&MediaItem> for ItemSummary {
    fn from(item: &MediaItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.display_title().to_string(),
            kind: item.kind,
            thumbnail: item.thumbnail.clone(),
        }
    }
}
