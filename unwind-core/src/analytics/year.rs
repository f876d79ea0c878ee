//! Year in review.
//!
//! [`compute_year_statistics`] extracts the year's events once, runs every
//! analyzer on them and merges the fragments into a single [`YearStatistics`].
//! Analyzers never see each other's output, so their order does not matter.

use super::events::{created_in_year, extract_events};
use super::peak::{monthly_timeline, summarize_peak_day, PeakDay};
use super::rankings::{
    self, distribution, rank_efficiency, rank_media, rank_people, rank_tags, top_item,
    EfficiencyRankings, MediaDistribution, MediaRanking, RankedEntry, TopItem,
};
use super::sessions::{pair_sessions, Session, SessionStats, DEFAULT_SESSION_WINDOW_MINUTES};
use super::streaks::{analyze_streaks, StreakStats};
use crate::error::Result;
use crate::types::{KindTotals, MediaItem, MediaKind};
use chrono::{Duration, TimeZone};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Limits and windows for one computation.
#[derive(Debug, Clone)]
pub struct YearOptions {
    /// Longest gap between a play event and its paired count event
    pub session_window: Duration,
    pub top_people: usize,
    pub top_tags: usize,
    pub top_play_tags: usize,
    pub top_media: usize,
    /// Sessions kept in the shortest and longest lists
    pub top_sessions: usize,
    /// Size of the short "top 3" views and efficiency lists
    pub breakdown_size: usize,
}

impl Default for YearOptions {
    fn default() -> Self {
        Self {
            session_window: Duration::minutes(DEFAULT_SESSION_WINDOW_MINUTES),
            top_people: 5,
            top_tags: 8,
            top_play_tags: 8,
            top_media: 5,
            top_sessions: 5,
            breakdown_size: 3,
        }
    }
}

/// Headline numbers for the year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneralTotals {
    pub count_events: u64,
    pub play_events: u64,
    /// Clips added to the library during the year
    pub new_clips: u64,
    /// Stills added to the library during the year
    pub new_stills: u64,
    /// Thumbnail of the most recently added clip
    pub newest_clip_thumbnail: Option<String>,
    /// Thumbnail of the most recently added still
    pub newest_still_thumbnail: Option<String>,
}

/// Complete statistics for one year.
#[derive(Debug, Clone, Serialize)]
pub struct YearStatistics {
    pub year: i32,
    pub totals: GeneralTotals,
    pub streaks: StreakStats,
    /// Every session, ascending by duration
    pub sessions: SessionStats,
    pub shortest_sessions: Vec<Session>,
    pub longest_sessions: Vec<Session>,
    pub top_people: Vec<RankedEntry<String>>,
    /// Person id -> thumbnail, filled by [`YearStatistics::with_person_images`]
    pub person_images: BTreeMap<String, String>,
    pub top_tags: Vec<RankedEntry<String>>,
    pub top_play_tags: Vec<RankedEntry<String>>,
    pub top_media: Vec<MediaRanking>,
    pub top_item: Option<TopItem>,
    pub efficiency: EfficiencyRankings,
    pub distribution: MediaDistribution,
    pub peak_day: PeakDay,
    /// Count events per month
    pub timeline: [u32; 12],
    /// Timestamps dropped because they could not be parsed
    pub skipped_timestamps: usize,
    #[serde(skip)]
    breakdown_size: usize,
}

impl YearStatistics {
    /// Whether the year had any count or play event.
    pub fn has_activity(&self) -> bool {
        self.totals.count_events > 0 || self.totals.play_events > 0
    }

    /// Short view of the tag ranking for secondary breakdowns.
    pub fn top_tags_breakdown(&self) -> &[RankedEntry<String>] {
        rankings::top(&self.top_tags, self.breakdown_size)
    }

    /// Tag ranking ordered by name, for chart axes.
    pub fn top_tags_by_name(&self) -> Vec<RankedEntry<String>> {
        rankings::sorted_by_name(&self.top_tags)
    }

    /// Thumbnail for a ranked person, if one was resolved.
    pub fn person_image(&self, person_id: &str) -> Option<&str> {
        self.person_images.get(person_id).map(String::as_str)
    }

    /// Resolve thumbnails for the ranked people with one batch lookup.
    ///
    /// Lookup failures are returned unchanged; nothing is filled in partially.
    pub fn with_person_images<S: PersonImageSource + ?Sized>(mut self, source: &S) -> Result<Self> {
        if self.top_people.is_empty() {
            return Ok(self);
        }

        let ids: Vec<&str> = self.top_people.iter().map(|p| p.key.as_str()).collect();
        let images = source.person_images(&ids)?;

        tracing::debug!(
            requested = ids.len(),
            resolved = images.len(),
            "Resolved person images"
        );

        let resolved: BTreeMap<String, String> = self
            .top_people
            .iter()
            .filter_map(|p| images.get(&p.key).map(|img| (p.key.clone(), img.clone())))
            .collect();
        self.person_images = resolved;
        Ok(self)
    }
}

/// Batch lookup of person thumbnails.
///
/// Implementations receive every id at once so a remote source can answer
/// with a single request.
pub trait PersonImageSource {
    /// Thumbnails for the given person ids; unknown ids are simply absent.
    fn person_images(&self, ids: &[&str]) -> Result<HashMap<String, String>>;
}

impl PersonImageSource for HashMap<String, String> {
    fn person_images(&self, ids: &[&str]) -> Result<HashMap<String, String>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.get(*id).map(|img| (id.to_string(), img.clone())))
            .collect())
    }
}

/// Compute every statistic for `year`.
///
/// `items` is the activity-filtered item list and `totals` the unfiltered
/// per-kind counts. Calendar boundaries (year, day, month, hour) are taken in
/// `tz`. Calling this twice with the same input yields the same output.
pub fn compute_year_statistics<Tz: TimeZone>(
    year: i32,
    items: &[MediaItem],
    totals: &KindTotals,
    tz: &Tz,
    options: &YearOptions,
) -> YearStatistics {
    let events = extract_events(items, year, tz);
    let counts = &events.count_events;
    let plays = &events.play_events;

    let created = created_in_year(items, year, tz);
    let newest_thumbnail = |kind: MediaKind| {
        created
            .iter()
            .find(|(item, _)| item.kind == kind)
            .and_then(|(item, _)| item.thumbnail.clone())
    };
    let general = GeneralTotals {
        count_events: counts.len() as u64,
        play_events: plays.len() as u64,
        new_clips: created.iter().filter(|(i, _)| i.kind == MediaKind::Clip).count() as u64,
        new_stills: created.iter().filter(|(i, _)| i.kind == MediaKind::Still).count() as u64,
        newest_clip_thumbnail: newest_thumbnail(MediaKind::Clip),
        newest_still_thumbnail: newest_thumbnail(MediaKind::Still),
    };

    let sessions = pair_sessions(counts, plays, options.session_window);
    let shortest_sessions = sessions.shortest(options.top_sessions);
    let longest_sessions = sessions.longest(options.top_sessions);

    let stats = YearStatistics {
        year,
        totals: general,
        streaks: analyze_streaks(counts, year),
        shortest_sessions,
        longest_sessions,
        sessions,
        top_people: rank_people(counts, options.top_people),
        person_images: BTreeMap::new(),
        top_tags: rank_tags(counts, options.top_tags),
        top_play_tags: rank_tags(plays, options.top_play_tags),
        top_media: rank_media(counts, plays, options.top_media),
        top_item: top_item(counts),
        efficiency: rank_efficiency(counts, plays, options.breakdown_size),
        distribution: distribution(counts, totals),
        peak_day: summarize_peak_day(counts),
        timeline: monthly_timeline(counts),
        skipped_timestamps: events.skipped_timestamps,
        breakdown_size: options.breakdown_size,
    };

    tracing::info!(
        year,
        count_events = stats.totals.count_events,
        play_events = stats.totals.play_events,
        sessions = stats.sessions.len(),
        streak = stats.streaks.longest_streak.length,
        skipped = stats.skipped_timestamps,
        "Computed year statistics"
    );

    stats
}
