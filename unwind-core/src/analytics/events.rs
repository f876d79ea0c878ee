//! Event extraction.
//!
//! Flattens each item's count-history and play-history into two event lists
//! restricted to one calendar year. The year test and every later calendar
//! operation use wall-clock time in the caller's time zone.

use crate::snapshot::parse_timestamp;
use crate::types::MediaItem;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use std::collections::BTreeSet;

/// One timestamped occurrence on a media item.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Item the event belongs to
    pub item: &'a MediaItem,
    /// Absolute instant, used for durations
    pub at: DateTime<Utc>,
    /// Wall-clock time in the analysis zone, used for calendar buckets
    pub local: NaiveDateTime,
}

impl<'a> Event<'a> {
    /// Build an event from an instant, localizing it into `tz`.
    pub fn new<Tz: TimeZone>(item: &'a MediaItem, at: DateTime<Utc>, tz: &Tz) -> Self {
        Self {
            item,
            at,
            local: at.with_timezone(tz).naive_local(),
        }
    }

    /// Calendar day in the analysis zone.
    pub fn date(&self) -> NaiveDate {
        self.local.date()
    }

    /// Hour of day (0-23) in the analysis zone.
    pub fn hour(&self) -> u32 {
        self.local.hour()
    }

    /// Month index (0 = January).
    pub fn month0(&self) -> usize {
        self.local.month0() as usize
    }
}

/// Count and play events for a single year.
#[derive(Debug, Clone, Default)]
pub struct YearEvents<'a> {
    pub year: i32,
    /// Count-history events, in item order then history order
    pub count_events: Vec<Event<'a>>,
    /// Play-history events of clips, same ordering
    pub play_events: Vec<Event<'a>>,
    /// Timestamps dropped because they could not be parsed
    pub skipped_timestamps: usize,
}

/// Extract the count and play events of `year` from `items`.
///
/// Unparseable timestamps are logged and skipped. Play histories on stills
/// are ignored.
pub fn extract_events<'a, Tz: TimeZone>(
    items: &'a [MediaItem],
    year: i32,
    tz: &Tz,
) -> YearEvents<'a> {
    let mut events = YearEvents {
        year,
        ..Default::default()
    };

    for item in items {
        for raw in &item.count_history {
            match localize(item, raw, tz) {
                Some(event) if event.local.year() == year => events.count_events.push(event),
                Some(_) => {}
                None => events.skipped_timestamps += 1,
            }
        }

        if !item.is_playable() {
            if !item.play_history.is_empty() {
                tracing::debug!(item_id = %item.id, "Ignoring play history on still");
            }
            continue;
        }

        for raw in &item.play_history {
            match localize(item, raw, tz) {
                Some(event) if event.local.year() == year => events.play_events.push(event),
                Some(_) => {}
                None => events.skipped_timestamps += 1,
            }
        }
    }

    tracing::debug!(
        year,
        count_events = events.count_events.len(),
        play_events = events.play_events.len(),
        skipped = events.skipped_timestamps,
        "Extracted events"
    );

    events
}

fn localize<'a, Tz: TimeZone>(item: &'a MediaItem, raw: &str, tz: &Tz) -> Option<Event<'a>> {
    match parse_timestamp(raw, tz) {
        Some(at) => Some(Event::new(item, at, tz)),
        None => {
            tracing::warn!(item_id = %item.id, timestamp = raw, "Skipping unparseable timestamp");
            None
        }
    }
}

/// Years that have at least one count or play event, newest first.
///
/// Years after `current_year` (clock skew, bad data) are left out.
pub fn available_years<Tz: TimeZone>(items: &[MediaItem], tz: &Tz, current_year: i32) -> Vec<i32> {
    let years: BTreeSet<i32> = items
        .iter()
        .flat_map(|item| item.count_history.iter().chain(item.play_history.iter()))
        .filter_map(|raw| parse_timestamp(raw, tz))
        .map(|at| at.with_timezone(tz).year())
        .filter(|year| *year <= current_year)
        .collect();

    years.into_iter().rev().collect()
}

/// Items of `items` created during `year`, newest first.
pub fn created_in_year<'a, Tz: TimeZone>(
    items: &'a [MediaItem],
    year: i32,
    tz: &Tz,
) -> Vec<(&'a MediaItem, DateTime<Utc>)> {
    let mut created: Vec<(&MediaItem, DateTime<Utc>)> = items
        .iter()
        .filter_map(|item| {
            let at = parse_timestamp(item.created_at.as_deref()?, tz)?;
            (at.with_timezone(tz).year() == year).then_some((item, at))
        })
        .collect();

    created.sort_by(|a, b| b.1.cmp(&a.1));
    created
}
