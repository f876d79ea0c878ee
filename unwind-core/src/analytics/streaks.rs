//! Streaks and dry spells.
//!
//! Walks every calendar day of the year once, tracking the current run of
//! active days and the current run of empty days side by side.

use super::events::Event;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

/// A run of consecutive calendar days.
///
/// `length == 0` means no run was recorded; both dates are then `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Run {
    pub length: u32,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Run {
    /// A run of `length` days finishing on `end` (inclusive).
    fn ending_on(length: u32, end: NaiveDate) -> Self {
        Self {
            length,
            start: Some(end - Duration::days(i64::from(length) - 1)),
            end: Some(end),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Streak statistics for one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    /// Longest run of days with at least one count event
    pub longest_streak: Run,
    /// Longest run of days without any count event
    pub longest_gap: Run,
    /// Distinct days with activity
    pub active_days: u32,
    /// Days in the year (365 or 366)
    pub total_days: u32,
}

impl StreakStats {
    /// Calculate activity percentage.
    pub fn activity_percentage(&self) -> f64 {
        if self.total_days == 0 {
            0.0
        } else {
            (self.active_days as f64 / self.total_days as f64) * 100.0
        }
    }
}

/// Compute the longest streak and the longest dry spell of `year`.
///
/// Runs touching Jan 1 or Dec 31 count in full. A year without any count
/// event reports no streak and no gap.
pub fn analyze_streaks(count_events: &[Event<'_>], year: i32) -> StreakStats {
    let (Some(first_day), Some(next_year)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        year.checked_add(1).and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1)),
    ) else {
        return StreakStats::default();
    };
    let last_day = next_year - Duration::days(1);
    let total_days = (next_year - first_day).num_days() as u32;

    let active: HashSet<NaiveDate> = count_events
        .iter()
        .map(|e| e.date())
        .filter(|d| d.year() == year)
        .collect();

    if active.is_empty() {
        return StreakStats {
            total_days,
            ..Default::default()
        };
    }

    let mut best_streak = Run::default();
    let mut best_gap = Run::default();
    let mut current_streak = 0u32;
    let mut current_gap = 0u32;

    for day in first_day.iter_days().take_while(|d| *d <= last_day) {
        if active.contains(&day) {
            current_streak += 1;
            if current_gap > 0 {
                if current_gap > best_gap.length {
                    if let Some(end) = day.pred_opt() {
                        best_gap = Run::ending_on(current_gap, end);
                    }
                }
                current_gap = 0;
            }
        } else {
            current_gap += 1;
            if current_streak > 0 {
                if current_streak > best_streak.length {
                    if let Some(end) = day.pred_opt() {
                        best_streak = Run::ending_on(current_streak, end);
                    }
                }
                current_streak = 0;
            }
        }
    }

    // Runs still open on Dec 31 never hit a closing day inside the loop
    if current_streak > best_streak.length {
        best_streak = Run::ending_on(current_streak, last_day);
    }
    if current_gap > best_gap.length {
        best_gap = Run::ending_on(current_gap, last_day);
    }

    tracing::debug!(
        year,
        streak = best_streak.length,
        gap = best_gap.length,
        active_days = active.len(),
        "Analyzed streaks"
    );

    StreakStats {
        longest_streak: best_streak,
        longest_gap: best_gap,
        active_days: active.len() as u32,
        total_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MediaItem, MediaKind};
    use chrono::{TimeZone, Utc};

    fn events_on<'a>(item: &'a MediaItem, days: &[NaiveDate]) -> Vec<Event<'a>> {
        days.iter()
            .map(|d| {
                let at = Utc
                    .from_utc_datetime(&d.and_hms_opt(10, 0, 0).unwrap());
                Event::new(item, at, &Utc)
            })
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_three_day_streak() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let events = events_on(&item, &[date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 3)]);

        let stats = analyze_streaks(&events, 2024);
        assert_eq!(stats.longest_streak.length, 3);
        assert_eq!(stats.longest_streak.start, Some(date(2024, 3, 1)));
        assert_eq!(stats.longest_streak.end, Some(date(2024, 3, 3)));

        // Jan 1..Feb 29 is 60 days, Mar 4..Dec 31 is 303 days
        assert_eq!(stats.longest_gap.length, 303);
        assert_eq!(stats.longest_gap.start, Some(date(2024, 3, 4)));
        assert_eq!(stats.longest_gap.end, Some(date(2024, 12, 31)));
        assert_eq!(stats.active_days, 3);
        assert_eq!(stats.total_days, 366);
    }

    #[test]
    fn test_every_day_active() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let days: Vec<NaiveDate> = date(2023, 1, 1)
            .iter_days()
            .take_while(|d| d.year() == 2023)
            .collect();
        let events = events_on(&item, &days);

        let stats = analyze_streaks(&events, 2023);
        assert_eq!(stats.longest_streak.length, 365);
        assert_eq!(stats.longest_streak.start, Some(date(2023, 1, 1)));
        assert_eq!(stats.longest_streak.end, Some(date(2023, 12, 31)));
        assert_eq!(stats.longest_gap, Run::default());
        assert_eq!(stats.activity_percentage(), 100.0);
    }

    #[test]
    fn test_every_day_active_in_leap_year() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let days: Vec<NaiveDate> = date(2024, 1, 1)
            .iter_days()
            .take_while(|d| d.year() == 2024)
            .collect();
        let events = events_on(&item, &days);

        let stats = analyze_streaks(&events, 2024);
        assert_eq!(stats.total_days, 366);
        assert_eq!(stats.active_days, 366);
        assert_eq!(stats.longest_streak.length, 366);
        assert_eq!(stats.longest_streak.end, Some(date(2024, 12, 31)));
        assert_eq!(stats.longest_gap.length, 0);
        assert_eq!(stats.longest_gap, Run::default());
    }

    #[test]
    fn test_years_outside_calendar_range() {
        assert_eq!(analyze_streaks(&[], i32::MAX), StreakStats::default());
        assert_eq!(analyze_streaks(&[], i32::MIN), StreakStats::default());
    }

    #[test]
    fn test_no_events() {
        let stats = analyze_streaks(&[], 2024);
        assert!(stats.longest_streak.is_empty());
        assert!(stats.longest_gap.is_empty());
        assert_eq!(stats.longest_gap.start, None);
        assert_eq!(stats.total_days, 366);
        assert_eq!(stats.activity_percentage(), 0.0);
    }

    #[test]
    fn test_leading_gap_wins() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let events = events_on(&item, &[date(2024, 11, 1), date(2024, 12, 31)]);

        let stats = analyze_streaks(&events, 2024);
        assert_eq!(stats.longest_gap.start, Some(date(2024, 1, 1)));
        assert_eq!(stats.longest_gap.end, Some(date(2024, 10, 31)));
        assert_eq!(stats.longest_gap.length, 305);
        // Equal-length streaks keep the first one
        assert_eq!(stats.longest_streak.length, 1);
        assert_eq!(stats.longest_streak.start, Some(date(2024, 11, 1)));
    }

    #[test]
    fn test_streak_running_into_year_end() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let events = events_on(
            &item,
            &[
                date(2023, 6, 1),
                date(2023, 12, 29),
                date(2023, 12, 30),
                date(2023, 12, 31),
            ],
        );

        let stats = analyze_streaks(&events, 2023);
        assert_eq!(stats.longest_streak.length, 3);
        assert_eq!(stats.longest_streak.start, Some(date(2023, 12, 29)));
        assert_eq!(stats.longest_streak.end, Some(date(2023, 12, 31)));
    }

    #[test]
    fn test_multiple_events_same_day_count_once() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let events = events_on(&item, &[date(2024, 5, 5), date(2024, 5, 5), date(2024, 5, 6)]);
        let stats = analyze_streaks(&events, 2024);
        assert_eq!(stats.active_days, 2);
        assert_eq!(stats.longest_streak.length, 2);
    }
}
