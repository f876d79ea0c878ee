//! Play-to-count session pairing.
//!
//! A session starts at a play event and ends at the **latest** count event on
//! the same item within the pairing window after it, not the first one.

use super::events::Event;
use super::ItemSummary;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Default window between a play event and its paired count event.
pub const DEFAULT_SESSION_WINDOW_MINUTES: i64 = 60;

/// A play event paired with a later count event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub item: ItemSummary,
    /// When playback started
    pub started_at: DateTime<Utc>,
    /// Seconds from play to the paired count event, fractional (always > 0)
    pub duration_secs: f64,
}

/// All sessions of a year, sorted by ascending duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub sessions: Vec<Session>,
}

impl SessionStats {
    /// The `n` shortest sessions, shortest first.
    pub fn shortest(&self, n: usize) -> Vec<Session> {
        self.sessions.iter().take(n).cloned().collect()
    }

    /// The `n` longest sessions, longest first.
    pub fn longest(&self, n: usize) -> Vec<Session> {
        self.sessions.iter().rev().take(n).cloned().collect()
    }

    /// Mean duration in seconds, if any session was found.
    pub fn mean_duration_secs(&self) -> Option<f64> {
        if self.sessions.is_empty() {
            return None;
        }
        let total: f64 = self.sessions.iter().map(|s| s.duration_secs).sum();
        Some(total / self.sessions.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Pair every play event with the latest count event on the same item that
/// falls within `window` after it.
///
/// Count instants are indexed per item and sorted, so each play is answered
/// with one binary search. Pairs with a non-positive duration are dropped.
pub fn pair_sessions(
    count_events: &[Event<'_>],
    play_events: &[Event<'_>],
    window: Duration,
) -> SessionStats {
    let mut counts_by_item: HashMap<&str, Vec<DateTime<Utc>>> = HashMap::new();
    for event in count_events {
        counts_by_item
            .entry(event.item.id.as_str())
            .or_default()
            .push(event.at);
    }
    for instants in counts_by_item.values_mut() {
        instants.sort_unstable();
    }

    let mut sessions = Vec::new();
    for play in play_events {
        let Some(counts) = counts_by_item.get(play.item.id.as_str()) else {
            continue;
        };

        let limit = play.at + window;
        let upper = counts.partition_point(|at| *at <= limit);
        let Some(latest) = upper.checked_sub(1).map(|i| counts[i]) else {
            continue;
        };
        if latest <= play.at {
            continue;
        }

        let Ok(elapsed) = (latest - play.at).to_std() else {
            continue;
        };
        let duration_secs = elapsed.as_secs_f64();

        sessions.push(Session {
            item: ItemSummary::from(play.item),
            started_at: play.at,
            duration_secs,
        });
    }

    // Stable: equal durations keep play-event order
    sessions.sort_by(|a, b| a.duration_secs.total_cmp(&b.duration_secs));

    tracing::debug!(
        sessions = sessions.len(),
        plays = play_events.len(),
        "Paired play sessions"
    );

    SessionStats { sessions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::parse_timestamp;
    use crate::types::{MediaItem, MediaKind};

    fn event<'a>(item: &'a MediaItem, raw: &str) -> Event<'a> {
        Event::new(item, parse_timestamp(raw, &Utc).unwrap(), &Utc)
    }

    fn hour() -> Duration {
        Duration::minutes(DEFAULT_SESSION_WINDOW_MINUTES)
    }

    #[test]
    fn test_pairs_with_latest_count_in_window() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let plays = vec![event(&item, "2024-01-01T20:00:00Z")];
        let counts = vec![
            event(&item, "2024-01-01T20:04:00Z"),
            event(&item, "2024-01-01T20:30:00Z"),
        ];

        let stats = pair_sessions(&counts, &plays, hour());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.sessions[0].duration_secs, 1800.0);
        assert_eq!(stats.sessions[0].item.id, "a");
    }

    #[test]
    fn test_ignores_counts_outside_window() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let plays = vec![event(&item, "2024-01-01T20:00:00Z")];
        let counts = vec![
            event(&item, "2024-01-01T19:59:00Z"),
            event(&item, "2024-01-01T21:00:01Z"),
        ];
        assert!(pair_sessions(&counts, &plays, hour()).is_empty());

        // Exactly at the window edge is still inside
        let counts = vec![event(&item, "2024-01-01T21:00:00Z")];
        let stats = pair_sessions(&counts, &plays, hour());
        assert_eq!(stats.sessions[0].duration_secs, 3600.0);
    }

    #[test]
    fn test_drops_zero_duration() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let plays = vec![event(&item, "2024-01-01T20:00:00Z")];
        let counts = vec![event(&item, "2024-01-01T20:00:00Z")];
        assert!(pair_sessions(&counts, &plays, hour()).is_empty());
    }

    #[test]
    fn test_never_pairs_across_items() {
        let a = MediaItem::new("a", MediaKind::Clip);
        let b = MediaItem::new("b", MediaKind::Clip);
        let plays = vec![event(&a, "2024-01-01T20:00:00Z")];
        let counts = vec![event(&b, "2024-01-01T20:10:00Z")];
        assert!(pair_sessions(&counts, &plays, hour()).is_empty());
    }

    #[test]
    fn test_shortest_and_longest() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let mut plays = Vec::new();
        let mut counts = Vec::new();
        for (day, minutes) in [(1, 10), (2, 3), (3, 45), (4, 20), (5, 1)] {
            plays.push(event(&item, &format!("2024-02-0{}T08:00:00Z", day)));
            counts.push(event(&item, &format!("2024-02-0{}T08:{:02}:00Z", day, minutes)));
        }

        let stats = pair_sessions(&counts, &plays, hour());
        let durations: Vec<f64> = stats.sessions.iter().map(|s| s.duration_secs).collect();
        assert_eq!(durations, vec![60.0, 180.0, 600.0, 1200.0, 2700.0]);

        let shortest: Vec<f64> = stats.shortest(2).iter().map(|s| s.duration_secs).collect();
        assert_eq!(shortest, vec![60.0, 180.0]);
        let longest: Vec<f64> = stats.longest(2).iter().map(|s| s.duration_secs).collect();
        assert_eq!(longest, vec![2700.0, 1200.0]);
        assert_eq!(stats.longest(10).len(), 5);
        assert_eq!(stats.mean_duration_secs(), Some(948.0));
    }

    #[test]
    fn test_durations_bounded_by_window() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let plays = vec![
            event(&item, "2024-03-01T10:00:00Z"),
            event(&item, "2024-03-01T10:20:00Z"),
        ];
        let counts = vec![
            event(&item, "2024-03-01T10:25:00Z"),
            event(&item, "2024-03-01T10:50:00Z"),
            event(&item, "2024-03-01T11:15:00Z"),
        ];

        let window = Duration::minutes(30);
        let stats = pair_sessions(&counts, &plays, window);
        assert_eq!(stats.len(), 2);
        assert!(stats
            .sessions
            .iter()
            .all(|s| s.duration_secs > 0.0 && s.duration_secs <= window.num_seconds() as f64));
    }

    #[test]
    fn test_keeps_sub_second_sessions() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let plays = vec![
            event(&item, "2024-01-01T20:00:00.000Z"),
            event(&item, "2024-01-02T20:00:00.000Z"),
        ];
        let counts = vec![
            event(&item, "2024-01-01T20:00:00.600Z"),
            event(&item, "2024-01-02T20:29:59.600Z"),
        ];

        let stats = pair_sessions(&counts, &plays, hour());
        assert_eq!(stats.len(), 2);
        assert!((stats.sessions[0].duration_secs - 0.6).abs() < 1e-9);
        assert!((stats.sessions[1].duration_secs - 1799.6).abs() < 1e-9);
    }
}
