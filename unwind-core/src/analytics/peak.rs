//! Peak day and hourly histogram.

use super::events::Event;
use super::ItemSummary;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// A count event on the peak day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeakEvent {
    pub item: ItemSummary,
    pub at: DateTime<Utc>,
    /// Wall-clock time in the analysis zone
    pub local: NaiveDateTime,
}

/// The busiest day of the year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeakDay {
    /// None when the year has no count events
    pub date: Option<NaiveDate>,
    pub count: u32,
    /// That day's count events, in input order
    pub events: Vec<PeakEvent>,
    /// Count events per hour of the peak day (0-23)
    pub hourly: [u32; 24],
}

impl PeakDay {
    /// Chart labels for [`PeakDay::hourly`]: "0:00" through "23:00".
    pub fn hourly_labels() -> Vec<String> {
        (0..24).map(|h| format!("{}:00", h)).collect()
    }

    /// Hour with the most events on the peak day (earliest on ties).
    pub fn busiest_hour(&self) -> Option<u8> {
        let mut best: Option<(usize, u32)> = None;
        for (hour, count) in self.hourly.iter().enumerate() {
            if *count > 0 && best.map_or(true, |(_, c)| *count > c) {
                best = Some((hour, *count));
            }
        }
        best.map(|(hour, _)| hour as u8)
    }
}

/// Find the day with the most count events and break it down by hour.
///
/// Ties go to the earliest date.
pub fn summarize_peak_day(count_events: &[Event<'_>]) -> PeakDay {
    let mut by_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for event in count_events {
        *by_day.entry(event.date()).or_insert(0) += 1;
    }

    // Ascending iteration with a strict comparison keeps the earliest date
    let mut peak: Option<(NaiveDate, u32)> = None;
    for (date, count) in &by_day {
        if peak.map_or(true, |(_, best)| *count > best) {
            peak = Some((*date, *count));
        }
    }

    let Some((date, count)) = peak else {
        return PeakDay::default();
    };

    let mut hourly = [0u32; 24];
    let events: Vec<PeakEvent> = count_events
        .iter()
        .filter(|e| e.date() == date)
        .map(|e| {
            hourly[e.hour() as usize] += 1;
            PeakEvent {
                item: ItemSummary::from(e.item),
                at: e.at,
                local: e.local,
            }
        })
        .collect();

    tracing::debug!(%date, count, "Found peak day");

    PeakDay {
        date: Some(date),
        count,
        events,
        hourly,
    }
}

/// Count events per month (index 0 = January).
pub fn monthly_timeline(count_events: &[Event<'_>]) -> [u32; 12] {
    let mut months = [0u32; 12];
    for event in count_events {
        months[event.month0()] += 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::parse_timestamp;
    use crate::types::{MediaItem, MediaKind};
    use chrono::FixedOffset;

    fn event<'a>(item: &'a MediaItem, raw: &str) -> Event<'a> {
        Event::new(item, parse_timestamp(raw, &Utc).unwrap(), &Utc)
    }

    #[test]
    fn test_peak_day_and_hours() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let events = vec![
            event(&item, "2024-05-01T09:00:00Z"),
            event(&item, "2024-05-02T09:15:00Z"),
            event(&item, "2024-05-02T09:45:00Z"),
            event(&item, "2024-05-02T23:10:00Z"),
            event(&item, "2024-05-03T01:00:00Z"),
        ];

        let peak = summarize_peak_day(&events);
        assert_eq!(peak.date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(peak.count, 3);
        assert_eq!(peak.events.len(), 3);
        assert_eq!(peak.hourly[9], 2);
        assert_eq!(peak.hourly[23], 1);
        assert_eq!(peak.hourly.iter().sum::<u32>(), 3);
        assert_eq!(peak.busiest_hour(), Some(9));
    }

    #[test]
    fn test_peak_tie_goes_to_earliest_date() {
        let item = MediaItem::new("a", MediaKind::Clip);
        // Later date appears first in input
        let events = vec![
            event(&item, "2024-08-20T10:00:00Z"),
            event(&item, "2024-08-20T11:00:00Z"),
            event(&item, "2024-02-03T10:00:00Z"),
            event(&item, "2024-02-03T12:00:00Z"),
        ];

        let first = summarize_peak_day(&events);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 2, 3));
        assert_eq!(first, summarize_peak_day(&events));
    }

    #[test]
    fn test_peak_uses_local_hours() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let at = parse_timestamp("2024-05-02T03:30:00Z", &Utc).unwrap();
        let events = vec![Event::new(&item, at, &minus_five)];

        let peak = summarize_peak_day(&events);
        assert_eq!(peak.date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(peak.hourly[22], 1);
    }

    #[test]
    fn test_empty_peak() {
        let peak = summarize_peak_day(&[]);
        assert_eq!(peak.date, None);
        assert_eq!(peak.count, 0);
        assert!(peak.events.is_empty());
        assert_eq!(peak.hourly, [0; 24]);
        assert_eq!(peak.busiest_hour(), None);
    }

    #[test]
    fn test_hourly_labels() {
        let labels = PeakDay::hourly_labels();
        assert_eq!(labels.len(), 24);
        assert_eq!(labels[0], "0:00");
        assert_eq!(labels[23], "23:00");
    }

    #[test]
    fn test_monthly_timeline() {
        let item = MediaItem::new("a", MediaKind::Clip);
        let events = vec![
            event(&item, "2024-01-31T10:00:00Z"),
            event(&item, "2024-02-01T10:00:00Z"),
            event(&item, "2024-12-31T10:00:00Z"),
            event(&item, "2024-12-01T10:00:00Z"),
        ];
        let months = monthly_timeline(&events);
        assert_eq!(months[0], 1);
        assert_eq!(months[1], 1);
        assert_eq!(months[11], 2);
        assert_eq!(months.iter().sum::<u32>(), 4);
    }
}
