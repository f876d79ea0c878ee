//! Top-N rankings.
//!
//! All reductions key by stable entity id (never display name) and keep
//! entries in first-seen order until the final sort. The sort is stable, so
//! ties stay in first-seen order.

use super::events::Event;
use super::ItemSummary;
use crate::types::{KindTotals, MediaKind};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// One row of a count-ranked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry<K> {
    pub key: K,
    pub name: String,
    pub count: u32,
    /// Occurrences per month (index 0 = January), when tracked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_month: Option<[u32; 12]>,
}

/// Running counts in first-seen order.
pub(super) struct Tally<K> {
    index: HashMap<K, usize>,
    entries: Vec<RankedEntry<K>>,
    monthly: bool,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub(super) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            monthly: false,
        }
    }

    fn with_months() -> Self {
        Self {
            monthly: true,
            ..Self::new()
        }
    }

    fn entry(&mut self, key: &K, name: &str) -> &mut RankedEntry<K> {
        let idx = match self.index.get(key) {
            Some(idx) => *idx,
            None => {
                self.entries.push(RankedEntry {
                    key: key.clone(),
                    name: name.to_string(),
                    count: 0,
                    by_month: self.monthly.then_some([0; 12]),
                });
                self.index.insert(key.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx]
    }

    pub(super) fn add(&mut self, key: &K, name: &str) {
        self.add_n(key, name, 1);
    }

    pub(super) fn add_n(&mut self, key: &K, name: &str, n: u32) {
        self.entry(key, name).count += n;
    }

    fn add_in_month(&mut self, key: &K, name: &str, month0: usize) {
        let entry = self.entry(key, name);
        entry.count += 1;
        if let Some(months) = entry.by_month.as_mut() {
            months[month0] += 1;
        }
    }

    pub(super) fn into_ranked(self, limit: usize) -> Vec<RankedEntry<K>> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(limit);
        entries
    }
}

/// First `n` entries of a ranked list; a view, not a re-ranking.
pub fn top<K>(entries: &[RankedEntry<K>], n: usize) -> &[RankedEntry<K>] {
    &entries[..n.min(entries.len())]
}

/// Copy of a ranked list ordered by name, for chart axes.
pub fn sorted_by_name<K: Clone>(entries: &[RankedEntry<K>]) -> Vec<RankedEntry<K>> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    sorted
}

/// People ranked by the number of count events they appear on.
pub fn rank_people(count_events: &[Event<'_>], limit: usize) -> Vec<RankedEntry<String>> {
    let mut tally = Tally::new();
    for event in count_events {
        for person in &event.item.people {
            tally.add(&person.id, &person.name);
        }
    }
    tally.into_ranked(limit)
}

/// Tags ranked by occurrences on `events`, with a per-month breakdown.
///
/// Used for count events and for play events alike.
pub fn rank_tags(events: &[Event<'_>], limit: usize) -> Vec<RankedEntry<String>> {
    let mut tally = Tally::with_months();
    for event in events {
        for tag in &event.item.tags {
            tally.add_in_month(&tag.id, &tag.name, event.month0());
        }
    }
    tally.into_ranked(limit)
}

/// Count and play totals for one media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRanking {
    pub item: ItemSummary,
    pub count_total: u32,
    pub play_total: u32,
}

/// Media items ranked by count events, with their play events alongside.
///
/// Only items with at least one count event are ranked; play events on other
/// items are not counted.
pub fn rank_media(
    count_events: &[Event<'_>],
    play_events: &[Event<'_>],
    limit: usize,
) -> Vec<MediaRanking> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<MediaRanking> = Vec::new();

    for event in count_events {
        let id = event.item.id.as_str();
        let idx = *index.entry(id).or_insert_with(|| {
            rows.push(MediaRanking {
                item: ItemSummary::from(event.item),
                count_total: 0,
                play_total: 0,
            });
            rows.len() - 1
        });
        rows[idx].count_total += 1;
    }

    for event in play_events {
        if let Some(idx) = index.get(event.item.id.as_str()) {
            rows[*idx].play_total += 1;
        }
    }

    rows.sort_by(|a, b| b.count_total.cmp(&a.count_total));
    rows.truncate(limit);
    rows
}

/// The item with the most count events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopItem {
    pub item: ItemSummary,
    pub count: u32,
}

/// Item with the greatest number of count events; the first seen wins ties.
pub fn top_item(count_events: &[Event<'_>]) -> Option<TopItem> {
    let mut tally: Tally<String> = Tally::new();
    for event in count_events {
        tally.add(&event.item.id, event.item.display_title());
    }

    let mut best: Option<&RankedEntry<String>> = None;
    for entry in &tally.entries {
        if best.map_or(true, |b| entry.count > b.count) {
            best = Some(entry);
        }
    }
    let best = best?;

    count_events
        .iter()
        .find(|e| e.item.id == best.key)
        .map(|e| TopItem {
            item: ItemSummary::from(e.item),
            count: best.count,
        })
}

/// Items of one kind with and without activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindSplit {
    pub with_activity: u64,
    pub without_activity: u64,
    pub total: u64,
}

/// With/without-activity split for both media kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MediaDistribution {
    pub clips: KindSplit,
    pub stills: KindSplit,
}

/// Split the unfiltered population into items with at least one count event
/// this year and the rest.
pub fn distribution(count_events: &[Event<'_>], totals: &KindTotals) -> MediaDistribution {
    let active: HashSet<(&str, MediaKind)> = count_events
        .iter()
        .map(|e| (e.item.id.as_str(), e.item.kind))
        .collect();

    let split = |kind: MediaKind| {
        let with_activity = active.iter().filter(|(_, k)| *k == kind).count() as u64;
        let total = totals.for_kind(kind);
        if with_activity > total {
            tracing::warn!(
                kind = %kind,
                with_activity,
                total,
                "Active items exceed supplied total"
            );
        }
        KindSplit {
            with_activity,
            without_activity: total.saturating_sub(with_activity),
            total,
        }
    };

    MediaDistribution {
        clips: split(MediaKind::Clip),
        stills: split(MediaKind::Still),
    }
}

/// Count events per play event for one clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyEntry {
    pub item: ItemSummary,
    pub count_total: u32,
    pub play_total: u32,
    pub efficiency: f64,
}

/// Most and least efficient clips of the year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EfficiencyRankings {
    /// Highest efficiency first
    pub most_efficient: Vec<EfficiencyEntry>,
    /// The lowest `n`, listed from the highest of them down to the lowest
    pub least_efficient: Vec<EfficiencyEntry>,
}

/// Rank clips played at least once this year by count events per play.
pub fn rank_efficiency(
    count_events: &[Event<'_>],
    play_events: &[Event<'_>],
    n: usize,
) -> EfficiencyRankings {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<EfficiencyEntry> = Vec::new();

    for event in play_events.iter().filter(|e| e.item.is_playable()) {
        let idx = *index.entry(event.item.id.as_str()).or_insert_with(|| {
            rows.push(EfficiencyEntry {
                item: ItemSummary::from(event.item),
                count_total: 0,
                play_total: 0,
                efficiency: 0.0,
            });
            rows.len() - 1
        });
        rows[idx].play_total += 1;
    }

    for event in count_events {
        if let Some(idx) = index.get(event.item.id.as_str()) {
            rows[*idx].count_total += 1;
        }
    }

    for row in &mut rows {
        row.efficiency = f64::from(row.count_total) / f64::from(row.play_total);
    }

    let mut most = rows.clone();
    most.sort_by(|a, b| b.efficiency.total_cmp(&a.efficiency));
    most.truncate(n);

    let mut least = rows;
    least.sort_by(|a, b| a.efficiency.total_cmp(&b.efficiency));
    least.truncate(n);
    least.reverse();

    EfficiencyRankings {
        most_efficient: most,
        least_efficient: least,
    }
}
