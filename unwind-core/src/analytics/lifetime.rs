//! All-time overview.
//!
//! Aggregates over whole histories instead of one year. An item's lifetime
//! count is the length of its count-history and its play count the length of
//! its play-history, so no timestamp needs to parse.

use super::rankings::{RankedEntry, Tally};
use super::ItemSummary;
use crate::types::MediaItem;
use serde::Serialize;

/// Default number of rows in each all-time ranking.
pub const DEFAULT_LIFETIME_LIMIT: usize = 15;

/// An item and its all-time count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifetimeItem {
    pub item: ItemSummary,
    pub count: u32,
}

/// One clip placed by play count against count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayCountPoint {
    pub item: ItemSummary,
    pub play_count: u32,
    pub count: u32,
}

/// All-time rankings over the whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LifetimeOverview {
    /// Items with the highest lifetime count
    pub top_items: Vec<LifetimeItem>,
    /// People weighted by the lifetime count of their items
    pub top_people: Vec<RankedEntry<String>>,
    /// Tags by the number of counted items carrying them
    pub top_tags: Vec<RankedEntry<String>>,
    /// Every clip's play count against its count, in input order
    pub play_vs_count: Vec<PlayCountPoint>,
}

impl LifetimeOverview {
    pub fn is_empty(&self) -> bool {
        self.top_items.is_empty() && self.play_vs_count.is_empty()
    }
}

fn lifetime_count(item: &MediaItem) -> u32 {
    u32::try_from(item.count_history.len()).unwrap_or(u32::MAX)
}

fn lifetime_plays(item: &MediaItem) -> u32 {
    u32::try_from(item.play_history.len()).unwrap_or(u32::MAX)
}

/// Items with at least one count, highest first; ties keep input order.
pub fn top_lifetime_items(items: &[MediaItem], limit: usize) -> Vec<LifetimeItem> {
    let mut ranked: Vec<LifetimeItem> = items
        .iter()
        .filter(|item| !item.count_history.is_empty())
        .map(|item| LifetimeItem {
            item: ItemSummary::from(item),
            count: lifetime_count(item),
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// People ranked by the summed lifetime count of the items they appear on.
pub fn lifetime_people(items: &[MediaItem], limit: usize) -> Vec<RankedEntry<String>> {
    let mut tally = Tally::new();
    for item in items.iter().filter(|item| !item.count_history.is_empty()) {
        let count = lifetime_count(item);
        for person in &item.people {
            tally.add_n(&person.id, &person.name, count);
        }
    }
    tally.into_ranked(limit)
}

/// Tags ranked by how many counted items carry them.
pub fn lifetime_tags(items: &[MediaItem], limit: usize) -> Vec<RankedEntry<String>> {
    let mut tally = Tally::new();
    for item in items.iter().filter(|item| !item.count_history.is_empty()) {
        for tag in &item.tags {
            tally.add(&tag.id, &tag.name);
        }
    }
    tally.into_ranked(limit)
}

/// Play count against count for every clip.
pub fn play_vs_count(items: &[MediaItem]) -> Vec<PlayCountPoint> {
    items
        .iter()
        .filter(|item| item.is_playable())
        .map(|item| PlayCountPoint {
            item: ItemSummary::from(item),
            play_count: lifetime_plays(item),
            count: lifetime_count(item),
        })
        .collect()
}

/// Build the all-time overview with `limit` rows per ranking.
pub fn compute_lifetime_overview(items: &[MediaItem], limit: usize) -> LifetimeOverview {
    let overview = LifetimeOverview {
        top_items: top_lifetime_items(items, limit),
        top_people: lifetime_people(items, limit),
        top_tags: lifetime_tags(items, limit),
        play_vs_count: play_vs_count(items),
    };

    tracing::debug!(
        items = items.len(),
        ranked = overview.top_items.len(),
        clips = overview.play_vs_count.len(),
        "Computed lifetime overview"
    );

    overview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MediaKind, Person, Tag};

    fn item(id: &str, kind: MediaKind, counts: usize, plays: usize) -> MediaItem {
        MediaItem {
            count_history: vec!["2020-01-01T00:00:00Z".to_string(); counts],
            play_history: vec!["2020-01-01T00:00:00Z".to_string(); plays],
            ..MediaItem::new(id, kind)
        }
    }

    fn person(id: &str, name: &str) -> Person {
        Person {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn tag(id: &str, name: &str) -> Tag {
        Tag {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_top_items_skip_uncounted_and_keep_order() {
        let items = vec![
            item("a", MediaKind::Clip, 2, 0),
            item("b", MediaKind::Still, 0, 0),
            item("c", MediaKind::Still, 5, 0),
            item("d", MediaKind::Clip, 2, 1),
        ];

        let top = top_lifetime_items(&items, 15);
        let ids: Vec<(&str, u32)> = top.iter().map(|t| (t.item.id.as_str(), t.count)).collect();
        assert_eq!(ids, vec![("c", 5), ("a", 2), ("d", 2)]);
        assert_eq!(top_lifetime_items(&items, 1).len(), 1);
    }

    #[test]
    fn test_people_weighted_by_item_count() {
        let mut a = item("a", MediaKind::Clip, 3, 0);
        a.people = vec![person("p1", "Rae"), person("p2", "Jo")];
        let mut b = item("b", MediaKind::Clip, 4, 0);
        b.people = vec![person("p2", "Jo")];
        let mut c = item("c", MediaKind::Clip, 0, 2);
        c.people = vec![person("p3", "Sam")];

        let ranked = lifetime_people(&[a, b, c], 15);
        let rows: Vec<(&str, u32)> = ranked.iter().map(|p| (p.key.as_str(), p.count)).collect();
        assert_eq!(rows, vec![("p2", 7), ("p1", 3)]);
    }

    #[test]
    fn test_tags_count_items_not_events() {
        let mut a = item("a", MediaKind::Clip, 9, 0);
        a.tags = vec![tag("t1", "Beach")];
        let mut b = item("b", MediaKind::Still, 1, 0);
        b.tags = vec![tag("t1", "Beach"), tag("t2", "Night")];

        let ranked = lifetime_tags(&[a, b], 15);
        assert_eq!(ranked[0].key, "t1");
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[1].count, 1);
        assert!(ranked.iter().all(|t| t.by_month.is_none()));
    }

    #[test]
    fn test_play_vs_count_covers_clips_only() {
        let items = vec![
            item("a", MediaKind::Clip, 3, 7),
            item("s", MediaKind::Still, 4, 0),
            item("b", MediaKind::Clip, 0, 2),
        ];

        let points = play_vs_count(&items);
        let rows: Vec<(&str, u32, u32)> = points
            .iter()
            .map(|p| (p.item.id.as_str(), p.play_count, p.count))
            .collect();
        assert_eq!(rows, vec![("a", 7, 3), ("b", 2, 0)]);
    }

    #[test]
    fn test_overview_of_empty_library() {
        let overview = compute_lifetime_overview(&[], DEFAULT_LIFETIME_LIMIT);
        assert!(overview.is_empty());
        assert!(overview.top_people.is_empty());
        assert!(overview.top_tags.is_empty());
    }
}
