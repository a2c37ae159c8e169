//! Rolling detection history.
//!
//! The log only retains the most recent `capacity` events. Every count it
//! reports is over that retained window, not a lifetime total.

use serde::Serialize;

use crate::buffer::RecentBuffer;
use crate::detect::{DetectionCategory, DetectionEvent};

pub const DEFAULT_EVENT_CAPACITY: usize = 50;

/// Count of retained events for one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: DetectionCategory,
    pub name: &'static str,
    pub count: usize,
}

#[derive(Clone, Debug)]
pub struct EventLog {
    events: RecentBuffer<DetectionEvent>,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: RecentBuffer::new(capacity),
        }
    }

    /// Append an event at the head, dropping the oldest past capacity.
    pub(crate) fn record(&mut self, event: DetectionEvent) {
        if let Some(evicted) = self.events.push(event) {
            log::trace!("event log: evicted {}", evicted.id);
        }
    }

    /// Retained events, newest first.
    pub fn events(&self) -> impl Iterator<Item = &DetectionEvent> + '_ {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&DetectionEvent> {
        self.events.latest()
    }

    /// Number of retained events with `category`. Recomputed on every call.
    pub fn count(&self, category: DetectionCategory) -> usize {
        self.events
            .iter()
            .filter(|event| event.category == category)
            .count()
    }

    /// Counts for every category, in [`DetectionCategory::ALL`] order.
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        DetectionCategory::ALL
            .iter()
            .map(|&category| CategoryCount {
                category,
                name: category.short_name(),
                count: self.count(category),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }

    pub fn to_vec(&self) -> Vec<DetectionEvent> {
        self.events.to_vec()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn event(n: u128, category: DetectionCategory) -> DetectionEvent {
        DetectionEvent {
            id: Uuid::from_u128(n),
            category,
            timestamp: DateTime::<Utc>::from_timestamp(1_700_000_000 + n as i64, 0).unwrap(),
        }
    }

    #[test]
    fn counts_only_retained_window() {
        let mut log = EventLog::new(3);
        log.record(event(1, DetectionCategory::MissingHelmet));
        log.record(event(2, DetectionCategory::MissingHelmet));
        log.record(event(3, DetectionCategory::MissingVest));
        log.record(event(4, DetectionCategory::ZoneViolation));

        assert_eq!(log.len(), 3);
        assert_eq!(log.count(DetectionCategory::MissingHelmet), 1);
        assert_eq!(log.count(DetectionCategory::MissingVest), 1);
        assert_eq!(log.count(DetectionCategory::ZoneViolation), 1);
    }

    #[test]
    fn events_are_newest_first() {
        let mut log = EventLog::default();
        for n in 0..5 {
            log.record(event(n, DetectionCategory::MissingVest));
        }
        let ids: Vec<_> = log.events().map(|e| e.id.as_u128()).collect();
        assert_eq!(ids, vec![4, 3, 2, 1, 0]);
        assert_eq!(log.latest().map(|e| e.id.as_u128()), Some(4));
    }

    #[test]
    fn category_counts_cover_all_categories() {
        let mut log = EventLog::default();
        log.record(event(1, DetectionCategory::ZoneViolation));
        let counts = log.category_counts();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0].name, "Helmet");
        assert_eq!(counts[0].count, 0);
        assert_eq!(counts[2].name, "Zone");
        assert_eq!(counts[2].count, 1);
    }
}
