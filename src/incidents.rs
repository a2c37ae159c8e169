//! Incidents dashboard data.
//!
//! Hard-coded demo rows and chart counts, plus helpers that build the same
//! table and chart from live events in an [`EventLog`].

use serde::Serialize;
use std::fmt;

use crate::detect::{DetectionCategory, DetectionEvent};
use crate::event_log::{CategoryCount, EventLog};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn for_category(category: DetectionCategory) -> Self {
        match category {
            DetectionCategory::MissingHelmet => Severity::High,
            DetectionCategory::ZoneViolation => Severity::Medium,
            DetectionCategory::MissingVest => Severity::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the "Latest Incidents" table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IncidentRow {
    pub id: String,
    /// Time of day (UTC), "HH:MM".
    pub time: String,
    pub category: DetectionCategory,
    pub zone: String,
    pub severity: Severity,
}

impl IncidentRow {
    pub fn from_event(event: &DetectionEvent, zone: &str) -> Self {
        Self {
            id: event.id.to_string(),
            time: event.timestamp.format("%H:%M").to_string(),
            category: event.category,
            zone: zone.to_string(),
            severity: Severity::for_category(event.category),
        }
    }

    pub fn label(&self) -> &'static str {
        self.category.label()
    }
}

fn demo_row(
    id: &str,
    time: &str,
    category: DetectionCategory,
    zone: &str,
    severity: Severity,
) -> IncidentRow {
    IncidentRow {
        id: id.to_string(),
        time: time.to_string(),
        category,
        zone: zone.to_string(),
        severity,
    }
}

/// Static demo incidents shown before any live event exists.
pub fn demo_incidents() -> Vec<IncidentRow> {
    vec![
        demo_row(
            "1",
            "09:12",
            DetectionCategory::MissingHelmet,
            "Line A",
            Severity::High,
        ),
        demo_row(
            "2",
            "09:25",
            DetectionCategory::ZoneViolation,
            "Loading Dock",
            Severity::Medium,
        ),
        demo_row(
            "3",
            "10:03",
            DetectionCategory::MissingVest,
            "Line B",
            Severity::Low,
        ),
        demo_row(
            "4",
            "10:14",
            DetectionCategory::MissingHelmet,
            "Yard",
            Severity::High,
        ),
    ]
}

/// Static "incidents by type" chart data.
pub fn demo_chart() -> Vec<CategoryCount> {
    [
        (DetectionCategory::MissingHelmet, 12),
        (DetectionCategory::MissingVest, 7),
        (DetectionCategory::ZoneViolation, 9),
    ]
    .into_iter()
    .map(|(category, count)| CategoryCount {
        category,
        name: category.short_name(),
        count,
    })
    .collect()
}

/// Newest `limit` events as table rows, all attributed to `zone`.
pub fn latest_incidents(log: &EventLog, zone: &str, limit: usize) -> Vec<IncidentRow> {
    log.events()
        .take(limit)
        .map(|event| IncidentRow::from_event(event, zone))
        .collect()
}

/// Live chart data over the retained window.
pub fn chart_from_log(log: &EventLog) -> Vec<CategoryCount> {
    log.category_counts()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    #[test]
    fn demo_data_is_consistent() {
        for row in demo_incidents() {
            assert_eq!(row.severity, Severity::for_category(row.category));
        }
        let chart = demo_chart();
        assert_eq!(chart.iter().map(|c| c.count).sum::<usize>(), 28);
        assert_eq!(chart[0].name, "Helmet");
    }

    #[test]
    fn rows_from_live_events() {
        let mut log = EventLog::default();
        for (n, category) in DetectionCategory::ALL.into_iter().enumerate() {
            log.record(DetectionEvent {
                id: Uuid::from_u128(n as u128),
                category,
                timestamp: DateTime::<Utc>::from_timestamp(9 * 3600 + 12 * 60 + n as i64 * 60, 0)
                    .unwrap(),
            });
        }
        let rows = latest_incidents(&log, "Line A", 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, DetectionCategory::ZoneViolation);
        assert_eq!(rows[0].time, "09:14");
        assert_eq!(rows[0].severity, Severity::Medium);
        assert_eq!(rows[1].label(), "Missing Vest");

        let chart = chart_from_log(&log);
        assert!(chart.iter().all(|c| c.count == 1));
    }
}
