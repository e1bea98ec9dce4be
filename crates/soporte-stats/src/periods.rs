//! Time-window filtering for the statistics views.
//!
//! The tracker's charts offer four tabs: last week, last month, last year,
//! and all time. Filtering keys on the record's `fecha_soporte` value;
//! records without a parseable date are excluded from bounded windows.

use chrono::{DateTime, Duration, Utc};
use soporte_records::{parse_datetime, Record};

/// A statistics time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Last 7 days.
    Semanal,
    /// Last 30 days.
    Mensual,
    /// Last 365 days.
    Anual,
    /// All records.
    General,
}

impl Period {
    /// Returns the window length in days, or `None` for [`Period::General`].
    pub fn days(self) -> Option<i64> {
        match self {
            Self::Semanal => Some(7),
            Self::Mensual => Some(30),
            Self::Anual => Some(365),
            Self::General => None,
        }
    }
}

/// Returns the records whose `fecha_soporte` falls inside the window
/// ending at `now`.
///
/// [`Period::General`] returns everything, including records without a
/// date.
pub fn filter_by_period(records: &[Record], now: DateTime<Utc>, period: Period) -> Vec<Record> {
    let Some(days) = period.days() else {
        return records.to_vec();
    };
    let start = now - Duration::days(days);
    records
        .iter()
        .filter(|record| {
            record
                .get_str("fecha_soporte")
                .and_then(parse_datetime)
                .is_some_and(|date| date >= start)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn record_on(date: &str) -> Record {
        let mut data = Map::new();
        data.insert("fecha_soporte".into(), json!(date));
        Record::new(format!("rec{date}"), "pbc_hist", data)
    }

    fn now() -> DateTime<Utc> {
        parse_datetime("2026-08-07 12:00:00.000Z").unwrap()
    }

    #[test]
    fn test_semanal_window() {
        let records = vec![
            record_on("2026-08-05"),
            record_on("2026-07-15"),
            record_on("2025-09-01"),
        ];
        let filtered = filter_by_period(&records, now(), Period::Semanal);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].get_str("fecha_soporte"), Some("2026-08-05"));
    }

    #[test]
    fn test_mensual_and_anual_windows() {
        let records = vec![
            record_on("2026-08-05"),
            record_on("2026-07-15"),
            record_on("2025-09-01"),
        ];
        assert_eq!(filter_by_period(&records, now(), Period::Mensual).len(), 2);
        assert_eq!(filter_by_period(&records, now(), Period::Anual).len(), 3);
    }

    #[test]
    fn test_general_keeps_undated_records() {
        let records = vec![record_on("2026-08-05"), Record::new("r2", "pbc_hist", Map::new())];
        assert_eq!(filter_by_period(&records, now(), Period::General).len(), 2);
        // Bounded windows drop the undated record.
        assert_eq!(filter_by_period(&records, now(), Period::Anual).len(), 1);
    }
}
