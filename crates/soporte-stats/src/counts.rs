//! Count aggregations over support records.
//!
//! Pure groupby/reduce functions behind the tracker's charts: supports per
//! subject, per department, per technician, and per month, plus the "top"
//! lookups shown on the dashboard. All of them operate on already-fetched
//! (and, where relations matter, already-expanded) record slices.

use chrono::Datelike;
use serde_json::Value;
use soporte_records::{parse_datetime, Record};

/// Counts keys in first-seen order.
fn count_first_seen(keys: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

/// Returns the entry with the highest count; on ties the first-seen key
/// wins.
fn top_entry(counts: &[(String, usize)]) -> Option<&(String, usize)> {
    let mut best: Option<&(String, usize)> = None;
    for entry in counts {
        if best.map_or(true, |b| entry.1 > b.1) {
            best = Some(entry);
        }
    }
    best
}

/// Supports per `asunto`, in first-seen order. Records without a subject
/// are skipped.
pub fn counts_by_subject(records: &[Record]) -> Vec<(String, usize)> {
    count_first_seen(
        records
            .iter()
            .filter_map(|r| r.get_str("asunto"))
            .filter(|s| !s.is_empty())
            .map(ToString::to_string),
    )
}

/// Supports per department id, from expanded records.
pub fn counts_by_department(records: &[Record]) -> Vec<(String, usize)> {
    count_first_seen(records.iter().filter_map(|r| {
        r.expand
            .get("departamento")
            .and_then(|d| d.get("id"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
    }))
}

/// Supports per technician id, from expanded records.
///
/// A record with several associated technicians counts once per
/// technician.
pub fn counts_by_technician(records: &[Record]) -> Vec<(String, usize)> {
    count_first_seen(records.iter().flat_map(|r| {
        r.expand
            .get("tecnicos_asociados")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|t| t.get("id").and_then(Value::as_str))
            .map(ToString::to_string)
            .collect::<Vec<_>>()
    }))
}

/// The expanded technician object with the most supports, if any.
pub fn top_technician(records: &[Record]) -> Option<Value> {
    let counts = counts_by_technician(records);
    let (id, _) = top_entry(&counts)?;
    records.iter().find_map(|r| {
        r.expand
            .get("tecnicos_asociados")
            .and_then(Value::as_array)
            .and_then(|tecnicos| {
                tecnicos
                    .iter()
                    .find(|t| t.get("id").and_then(Value::as_str) == Some(id))
                    .cloned()
            })
    })
}

/// The expanded department object with the most supports, if any.
pub fn top_department(records: &[Record]) -> Option<Value> {
    let counts = counts_by_department(records);
    let (id, _) = top_entry(&counts)?;
    records.iter().find_map(|r| {
        let departamento = r.expand.get("departamento")?;
        (departamento.get("id").and_then(Value::as_str) == Some(id))
            .then(|| departamento.clone())
    })
}

/// Supports per calendar month of `year`, keyed on `fecha_soporte`.
///
/// Index 0 is January. Records outside `year` or without a parseable date
/// are skipped.
pub fn monthly_counts(records: &[Record], year: i32) -> [usize; 12] {
    let mut months = [0usize; 12];
    for record in records {
        let Some(date) = record.get_str("fecha_soporte").and_then(parse_datetime) else {
            continue;
        };
        if date.year() == year {
            months[date.month0() as usize] += 1;
        }
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn support(asunto: &str, fecha: &str, tecnicos: &[(&str, &str)], dep: Option<(&str, &str)>) -> Record {
        let mut data = Map::new();
        data.insert("asunto".into(), json!(asunto));
        data.insert("fecha_soporte".into(), json!(fecha));
        let mut record = Record::new(format!("r{asunto}{fecha}"), "pbc_hist", data);
        if !tecnicos.is_empty() {
            let expanded: Vec<Value> = tecnicos
                .iter()
                .map(|(id, nombre)| json!({"id": id, "nombre": nombre}))
                .collect();
            record
                .expand
                .insert("tecnicos_asociados".into(), Value::Array(expanded));
        }
        if let Some((id, nombre)) = dep {
            record
                .expand
                .insert("departamento".into(), json!({"id": id, "nombre": nombre}));
        }
        record
    }

    fn sample() -> Vec<Record> {
        vec![
            support(
                "falla de red",
                "2026-03-10",
                &[("t1", "Ana"), ("t2", "Luis")],
                Some(("d1", "Informática")),
            ),
            support(
                "falla de red",
                "2026-03-22",
                &[("t1", "Ana")],
                Some(("d2", "Recursos Humanos")),
            ),
            support(
                "soporte técnico",
                "2026-04-02",
                &[("t2", "Luis")],
                Some(("d1", "Informática")),
            ),
            support("soporte técnico", "2025-12-30", &[("t1", "Ana")], None),
        ]
    }

    #[test]
    fn test_counts_by_subject_first_seen_order() {
        let counts = counts_by_subject(&sample());
        assert_eq!(
            counts,
            vec![
                ("falla de red".to_string(), 2),
                ("soporte técnico".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_counts_skip_blank_subject() {
        let mut records = sample();
        records.push(support("", "2026-05-01", &[], None));
        assert_eq!(counts_by_subject(&records).len(), 2);
    }

    #[test]
    fn test_counts_by_technician_multi_valued() {
        let counts = counts_by_technician(&sample());
        assert_eq!(
            counts,
            vec![("t1".to_string(), 3), ("t2".to_string(), 2)]
        );
    }

    #[test]
    fn test_top_technician_returns_expanded_object() {
        let top = top_technician(&sample()).unwrap();
        assert_eq!(top["id"], "t1");
        assert_eq!(top["nombre"], "Ana");
    }

    #[test]
    fn test_top_department_tie_first_seen_wins() {
        let records = vec![
            support("a", "2026-01-01", &[], Some(("d1", "Informática"))),
            support("b", "2026-01-02", &[], Some(("d2", "Recursos Humanos"))),
        ];
        // One support each: the first-seen department wins the tie.
        let top = top_department(&records).unwrap();
        assert_eq!(top["id"], "d1");
    }

    #[test]
    fn test_top_on_empty_records() {
        assert!(top_technician(&[]).is_none());
        assert!(top_department(&[]).is_none());
    }

    #[test]
    fn test_monthly_counts_buckets_by_year() {
        let months = monthly_counts(&sample(), 2026);
        assert_eq!(months[2], 2); // March
        assert_eq!(months[3], 1); // April
        assert_eq!(months[11], 0); // December 2025 excluded
        assert_eq!(months.iter().sum::<usize>(), 3);
    }
}
