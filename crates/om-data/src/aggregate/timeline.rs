use std::collections::BTreeMap;
use ahash::AHashMap;
use chrono::NaiveDate;
use tracing::trace;

use om_core::model::DATE_FORMAT;
use om_core::{MedalCounts, MedalRecord};
use super::DatedCounts;

/// Per-date medal counts for one country, optionally narrowed to one
/// discipline, sorted by date with one entry per distinct day.
///
/// Records are grouped by their exact date text first; groups whose date
/// does not parse are dropped.
pub fn timeline_series(
    records: &[MedalRecord],
    country_code: &str,
    discipline: Option<&str>,
) -> Vec<DatedCounts> {
    let mut by_date: AHashMap<&str, MedalCounts> = AHashMap::new();

    for record in records {
        if record.country_code != country_code {
            continue;
        }
        if discipline.is_some_and(|d| record.discipline != d) {
            continue;
        }
        by_date.entry(record.date.as_str()).or_default().add(record.medal_type);
    }

    // Differently spelled dates can land on the same day; merge them
    let mut by_day: BTreeMap<NaiveDate, MedalCounts> = BTreeMap::new();
    for (text, counts) in by_date {
        match NaiveDate::parse_from_str(text.trim(), DATE_FORMAT) {
            Ok(date) => by_day.entry(date).or_default().merge(&counts),
            Err(_) => trace!(date = text, "Skipping malformed date"),
        }
    }

    by_day
        .into_iter()
        .map(|(date, counts)| DatedCounts::new(date, counts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use om_core::MedalType;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records() -> Vec<MedalRecord> {
        vec![
            MedalRecord::new(MedalType::Gold, "2024-07-28", "USA", "Swimming"),
            MedalRecord::new(MedalType::Silver, "2024-07-28", "USA", "Swimming"),
            MedalRecord::new(MedalType::Gold, "2024-07-29", "USA", "Athletics"),
        ]
    }

    #[test]
    fn test_series_for_country() {
        let series = timeline_series(&records(), "USA", None);
        assert_eq!(
            series,
            vec![
                DatedCounts { date: day(2024, 7, 28), gold: 1, silver: 1, bronze: 0, total: 2 },
                DatedCounts { date: day(2024, 7, 29), gold: 1, silver: 0, bronze: 0, total: 1 },
            ]
        );
    }

    #[test]
    fn test_series_filtered_by_discipline() {
        let series = timeline_series(&records(), "USA", Some("Athletics"));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, day(2024, 7, 29));
    }

    #[test]
    fn test_unknown_country_is_empty() {
        assert!(timeline_series(&records(), "ATA", None).is_empty());
        assert!(timeline_series(&[], "USA", None).is_empty());
    }

    #[test]
    fn test_malformed_dates_are_dropped() {
        let mut records = records();
        records.push(MedalRecord::new(MedalType::Bronze, "July 30th", "USA", "Judo"));
        records.push(MedalRecord::new(MedalType::Bronze, "2024-02-30", "USA", "Judo"));

        let series = timeline_series(&records, "USA", None);
        assert_eq!(series.len(), 2);
        assert_eq!(series.iter().map(|e| e.bronze).sum::<u32>(), 0);
    }

    #[test]
    fn test_series_sorted_without_duplicates() {
        let records = vec![
            MedalRecord::new(MedalType::Bronze, "2024-08-10", "KEN", "Athletics"),
            MedalRecord::new(MedalType::Gold, "2024-08-01", "KEN", "Athletics"),
            MedalRecord::new(MedalType::Silver, " 2024-08-10", "KEN", "Athletics"),
            MedalRecord::new(MedalType::Gold, "2024-08-05", "KEN", "Athletics"),
        ];

        let series = timeline_series(&records, "KEN", None);
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        for entry in &series {
            assert_eq!(entry.total, entry.gold + entry.silver + entry.bronze);
        }
        assert_eq!(series.last().map(|e| e.total), Some(2));
    }
}
