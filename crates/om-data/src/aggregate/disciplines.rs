use ahash::AHashMap;
use indexmap::IndexMap;

use om_core::{MedalRecord, MedalType};
use super::{DetailMatrix, DisciplineCell};

/// The `limit` disciplines with the most medals for a country.
///
/// Ties keep first-seen order: counting preserves insertion order and the
/// sort is stable.
pub fn top_disciplines(records: &[MedalRecord], country_code: &str, limit: usize) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for record in records.iter().filter(|r| r.country_code == country_code) {
        *counts.entry(record.discipline.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(limit)
        .map(|(discipline, _)| discipline.to_string())
        .collect()
}

/// Dense `disciplines x medal types` counts for a country. Every pair is
/// present, zero-filled when the country has no such medal.
pub fn discipline_matrix(
    records: &[MedalRecord],
    country_code: &str,
    disciplines: &[String],
) -> Vec<DisciplineCell> {
    let mut counts: AHashMap<(&str, MedalType), u32> = AHashMap::new();
    for record in records.iter().filter(|r| r.country_code == country_code) {
        *counts
            .entry((record.discipline.as_str(), record.medal_type))
            .or_insert(0) += 1;
    }

    disciplines
        .iter()
        .flat_map(|discipline| {
            let counts = &counts;
            MedalType::ALL.into_iter().map(move |medal_type| DisciplineCell {
                discipline: discipline.clone(),
                medal_type,
                count: counts
                    .get(&(discipline.as_str(), medal_type))
                    .copied()
                    .unwrap_or(0),
            })
        })
        .collect()
}

/// Top disciplines and their matrix in one pass over the selection
pub fn detail_matrix(records: &[MedalRecord], country_code: &str, limit: usize) -> DetailMatrix {
    let disciplines = top_disciplines(records, country_code, limit);
    let cells = discipline_matrix(records, country_code, &disciplines);
    DetailMatrix { disciplines, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DEFAULT_DISCIPLINE_LIMIT;

    fn records() -> Vec<MedalRecord> {
        vec![
            MedalRecord::new(MedalType::Gold, "2024-07-28", "USA", "Swimming"),
            MedalRecord::new(MedalType::Silver, "2024-07-28", "USA", "Swimming"),
            MedalRecord::new(MedalType::Gold, "2024-07-29", "USA", "Athletics"),
        ]
    }

    #[test]
    fn test_top_disciplines_ranked() {
        assert_eq!(
            top_disciplines(&records(), "USA", DEFAULT_DISCIPLINE_LIMIT),
            vec!["Swimming".to_string(), "Athletics".to_string()]
        );
    }

    #[test]
    fn test_top_disciplines_ties_keep_first_seen_order() {
        let records = vec![
            MedalRecord::new(MedalType::Gold, "2024-07-28", "NED", "Rowing"),
            MedalRecord::new(MedalType::Gold, "2024-07-28", "NED", "Cycling Track"),
            MedalRecord::new(MedalType::Gold, "2024-07-28", "NED", "Hockey"),
            MedalRecord::new(MedalType::Gold, "2024-07-29", "NED", "Hockey"),
            MedalRecord::new(MedalType::Gold, "2024-07-29", "NED", "Sailing"),
        ];

        assert_eq!(
            top_disciplines(&records, "NED", 3),
            vec!["Hockey".to_string(), "Rowing".to_string(), "Cycling Track".to_string()]
        );
    }

    #[test]
    fn test_top_disciplines_respects_limit() {
        let records: Vec<MedalRecord> = (0..20)
            .map(|i| MedalRecord::new(MedalType::Bronze, "2024-08-01", "CHN", format!("D{i}")))
            .collect();
        assert_eq!(top_disciplines(&records, "CHN", DEFAULT_DISCIPLINE_LIMIT).len(), 12);
        assert!(top_disciplines(&records, "USA", DEFAULT_DISCIPLINE_LIMIT).is_empty());
    }

    #[test]
    fn test_matrix_is_dense() {
        let disciplines = vec!["Swimming".to_string(), "Athletics".to_string()];
        let cells = discipline_matrix(&records(), "USA", &disciplines);

        assert_eq!(cells.len(), 6);
        assert!(cells.contains(&DisciplineCell {
            discipline: "Athletics".to_string(),
            medal_type: MedalType::Silver,
            count: 0,
        }));
        assert_eq!(cells[0].count, 1);
        assert_eq!(cells[0].medal_type, MedalType::Gold);
    }

    #[test]
    fn test_detail_matrix_rows() {
        let matrix = detail_matrix(&records(), "USA", DEFAULT_DISCIPLINE_LIMIT);
        assert_eq!(matrix.cells.len(), matrix.disciplines.len() * 3);
        assert_eq!(matrix.count("Swimming", MedalType::Silver), Some(1));
        assert!(matrix.contains("Athletics"));

        let empty = detail_matrix(&records(), "FRA", DEFAULT_DISCIPLINE_LIMIT);
        assert!(empty.is_empty());
        assert!(empty.cells.is_empty());
    }

    #[test]
    fn test_detail_matrix_truncates_to_limit() {
        // 20 disciplines; discipline i has i + 1 medals, so ranking is by index descending
        let records: Vec<MedalRecord> = (0..20)
            .flat_map(|i| {
                let discipline = format!("Discipline {i:02}");
                (0..=i).map(move |_| MedalRecord::new(MedalType::Bronze, "2024-08-01", "CHN", discipline.as_str()))
            })
            .collect();

        let matrix = detail_matrix(&records, "CHN", DEFAULT_DISCIPLINE_LIMIT);
        assert_eq!(matrix.disciplines.len(), 12);
        assert_eq!(matrix.cells.len(), 36);
        assert_eq!(matrix.disciplines[0], "Discipline 19");
        assert_eq!(matrix.disciplines[11], "Discipline 08");
        assert_eq!(matrix.count("Discipline 19", MedalType::Gold), Some(0));
        assert!(!matrix.contains("Discipline 07"));

        // Fewer distinct disciplines than the limit keeps them all
        let matrix = detail_matrix(&records, "CHN", 40);
        assert_eq!(matrix.cells.len(), 20 * 3);
    }
}
