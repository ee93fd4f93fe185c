use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::{info, trace};

use om_core::{CountryTotal, MedalRecord, MedalType};
use crate::config::SourceConfig;
use crate::store::Dataset;
use crate::{DataError, LoadError};
use super::MedalSource;

/// Columns the medal-events table must carry
const MEDAL_COLUMNS: &[&str] = &["medal_type", "medal_date", "country_code", "discipline"];

/// Columns the country-totals table must carry
const TOTAL_COLUMNS: &[&str] = &["country_code"];

/// Rows kept and dropped while reading one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableReport {
    pub kept: usize,
    pub dropped: usize,
}

#[derive(Debug, Deserialize)]
struct RawMedalRow {
    #[serde(default)]
    medal_type: Option<String>,
    #[serde(default)]
    medal_date: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    discipline: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTotalRow {
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default, rename = "Gold Medal")]
    gold: Option<String>,
    #[serde(default, rename = "Silver Medal")]
    silver: Option<String>,
    #[serde(default, rename = "Bronze Medal")]
    bronze: Option<String>,
    #[serde(default, rename = "Total")]
    total: Option<String>,
}

/// Non-empty trimmed text, `None` otherwise
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Numeric counts are coerced from text; anything unusable becomes 0
fn coerce_count(value: Option<&str>) -> u32 {
    let Some(text) = value.map(str::trim).filter(|t| !t.is_empty()) else {
        return 0;
    };
    if let Ok(count) = text.parse::<u32>() {
        return count;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 => v.round() as u32,
        _ => 0,
    }
}

impl RawMedalRow {
    fn into_record(self) -> Option<MedalRecord> {
        let date = present(self.medal_date)?;
        let country_code = present(self.country_code)?;
        let medal_type = present(self.medal_type)?.parse::<MedalType>().ok()?;
        Some(MedalRecord {
            medal_type,
            date,
            country_code,
            discipline: present(self.discipline).unwrap_or_default(),
        })
    }
}

impl RawTotalRow {
    fn into_total(self) -> Option<CountryTotal> {
        let country_code = present(self.country_code)?;
        let country_name = present(self.country).unwrap_or_else(|| country_code.clone());
        Some(CountryTotal {
            gold: coerce_count(self.gold.as_deref()),
            silver: coerce_count(self.silver.as_deref()),
            bronze: coerce_count(self.bronze.as_deref()),
            total: coerce_count(self.total.as_deref()),
            country_code,
            country_name,
        })
    }
}

fn table_reader<R: Read>(reader: R, delimiter: u8) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn require_columns(headers: &StringRecord, required: &[&str]) -> Result<(), DataError> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataError::MissingColumn {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Read the medal-events table. Rows missing a date or country code, or
/// with an unknown medal type, are dropped.
pub fn read_medals<R: Read>(reader: R, delimiter: u8) -> Result<(Vec<MedalRecord>, TableReport), DataError> {
    let mut csv_reader = table_reader(reader, delimiter);
    let headers = csv_reader.headers()?.clone();
    require_columns(&headers, MEDAL_COLUMNS)?;

    let mut records = Vec::new();
    let mut report = TableReport::default();

    for (idx, result) in csv_reader.deserialize::<RawMedalRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                trace!(row = idx + 1, error = %e, "Dropping unreadable medal row");
                report.dropped += 1;
                continue;
            }
        };

        match row.into_record() {
            Some(record) => {
                records.push(record);
                report.kept += 1;
            }
            None => {
                trace!(row = idx + 1, "Dropping medal row with missing fields");
                report.dropped += 1;
            }
        }
    }

    Ok((records, report))
}

/// Read the country-totals table. Rows missing a country code are dropped.
pub fn read_totals<R: Read>(reader: R, delimiter: u8) -> Result<(Vec<CountryTotal>, TableReport), DataError> {
    let mut csv_reader = table_reader(reader, delimiter);
    let headers = csv_reader.headers()?.clone();
    require_columns(&headers, TOTAL_COLUMNS)?;

    let mut totals = Vec::new();
    let mut report = TableReport::default();

    for (idx, result) in csv_reader.deserialize::<RawTotalRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                trace!(row = idx + 1, error = %e, "Dropping unreadable totals row");
                report.dropped += 1;
                continue;
            }
        };

        match row.into_total() {
            Some(total) => {
                totals.push(total);
                report.kept += 1;
            }
            None => {
                trace!(row = idx + 1, "Dropping totals row without country code");
                report.dropped += 1;
            }
        }
    }

    Ok((totals, report))
}

/// CSV-file backed medal source
pub struct CsvMedalSource {
    config: SourceConfig,
    name: String,
}

impl CsvMedalSource {
    pub fn new(config: SourceConfig) -> Self {
        let name = config
            .medals_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("medals.csv")
            .to_string();
        Self { config, name }
    }

    fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| LoadError::from_data(path.display().to_string(), DataError::Io(e)))
    }

    /// Blocking read of both tables
    fn read_blocking(medals_path: PathBuf, totals_path: PathBuf, delimiter: u8) -> Result<Dataset, LoadError> {
        let (medals, medal_report) = read_medals(Self::open(&medals_path)?, delimiter)
            .map_err(|e| LoadError::from_data(medals_path.display().to_string(), e))?;
        let (totals, total_report) = read_totals(Self::open(&totals_path)?, delimiter)
            .map_err(|e| LoadError::from_data(totals_path.display().to_string(), e))?;

        info!(
            medals_kept = medal_report.kept,
            medals_dropped = medal_report.dropped,
            totals_kept = total_report.kept,
            totals_dropped = total_report.dropped,
            "Read medal tables"
        );

        Ok(Dataset::new(medals, totals))
    }
}

#[async_trait]
impl MedalSource for CsvMedalSource {
    async fn load(&self) -> Result<Dataset, LoadError> {
        let medals_path = self.config.medals_path.clone();
        let totals_path = self.config.totals_path.clone();
        let delimiter = self.config.delimiter_byte();

        tokio::task::spawn_blocking(move || Self::read_blocking(medals_path, totals_path, delimiter)).await?
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MEDALS: &str = "\
medal_type,medal_date,name,country_code,discipline
Gold Medal,2024-07-28,A,USA,Swimming
Silver Medal,2024-07-28,B,USA,Swimming
Gold Medal,,C,USA,Athletics
Bronze Medal,2024-07-29,D,,Judo
Participation,2024-07-29,E,FRA,Judo
Bronze Medal,2024-07-30,F,FRA,Judo
";

    const TOTALS: &str = "\
country_code,country,Gold Medal,Silver Medal,Bronze Medal,Total
USA,United States,40,44,42,126
FRA,France,16,,22.0,x
,Nowhere,1,1,1,3
";

    #[test]
    fn test_read_medals_drops_incomplete_rows() {
        let (records, report) = read_medals(MEDALS.as_bytes(), b',').unwrap();
        assert_eq!(report, TableReport { kept: 3, dropped: 3 });
        assert_eq!(records[0], MedalRecord::new(MedalType::Gold, "2024-07-28", "USA", "Swimming"));
        assert_eq!(records[2].country_code, "FRA");
    }

    #[test]
    fn test_read_totals_coerces_counts() {
        let (totals, report) = read_totals(TOTALS.as_bytes(), b',').unwrap();
        assert_eq!(report, TableReport { kept: 2, dropped: 1 });
        assert_eq!(totals[0].total, 126);
        assert_eq!(totals[1].country_name, "France");
        assert_eq!(totals[1].silver, 0);
        assert_eq!(totals[1].bronze, 22);
        assert_eq!(totals[1].total, 0);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let result = read_medals("medal_type,medal_date\nGold Medal,2024-07-28\n".as_bytes(), b',');
        assert!(matches!(result, Err(DataError::MissingColumn { .. })));

        let result = read_totals("".as_bytes(), b',');
        assert!(matches!(result, Err(DataError::MissingColumn { .. })));
    }

    #[tokio::test]
    async fn test_csv_source_loads_files() {
        let dir = tempfile::tempdir().unwrap();
        let medals_path = dir.path().join("medals.csv");
        let totals_path = dir.path().join("medals_total.csv");
        File::create(&medals_path).unwrap().write_all(MEDALS.as_bytes()).unwrap();
        File::create(&totals_path).unwrap().write_all(TOTALS.as_bytes()).unwrap();

        let source = CsvMedalSource::new(SourceConfig::new(&medals_path, &totals_path));
        let dataset = source.load().await.unwrap();

        assert_eq!(source.source_name(), "medals.csv");
        assert_eq!(dataset.medals.len(), 3);
        assert_eq!(dataset.totals.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvMedalSource::new(SourceConfig::new(
            dir.path().join("nope.csv"),
            dir.path().join("nope_total.csv"),
        ));

        let result = source.load().await;
        assert!(matches!(result, Err(LoadError::Unreachable { .. })));
    }
}
