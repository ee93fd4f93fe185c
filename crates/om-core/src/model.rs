//! Medal dataset types
//!
//! Records are immutable once loaded and shared between the store, the
//! aggregation engine and the views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Date format used by the medal-events table
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Kind of medal awarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MedalType {
    Gold,
    Silver,
    Bronze,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown medal type '{0}'")]
pub struct UnknownMedalType(pub String);

impl MedalType {
    /// All medal types in display order
    pub const ALL: [MedalType; 3] = [MedalType::Gold, MedalType::Silver, MedalType::Bronze];

    /// Label as it appears in the source tables
    pub fn label(&self) -> &'static str {
        match self {
            MedalType::Gold => "Gold Medal",
            MedalType::Silver => "Silver Medal",
            MedalType::Bronze => "Bronze Medal",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            MedalType::Gold => "Gold",
            MedalType::Silver => "Silver",
            MedalType::Bronze => "Bronze",
        }
    }

    /// Position in [`MedalType::ALL`]
    pub fn index(&self) -> usize {
        match self {
            MedalType::Gold => 0,
            MedalType::Silver => 1,
            MedalType::Bronze => 2,
        }
    }
}

impl fmt::Display for MedalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MedalType {
    type Err = UnknownMedalType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        MedalType::ALL
            .into_iter()
            .find(|medal| {
                trimmed.eq_ignore_ascii_case(medal.label())
                    || trimmed.eq_ignore_ascii_case(medal.short_name())
            })
            .ok_or_else(|| UnknownMedalType(trimmed.to_string()))
    }
}

/// One awarded medal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalRecord {
    pub medal_type: MedalType,
    /// Raw `YYYY-MM-DD` text; parsed lazily so malformed dates can be skipped
    pub date: String,
    pub country_code: String,
    pub discipline: String,
}

impl MedalRecord {
    pub fn new(
        medal_type: MedalType,
        date: impl Into<String>,
        country_code: impl Into<String>,
        discipline: impl Into<String>,
    ) -> Self {
        Self {
            medal_type,
            date: date.into(),
            country_code: country_code.into(),
            discipline: discipline.into(),
        }
    }

    /// Parse the date, `None` when malformed
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }
}

/// Precomputed per-country medal summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTotal {
    pub country_code: String,
    pub country_name: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    /// Taken from the source as-is
    pub total: u32,
}

/// Medal counts split by type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalCounts {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalCounts {
    pub fn add(&mut self, medal_type: MedalType) {
        match medal_type {
            MedalType::Gold => self.gold += 1,
            MedalType::Silver => self.silver += 1,
            MedalType::Bronze => self.bronze += 1,
        }
    }

    pub fn get(&self, medal_type: MedalType) -> u32 {
        match medal_type {
            MedalType::Gold => self.gold,
            MedalType::Silver => self.silver,
            MedalType::Bronze => self.bronze,
        }
    }

    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }

    pub fn merge(&mut self, other: &MedalCounts) {
        self.gold += other.gold;
        self.silver += other.silver;
        self.bronze += other.bronze;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medal_type_parsing() {
        assert_eq!("Gold Medal".parse::<MedalType>(), Ok(MedalType::Gold));
        assert_eq!(" silver medal ".parse::<MedalType>(), Ok(MedalType::Silver));
        assert_eq!("Bronze".parse::<MedalType>(), Ok(MedalType::Bronze));
        assert!("Wooden Spoon".parse::<MedalType>().is_err());
    }

    #[test]
    fn test_parsed_date() {
        let record = MedalRecord::new(MedalType::Gold, "2024-07-28", "USA", "Swimming");
        assert_eq!(record.parsed_date(), NaiveDate::from_ymd_opt(2024, 7, 28));

        let bad = MedalRecord::new(MedalType::Gold, "28/07/2024", "USA", "Swimming");
        assert_eq!(bad.parsed_date(), None);
    }

    #[test]
    fn test_counts_total() {
        let mut counts = MedalCounts::default();
        counts.add(MedalType::Gold);
        counts.add(MedalType::Gold);
        counts.add(MedalType::Bronze);
        assert_eq!(counts.get(MedalType::Gold), 2);
        assert_eq!(counts.total(), 3);
    }
}
