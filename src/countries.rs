//! Country life-expectancy table
//!
//! Supplies the value used to pre-populate the life expectancy before the
//! week calculator runs. The built-in table holds 2021 figures; a JSON file
//! with the same `{country, life_expectancy, year}` records can replace it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::CountryTableError;

pub const DEFAULT_COUNTRY: &str = "India";

/// Used when a country is not in the table ("Other").
pub const FALLBACK_LIFE_EXPECTANCY: f64 = 80.0;

const BUILTIN_YEAR: u16 = 2021;

const BUILTIN: &[(&str, f64)] = &[
    ("Japan", 84.7),
    ("Switzerland", 84.3),
    ("Australia", 84.3),
    ("Israel", 84.2),
    ("South Korea", 83.7),
    ("Sweden", 83.3),
    ("France", 83.2),
    ("Norway", 83.2),
    ("Italy", 83.1),
    ("Iceland", 83.0),
    ("Canada", 82.7),
    ("Ireland", 82.6),
    ("Netherlands", 82.5),
    ("New Zealand", 82.5),
    ("Singapore", 82.4),
    ("Luxembourg", 82.3),
    ("Belgium", 81.9),
    ("Finland", 81.8),
    ("Portugal", 81.7),
    ("United Kingdom", 80.9),
    ("Germany", 80.6),
    ("United States", 77.2),
    ("China", 77.1),
    ("Brazil", 75.9),
    ("Russia", 73.2),
    ("India", 70.1),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub country: String,
    pub life_expectancy: f64,
    pub year: u16,
}

/// Records sorted by country name, at most one per country.
#[derive(Debug, Clone)]
pub struct LifeExpectancyTable {
    records: Vec<CountryRecord>,
}

impl LifeExpectancyTable {
    pub fn builtin() -> Self {
        let records = BUILTIN
            .iter()
            .map(|&(country, life_expectancy)| CountryRecord {
                country: country.to_string(),
                life_expectancy,
                year: BUILTIN_YEAR,
            })
            .collect();
        Self::from_sorted(records)
    }

    /// Build a table from arbitrary records. Later records for the same
    /// country (case-insensitive) replace earlier ones.
    pub fn from_records(
        records: impl IntoIterator<Item = CountryRecord>,
    ) -> Result<Self, CountryTableError> {
        let mut merged: Vec<CountryRecord> = Vec::new();
        for record in records {
            if !record.life_expectancy.is_finite() || record.life_expectancy < 0.0 {
                return Err(CountryTableError::InvalidLifeExpectancy {
                    country: record.country,
                    value: record.life_expectancy,
                });
            }
            match merged
                .iter_mut()
                .find(|existing| existing.country.eq_ignore_ascii_case(&record.country))
            {
                Some(existing) => *existing = record,
                None => merged.push(record),
            }
        }

        if merged.is_empty() {
            return Err(CountryTableError::Empty);
        }
        Ok(Self::from_sorted(merged))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CountryTableError> {
        let bytes = std::fs::read(path.as_ref())?;
        let records: Vec<CountryRecord> = serde_json::from_slice(&bytes)?;
        Self::from_records(records)
    }

    fn from_sorted(mut records: Vec<CountryRecord>) -> Self {
        records.sort_by(|a, b| a.country.cmp(&b.country));
        Self { records }
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn lookup(&self, country: &str) -> Option<&CountryRecord> {
        let country = country.trim();
        self.records
            .iter()
            .find(|record| record.country.eq_ignore_ascii_case(country))
    }

    pub fn life_expectancy_or_default(&self, country: &str) -> f64 {
        self.lookup(country)
            .map(|record| record.life_expectancy)
            .unwrap_or(FALLBACK_LIFE_EXPECTANCY)
    }

    /// Case-insensitive substring match on the country name. An empty
    /// query matches everything.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a CountryRecord> + use<'a> {
        let needle = query.trim().to_lowercase();
        self.records
            .iter()
            .filter(move |record| record.country.to_lowercase().contains(&needle))
    }
}

impl Default for LifeExpectancyTable {
    fn default() -> Self {
        Self::builtin()
    }
}
