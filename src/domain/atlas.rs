/// Country atlas: the ordered country/city reference list.
///
/// ## Sources (priority order):
///   1. `countries.json` at the configured path
///   2. Built-in fallback list (ten countries)
///
/// The file is a JSON array of `{"country": ..., "cities": [...]}`
/// entries. Array order is the unlock chain order, so the file is kept
/// as an ordered list, never a map.

use std::path::Path;

use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::warn;

/// One atlas entry: a country and the cities a run can target.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Country {
    pub country: String,
    pub cities: Vec<String>,
}

impl Country {
    /// Random target city for a run. None when the entry has no cities.
    pub fn pick_city(&self) -> Option<String> {
        self.cities.choose(&mut rand::thread_rng()).cloned()
    }
}

/// The ordered country list. Order defines the unlock chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atlas {
    entries: Vec<Country>,
}

impl Atlas {
    /// Load from `path`. A missing or malformed file falls back to the
    /// built-in list so the game always has a map to offer.
    pub fn load(path: &Path) -> Atlas {
        match try_load(path) {
            Some(entries) => Atlas { entries },
            None => {
                warn!(
                    path = %path.display(),
                    "countries file missing or invalid, using built-in list"
                );
                Atlas::fallback()
            }
        }
    }

    /// The built-in ten-country list.
    pub fn fallback() -> Atlas {
        Atlas { entries: fallback_entries() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Country] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&Country> {
        self.entries.get(idx)
    }

    /// Entry by exact country name.
    pub fn find(&self, country: &str) -> Option<&Country> {
        self.entries.iter().find(|c| c.country == country)
    }

    /// Country names in chain order, for the unlock rules.
    pub fn country_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|c| c.country.as_str()).collect()
    }
}

/// Read and validate a countries file. Any problem yields None:
/// the top level must be a non-empty array and every entry needs a
/// non-blank country name.
fn try_load(path: &Path) -> Option<Vec<Country>> {
    let text = std::fs::read_to_string(path).ok()?;
    let entries: Vec<Country> = serde_json::from_str(&text).ok()?;
    if entries.is_empty() || entries.iter().any(|c| c.country.trim().is_empty()) {
        return None;
    }
    Some(entries)
}

fn fallback_entries() -> Vec<Country> {
    let raw: &[(&str, &[&str])] = &[
        ("India", &["Mumbai", "Delhi", "Bengaluru", "Chennai"]),
        ("Sweden", &["Stockholm", "Gothenburg", "Malmö", "Uppsala"]),
        ("USA", &["New York", "Los Angeles", "Chicago", "Houston"]),
        ("Japan", &["Tokyo", "Osaka", "Yokohama", "Nagoya"]),
        ("Brazil", &["São Paulo", "Rio", "Brasília", "Salvador"]),
        ("Australia", &["Sydney", "Melbourne", "Brisbane", "Perth"]),
        ("Egypt", &["Cairo", "Alexandria", "Giza", "Shubra El Kheima"]),
        ("Germany", &["Berlin", "Hamburg", "Munich", "Cologne"]),
        ("UK", &["London", "Birmingham", "Manchester", "Leeds"]),
        ("France", &["Paris", "Marseille", "Lyon", "Toulouse"]),
    ];
    raw.iter()
        .map(|(country, cities)| Country {
            country: country.to_string(),
            cities: cities.iter().map(|c| c.to_string()).collect(),
        })
        .collect()
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
