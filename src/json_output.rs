//! JSON output format for profiling results

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::report::generate_result;
use crate::sample_set::SampleSet;

/// Totals for a single category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCategoryTotal {
    /// Category label (e.g., "CPU", "SQL")
    pub category: String,
    /// Accumulated elapsed time in milliseconds
    pub elapsed_ms: u64,
    /// Number of scopes opened for this category
    pub occurrences: u64,
}

/// A named counter and its accumulated value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCounter {
    pub name: String,
    pub value: i64,
}

/// A complete profiling report in machine-readable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonReport {
    /// Subject label (if the reported scope was labeled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// One entry per category, declaration order
    pub categories: Vec<JsonCategoryTotal>,
    /// Time not attributed to any category, milliseconds
    pub unaccounted_ms: u64,
    /// Total wall-clock time since the segment epoch, milliseconds
    pub total_ms: u64,
    /// Counters in insertion order
    pub counters: Vec<JsonCounter>,
}

impl JsonReport {
    /// Build a report from a sample set, measuring total time up to now
    pub fn from_sample_set(set: &SampleSet) -> Self {
        let result = generate_result(set);
        let categories = Category::ALL
            .iter()
            .map(|&category| {
                let sample = set.sample(category);
                JsonCategoryTotal {
                    category: category.label().to_string(),
                    elapsed_ms: sample.elapsed().as_millis() as u64,
                    occurrences: sample.occurrences(),
                }
            })
            .collect();
        let counters = set
            .counters()
            .map(|(name, value)| JsonCounter {
                name: name.to_string(),
                value,
            })
            .collect();
        JsonReport {
            subject: set.subject().map(str::to_string),
            categories,
            unaccounted_ms: result.unaccounted.as_millis() as u64,
            total_ms: result.total.as_millis() as u64,
            counters,
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Deserialize from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
