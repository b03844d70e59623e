use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::{data::Value, sanitize::percentage};

pub const OTHER_BUCKET: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFrequencies {
    pub entries: Vec<FrequencyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_bucket: Option<FrequencyEntry>,
    pub distinct_count: usize,
    pub total: usize,
}

impl CategoryFrequencies {
    pub fn accounted(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum::<usize>()
            + self.other_bucket.as_ref().map_or(0, |o| o.count)
    }
}

#[derive(Debug, Default)]
pub(crate) struct FrequencyAccumulator {
    total: usize,
    counts: BTreeMap<String, usize>,
}

impl FrequencyAccumulator {
    pub(crate) fn ingest(&mut self, value: &Value) {
        let Some(key) = value.as_display() else {
            return;
        };
        self.total += 1;
        *self.counts.entry(key.into_owned()).or_insert(0) += 1;
    }

    /// Top `top` values with at least `min_frequency` occurrences, highest
    /// count first and ties in value order. Whatever is left over is folded
    /// into the `Other` bucket.
    pub(crate) fn finish(self, top: usize, min_frequency: usize) -> CategoryFrequencies {
        let total = self.total;
        let distinct_count = self.counts.len();
        let entries: Vec<FrequencyEntry> = self
            .counts
            .into_iter()
            .filter(|(_, count)| *count >= min_frequency)
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .take(top)
            .map(|(value, count)| FrequencyEntry {
                value,
                count,
                percentage: percentage(count, total, 0.0),
            })
            .collect();

        let listed: usize = entries.iter().map(|e| e.count).sum();
        let residual = total - listed;
        let other_bucket = (residual > 0).then(|| FrequencyEntry {
            value: OTHER_BUCKET.to_string(),
            count: residual,
            percentage: percentage(residual, total, 0.0),
        });

        CategoryFrequencies {
            entries,
            other_bucket,
            distinct_count,
            total,
        }
    }
}
