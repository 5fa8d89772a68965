//! Metric family data model shared by all collectors.
//!
//! A [`MetricFamily`] is the uniform output unit of a collection pass: a
//! named, documented gauge with a fixed label schema and the samples gathered
//! during one scrape. Families are built fresh on every scrape and never
//! retained between scrapes.

pub mod text;

use serde::{Deserialize, Serialize};

pub use text::encode_text;

/// One labeled observation within a [`MetricFamily`].
///
/// `label_values` match the family's `label_names` by position and count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub label_values: Vec<String>,
    pub value: f64,
}

/// A named gauge family with a fixed, ordered label schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    /// Creates an empty gauge family with the given label schema.
    pub fn gauge(name: &str, help: &str, label_names: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
            samples: Vec::new(),
        }
    }

    /// Appends one sample. `label_values` must line up with the family's
    /// `label_names`, one value per name, in order.
    pub fn add_sample(&mut self, label_values: Vec<String>, value: f64) {
        debug_assert_eq!(
            label_values.len(),
            self.label_names.len(),
            "label value count must match label name count for {}",
            self.name
        );
        self.samples.push(Sample {
            label_values,
            value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_samples_in_insertion_order() {
        let mut family = MetricFamily::gauge("test_metric", "Test metric", &["id"]);
        family.add_sample(vec!["a".to_string()], 1.0);
        family.add_sample(vec!["b".to_string()], 2.0);

        assert_eq!(family.samples.len(), 2);
        assert_eq!(family.samples[0].label_values, vec!["a"]);
        assert_eq!(family.samples[1].label_values, vec!["b"]);
    }

    #[test]
    fn should_align_label_values_with_label_names() {
        let mut family =
            MetricFamily::gauge("test_metric", "Test metric", &["id", "zone", "state"]);
        family.add_sample(
            vec!["v-1".to_string(), "us-east-1a".to_string(), "in-use".to_string()],
            42.0,
        );

        for sample in &family.samples {
            assert_eq!(sample.label_values.len(), family.label_names.len());
        }
    }
}
