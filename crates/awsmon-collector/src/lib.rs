//! Collector framework for the AWS exporter.
//!
//! Each [`ResourceCollector`] implementation polls one AWS resource type
//! across all pages of its listing API and returns the results as a vector of
//! [`MetricFamily`]s. The [`collect`] wrapper drives every collector
//! uniformly and contains its failures so one broken data source cannot blank
//! out the rest of the scrape.

pub mod ec2;
pub mod rds;
pub mod registry;

use anyhow::Result;
use awsmon_aws::Tag;
use awsmon_metrics::MetricFamily;

pub use registry::CollectorRegistry;

/// Family emitted in place of a collector's output when its scrape fails.
pub const ERROR_FAMILY_NAME: &str = "aws_collector_error";

/// A resource collector bound to one AWS service.
///
/// Implementations build their service client once, at construction, and keep
/// it for the collector's lifetime; a construction failure is fatal at
/// startup. `collect_metrics` runs on every scrape. The trait requires
/// `Send + Sync` so the registry can be shared across concurrent scrapes.
#[async_trait::async_trait]
pub trait ResourceCollector: Send + Sync {
    /// Collector type name (e.g. `"Ec2VolumeCollector"`), used for logging
    /// and as the `collector_type` label of the error family.
    fn name(&self) -> &'static str;

    /// Polls the resource listing across all pages and returns the fully
    /// built metric families for this pass.
    ///
    /// All families must be materialized before returning so a failure
    /// mid-pagination loses the whole pass, never a partial family.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fetch or decode fails.
    async fn collect_metrics(&self) -> Result<Vec<MetricFamily>>;
}

/// Runs one collector with fault containment.
///
/// On success the produced families are forwarded unchanged. On failure the
/// error is logged and swallowed here, and the collector's entire output for
/// this scrape is replaced by a single [`ERROR_FAMILY_NAME`] family labeled
/// with the collector type and error text, value 1. Errors never propagate to
/// the registry.
pub async fn collect(collector: &dyn ResourceCollector) -> Vec<MetricFamily> {
    match collector.collect_metrics().await {
        Ok(families) => families,
        Err(e) => {
            tracing::error!(
                collector = collector.name(),
                error = %e,
                "Error collecting metrics"
            );
            let mut family = MetricFamily::gauge(
                ERROR_FAMILY_NAME,
                "Error occurred during metrics collection",
                &["collector_type", "error"],
            );
            family.add_sample(vec![collector.name().to_string(), e.to_string()], 1.0);
            vec![family]
        }
    }
}

/// Resolves a resource's display name from its tag set: the value of the tag
/// whose key case-insensitively equals `"name"`, or `"unknown"`.
pub(crate) fn name_from_tags(tags: &[Tag]) -> String {
    tags.iter()
        .find(|tag| tag.key.eq_ignore_ascii_case("name"))
        .map(|tag| tag.value.clone())
        .unwrap_or_else(|| "unknown".to_string())
}
