//! Registry of active collectors, aggregated per scrape.

use crate::{collect, ResourceCollector};
use awsmon_metrics::MetricFamily;

/// Holds the set of registered collectors for the process's lifetime.
///
/// Registration is append-only and happens during startup; after that the
/// registry is read-only and can be shared behind an `Arc`, so concurrent
/// scrapes evaluate independently without locking.
#[derive(Default)]
pub struct CollectorRegistry {
    collectors: Vec<Box<dyn ResourceCollector>>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collector to the active set. There is no deregistration.
    pub fn register(&mut self, collector: Box<dyn ResourceCollector>) {
        tracing::info!(collector = collector.name(), "Collector registered");
        self.collectors.push(collector);
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Runs every collector in registration order and concatenates the
    /// emitted families into one payload.
    ///
    /// Each collector's own fault containment (see [`collect`]) means no
    /// additional error handling happens here; a failed collector shows up as
    /// its error family in the same position its normal output would occupy.
    pub async fn collect_all(&self) -> Vec<MetricFamily> {
        let mut families = Vec::new();
        for collector in &self.collectors {
            families.extend(collect(collector.as_ref()).await);
        }
        families
    }
}
