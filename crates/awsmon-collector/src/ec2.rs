//! EC2 volume collector: per-volume IOPS and throughput gauges.

use crate::{name_from_tags, ResourceCollector};
use anyhow::Result;
use awsmon_aws::ec2::Ec2Client;
use awsmon_aws::{AwsSettings, VolumeApi};
use awsmon_metrics::MetricFamily;

const LABELS: [&str; 5] = [
    "volume_id",
    "volume_type",
    "availability_zone",
    "state",
    "name",
];

pub struct Ec2VolumeCollector {
    client: Box<dyn VolumeApi>,
}

impl Ec2VolumeCollector {
    /// Builds the collector and its EC2 client.
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials resolve or the HTTP client cannot
    /// be built. This propagates to the caller: a collector that cannot
    /// construct its client must fail startup, not scrape silently.
    pub fn new(settings: &AwsSettings) -> Result<Self, awsmon_aws::error::AwsApiError> {
        Ok(Self {
            client: Box::new(Ec2Client::new(settings)?),
        })
    }

    /// Builds the collector over an existing listing client. Used by tests
    /// to substitute a mock API.
    pub fn with_client(client: Box<dyn VolumeApi>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ResourceCollector for Ec2VolumeCollector {
    fn name(&self) -> &'static str {
        "Ec2VolumeCollector"
    }

    async fn collect_metrics(&self) -> Result<Vec<MetricFamily>> {
        let mut iops = MetricFamily::gauge("aws_ec2_volume_iops", "IOPS of EC2 volume", &LABELS);
        let mut throughput = MetricFamily::gauge(
            "aws_ec2_volume_throughput_mbps",
            "Throughput of EC2 volume in MBps",
            &LABELS,
        );

        let mut next_token: Option<String> = None;
        loop {
            let page = self.client.describe_volumes(next_token.as_deref()).await?;
            for volume in page.volumes {
                let label_values = vec![
                    volume.volume_id,
                    volume.volume_type,
                    volume.availability_zone,
                    volume.state,
                    name_from_tags(&volume.tags),
                ];
                // Absent numerics become 0 so every volume contributes one
                // sample to both families.
                iops.add_sample(label_values.clone(), volume.iops.unwrap_or(0.0));
                throughput.add_sample(label_values, volume.throughput_mbps.unwrap_or(0.0));
            }
            next_token = page.next_token;
            if next_token.is_none() {
                break;
            }
        }

        Ok(vec![iops, throughput])
    }
}
