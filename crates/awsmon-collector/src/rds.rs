//! RDS instance collector: per-instance allocated storage and provisioned
//! IOPS gauges.

use crate::ResourceCollector;
use anyhow::Result;
use awsmon_aws::rds::RdsClient;
use awsmon_aws::{AwsSettings, DbInstanceApi};
use awsmon_metrics::MetricFamily;

const LABELS: [&str; 5] = [
    "dbinstance_identifier",
    "db_instance_class",
    "engine",
    "availability_zone",
    "status",
];

pub struct RdsInstanceCollector {
    client: Box<dyn DbInstanceApi>,
}

impl RdsInstanceCollector {
    /// Builds the collector and its RDS client. Construction failure
    /// propagates and is fatal at startup.
    pub fn new(settings: &AwsSettings) -> Result<Self, awsmon_aws::error::AwsApiError> {
        Ok(Self {
            client: Box::new(RdsClient::new(settings)?),
        })
    }

    /// Builds the collector over an existing listing client. Used by tests
    /// to substitute a mock API.
    pub fn with_client(client: Box<dyn DbInstanceApi>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ResourceCollector for RdsInstanceCollector {
    fn name(&self) -> &'static str {
        "RdsInstanceCollector"
    }

    async fn collect_metrics(&self) -> Result<Vec<MetricFamily>> {
        let mut storage = MetricFamily::gauge(
            "aws_rds_allocated_storage_gb",
            "Allocated storage size of RDS instance in GB",
            &LABELS,
        );
        let mut iops = MetricFamily::gauge(
            "aws_rds_provisioned_iops",
            "Provisioned IOPS of RDS instance",
            &LABELS,
        );

        let mut marker: Option<String> = None;
        loop {
            let page = self.client.describe_db_instances(marker.as_deref()).await?;
            for instance in page.instances {
                let label_values = vec![
                    instance.identifier,
                    instance.instance_class,
                    instance.engine,
                    instance.availability_zone,
                    instance.status,
                ];
                storage.add_sample(
                    label_values.clone(),
                    instance.allocated_storage_gb.unwrap_or(0.0),
                );
                iops.add_sample(label_values, instance.provisioned_iops.unwrap_or(0.0));
            }
            marker = page.marker;
            if marker.is_none() {
                break;
            }
        }

        Ok(vec![storage, iops])
    }
}
