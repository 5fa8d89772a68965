//! RDS `DescribeDBInstances` client.

use crate::client::QueryClient;
use crate::error::{AwsApiError, Result};
use crate::xml::XmlElement;
use crate::{AwsSettings, DbInstance, DbInstanceApi, DbInstancePage};

const API_VERSION: &str = "2014-10-31";
const PAGE_SIZE: &str = "100";

pub struct RdsClient {
    query: QueryClient,
}

impl RdsClient {
    pub fn new(settings: &AwsSettings) -> Result<Self> {
        let credentials = settings.resolve_credentials()?;
        Ok(Self {
            query: QueryClient::new("rds", &settings.region, credentials)?,
        })
    }
}

#[async_trait::async_trait]
impl DbInstanceApi for RdsClient {
    async fn describe_db_instances(&self, marker: Option<&str>) -> Result<DbInstancePage> {
        let mut params = vec![
            ("Action", "DescribeDBInstances"),
            ("Version", API_VERSION),
            ("MaxRecords", PAGE_SIZE),
        ];
        if let Some(marker) = marker {
            params.push(("Marker", marker));
        }

        let response = self.query.call(&params).await?;
        decode_page(&response)
    }
}

fn decode_page(response: &XmlElement) -> Result<DbInstancePage> {
    // RDS nests the payload one level deeper than EC2:
    // DescribeDBInstancesResponse > DescribeDBInstancesResult > DBInstances.
    let result = response
        .child("DescribeDBInstancesResult")
        .ok_or_else(|| AwsApiError::XmlError("missing DescribeDBInstancesResult".to_string()))?;

    let mut page = DbInstancePage {
        marker: result.child_text("Marker").map(str::to_string),
        ..Default::default()
    };

    let Some(instances) = result.child("DBInstances") else {
        return Ok(page);
    };

    for item in instances.children_named("DBInstance") {
        page.instances.push(DbInstance {
            identifier: item
                .child_text("DBInstanceIdentifier")
                .unwrap_or_default()
                .to_string(),
            instance_class: item
                .child_text("DBInstanceClass")
                .unwrap_or_default()
                .to_string(),
            engine: item.child_text("Engine").unwrap_or_default().to_string(),
            availability_zone: item
                .child_text("AvailabilityZone")
                .unwrap_or_default()
                .to_string(),
            status: item
                .child_text("DBInstanceStatus")
                .unwrap_or_default()
                .to_string(),
            allocated_storage_gb: item.child_f64("AllocatedStorage"),
            provisioned_iops: item.child_f64("Iops"),
        });
    }

    Ok(page)
}
