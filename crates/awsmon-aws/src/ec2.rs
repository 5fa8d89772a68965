//! EC2 `DescribeVolumes` client.

use crate::client::QueryClient;
use crate::error::Result;
use crate::xml::XmlElement;
use crate::{AwsSettings, Tag, Volume, VolumeApi, VolumePage};

const API_VERSION: &str = "2016-11-15";
const PAGE_SIZE: &str = "500";

pub struct Ec2Client {
    query: QueryClient,
}

impl Ec2Client {
    pub fn new(settings: &AwsSettings) -> Result<Self> {
        let credentials = settings.resolve_credentials()?;
        Ok(Self {
            query: QueryClient::new("ec2", &settings.region, credentials)?,
        })
    }
}

#[async_trait::async_trait]
impl VolumeApi for Ec2Client {
    async fn describe_volumes(&self, next_token: Option<&str>) -> Result<VolumePage> {
        let mut params = vec![
            ("Action", "DescribeVolumes"),
            ("Version", API_VERSION),
            ("MaxResults", PAGE_SIZE),
        ];
        if let Some(token) = next_token {
            params.push(("NextToken", token));
        }

        let response = self.query.call(&params).await?;
        Ok(decode_page(&response))
    }
}

fn decode_page(response: &XmlElement) -> VolumePage {
    let mut page = VolumePage {
        next_token: response.child_text("nextToken").map(str::to_string),
        ..Default::default()
    };

    let Some(volume_set) = response.child("volumeSet") else {
        return page;
    };

    for item in volume_set.children_named("item") {
        page.volumes.push(Volume {
            volume_id: item.child_text("volumeId").unwrap_or_default().to_string(),
            volume_type: item
                .child_text("volumeType")
                .unwrap_or_default()
                .to_string(),
            availability_zone: item
                .child_text("availabilityZone")
                .unwrap_or_default()
                .to_string(),
            // DescribeVolumes reports the volume lifecycle state under
            // <status> (creating / available / in-use / ...).
            state: item.child_text("status").unwrap_or_default().to_string(),
            iops: item.child_f64("iops"),
            throughput_mbps: item.child_f64("throughput"),
            tags: decode_tags(item),
        });
    }

    page
}

fn decode_tags(item: &XmlElement) -> Vec<Tag> {
    let Some(tag_set) = item.child("tagSet") else {
        return Vec::new();
    };
    tag_set
        .children_named("item")
        .filter_map(|tag| {
            Some(Tag {
                key: tag.child_text("key")?.to_string(),
                value: tag.child_text("value")?.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    const PAGE_XML: &str = "\
        <DescribeVolumesResponse xmlns=\"http://ec2.amazonaws.com/doc/2016-11-15/\">\
          <requestId>req-1</requestId>\
          <volumeSet>\
            <item>\
              <volumeId>vol-0abc</volumeId>\
              <volumeType>gp3</volumeType>\
              <availabilityZone>us-east-1a</availabilityZone>\
              <status>in-use</status>\
              <iops>3000</iops>\
              <throughput>125</throughput>\
              <tagSet>\
                <item><key>Name</key><value>web-data</value></item>\
                <item><key>env</key><value>prod</value></item>\
              </tagSet>\
            </item>\
            <item>\
              <volumeId>vol-0def</volumeId>\
              <volumeType>standard</volumeType>\
              <availabilityZone>us-east-1b</availabilityZone>\
              <status>available</status>\
            </item>\
          </volumeSet>\
          <nextToken>token-2</nextToken>\
        </DescribeVolumesResponse>";

    #[test]
    fn should_decode_volumes_and_continuation_token() {
        let root = xml::parse(PAGE_XML).expect("document should parse");
        let page = decode_page(&root);

        assert_eq!(page.next_token.as_deref(), Some("token-2"));
        assert_eq!(page.volumes.len(), 2);

        let first = &page.volumes[0];
        assert_eq!(first.volume_id, "vol-0abc");
        assert_eq!(first.volume_type, "gp3");
        assert_eq!(first.availability_zone, "us-east-1a");
        assert_eq!(first.state, "in-use");
        assert_eq!(first.iops, Some(3000.0));
        assert_eq!(first.throughput_mbps, Some(125.0));
        assert_eq!(first.tags.len(), 2);
        assert_eq!(first.tags[0].key, "Name");
        assert_eq!(first.tags[0].value, "web-data");
    }

    #[test]
    fn should_leave_absent_numeric_fields_as_none() {
        let root = xml::parse(PAGE_XML).expect("document should parse");
        let page = decode_page(&root);

        let second = &page.volumes[1];
        assert_eq!(second.iops, None);
        assert_eq!(second.throughput_mbps, None);
        assert!(second.tags.is_empty());
    }

    #[test]
    fn should_decode_final_page_without_token() {
        let root = xml::parse(
            "<DescribeVolumesResponse><requestId>req-2</requestId>\
             <volumeSet/></DescribeVolumesResponse>",
        )
        .expect("document should parse");
        let page = decode_page(&root);

        assert!(page.volumes.is_empty());
        assert_eq!(page.next_token, None);
    }
}
