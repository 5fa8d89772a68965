//! Shared HTTP plumbing for the Query API service clients.

use crate::error::{AwsApiError, Result};
use crate::sign::{self, Credentials};
use crate::xml::{self, XmlElement};
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;

/// Signs and issues `POST /` Query API calls against one service endpoint.
pub(crate) struct QueryClient {
    service: String,
    host: String,
    region: String,
    credentials: Credentials,
    http: Client,
}

impl QueryClient {
    pub(crate) fn new(service: &str, region: &str, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            service: service.to_string(),
            host: format!("{}.{}.amazonaws.com", service, region),
            region: region.to_string(),
            credentials,
            http,
        })
    }

    /// Calls one API action and returns the parsed response document root.
    pub(crate) async fn call(&self, params: &[(&str, &str)]) -> Result<XmlElement> {
        let payload = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let signed = sign::sign_request(
            &self.credentials,
            &self.region,
            &self.service,
            &self.host,
            &payload,
            Utc::now(),
        )?;

        let url = format!("https://{}/", self.host);
        let response = self
            .http
            .post(&url)
            .header("Content-Type", sign::CONTENT_TYPE)
            .header("X-Amz-Date", signed.amz_date)
            .header("Authorization", signed.authorization)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            service = %self.service,
            status = status.as_u16(),
            bytes = body.len(),
            "Query API page fetched"
        );

        if !status.is_success() {
            return Err(self.decode_error(status.as_u16(), body));
        }

        xml::parse(&body)
    }

    /// Turns an error response body into a typed error. EC2 wraps errors in
    /// `<Response><Errors><Error>`, RDS in `<ErrorResponse><Error>`; both
    /// carry `Code` and `Message` on the innermost `Error` element.
    fn decode_error(&self, status: u16, body: String) -> AwsApiError {
        if let Ok(root) = xml::parse(&body) {
            if let Some(error) = find_error_element(&root) {
                if let (Some(code), Some(message)) =
                    (error.child_text("Code"), error.child_text("Message"))
                {
                    return AwsApiError::ApiError {
                        service: self.service.clone(),
                        code: code.to_string(),
                        message: message.to_string(),
                    };
                }
            }
        }
        AwsApiError::HttpError {
            service: self.service.clone(),
            status,
            body,
        }
    }
}

fn find_error_element(element: &XmlElement) -> Option<&XmlElement> {
    if element.name == "Error" && element.child("Code").is_some() {
        return Some(element);
    }
    element.children.iter().find_map(find_error_element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_find_ec2_style_error_element() {
        let root = xml::parse(
            "<Response><Errors><Error><Code>AuthFailure</Code>\
             <Message>credentials rejected</Message></Error></Errors>\
             <RequestID>req-1</RequestID></Response>",
        )
        .expect("document should parse");

        let error = find_error_element(&root).expect("error element present");
        assert_eq!(error.child_text("Code"), Some("AuthFailure"));
    }

    #[test]
    fn should_find_rds_style_error_element() {
        let root = xml::parse(
            "<ErrorResponse><Error><Type>Sender</Type><Code>Throttling</Code>\
             <Message>Rate exceeded</Message></Error></ErrorResponse>",
        )
        .expect("document should parse");

        let error = find_error_element(&root).expect("error element present");
        assert_eq!(error.child_text("Code"), Some("Throttling"));
        assert_eq!(error.child_text("Message"), Some("Rate exceeded"));
    }
}
