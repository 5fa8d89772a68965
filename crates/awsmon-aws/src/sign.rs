//! AWS Signature Version 4 for POST form-encoded Query API calls.

use crate::error::{AwsApiError, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

const SIGNED_HEADERS: &str = "content-type;host;x-amz-date";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Headers produced by signing one request.
#[derive(Debug)]
pub struct SignedRequest {
    pub authorization: String,
    pub amz_date: String,
}

/// Signs a `POST /` Query API request with SigV4.
///
/// The signed header set is fixed to `content-type;host;x-amz-date`, which is
/// all these requests carry.
pub fn sign_request(
    credentials: &Credentials,
    region: &str,
    service: &str,
    host: &str,
    payload: &str,
    timestamp: DateTime<Utc>,
) -> Result<SignedRequest> {
    let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
    let date = timestamp.format("%Y%m%d").to_string();

    // Step 1: canonical request
    let canonical_headers = format!(
        "content-type:{}\nhost:{}\nx-amz-date:{}\n",
        CONTENT_TYPE, host, amz_date
    );
    let hashed_payload = format!("{:x}", Sha256::digest(payload.as_bytes()));
    let canonical_request = format!(
        "POST\n/\n\n{}\n{}\n{}",
        canonical_headers, SIGNED_HEADERS, hashed_payload
    );
    let hashed_canonical_request = format!("{:x}", Sha256::digest(canonical_request.as_bytes()));

    // Step 2: string to sign
    let credential_scope = format!("{}/{}/{}/aws4_request", date, region, service);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        amz_date, credential_scope, hashed_canonical_request
    );

    // Step 3: signature
    let secret_date = hmac_sha256(
        format!("AWS4{}", credentials.secret_access_key).as_bytes(),
        date.as_bytes(),
    )?;
    let secret_region = hmac_sha256(&secret_date, region.as_bytes())?;
    let secret_service = hmac_sha256(&secret_region, service.as_bytes())?;
    let secret_signing = hmac_sha256(&secret_service, b"aws4_request")?;
    let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes())?);

    // Step 4: authorization header
    let authorization = format!(
        "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
        credentials.access_key_id, credential_scope, SIGNED_HEADERS, signature
    );

    Ok(SignedRequest {
        authorization,
        amz_date,
    })
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AwsApiError::SigningError(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_credentials() -> Credentials {
        Credentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
        }
    }

    #[test]
    fn should_build_authorization_with_credential_scope() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let signed = sign_request(
            &test_credentials(),
            "us-east-1",
            "ec2",
            "ec2.us-east-1.amazonaws.com",
            "Action=DescribeVolumes&Version=2016-11-15",
            timestamp,
        )
        .expect("signing should succeed");

        assert!(signed.authorization.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240101/us-east-1/ec2/aws4_request"
        ));
        assert!(signed
            .authorization
            .contains("SignedHeaders=content-type;host;x-amz-date"));
        assert_eq!(signed.amz_date, "20240101T120000Z");
    }

    #[test]
    fn should_produce_64_hex_char_signature() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let signed = sign_request(
            &test_credentials(),
            "us-east-1",
            "rds",
            "rds.us-east-1.amazonaws.com",
            "Action=DescribeDBInstances&Version=2014-10-31",
            timestamp,
        )
        .expect("signing should succeed");

        let signature = signed
            .authorization
            .rsplit("Signature=")
            .next()
            .expect("signature present");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn should_be_deterministic_for_identical_inputs() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let a = sign_request(
            &test_credentials(),
            "us-east-1",
            "ec2",
            "ec2.us-east-1.amazonaws.com",
            "Action=DescribeVolumes",
            timestamp,
        )
        .expect("signing should succeed");
        let b = sign_request(
            &test_credentials(),
            "us-east-1",
            "ec2",
            "ec2.us-east-1.amazonaws.com",
            "Action=DescribeVolumes",
            timestamp,
        )
        .expect("signing should succeed");

        assert_eq!(a.authorization, b.authorization);
    }

    #[test]
    fn should_change_signature_when_payload_changes() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let a = sign_request(
            &test_credentials(),
            "us-east-1",
            "ec2",
            "ec2.us-east-1.amazonaws.com",
            "Action=DescribeVolumes",
            timestamp,
        )
        .expect("signing should succeed");
        let b = sign_request(
            &test_credentials(),
            "us-east-1",
            "ec2",
            "ec2.us-east-1.amazonaws.com",
            "Action=DescribeVolumes&NextToken=abc",
            timestamp,
        )
        .expect("signing should succeed");

        assert_ne!(a.authorization, b.authorization);
    }
}
