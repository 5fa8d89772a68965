/// Errors that can occur when calling the AWS Query APIs.
#[derive(Debug, thiserror::Error)]
pub enum AwsApiError {
    /// HTTP-level error: non-2xx status code whose body could not be decoded
    /// as a structured API error.
    #[error("{service} API HTTP error: status={status}, body={body}")]
    HttpError {
        service: String,
        status: u16,
        body: String,
    },

    /// Structured error payload returned by the service.
    #[error("{service} API error: code={code}, message={message}")]
    ApiError {
        service: String,
        code: String,
        message: String,
    },

    /// An underlying HTTP transport error from `reqwest`.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The response body is not well-formed XML or is missing required fields.
    #[error("XML decode error: {0}")]
    XmlError(String),

    /// HMAC signing failed (invalid key length or algorithm mismatch).
    #[error("Signing error: {0}")]
    SigningError(String),

    /// No static credential pair was configured and none was found in the
    /// environment.
    #[error("No AWS credentials: set aws.access_key_id/aws.secret_access_key or the AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY environment variables")]
    MissingCredentials,
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, AwsApiError>;
