use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No credentials provider configured for this session")]
    NoCredentials,

    #[error("Unable to resolve AWS credentials: {0}")]
    Credentials(#[from] aws_credential_types::provider::error::CredentialsError),

    #[error("S3 request failed: {0}")]
    S3(String),

    #[error("Malformed delete request: {0}")]
    MalformedDelete(#[from] aws_sdk_s3::error::BuildError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
