mod error;
mod provider;
mod s3;

pub use error::{Result, StoreError};
pub use provider::ObjectStore;
pub use s3::{S3Bucket, S3Options};
