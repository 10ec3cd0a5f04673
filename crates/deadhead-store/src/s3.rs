use async_trait::async_trait;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use chrono::{DateTime, Utc};
use deadhead_retention::ObjectInfo;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::provider::ObjectStore;

// DeleteObjects accepts at most 1000 keys per request.
const MAX_DELETE_BATCH: usize = 1_000;

/// Connection settings for a bucket session.
#[derive(Debug, Clone, Default)]
pub struct S3Options {
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub force_path_style: bool,
}

/// An authenticated bucket session, shared by the listing and deletion
/// phases of a run.
pub struct S3Bucket {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Bucket {
    /// Resolves credentials once and builds the client.
    ///
    /// Explicit keys take precedence when both are supplied; otherwise the
    /// SDK default chain (environment, profile, instance metadata) applies.
    /// Resolution happens eagerly so a misconfigured environment fails here
    /// instead of halfway through a run.
    pub async fn connect(options: S3Options) -> Result<Self> {
        let S3Options {
            bucket,
            region,
            endpoint_url,
            access_key,
            secret_key,
            force_path_style,
        } = options;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }

        if let (Some(access_key), Some(secret_key)) = (access_key, secret_key) {
            let credentials = aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "deadhead-cli",
            );
            loader = loader.credentials_provider(credentials);
        }

        let sdk_config = loader.load().await;

        let provider = sdk_config
            .credentials_provider()
            .ok_or(StoreError::NoCredentials)?;
        provider.provide_credentials().await?;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint_url) = endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        if force_path_style {
            builder = builder.force_path_style(true);
        }

        info!("Opened S3 session for bucket {}", bucket);

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket,
        })
    }

    /// Collects the keys belonging to a deployment: the bare `deployment_id`
    /// object plus everything under `deployment_id/`. The server-side prefix
    /// narrows the scan; the exact membership check keeps siblings like
    /// `app10` out of an `app1` delete.
    async fn deployment_keys(&self, deployment_id: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(deployment_id)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(request_error)?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter(|key| belongs_to_deployment(key, deployment_id))
                    .map(str::to_string),
            );

            match page.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }
}

#[async_trait]
impl ObjectStore for S3Bucket {
    async fn list_objects(&self) -> Result<Vec<ObjectInfo>> {
        let mut objects = Vec::new();
        let mut continuation_token = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(request_error)?;

            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                let Some(last_modified) = object.last_modified().and_then(to_utc) else {
                    continue;
                };

                objects.push(ObjectInfo {
                    key: key.to_string(),
                    last_modified,
                });
            }

            match page.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!("Listed {} object(s) in bucket {}", objects.len(), self.bucket);

        Ok(objects)
    }

    async fn delete_deployment(&self, deployment_id: &str) -> Result<u64> {
        let keys = self.deployment_keys(deployment_id).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        debug!(
            "Deleting {} object(s) under deployment {}",
            keys.len(),
            deployment_id
        );

        for batch in keys.chunks(MAX_DELETE_BATCH) {
            let identifiers = batch
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let delete = Delete::builder().set_objects(Some(identifiers)).build()?;

            let response = self
                .client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(request_error)?;

            let failures = response.errors();
            if let Some(failure) = failures.first() {
                return Err(StoreError::S3(format!(
                    "{} object(s) under {} failed to delete, first was {}: {}",
                    failures.len(),
                    deployment_id,
                    failure.key().unwrap_or("<unknown key>"),
                    failure.message().unwrap_or("no message"),
                )));
            }
        }

        Ok(keys.len() as u64)
    }
}

fn belongs_to_deployment(key: &str, deployment_id: &str) -> bool {
    match key.strip_prefix(deployment_id) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

fn to_utc(timestamp: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

fn request_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    StoreError::S3(DisplayErrorContext(err).to_string())
}
