use anyhow::{Context, anyhow};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, error::SdkError};

use crate::application::ports::object_storage::ObjectStorage;
use crate::bootstrap::config::Config;
use crate::infrastructure::storage::bucket_public_url;

/// S3-compatible bucket (AWS, MinIO, or Cloud Storage through its XML
/// interoperability endpoint with HMAC keys).
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    public_origin: String,
}

impl S3ObjectStorage {
    pub async fn new(cfg: &Config) -> anyhow::Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &cfg.s3_region {
            loader = loader.region(Region::new(region.clone()));
        }

        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);

        if let (Some(access), Some(secret)) = (&cfg.s3_access_key, &cfg.s3_secret_key) {
            let creds = Credentials::new(
                access.clone(),
                secret.clone(),
                None,
                None,
                "restaurant-api-static",
            );
            builder = builder.credentials_provider(creds);
        }

        if let Some(endpoint) = &cfg.s3_endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }

        if cfg.s3_use_path_style {
            builder = builder.force_path_style(true);
        }

        let client = Client::from_conf(builder.build());
        let bucket = cfg.storage_bucket.clone();

        require_bucket(&client, &bucket).await?;
        tracing::info!(bucket = %bucket, "object_storage_ready");

        Ok(Self {
            client,
            bucket,
            public_origin: cfg.storage_public_base_url.clone(),
        })
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .with_context(|| format!("failed to put object {key}"))?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("failed to delete object {key}"))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        bucket_public_url(&self.public_origin, &self.bucket, key)
    }
}

/// The bucket must already exist with public read access; it is never created
/// here because a freshly created bucket is private.
async fn require_bucket(client: &Client, bucket: &str) -> anyhow::Result<()> {
    let outcome = client.head_bucket().bucket(bucket).send().await;
    bucket_presence(bucket, outcome)
}

fn bucket_presence<T, R>(
    bucket: &str,
    outcome: Result<T, SdkError<HeadBucketError, R>>,
) -> anyhow::Result<()>
where
    R: std::fmt::Debug,
{
    match outcome {
        Ok(_) => Ok(()),
        Err(SdkError::ServiceError(service_err)) => match service_err.err() {
            HeadBucketError::NotFound(_) => Err(anyhow!(
                "bucket {bucket} does not exist; create it with public read access before starting"
            )),
            other => Err(anyhow!(other.to_string())),
        },
        Err(err) => Err(anyhow!(err.to_string())),
    }
}
