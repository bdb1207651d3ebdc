//! Figures bucket: created on demand with a public-read policy, holding images
//! referenced from generated reports.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Largest accepted figure: 10 MB.
pub const MAX_FIGURE_BYTES: usize = 10_485_760;

/// Accepted MIME types and the extension stored for each.
const ALLOWED_TYPES: [(&str, &str); 5] = [
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/svg+xml", "svg"),
];

#[derive(Debug, Error, PartialEq)]
pub enum FigureError {
    #[error("Unsupported figure type '{0}'")]
    UnsupportedType(String),

    #[error("Figure is {size} bytes; the limit is {MAX_FIGURE_BYTES}")]
    TooLarge { size: usize },

    #[error("Figure is empty")]
    Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadedFigure {
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

/// Checks type and size, returning the file extension to store under.
pub fn validate_figure(content_type: &str, size: usize) -> Result<&'static str, FigureError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let ext = ALLOWED_TYPES
        .iter()
        .find(|(t, _)| *t == mime)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| FigureError::UnsupportedType(content_type.to_string()))?;

    if size == 0 {
        return Err(FigureError::Empty);
    }
    if size > MAX_FIGURE_BYTES {
        return Err(FigureError::TooLarge { size });
    }
    Ok(ext)
}

/// Bucket policy granting anonymous `s3:GetObject` on every object.
pub fn public_read_policy(bucket: &str) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": {"AWS": ["*"]},
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{bucket}/*")]
        }]
    })
    .to_string()
}

/// Creates the bucket with a public-read policy if it does not exist.
/// Returns true when the bucket was created by this call.
pub async fn ensure_figures_bucket(
    s3: &S3Client,
    bucket: &str,
    region: &str,
) -> anyhow::Result<bool> {
    let listing = s3
        .list_buckets()
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 list_buckets failed: {e}"))?;

    let exists = listing.buckets().iter().any(|b| b.name() == Some(bucket));
    if exists {
        info!("Bucket '{bucket}' already exists, skipping creation");
        return Ok(false);
    }

    info!("Bucket '{bucket}' not found, creating");
    let mut create = s3.create_bucket().bucket(bucket);
    if region != "us-east-1" {
        create = create.create_bucket_configuration(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build(),
        );
    }
    create
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 create_bucket failed: {e}"))?;

    s3.put_bucket_policy()
        .bucket(bucket)
        .policy(public_read_policy(bucket))
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 put_bucket_policy failed: {e}"))?;

    info!(bucket, "Figures bucket created with public read policy");
    Ok(true)
}

/// Stores a validated figure under `figures/<uuid>.<ext>`.
pub async fn upload_figure(
    s3: &S3Client,
    bucket: &str,
    ext: &str,
    content_type: &str,
    bytes: Bytes,
) -> anyhow::Result<String> {
    let key = format!("figures/{}.{ext}", Uuid::new_v4());
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

    info!("Uploaded figure to s3://{bucket}/{key}");
    Ok(key)
}
