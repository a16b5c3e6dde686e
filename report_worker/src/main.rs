use std::io::{Read, Write};
use std::{env, fs};

use anyhow::{bail, Context, Result};
use aws_sdk_s3::Client as S3Client;
use encoding_rs::Encoding;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::info;

use bestsellers::{generate_report, ReportConfig};

/// S3 event notification document, reduced to the fields the worker consumes.
#[derive(Debug, Deserialize)]
struct S3Event {
    #[serde(rename = "Records", default)]
    records: Vec<S3EventRecord>,
}

#[derive(Debug, Deserialize)]
struct S3EventRecord {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: S3Bucket,
    object: S3Object,
}

#[derive(Debug, Deserialize)]
struct S3Bucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct S3Object {
    key: String,
}

#[derive(Debug)]
struct WorkerConfig {
    report_bucket: String,
    report_prefix: String,
    report: ReportConfig,
}

impl WorkerConfig {
    fn from_env() -> Result<Self> {
        let report_bucket =
            env::var("REPORT_BUCKET").context("REPORT_BUCKET environment variable required")?;
        let report_prefix = env::var("REPORT_PREFIX").unwrap_or_default();

        let mut report = ReportConfig::default();
        if let Ok(value) = env::var("TOP_K") {
            report.top_k = value
                .parse::<usize>()
                .context("invalid value for TOP_K")?;
        }
        if let Ok(value) = env::var("SOURCE_ENCODING") {
            report.encoding = Encoding::for_label(value.as_bytes())
                .with_context(|| format!("unknown encoding label '{value}' in SOURCE_ENCODING"))?;
        }

        Ok(Self {
            report_bucket,
            report_prefix,
            report,
        })
    }
}

/// S3 event notifications URL-encode object keys: '+' stands for a space and
/// reserved characters arrive percent-escaped.
fn decode_object_key(raw: &str) -> Result<String> {
    let unplussed = raw.replace('+', " ");
    let decoded = urlencoding::decode(&unplussed)
        .with_context(|| format!("Object key is not valid UTF-8 once decoded: {raw}"))?;
    Ok(decoded.into_owned())
}

/// Build the report object key from the source key: the source file name
/// loses its `.csv` suffix and gains `.html` under the configured prefix.
fn report_key(prefix: &str, source_key: &str) -> String {
    let name = source_key.rsplit('/').next().unwrap_or(source_key);
    let stem = name.strip_suffix(".csv").unwrap_or(name);

    if prefix.is_empty() {
        format!("{stem}.html")
    } else {
        format!("{}/{stem}.html", prefix.trim_end_matches('/'))
    }
}

/// Download the source object into a scoped temporary file.
///
/// The file is removed when the returned handle drops, on every exit path.
async fn spool_source_object(
    client: &S3Client,
    bucket: &str,
    key: &str,
) -> Result<NamedTempFile> {
    let resp = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .with_context(|| format!("Failed to download s3://{bucket}/{key}"))?;

    let bytes = resp
        .body
        .collect()
        .await
        .with_context(|| "Failed to read S3 object body")?
        .into_bytes();

    let mut spool = NamedTempFile::new().context("Failed to create spool file")?;
    spool
        .write_all(&bytes)
        .context("Failed to spool source object")?;

    Ok(spool)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let event_path = match env::args().nth(1) {
        Some(p) => p,
        None => bail!(
            "Usage: report_worker <event.json | ->\n\n\
             Reads an S3 event notification document (from a file, or stdin\n\
             when given '-'), generates the bestsellers report for the\n\
             referenced object, and uploads it to $REPORT_BUCKET.\n\n\
             Environment:\n  \
             REPORT_BUCKET      Destination bucket for the report (required)\n  \
             REPORT_PREFIX      Key prefix for report objects (optional)\n  \
             TOP_K              Number of products to rank (default: 10)\n  \
             SOURCE_ENCODING    Source encoding label (default: windows-1252)"
        ),
    };

    let config = WorkerConfig::from_env()?;

    let raw_event = if event_path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        fs::read_to_string(&event_path)
            .with_context(|| format!("Failed to read event file: {event_path}"))?
    };

    let event: S3Event =
        serde_json::from_str(&raw_event).context("Failed to parse S3 event notification")?;
    let record = event
        .records
        .first()
        .context("S3 event notification carries no records")?;

    let source_bucket = &record.s3.bucket.name;
    let source_key = decode_object_key(&record.s3.object.key)?;

    info!(bucket = %source_bucket, key = %source_key, "processing source object");

    let aws_conf = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;
    let client = S3Client::new(&aws_conf);

    let spool = spool_source_object(&client, source_bucket, &source_key).await?;
    let bytes = fs::read(spool.path()).context("Failed to read spooled source object")?;

    let html = generate_report(&bytes, &config.report).with_context(|| {
        format!("Failed to generate report for s3://{source_bucket}/{source_key}")
    })?;

    let key = report_key(&config.report_prefix, &source_key);
    info!(bucket = %config.report_bucket, key = %key, "uploading report");

    client
        .put_object()
        .bucket(&config.report_bucket)
        .key(&key)
        .body(html.into_bytes().into())
        .content_type("text/html; charset=utf-8")
        .send()
        .await
        .with_context(|| {
            format!(
                "Failed to upload report to s3://{}/{}",
                config.report_bucket, key
            )
        })?;

    info!("report published");

    Ok(())
}
