use std::{env, fs};

use anyhow::{bail, Context, Result};
use aws_sdk_s3::Client as S3Client;
use encoding_rs::Encoding;
use tracing::info;

use bestsellers::{generate_report, ReportConfig};

#[derive(Debug)]
struct Config {
    input_path: String,
    report: ReportConfig,
    out: Option<String>,
}

fn parse_args() -> Result<Config> {
    let mut args = env::args().skip(1);
    let input_path = match args.next() {
        Some(p) => p,
        None => bail!(
            "Usage: report_cli <path_or_s3_uri> [OPTIONS]\n\n\
             Options:\n  \
             --top-k N          Number of products to rank (default: 10)\n  \
             --encoding LABEL   Source character encoding (default: windows-1252)\n  \
             --out PATH         Write the HTML report to PATH instead of stdout\n\n\
             Examples:\n  \
             report_cli sales.csv --out bestsellers.html\n  \
             report_cli s3://exports/sales-2024.csv --top-k 25"
        ),
    };

    let mut report = ReportConfig::default();
    let mut out: Option<String> = None;

    let rest: Vec<String> = args.collect();
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--top-k" => {
                let value = rest
                    .get(i + 1)
                    .context("--top-k requires a numeric value")?;
                report.top_k = value
                    .parse::<usize>()
                    .context("invalid value for --top-k")?;
                i += 2;
            }
            "--encoding" => {
                let value = rest
                    .get(i + 1)
                    .context("--encoding requires an encoding label")?;
                report.encoding = Encoding::for_label(value.as_bytes())
                    .with_context(|| format!("unknown encoding label '{value}'"))?;
                i += 2;
            }
            "--out" => {
                let value = rest.get(i + 1).context("--out requires a file path")?;
                out = Some(value.clone());
                i += 2;
            }
            other => bail!("Unknown argument: {other}"),
        }
    }

    Ok(Config {
        input_path,
        report,
        out,
    })
}

/// Parse an S3 URI like s3://bucket/key into (bucket, key)
fn parse_s3_uri(uri: &str) -> Option<(String, String)> {
    let stripped = uri.strip_prefix("s3://")?;
    let (bucket, key) = stripped.split_once('/')?;
    Some((bucket.to_string(), key.to_string()))
}

/// Download an object from S3 and return its contents as bytes
async fn download_from_s3(client: &S3Client, bucket: &str, key: &str) -> Result<Vec<u8>> {
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
        .into_bytes()
        .to_vec();

    Ok(bytes)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = parse_args()?;

    // Read from S3 or local file
    let bytes = if let Some((bucket, key)) = parse_s3_uri(&config.input_path) {
        let aws_conf = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        let client = S3Client::new(&aws_conf);
        download_from_s3(&client, &bucket, &key).await?
    } else {
        fs::read(&config.input_path)
            .with_context(|| format!("Failed to read input file: {}", config.input_path))?
    };

    info!(
        input = %config.input_path,
        size = bytes.len(),
        "loaded source object"
    );

    let html = generate_report(&bytes, &config.report)
        .with_context(|| format!("Failed to generate report from {}", config.input_path))?;

    match &config.out {
        Some(path) => {
            fs::write(path, &html)
                .with_context(|| format!("Failed to write HTML report to {path}"))?;
            info!(path = %path, "HTML report written");
        }
        None => print!("{html}"),
    }

    Ok(())
}
