// ABOUTME: CLI that enumerates feed items and optionally extracts each article's text.
// ABOUTME: Loads feeds from URL, file or stdin and prints a JSON envelope.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use cetd_core::{Extractor, Segment};
use cetd_feed::{parse_feed_bytes, select_items, FeedItem};
use cetd_web::Fetcher;
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Enumerate feed items and extract their main text.
#[derive(Parser, Debug)]
#[command(name = "cetd-feed")]
#[command(about = "List feed items and optionally extract each article by text density", long_about = None)]
struct Args {
    /// Feed URL(s) or local file paths. Use "-" to read one feed from stdin.
    #[arg(required = true)]
    targets: Vec<String>,

    /// Maximum number of items taken from the head of each feed.
    #[arg(long, default_value_t = 10)]
    max_items: usize,

    /// Fetch every selected item and extract its content.
    #[arg(long, default_value_t = false)]
    extract: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Debug, Serialize)]
struct ItemReport {
    #[serde(flatten)]
    item: FeedItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    segments: Option<Vec<Segment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn is_url(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

async fn load_bytes(fetcher: &Fetcher, target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    if is_url(target) {
        let fetched = fetcher.get_with_retry(target).await?;
        return Ok(fetched.body.to_vec());
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}

async fn extract_item(fetcher: &Fetcher, extractor: &Extractor, item: FeedItem) -> ItemReport {
    let outcome = async {
        let fetched = fetcher.get_with_retry(&item.link).await?;
        let extraction = extractor.extract(&fetched.text_utf8())?;
        anyhow::Ok(extraction)
    }
    .await;

    match outcome {
        Ok(extraction) => ItemReport {
            text: Some(extraction.text()),
            segments: Some(extraction.segments),
            error: None,
            item,
        },
        Err(err) => {
            tracing::warn!(link = %item.link, error = %err, "item extraction failed");
            ItemReport {
                segments: None,
                text: None,
                error: Some(err.to_string()),
                item,
            }
        }
    }
}

async fn process_target(
    fetcher: &Fetcher,
    extractor: &Extractor,
    target: &str,
    args: &Args,
) -> Result<serde_json::Value> {
    let bytes = load_bytes(fetcher, target).await?;
    let feed = parse_feed_bytes(&bytes, target)?;
    let items = select_items(&feed, args.max_items)?;

    let mut reports = Vec::with_capacity(items.len());
    for item in items {
        let report = if args.extract {
            extract_item(fetcher, extractor, item).await
        } else {
            ItemReport {
                item,
                segments: None,
                text: None,
                error: None,
            }
        };
        reports.push(report);
    }

    Ok(json!({
        "title": feed.title,
        "home_url": feed.home_url,
        "items": reports,
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let fetcher = Fetcher::builder().build()?;
    let extractor = Extractor::default();

    let mut results = Vec::new();
    for target in &args.targets {
        match process_target(&fetcher, &extractor, target, &args).await {
            Ok(feed) => results.push(json!({
                "feed_url": target,
                "ok": true,
                "feed": feed,
                "error": null
            })),
            Err(err) => results.push(json!({
                "feed_url": target,
                "ok": false,
                "feed": null,
                "error": err.to_string()
            })),
        }
    }

    let parsed = results
        .iter()
        .filter(|r| r.get("ok").and_then(|v| v.as_bool()) == Some(true))
        .count();
    let output = json!({
        "feeds": results,
        "total_feeds": results.len(),
        "parsed": parsed,
        "failed": results.len() - parsed
    });

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}
