use anyhow::{Context, Result};
use lotofeed::{
    fetch::{self, FeedSource},
    process::ColumnMapping,
};
use reqwest::Client;
use std::{env, process::exit};
use tracing_subscriber::EnvFilter;
use url::Url;

enum Source {
    Sheet(String),
    Feed(String),
}

#[tokio::main]
async fn main() {
    // Keep the report readable: library logs only show up on request.
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env).init();

    let args: Vec<String> = env::args().collect();
    let source = match args.len() {
        1 => Source::Sheet(fetch::DEFAULT_SHEET_ID.to_string()),
        2 => Source::Sheet(args[1].clone()),
        3 if args[1] == "--url" => Source::Feed(args[2].clone()),
        _ => {
            eprintln!("Usage: {} [SHEET_ID | --url FEED_URL]", args[0]);
            exit(1);
        }
    };
    if let Err(e) = inspect_feed(source).await {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Fetch the raw table and print what the normalizer would see: every column
/// with its derived field key, plus a sample of the first row's cells.
async fn inspect_feed(source: Source) -> Result<()> {
    let client = Client::new();
    let (table, shown) = match source {
        Source::Sheet(id) => {
            let src = FeedSource::new(id);
            let url = src.gviz_url()?;
            (fetch::fetch_table(&client, &src).await?, url.to_string())
        }
        Source::Feed(raw) => {
            let url = Url::parse(&raw).with_context(|| format!("parsing feed URL {}", raw))?;
            (fetch::fetch_table_from(&client, &url).await?, raw)
        }
    };

    println!("=== Feed: {} ===", shown);
    println!("Columns: {}", table.cols.len());
    println!("Rows:    {}", table.rows.len());
    println!();

    // Same mapping the normalizer builds, flipped to column order.
    let mapping = ColumnMapping::from_columns(&table.cols);
    let mut keys_by_index: Vec<Option<(&str, bool)>> = vec![None; table.cols.len()];
    for (key, col) in mapping.iter() {
        if let Some(slot) = keys_by_index.get_mut(col.index) {
            *slot = Some((key, col.logo_url.is_some()));
        }
    }

    println!("=== Columns ===");
    for (i, col) in table.cols.iter().enumerate() {
        let label = col.label.as_deref().unwrap_or("<none>");
        let ty = col.ty.as_deref().unwrap_or("-");
        let key = match keys_by_index[i] {
            Some((key, true)) => format!("{} (logo)", key),
            Some((key, false)) => key.to_string(),
            None => "<unmapped>".to_string(),
        };
        println!(
            "- {:>2} [{:<2}] {:<8} | {:<45} | {}",
            i, col.id, ty, label, key
        );
    }
    println!();

    if let Some(row) = table.rows.first() {
        println!("=== First Row ===");
        for (i, cell) in row.c.iter().enumerate() {
            match cell {
                Some(cell) => match cell.f.as_deref() {
                    Some(f) => println!("  {:>2}: {:<30} (f: {})", i, cell.v.as_text(), f),
                    None => println!("  {:>2}: {}", i, cell.v.as_text()),
                },
                None => println!("  {:>2}: <null>", i),
            }
        }
    }

    Ok(())
}
