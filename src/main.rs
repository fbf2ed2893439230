use anyhow::{Context, Result};
use lotofeed::{
    fetch::{self, FeedSource},
    process::{self, DrawRecord, DrawSet},
    render::{draw_card, embed_url, iframe_snippet, options_html, Banner, JackpotFormat},
};
use reqwest::Client;
use std::{env, fs, path::PathBuf, process::exit};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

/// Env var overriding the built-in sheet id, checked after `--sheet`.
const SHEET_ID_ENV: &str = "LOTOFEED_SHEET_ID";

struct Options {
    sheet: Option<String>,
    url: Option<String>,
    draw: Option<String>,
    date: Option<String>,
    html: bool,
    embed_base: Option<String>,
    out: Option<PathBuf>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [--sheet ID] [--url FEED_URL] [--draw N] [--date DD-MM-YYYY] \
         [--html] [--embed BASE_URL] [--out FILE]",
        program
    )
}

fn flag_value(args: &[String], i: usize, name: &str) -> String {
    match args.get(i + 1) {
        Some(v) => v.clone(),
        None => {
            eprintln!("{} needs a value\n{}", name, usage(&args[0]));
            exit(1);
        }
    }
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().collect();
    let mut opts = Options {
        sheet: None,
        url: None,
        draw: None,
        date: None,
        html: false,
        embed_base: None,
        out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--sheet" => {
                opts.sheet = Some(flag_value(&args, i, "--sheet"));
                i += 1;
            }
            "--url" => {
                opts.url = Some(flag_value(&args, i, "--url"));
                i += 1;
            }
            "--draw" => {
                opts.draw = Some(flag_value(&args, i, "--draw"));
                i += 1;
            }
            "--date" => {
                opts.date = Some(flag_value(&args, i, "--date"));
                i += 1;
            }
            "--html" => opts.html = true,
            "--embed" => {
                opts.embed_base = Some(flag_value(&args, i, "--embed"));
                i += 1;
            }
            "--out" => {
                opts.out = Some(PathBuf::from(flag_value(&args, i, "--out")));
                i += 1;
            }
            "--help" | "-h" => {
                println!("{}", usage(&args[0]));
                exit(0);
            }
            other => {
                eprintln!("unknown flag {}\n{}", other, usage(&args[0]));
                exit(1);
            }
        }
        i += 1;
    }
    opts
}

#[tokio::main]
async fn main() {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    let opts = parse_args();
    if let Err(e) = run(opts).await {
        error!("{:#}", e);
        eprintln!("could not load draw data, try again");
        exit(1);
    }
}

async fn run(opts: Options) -> Result<()> {
    // ─── 2) one fetch ────────────────────────────────────────────────
    let client = Client::new();
    let table = match &opts.url {
        Some(raw) => {
            let url = Url::parse(raw).with_context(|| format!("parsing feed URL {}", raw))?;
            fetch::fetch_table_from(&client, &url).await?
        }
        None => {
            let sheet = opts
                .sheet
                .clone()
                .or_else(|| env::var(SHEET_ID_ENV).ok())
                .unwrap_or_else(|| fetch::DEFAULT_SHEET_ID.to_string());
            fetch::fetch_table(&client, &FeedSource::new(sheet)).await?
        }
    };

    // ─── 3) normalize ────────────────────────────────────────────────
    let draws = process::normalize_table(&table);
    if draws.is_empty() {
        warn!("feed contained no draw rows");
        println!("no draws available");
        return Ok(());
    }
    info!(draws = draws.len(), "draw set ready");

    // ─── 4) optional JSON export ─────────────────────────────────────
    if let Some(path) = &opts.out {
        let json = serde_json::to_string_pretty(&draws)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote draw export");
    }

    // ─── 5) select and show ──────────────────────────────────────────
    let selected = select_records(&draws, &opts);
    if selected.is_empty() {
        println!("no draw matches the requested filters");
        return Ok(());
    }

    if opts.html {
        print!(
            "{}",
            options_html(
                "Selecciona sorteo",
                draws.records().iter().map(|r| r.draw_number.as_str()),
            )
        );
        print!(
            "{}",
            options_html(
                "Selecciona fecha",
                draws.records().iter().map(|r| r.date.as_str()),
            )
        );
        for record in &selected {
            print!("{}", draw_card(record));
        }
    } else {
        let banner = Banner::for_record(selected[0], JackpotFormat::default());
        println!("{}", banner.headline);
        println!("{}", banner.jackpot);
        for record in &selected {
            println!();
            print_summary(record);
        }
    }

    if let Some(base) = &opts.embed_base {
        let url = embed_url(base, &selected[0].draw_number)?;
        println!("\n{}", iframe_snippet(&url));
    }

    Ok(())
}

fn select_records<'a>(draws: &'a DrawSet, opts: &Options) -> Vec<&'a DrawRecord> {
    match (&opts.draw, &opts.date) {
        (None, None) => draws.latest().into_iter().collect(),
        (draw, date) => draws.filter(draw.as_deref(), date.as_deref()),
    }
}

fn print_summary(record: &DrawRecord) {
    println!("Sorteo LOTO {}  {}", record.draw_number, record.date);
    for (name, game) in record.games.iter() {
        if game.is_empty() {
            continue;
        }
        match game {
            process::GameView::Numbers(g) => {
                let nums: Vec<String> = g.numbers.iter().map(u32::to_string).collect();
                println!("  {:<14} {}", name.to_uppercase(), nums.join(" - "));
            }
            process::GameView::Combo(g) => {
                println!("  {}:", name.to_uppercase());
                for play in &g.plays {
                    let nums: Vec<String> = play.iter().map(u32::to_string).collect();
                    println!("    {}", nums.join(" - "));
                }
            }
        }
    }
}
