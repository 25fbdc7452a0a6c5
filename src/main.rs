use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tweetstream::config::Config;
use tweetstream::display::format_tweet;
use tweetstream::feeds::{pump, JsonLinesSource, MessageSource};
use tweetstream::{parse_tweet, session, Category, TwitterData};

#[derive(Parser)]
#[command(name = "tweetstream")]
#[command(about = "Replay a tweet stream into a categorized, filterable feed", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/tweetstream/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a newline-delimited JSON capture and print the feed, newest first
    Replay {
        /// Capture file, or "-" for stdin
        input: Option<PathBuf>,

        /// Keyword the capture was tracked with
        #[arg(short, long)]
        keyword: Option<String>,

        /// Hide a category after the replay (repeatable)
        #[arg(long, value_enum)]
        hide: Vec<Category>,
    },
    /// Parse every message and print the records (or parse errors) as JSON
    Parse {
        /// Capture file, or "-" for stdin
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Replay {
            input,
            keyword,
            hide,
        } => {
            let keyword = keyword.unwrap_or_else(|| config.keyword.clone());
            replay(input.as_deref(), keyword, &hide, &config).await
        }
        Commands::Parse { input } => parse(input.as_deref()).await,
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn open_source(input: Option<&Path>) -> Result<Box<dyn MessageSource>> {
    match input {
        Some(path) if path != Path::new("-") => {
            Ok(Box::new(JsonLinesSource::open(path).await?))
        }
        _ => Ok(Box::new(JsonLinesSource::stdin())),
    }
}

async fn replay(
    input: Option<&Path>,
    keyword: String,
    hide: &[Category],
    config: &Config,
) -> Result<()> {
    let mut source = open_source(input).await?;
    let (handle, mut events, task) = session::spawn(keyword.clone(), config);

    let watcher = async move {
        let mut discarded = 0usize;
        while let Some(message) = events.recv().await {
            match message.data {
                TwitterData::FirstOfCategory(category) => {
                    info!(session = %message.session_id, %category, "new category in feed");
                }
                TwitterData::Discarded(_) => discarded += 1,
                _ => {}
            }
        }
        discarded
    };

    let feeder = async move {
        let forwarded = pump(source.as_mut(), &handle).await?;

        // Only toggle categories that actually hold tweets.
        for category in hide {
            if handle.count(*category).await? != 0 {
                handle.toggle_filter(*category).await?;
            }
        }

        let keys = handle.filtered_keys().await?;
        let limit = match config.display.max_items {
            0 => keys.len(),
            n => n,
        };
        for key in keys.into_iter().take(limit) {
            let (record, category) = handle.record(key).await?;
            print!("{}", format_tweet(key, &record, category, &config.display));
        }
        Ok::<usize, anyhow::Error>(forwarded)
    };

    let (forwarded, discarded) = futures::future::join(feeder, watcher).await;
    let forwarded = forwarded?;
    task.await?;
    info!(
        keyword = %keyword,
        forwarded,
        discarded,
        "replay finished"
    );
    Ok(())
}

async fn parse(input: Option<&Path>) -> Result<()> {
    let mut source = open_source(input).await?;
    while let Some(raw) = source.next_message().await? {
        let line = match parse_tweet(&raw) {
            Ok(record) => serde_json::to_string(&record)?,
            Err(error) => serde_json::json!({ "error": error.to_string() }).to_string(),
        };
        println!("{}", line);
    }
    Ok(())
}
