use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use hnr::app::{build_http_client, App, AppEvent};
use hnr::config::Config;
use hnr::hn::{FixtureSource, HnClient, StorySource};

/// Get the config directory path (~/.config/hnr/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("hnr"))
}

#[derive(Parser, Debug)]
#[command(name = "hnr", version, about = "Terminal Hacker News reader")]
struct Args {
    /// Config file (default: ~/.config/hnr/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read stories from JSON snapshots in DIR instead of the network
    #[arg(long, value_name = "DIR")]
    offline: Option<PathBuf>,

    /// Open this story directly
    #[arg(long, value_name = "ID")]
    story: Option<u64>,

    /// Print the front page (or the --story thread) to stdout and exit
    #[arg(long)]
    dump: bool,
}

/// Log to stderr in dump mode; in the TUI, log to a file only when
/// `RUST_LOG` asks for it, since the terminal belongs to the UI.
fn init_tracing(dump: bool, config_dir: &Path) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();

    if dump {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
    let log_path = config_dir.join("hnr.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn build_source(args: &Args, config: &Config) -> Result<StorySource> {
    if let Some(dir) = &args.offline {
        if !dir.is_dir() {
            anyhow::bail!("Offline snapshot directory not found: {}", dir.display());
        }
        tracing::info!(dir = %dir.display(), "Using offline snapshots");
        return Ok(StorySource::Offline(FixtureSource::new(dir)));
    }

    let http = build_http_client(config).context("Failed to build HTTP client")?;
    let client = HnClient::new(http, config).context("Invalid API configuration")?;
    Ok(StorySource::Live(client))
}

async fn dump(source: &StorySource, story: Option<u64>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match story {
        Some(id) => {
            let story = source
                .fetch_story(id)
                .await
                .with_context(|| format!("Failed to load story {}", id))?;
            hnr::dump::write_thread(&mut out, &story)?;
        }
        None => {
            let stories = source
                .fetch_front_page()
                .await
                .context("Failed to load front page")?;
            hnr::dump::write_front_page(&mut out, &stories)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    init_tracing(args.dump, &config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let source = build_source(&args, &config)?;

    if args.dump {
        return dump(&source, args.story).await;
    }

    let mut app = App::new(source, &config);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    hnr::ui::start(&mut app, args.story, &event_tx);
    hnr::ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
