//! Subfeed - browse the media of a subreddit from the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use subfeed_core::{AppConfig, LayoutMode, SortMode, StatusState, TimeWindow};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use viewer::{RenderParameters, UiPort, Viewer};

const DEFAULT_FILTER: &str = "subfeed=info,viewer=info,reddit_client=info";
const VERBOSE_FILTER: &str = "subfeed=debug,subfeed_core=debug,viewer=debug,reddit_client=debug,media_feed=debug";

/// Subfeed - fetch one page of a subreddit and lay out its images and videos.
#[derive(Parser)]
#[command(name = "subfeed")]
#[command(about = "Reddit media feed viewer")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "SUBFEED_CONFIG")]
    config: Option<PathBuf>,

    /// Reddit application client id
    #[arg(long, env = "SUBFEED_CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,

    /// Reddit application client secret
    #[arg(long, env = "SUBFEED_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Subreddit or multireddit, e.g. `pics` or `pics+aww`
    #[arg(short, long)]
    channel: Option<String>,

    /// Sort mode: best, hot, new, top or rising
    #[arg(long)]
    sort: Option<SortMode>,

    /// Time window for `top`: hour, day, week, month, year or all
    #[arg(long)]
    time: Option<TimeWindow>,

    /// Number of posts to fetch (1-100)
    #[arg(short, long)]
    limit: Option<String>,

    /// Layout mode: grid or list
    #[arg(long)]
    layout: Option<LayoutMode>,

    /// Grid columns
    #[arg(long)]
    columns: Option<u32>,

    /// Thumbnail size in pixels
    #[arg(long)]
    size: Option<u32>,

    /// Print the rendered feed as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(client_id) = &self.client_id {
            config.reddit.client_id = Some(client_id.clone());
        }
        if let Some(client_secret) = &self.client_secret {
            config.reddit.client_secret = Some(client_secret.clone());
        }
        if let Some(channel) = &self.channel {
            config.feed.channel = Some(channel.clone());
        }
        if let Some(sort) = self.sort {
            config.feed.sort = sort;
        }
        if let Some(time) = self.time {
            config.feed.time_window = Some(time);
        }
        if let Some(limit) = &self.limit {
            config.feed.limit = limit.clone();
        }
        if let Some(layout) = self.layout {
            config.feed.layout = layout;
        }
        if let Some(columns) = self.columns {
            config.feed.columns = columns;
        }
        if let Some(size) = self.size {
            config.feed.thumbnail_size = size;
        }
    }
}

/// Writes the feed to stdout.
struct TerminalPort {
    json: bool,
}

impl UiPort for TerminalPort {
    fn clear_feed(&self) {
        debug!("Feed cleared");
    }

    fn show_feed(&self, feed: &media_feed::RenderedFeed) {
        if self.json {
            match serde_json::to_string_pretty(feed) {
                Ok(out) => println!("{}", out),
                Err(e) => tracing::error!("Failed to serialize feed: {}", e),
            }
            return;
        }

        for card in &feed.cards {
            println!("[{}] {}", card.media.kind.as_str(), card.title);
            println!("    {}", card.media.src);
            println!("    {}", card.link);
        }
        for row in &feed.links {
            println!("[link] {}", row.permalink.href);
            println!("    {}", row.url.href);
        }
    }

    fn apply_layout(&self, params: &RenderParameters) {
        let properties: Vec<String> = params
            .custom_properties()
            .into_iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect();
        info!("Layout {} ({})", params.class_name(), properties.join("; "));
    }

    fn set_time_filter_visible(&self, visible: bool) {
        debug!("Time filter visible: {}", visible);
    }
}

fn print_status(status: &StatusState) {
    if status.is_error {
        eprintln!("error: {}", status.message);
    } else {
        eprintln!("{}", status.message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_to(&mut config);

    let port = Arc::new(TerminalPort { json: cli.json });
    let viewer = Viewer::from_config(&config, port).context("building viewer")?;

    let mut updates = viewer.status().subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let status = updates.borrow_and_update().clone();
            print_status(&status);
        }
    });

    viewer.initialize();
    viewer.refresh().await;

    let final_status = viewer.status().current();
    // Dropping the viewer closes the status channel and ends the printer.
    drop(viewer);
    printer.await.context("status printer")?;

    if final_status.is_error {
        std::process::exit(1);
    }
    Ok(())
}
