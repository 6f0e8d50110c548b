use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::EnvFilter;

use stories::constants::{FINISH_TOLERANCE, SLIDE_DURATION};
use stories::content::{ContentSource, JsonFileSource};
use stories::ffmpeg::probe_all;
use stories::navigation::{HostCommand, NavIntent};
use stories::player::ClockedPlayer;
use stories::{CarouselConfig, CarouselSession, DeckPolicy, SlideDeck};

#[derive(Parser, Debug)]
#[command(name = "stories", about = "Full-screen auto-advancing stories carousel")]
struct Args {
    /// JSON file holding the hero slider record
    deck: PathBuf,

    /// How long a slide stays up before it is advanced (milliseconds)
    #[arg(long, default_value_t = SLIDE_DURATION.as_millis() as u64)]
    slide_ms: u64,

    /// Video position this close to the end counts as finished (milliseconds)
    #[arg(long, default_value_t = FINISH_TOLERANCE.as_millis() as u64)]
    tolerance_ms: u64,

    /// Keep slides that lack a title, eyebrow text or background
    #[arg(long)]
    keep_incomplete: bool,

    /// Stop after the deck looped this many times
    #[arg(long)]
    loops: Option<u32>,

    /// Open a window instead of running headless
    #[cfg(feature = "viewer")]
    #[arg(long)]
    viewer: bool,
}

impl Args {
    fn config(&self) -> CarouselConfig {
        CarouselConfig {
            slide_duration: Duration::from_millis(self.slide_ms),
            finish_tolerance: Duration::from_millis(self.tolerance_ms),
            deck_policy: if self.keep_incomplete { DeckPolicy::KeepAll } else { DeckPolicy::CompleteOnly },
            max_loops: self.loops,
            ..CarouselConfig::default()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.config();
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    let deck = match runtime.block_on(load_deck(&args.deck, config.deck_policy)) {
        Ok(deck) => deck,
        Err(e) => {
            #[cfg(feature = "viewer")]
            {
                if args.viewer {
                    stories::viewer::show_error(&format!("{e:#}"));
                }
            }
            return Err(e);
        }
    };
    tracing::info!(slides = deck.len(), videos = deck.videos().count(), "deck ready");

    let durations = probe_all(deck.videos());
    let player = ClockedPlayer::new(durations, config.status_interval);

    #[cfg(feature = "viewer")]
    {
        if args.viewer {
            return stories::viewer::run(&runtime, deck, player, &config);
        }
    }

    runtime.block_on(run_headless(deck, player, &config))
}

async fn load_deck(path: &Path, policy: DeckPolicy) -> Result<SlideDeck> {
    let raw = JsonFileSource::new(path)
        .fetch_hero()
        .await
        .with_context(|| format!("could not load slides from {}", path.display()))?;
    Ok(SlideDeck::from_raw(&raw, policy))
}

async fn run_headless(deck: SlideDeck, player: ClockedPlayer, config: &CarouselConfig) -> Result<()> {
    let (session, handles) = CarouselSession::new(deck, player, config);
    let (quit_tx, quit_rx) = oneshot::channel();
    let input = tokio::spawn(read_commands(handles.intents.clone(), quit_tx));

    println!("Commands: n = next, p = previous, q = quit");
    let shutdown = async {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            quit = quit_rx => {
                // Input ended without a quit; keep running until Ctrl-C
                if quit.is_err() {
                    std::future::pending::<()>().await;
                }
            }
        }
    };

    let summary = session.run(shutdown).await;
    input.abort();
    drop(handles);
    tracing::info!(transitions = summary.transitions, loops = summary.loops, "session ended");
    Ok(())
}

async fn read_commands(intents: mpsc::Sender<NavIntent>, quit: oneshot::Sender<()>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read from stdin");
                return;
            }
        };
        match HostCommand::parse(&line) {
            Some(HostCommand::Navigate(intent)) => {
                if intents.send(intent).await.is_err() {
                    return;
                }
            }
            Some(HostCommand::Quit) => {
                let _ = quit.send(());
                return;
            }
            None if line.trim().is_empty() => {}
            None => println!("Unknown command {:?}", line.trim()),
        }
    }
}
