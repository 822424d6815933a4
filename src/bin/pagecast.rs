//! CLI binary for pagecast.
//!
//! A thin interactive shim over the library crate: submit a document URL,
//! then page through it from the terminal. Explanations print to stdout;
//! image and audio artifacts are written to a working directory so they can
//! be opened with whatever viewer/player is at hand.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pagecast::{
    DocumentViewer, HttpGateway, PageLoadReport, PlaybackSettings, ResourceHandle, ViewerConfig,
    ViewerObserver,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal observer ────────────────────────────────────────────────────────

/// Spins while a page load is in flight and reports narration playback
/// settings; artifact printing happens in the main loop from viewer state.
struct TerminalObserver {
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl TerminalObserver {
    fn new(quiet: bool) -> Arc<Self> {
        Arc::new(Self {
            spinner: Mutex::new(None),
            quiet,
        })
    }
}

impl ViewerObserver for TerminalObserver {
    fn loading_changed(&self, loading: bool) {
        if self.quiet {
            return;
        }
        let mut slot = self.spinner.lock().unwrap();
        if loading {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_message("fetching page…");
            bar.enable_steady_tick(Duration::from_millis(80));
            *slot = Some(bar);
        } else if let Some(bar) = slot.take() {
            bar.finish_and_clear();
        }
    }

    fn audio_attached(&self, handle: &ResourceHandle, settings: PlaybackSettings) {
        if self.quiet {
            return;
        }
        let state = if settings.speaking {
            format!("volume {:.2}", settings.volume)
        } else {
            "muted".to_string()
        };
        eprintln!(
            "{}",
            dim(&format!(
                "narration ready ({}, {} bytes, {state})",
                handle.content_type(),
                handle.len()
            ))
        );
    }
}

const AFTER_HELP: &str = r#"COMMANDS (at the `pagecast>` prompt):
  n             next page            (Page-Down in the web UI)
  p             previous page        (Page-Up in the web UI)
  g <page>      go to a page
  r             jump to a random page
  x             regenerate the current page's explanation
  v <volume>    set narration volume (0.0 - 1.0)
  m             toggle narration on/off
  u <url>       submit a new document URL (replaces the session)
  s             show session status
  q             quit

EXAMPLES:
  # Page through an arXiv paper served by a local backend
  pagecast https://arxiv.org/pdf/1706.03762

  # Point at a remote backend, start muted
  pagecast --backend https://reader.example.com --muted <url>

  # Keep artifacts somewhere specific
  pagecast --artifacts-dir ~/reader-out <url>

ENVIRONMENT VARIABLES:
  PAGECAST_BACKEND   Backend base URL (same as --backend)
  RUST_LOG           Tracing filter, e.g. RUST_LOG=pagecast=debug
"#;

/// Page through a remote document with explanations, images, and narration.
#[derive(Parser, Debug)]
#[command(
    name = "pagecast",
    version,
    about = "Page through a remote document with per-page explanations, images, and narration",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document URL to submit on startup.
    url: String,

    /// Backend base URL.
    #[arg(long, env = "PAGECAST_BACKEND", default_value = "http://localhost:8000")]
    backend: String,

    /// Initial narration volume (0.0 - 1.0).
    #[arg(long, default_value_t = 0.5)]
    volume: f32,

    /// Start with narration disabled.
    #[arg(long)]
    muted: bool,

    /// Per-request HTTP timeout in seconds (unset: wait forever, like the
    /// web UI does).
    #[arg(long)]
    timeout: Option<u64>,

    /// Bound the image cache to this many entries.
    #[arg(long)]
    cache_capacity: Option<usize>,

    /// Directory for fetched image/audio artifacts.
    #[arg(long, default_value = "pagecast-artifacts")]
    artifacts_dir: PathBuf,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress everything except explanations and errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let mut builder = ViewerConfig::builder()
        .base_url(&cli.backend)
        .volume(cli.volume)
        .speaking(!cli.muted);
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(cap) = cli.cache_capacity {
        builder = builder.cache_capacity(cap);
    }
    let config = builder.build().context("Invalid configuration")?;

    std::fs::create_dir_all(&cli.artifacts_dir)
        .with_context(|| format!("Failed to create {}", cli.artifacts_dir.display()))?;

    let gateway = Arc::new(HttpGateway::new(&config).context("Failed to build HTTP gateway")?);
    let observer = TerminalObserver::new(cli.quiet);
    let viewer = DocumentViewer::with_observer(gateway, &config, observer);

    let report = viewer
        .submit_url(&cli.url)
        .await
        .context("Failed to open document session")?;
    show_page(&viewer, &report, &cli.artifacts_dir, cli.quiet);

    // ── Command loop ─────────────────────────────────────────────────────
    let stdin = io::stdin();
    loop {
        eprint!("{} ", bold("pagecast>"));
        io::stderr().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let mut parts = line.split_whitespace();
        let cmd = match parts.next() {
            Some(c) => c,
            None => continue,
        };
        let arg = parts.next();

        let outcome = match cmd {
            "n" | "next" => viewer.next().await.map_err(anyhow::Error::from),
            "p" | "prev" | "previous" => viewer.previous().await.map_err(anyhow::Error::from),
            "r" | "random" => viewer.random().await.map_err(anyhow::Error::from),
            "x" | "regen" | "regenerate" => {
                viewer.regenerate().await.map(Some).map_err(anyhow::Error::from)
            }
            "g" | "goto" => match arg.and_then(|a| a.parse::<u32>().ok()) {
                Some(page) => viewer.go_to(page).await.map_err(anyhow::Error::from),
                None => {
                    eprintln!("{}", red("usage: g <page>"));
                    continue;
                }
            },
            "v" | "volume" => match arg.and_then(|a| a.parse::<f32>().ok()) {
                Some(vol) => {
                    viewer.set_volume(vol);
                    eprintln!("volume {:.2}", viewer.playback().volume);
                    continue;
                }
                None => {
                    eprintln!("{}", red("usage: v <0.0-1.0>"));
                    continue;
                }
            },
            "m" | "mute" => {
                let speaking = !viewer.playback().speaking;
                viewer.set_speaking(speaking);
                eprintln!("narration {}", if speaking { "on" } else { "off" });
                continue;
            }
            "u" | "url" => match arg {
                Some(url) => viewer.submit_url(url).await.map(Some).map_err(anyhow::Error::from),
                None => {
                    eprintln!("{}", red("usage: u <url>"));
                    continue;
                }
            },
            "s" | "status" => {
                print_status(&viewer);
                continue;
            }
            "q" | "quit" | "exit" => break,
            other => {
                eprintln!("{}", red(&format!("unknown command '{other}' (try: n p g r x v m u s q)")));
                continue;
            }
        };

        match outcome {
            Ok(Some(report)) => show_page(&viewer, &report, &cli.artifacts_dir, cli.quiet),
            Ok(None) => eprintln!("{}", dim("(no page change)")),
            Err(e) => eprintln!("{} {e:#}", red("error:")),
        }
    }

    Ok(())
}

/// Print the page header + explanation and write binary artifacts to disk.
fn show_page(viewer: &DocumentViewer, report: &PageLoadReport, artifacts_dir: &Path, quiet: bool) {
    let content = viewer.content();
    let (page, total) = match (viewer.current_page(), viewer.page_count()) {
        (Some(p), Some(t)) => (p, t),
        _ => return,
    };

    if report.stale {
        eprintln!("{}", dim("(superseded by a newer page load)"));
        return;
    }

    if !quiet {
        let status = if report.failed() {
            red(&format!("partial: {}", report.summary()))
        } else {
            green("ok")
        };
        eprintln!("{} {}", bold(&format!("── Page {page}/{total}")), status);
    }

    println!("{}", content.explanation);

    if let Some(ref image) = content.image {
        report_artifact(artifacts_dir, "page", page, image, quiet);
    }
    if let Some(ref audio) = content.audio {
        report_artifact(artifacts_dir, "narration", page, audio, quiet);
    }
}

fn report_artifact(dir: &Path, kind: &str, page: u32, handle: &ResourceHandle, quiet: bool) {
    let path = dir.join(format!("{kind}_{page:04}.{}", extension_for(handle.content_type())));
    match std::fs::write(&path, handle.data()) {
        Ok(()) => {
            if !quiet {
                eprintln!("{}", dim(&format!("{kind} → {}", path.display())));
            }
        }
        Err(e) => eprintln!("{} failed to write {}: {e}", red("error:"), path.display()),
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type.split(';').next().unwrap_or("").trim() {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/mpeg" => "mp3",
        "audio/ogg" => "ogg",
        _ => "bin",
    }
}

fn print_status(viewer: &DocumentViewer) {
    match (viewer.session_id(), viewer.current_page(), viewer.page_count()) {
        (Some(id), Some(page), Some(total)) => {
            let playback = viewer.playback();
            eprintln!("session:   {id}");
            eprintln!("page:      {page}/{total}");
            eprintln!(
                "narration: {} (volume {:.2})",
                if playback.speaking { "on" } else { "off" },
                playback.volume
            );
            eprintln!("loading:   {}", viewer.is_loading());
        }
        _ => eprintln!("no active session"),
    }
}
