//! `mail-launch`: run the email launcher against a saved HTML page.
//!
//! Usage:
//!   mail-launch extract page.html [--json]
//!   mail-launch launch page.html [--dry-run] [--french]
//!   mail-launch variables page.html

mod config;
mod host;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use mail_launcher::{
    detect_variables, extract, find_primary_editor, Clipboard, Document, LauncherConfig,
    LauncherSession, Navigator, SessionEvent, StrategyTag,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::host::{EchoClipboard, EchoNavigator, SystemClipboard, SystemNavigator};

/// Timer kinds that keep a launch in flight.
const IN_FLIGHT: &[&str] = &["retry", "clipboard-settled", "navigate"];

#[derive(Parser)]
#[command(name = "mail-launch")]
#[command(about = "Harvest subject and body from a page and hand them to the mail client")]
struct Cli {
    /// TOML config file (defaults to $MAIL_LAUNCHER_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one extraction pass and print what it found
    Extract {
        /// Saved HTML page
        file: PathBuf,

        /// Print the extraction as JSON
        #[arg(long)]
        json: bool,
    },
    /// Activate the launcher: copy to the clipboard and open the mail client
    Launch {
        /// Saved HTML page
        file: PathBuf,

        /// Print the clipboard text and URI instead of using them
        #[arg(long)]
        dry_run: bool,

        /// French labels
        #[arg(long)]
        french: bool,

        /// Give up on pending timers after this many milliseconds
        #[arg(long, default_value_t = 5000)]
        timeout_ms: u64,
    },
    /// List <<Variable>> tokens found in the page's primary editor
    Variables {
        /// Saved HTML page
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mail_launcher=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { file, json } => {
            let config = config::resolve(cli.config, false)?;
            run_extract(&file, &config, json)
        }
        Commands::Launch {
            file,
            dry_run,
            french,
            timeout_ms,
        } => {
            let config = config::resolve(cli.config, french)?;
            let doc = load_page(&file)?;
            let timeout = Duration::from_millis(timeout_ms);
            if dry_run {
                run_launch(doc, config, EchoClipboard, EchoNavigator, timeout).await
            } else {
                run_launch(doc, config, SystemClipboard::new(), SystemNavigator, timeout).await
            }
        }
        Commands::Variables { file } => run_variables(&file),
    }
}

fn load_page(path: &Path) -> Result<Document> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Document::parse_html(&html))
}

fn source(tag: Option<StrategyTag>) -> String {
    tag.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
}

fn run_extract(path: &Path, config: &LauncherConfig, json: bool) -> Result<()> {
    let doc = load_page(path)?;
    let extraction = extract(&doc, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&extraction)?);
        return Ok(());
    }

    if extraction.is_empty() {
        println!("{}", "No content found".bright_yellow());
        return Ok(());
    }

    let subject_source = if extraction.provenance.derived_subject {
        "derived".to_string()
    } else {
        source(extraction.provenance.subject)
    };
    println!(
        "{} {} {}",
        "Subject:".bright_green().bold(),
        extraction.result.subject,
        format!("({})", subject_source).dimmed()
    );
    println!(
        "{} {}",
        "Body:".bright_green().bold(),
        format!("({})", source(extraction.provenance.body)).dimmed()
    );
    println!("{}", extraction.result.body);
    Ok(())
}

/// Full session: inject, activate, then sleep through the timers in real
/// time until the launch settles.
async fn run_launch<C, N>(
    doc: Document,
    config: LauncherConfig,
    clipboard: C,
    navigator: N,
    timeout: Duration,
) -> Result<()>
where
    C: Clipboard,
    N: Navigator,
{
    let mut session = LauncherSession::new(doc, config, clipboard, navigator)
        .context("Failed to start launcher session")?;
    session.start();
    session.activate();

    let started = tokio::time::Instant::now();
    while IN_FLIGHT.iter().any(|kind| session.pending(kind) > 0) {
        let Some(deadline) = session.next_deadline() else {
            break;
        };
        let wait = deadline.saturating_sub(session.now());
        if started.elapsed() + wait > timeout {
            tracing::warn!(?timeout, "Gave up waiting for pending timers");
            break;
        }
        tokio::time::sleep(wait).await;
        session.advance(wait);
    }

    report(session.events());
    Ok(())
}

fn report(events: &[SessionEvent]) {
    for event in events {
        match event {
            SessionEvent::RetryScheduled { delay } => {
                println!("{} retrying in {:?}", "…".bright_yellow(), delay)
            }
            SessionEvent::NoContent => println!("{}", "✗ No content found".bright_red()),
            SessionEvent::NothingToSend => println!("{}", "✗ Nothing to send".bright_red()),
            SessionEvent::Copied { via, .. } => {
                println!("{} copied ({:?})", "✓".bright_green(), via)
            }
            SessionEvent::CopyFailed { error } => {
                println!("{} copy failed: {}", "✗".bright_red(), error)
            }
            SessionEvent::NavigationScheduled { long: true, .. } => println!(
                "{}",
                "! mailto URI is long, the mail client may truncate it".bright_yellow()
            ),
            SessionEvent::Navigated { .. } => {
                println!("{} mail client opened", "✓".bright_green())
            }
            SessionEvent::HandlerFailed { context, reason } => {
                println!("{} {} failed: {}", "✗".bright_red(), context, reason)
            }
            _ => {}
        }
    }
}

fn run_variables(path: &Path) -> Result<()> {
    let doc = load_page(path)?;
    let Some(editor) = find_primary_editor(&doc) else {
        println!("{}", "No editor found".bright_yellow());
        return Ok(());
    };

    let variables = detect_variables(&doc.field_text(editor));
    if variables.is_empty() {
        println!("{}", "No variables".dimmed());
    }
    for name in variables {
        println!("  {} {}", "•".bright_cyan(), name);
    }
    Ok(())
}
