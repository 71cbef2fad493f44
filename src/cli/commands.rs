use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::clipboard::copy_item;
use crate::display::to_duration;
use crate::models::{HistoryItem, PasteMode};
use crate::session::DEFAULT_PWSH;
use crate::source::{ClipboardSource, SourceConfig};
use crate::tui::{App, PickerEntry, PickerTerminal, build_entries};

#[derive(Parser)]
#[command(name = "cliphist-bridge")]
#[command(version = "0.1.0")]
#[command(about = "Browse the Windows clipboard history through a PowerShell helper", long_about = None)]
pub struct Cli {
    /// PowerShell executable used to spawn the helper
    #[arg(long, default_value = DEFAULT_PWSH)]
    pub pwsh: PathBuf,

    /// Directory containing the helper's support modules
    #[arg(long)]
    pub module_dir: Option<PathBuf>,

    /// History snapshot time-to-live in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub ttl_ms: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the current clipboard history
    List {
        /// Maximum number of entries to show
        #[arg(long, default_value_t = 20)]
        max: usize,
        /// Emit raw JSON items instead of the rendered listing
        #[arg(long)]
        json: bool,
        /// Abbreviation width budget in display columns (0 = unlimited)
        #[arg(long, default_value_t = 80)]
        max_width: usize,
    },
    /// Fuzzy-pick an entry and copy it back to the clipboard
    Pick {
        /// Maximum number of entries to offer
        #[arg(long, default_value_t = 100)]
        max: usize,
    },
    /// Copy the entry at a given index back to the clipboard
    Copy {
        /// Zero-based index into the history (0 = newest)
        index: usize,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let defaults = SourceConfig::default();
    let config = SourceConfig {
        pwsh: cli.pwsh,
        module_dir: cli.module_dir.unwrap_or(defaults.module_dir),
        cache_ttl: Duration::from_millis(cli.ttl_ms),
        placeholder: defaults.placeholder,
        extra_unprintable: defaults.extra_unprintable,
    };

    match cli.command {
        Some(Commands::List { max, json, max_width }) => list(config, max, json, max_width).await,
        Some(Commands::Pick { max }) => pick(config, max).await,
        Some(Commands::Copy { index }) => copy(config, index).await,
        None => {
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

async fn list(config: SourceConfig, max: usize, json: bool, max_width: usize) -> Result<()> {
    let source = ClipboardSource::connect(config).await?;
    let result = list_inner(&source, max, json, max_width).await;
    source.dispose().await;
    result
}

async fn list_inner(
    source: &ClipboardSource,
    max: usize,
    json: bool,
    max_width: usize,
) -> Result<()> {
    let items = source.get_history(max).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let now = Utc::now();
    for (index, item) in items.iter().enumerate() {
        let display = source.build_display(&item.normalized_text(), max_width, false);
        println!("{:02}:{:0>3}: {}", index, to_duration(item.age_millis(now)), display.abbr);
    }
    Ok(())
}

async fn copy(config: SourceConfig, index: usize) -> Result<()> {
    let source = ClipboardSource::connect(config).await?;
    let result = source.get_history(index + 1).await;
    source.dispose().await;

    let items = result?;
    let item = items
        .get(index)
        .with_context(|| format!("No history entry at index {} ({} available)", index, items.len()))?;
    let mode = copy_item(item)?;
    println!("Copied entry {} ({})", index, mode_label(mode));
    Ok(())
}

async fn pick(config: SourceConfig, max: usize) -> Result<()> {
    let source = ClipboardSource::connect(config).await?;
    let result = run_picker(&source, max);
    source.dispose().await;

    if let Some(item) = result? {
        let mode = copy_item(&item)?;
        println!("Copied ({})", mode_label(mode));
    }
    Ok(())
}

/// Drive the blocking picker loop from async context. `block_in_place` keeps
/// the runtime alive for the refresh closure, which re-enters it with
/// `Handle::block_on`.
fn run_picker(source: &ClipboardSource, max: usize) -> Result<Option<HistoryItem>> {
    tokio::task::block_in_place(|| {
        let handle = tokio::runtime::Handle::current();
        let renderer = source.renderer().clone();
        let abbr_width = crossterm::terminal::size()
            .map(|(cols, _)| (cols as usize).saturating_sub(12))
            .unwrap_or(80);

        let mut refresh = move || -> Result<Vec<PickerEntry>> {
            let items = handle.block_on(source.get_history(max))?;
            Ok(build_entries(&items, &renderer, abbr_width, Utc::now()))
        };

        let entries = refresh()?;
        let mut terminal = PickerTerminal::new()?;
        let mut app = App::new(entries, Some(Box::new(refresh)));
        let picked = app.run(terminal.terminal_mut());
        drop(app);
        terminal.restore()?;
        picked
    })
}

fn mode_label(mode: PasteMode) -> &'static str {
    match mode {
        PasteMode::Linewise => "linewise",
        PasteMode::Charwise => "characterwise",
    }
}
