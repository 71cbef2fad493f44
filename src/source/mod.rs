//! Consumer-facing surface: one connected clipboard-history source.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{DEFAULT_CACHE_TTL, HistoryCache};
use crate::display::{DisplayText, UnprintableRenderer};
use crate::error::SessionError;
use crate::models::HistoryItem;
use crate::session::{ClipboardSession, DEFAULT_PWSH, history_server_command};

/// Connection settings for a [`ClipboardSource`].
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// PowerShell executable to spawn.
    pub pwsh: PathBuf,
    /// Directory holding the support modules the helper preloads.
    pub module_dir: PathBuf,
    /// Maximum age of a history snapshot before the next access refreshes it.
    pub cache_ttl: Duration,
    /// Placeholder glyph for unprintable characters in search forms.
    pub placeholder: char,
    /// Host-reported additions to the unprintable character set.
    pub extra_unprintable: Vec<u32>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            pwsh: PathBuf::from(DEFAULT_PWSH),
            module_dir: default_module_dir(),
            cache_ttl: DEFAULT_CACHE_TTL,
            placeholder: '?',
            extra_unprintable: Vec::new(),
        }
    }
}

/// The support modules ship next to the binary by default.
fn default_module_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map(|dir| dir.join("modules"))
        .unwrap_or_else(|| PathBuf::from("modules"))
}

/// A connected clipboard-history source: managed helper session, TTL cache,
/// and a renderer configured with the effective unprintable set.
pub struct ClipboardSource {
    cache: HistoryCache<ClipboardSession>,
    renderer: UnprintableRenderer,
}

impl ClipboardSource {
    /// Spawn the helper, complete the initial round trip, and return a
    /// source primed with that first snapshot.
    pub async fn connect(config: SourceConfig) -> Result<Self, SessionError> {
        let spec = history_server_command(&config.pwsh, &config.module_dir);
        let mut session = ClipboardSession::new(spec);
        let initial = session.initialize().await?;

        let cache = HistoryCache::primed(session, config.cache_ttl, initial);
        let renderer = UnprintableRenderer::new()
            .with_placeholder(config.placeholder)
            .with_extra_unprintable(config.extra_unprintable);
        Ok(Self { cache, renderer })
    }

    /// Snapshot of the history, at most `max_items` entries (at least one
    /// when any exist), refreshed through the session when stale.
    pub async fn get_history(&self, max_items: usize) -> Result<Vec<HistoryItem>, SessionError> {
        self.cache.get_history(max_items).await
    }

    /// Presentation forms for one entry's text. `max_width` is a
    /// display-column budget (0 = unlimited).
    pub fn build_display(&self, text: &str, max_width: usize, highlight: bool) -> DisplayText {
        self.renderer.render(text, max_width, highlight)
    }

    pub fn renderer(&self) -> &UnprintableRenderer {
        &self.renderer
    }

    /// Shut the helper down. Safe to call more than once; waits for an
    /// in-flight refresh before tearing the process down.
    pub async fn dispose(&self) {
        self.cache.fetcher().await.dispose().await;
    }
}
