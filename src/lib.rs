//! cliphist-bridge - Windows clipboard history for completion UIs and pickers
//!
//! This library manages a long-lived PowerShell helper process that serves
//! clipboard history snapshots over a line-triggered stdin/stdout protocol.
//! It provides:
//!
//! - A managed session around the helper: spawn with retry, strict
//!   request/response round trips, graceful-then-forced shutdown
//! - An incremental decoder reassembling JSON values from arbitrarily
//!   chunked stream output
//! - A TTL cache with single-flight refresh and defensively cloned snapshots
//! - Safe presentation of raw clipboard text: caret-escaped abbreviations,
//!   byte-addressed highlight spans, width-aware truncation
//!
//! # Example
//!
//! ```no_run
//! use cliphist_bridge::{ClipboardSource, SourceConfig};
//!
//! # async fn demo() -> Result<(), cliphist_bridge::SessionError> {
//! let source = ClipboardSource::connect(SourceConfig::default()).await?;
//! for item in source.get_history(10).await? {
//!     let display = source.build_display(&item.normalized_text(), 80, true);
//!     println!("{}", display.abbr);
//! }
//! source.dispose().await;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod clipboard;
pub mod display;
pub mod error;
pub mod models;
pub mod parsers;
pub mod session;
pub mod source;
pub mod tui;

// Re-export commonly used types
pub use cache::{HistoryCache, HistoryFetcher};
pub use display::{DisplayText, HighlightSpan, UnprintableRenderer, to_duration};
pub use error::SessionError;
pub use models::{HistoryItem, PasteMode};
pub use parsers::JsonStreamDecoder;
pub use session::{ClipboardSession, CommandSpec, SessionState};
pub use source::{ClipboardSource, SourceConfig};
