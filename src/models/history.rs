use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a history entry should be inserted when pasted back.
///
/// Entries whose text ends with a newline behave like whole lines; everything
/// else is inserted inline at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteMode {
    Charwise,
    Linewise,
}

/// One clipboard history entry as emitted by the helper process.
///
/// Items are value objects: once decoded they are never mutated, only cloned.
/// `text` is kept byte-for-byte as captured (including control characters and
/// CRLF line endings); normalization happens on the way out via
/// [`HistoryItem::normalized_text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(rename = "Id", deserialize_with = "crate::parsers::deserializers::deserialize_item_id")]
    pub id: String,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(
        rename = "Time",
        deserialize_with = "crate::parsers::deserializers::deserialize_epoch_millis",
        serialize_with = "crate::parsers::deserializers::serialize_epoch_millis"
    )]
    pub captured_at: DateTime<Utc>,
}

impl HistoryItem {
    /// Entry text with CRLF line endings collapsed to LF.
    pub fn normalized_text(&self) -> String {
        self.text.replace("\r\n", "\n")
    }

    /// Linewise when the captured text ends with a line break.
    pub fn paste_mode(&self) -> PasteMode {
        if self.text.ends_with('\n') { PasteMode::Linewise } else { PasteMode::Charwise }
    }

    /// Age of this entry in milliseconds relative to `now`.
    pub fn age_millis(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.captured_at).num_milliseconds()
    }
}
