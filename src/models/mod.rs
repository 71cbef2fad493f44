pub mod history;

pub use history::{HistoryItem, PasteMode};
