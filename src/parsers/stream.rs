use serde_json::Value;

/// Incremental decoder that reassembles newline-delimited JSON values from a
/// stream of arbitrarily split text chunks.
///
/// Chunks may break anywhere, including inside a token, and one value may
/// span several physical lines (PowerShell is free to pretty-print). The
/// decoder buffers input, walks complete lines in order, and attempts a parse
/// after each line is added to the running candidate; a failed parse is the
/// normal "value still incomplete" state, not an error.
///
/// Input that never parses accumulates without bound. The session feeds the
/// decoder from a process it spawned itself, so growth implies a misbehaving
/// support module; no cap is enforced here, but [`JsonStreamDecoder::pending_bytes`]
/// exposes the buffer size for callers that want to watch it.
#[derive(Debug, Default)]
pub struct JsonStreamDecoder {
    buf: String,
}

impl JsonStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes buffered while waiting for a value to complete.
    pub fn pending_bytes(&self) -> usize {
        self.buf.len()
    }

    /// Append one chunk and return every value completed by it, in order.
    ///
    /// A single chunk can complete zero, one, or many values. Empty chunks
    /// are permitted and emit nothing.
    pub fn feed(&mut self, chunk: &str) -> Vec<Value> {
        self.buf.push_str(chunk);

        let mut values = Vec::new();
        let lines: Vec<&str> = self.buf.split('\n').collect();
        let mut candidate = String::new();
        let mut consumed = 0;
        for (i, line) in lines.iter().enumerate() {
            candidate.push_str(line);
            candidate.push('\n');
            match serde_json::from_str::<Value>(&candidate) {
                Ok(value) => {
                    values.push(value);
                    candidate.clear();
                    consumed = i + 1;
                }
                // Not a complete value yet; keep accumulating lines.
                Err(_) => continue,
            }
        }

        // Drop the consumed prefix; the unconsumed tail (a partially built
        // candidate, possibly without its final newline) carries over.
        let remainder = if consumed > 0 { Some(lines[consumed..].join("\n")) } else { None };
        if let Some(remainder) = remainder {
            self.buf = remainder;
        }

        values
    }
}
