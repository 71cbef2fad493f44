//! Shared test utilities for integration tests
#![allow(dead_code)]

use serde_json::json;

/// Builder for wire-format history items (`{Id, Text, Time}`)
pub struct WireItemBuilder {
    id: String,
    text: String,
    time: i64,
}

impl WireItemBuilder {
    /// Create a new wire item with default values
    pub fn new() -> Self {
        Self {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            text: "Test entry".to_string(),
            time: 1_700_000_000_000,
        }
    }

    /// Set the item id (expects a GUID string)
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Set the captured text
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Set the capture time (epoch milliseconds)
    pub fn time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    /// Convert to a wire JSON object
    pub fn to_value(&self) -> serde_json::Value {
        json!({ "Id": self.id, "Text": self.text, "Time": self.time })
    }
}

impl Default for WireItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact one-line JSON array payload, newline-terminated, as the helper
/// emits per capture cycle
pub fn payload_line(items: &[WireItemBuilder]) -> String {
    let array = serde_json::Value::Array(items.iter().map(WireItemBuilder::to_value).collect());
    format!("{}\n", array)
}

/// Helper to build a payload of `n` sequentially numbered entries
pub fn numbered_payload(n: usize) -> String {
    let items: Vec<WireItemBuilder> = (0..n)
        .map(|i| {
            WireItemBuilder::new()
                .id(&format!("550e8400-e29b-41d4-a716-4466554400{:02}", i))
                .text(&format!("entry {}", i))
                .time(1_700_000_000_000 + i as i64)
        })
        .collect();
    payload_line(&items)
}

/// Fake helper processes speaking the line-triggered protocol, built on `sh`.
///
/// The real helper is PowerShell; these stand-ins implement the same
/// contract (empty line -> one response, non-empty line -> exit) so session
/// tests run anywhere with a POSIX shell.
#[cfg(unix)]
pub mod fake_helper {
    use cliphist_bridge::CommandSpec;

    fn sh(script: String) -> CommandSpec {
        CommandSpec { program: "sh".into(), args: vec!["-c".to_string(), script] }
    }

    /// Helper that answers the i-th trigger with `responses[i]`, repeating
    /// the last response once the list runs out. Responses must already be
    /// newline-terminated (and free of single quotes, which `sh` cannot
    /// nest).
    pub fn scripted(responses: &[&str]) -> CommandSpec {
        assert!(!responses.is_empty(), "at least one response required");
        let mut cases = String::new();
        for (i, response) in responses.iter().enumerate() {
            cases.push_str(&format!("  {}) printf '%s' '{}';;\n", i + 1, response.trim_end_matches('\n')));
        }
        let last = responses[responses.len() - 1].trim_end_matches('\n');
        let script = format!(
            "count=0\n\
             while IFS= read -r line; do\n\
               if [ -n \"$line\" ]; then exit 0; fi\n\
               count=$((count+1))\n\
               case \"$count\" in\n\
             {cases}\
               *) printf '%s' '{last}';;\n\
               esac\n\
               printf '\\n'\n\
             done\n"
        );
        sh(script)
    }

    /// Helper that answers the first trigger, then closes its stdout while
    /// still draining stdin, so the next read hits EOF.
    pub fn eof_after_first(response: &str) -> CommandSpec {
        let response = response.trim_end_matches('\n');
        let script = format!(
            "IFS= read -r line\n\
             printf '%s\\n' '{response}'\n\
             exec 1>&-\n\
             while IFS= read -r line; do :; done\n"
        );
        sh(script)
    }

    /// A program path that cannot be spawned.
    pub fn missing_program() -> CommandSpec {
        CommandSpec {
            program: "/nonexistent/cliphist-helper".into(),
            args: vec!["-NoProfile".to_string()],
        }
    }
}
