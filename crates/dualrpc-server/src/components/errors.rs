use std::collections::BTreeMap;

use tracing::{debug, warn};

use dualrpc_protocol::error_codes;

/// The error catalog: code→message, with range-based fallbacks for codes
/// nobody registered.
#[derive(Debug, Default)]
pub struct Errors {
    entries: BTreeMap<i64, String>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, code: i64, message: &str) -> bool {
        if self.entries.contains_key(&code) {
            warn!(code, "cannot add error: duplicate entry");
            false
        } else {
            debug!(code, "added error");
            self.entries.insert(code, message.to_string());
            true
        }
    }

    pub fn delete(&mut self, code: i64) -> bool {
        if self.entries.remove(&code).is_some() {
            debug!(code, "deleted error");
            true
        } else {
            warn!(code, "cannot delete error: entry not found");
            false
        }
    }

    /// Resolve a code to its message. Unregistered codes inside the
    /// implementation-defined server range resolve to "Server Error",
    /// anything else unregistered to "Unknown Error".
    pub fn get(&self, code: i64) -> String {
        match self.entries.get(&code) {
            Some(message) => message.clone(),
            None if (error_codes::SERVER_ERROR_START..=error_codes::SERVER_ERROR_END)
                .contains(&code) =>
            {
                "Server Error".to_string()
            }
            None => "Unknown Error".to_string(),
        }
    }

    /// Only explicitly registered messages, no fallback.
    pub fn lookup(&self, code: i64) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    /// The full table, ordered by code.
    pub fn all(&self) -> &BTreeMap<i64, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
