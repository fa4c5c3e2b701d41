//! Process-environment flags for the feed binary.
//!
//! Environment detection is an edge concern: the binary reads it once at
//! startup to pick output formats. Nothing in the event core branches on
//! these flags.

/// Flags describing the environment the feed client runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedEnvironment {
    /// Set when running against a test/staging feed.
    pub is_test: bool,
    /// Emit JSON log lines instead of the compact format.
    pub json_logs: bool,
}

impl FeedEnvironment {
    /// Reads the flags from process environment variables.
    pub fn from_env() -> Self {
        Self {
            is_test: flag("AUCTION_FEED_TEST"),
            json_logs: flag("AUCTION_FEED_JSON_LOGS"),
        }
    }

    /// Returns whether this process targets a test feed.
    pub fn is_test_environment(&self) -> bool {
        self.is_test
    }
}

fn flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
