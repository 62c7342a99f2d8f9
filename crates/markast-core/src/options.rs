//! Parser options.
//!
//! `ParserOptions` is what callers hand to the facade. It doubles as the
//! `[parser]` section of the TOML configuration file, hence the serde
//! attributes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a single parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParserOptions {
    /// Recognize tables, task lists, strikethrough and autolinks.
    /// Default: true
    #[serde(default = "default_true", rename = "GFM")]
    pub enable_gfm_extensions: bool,

    /// Disable the lenient GFM additions (bare autolinks, overlong table rows).
    /// Default: false
    #[serde(default)]
    pub strict_mode: bool,

    /// Maximum container and inline nesting depth.
    /// Default: 32
    #[serde(default = "default_nesting")]
    pub max_nesting_depth: usize,

    /// Attach source locations to nodes.
    /// Default: true
    #[serde(default = "default_true")]
    pub track_source_locations: bool,

    /// Wall-clock budget in seconds, 0 = unbounded.
    /// Default: 0
    #[serde(default)]
    pub max_parsing_time: f64,

    /// Consecutive non-advancing loop iterations before giving up.
    /// Default: 64
    #[serde(default = "default_stalled")]
    pub max_stalled_iterations: usize,

    /// Consecutive empty loop results before giving up.
    /// Default: 256
    #[serde(default = "default_empty")]
    pub max_empty_results: usize,
}

fn default_true() -> bool {
    true
}

fn default_nesting() -> usize {
    32
}

fn default_stalled() -> usize {
    64
}

fn default_empty() -> usize {
    256
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            enable_gfm_extensions: true,
            strict_mode: false,
            max_nesting_depth: default_nesting(),
            track_source_locations: true,
            max_parsing_time: 0.0,
            max_stalled_iterations: default_stalled(),
            max_empty_results: default_empty(),
        }
    }
}

impl ParserOptions {
    /// Plain CommonMark, no GFM extensions.
    pub fn commonmark() -> Self {
        Self {
            enable_gfm_extensions: false,
            ..Self::default()
        }
    }

    /// Builder-style timeout setter.
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.max_parsing_time = seconds;
        self
    }

    /// Builder-style location tracking setter.
    pub fn with_locations(mut self, enabled: bool) -> Self {
        self.track_source_locations = enabled;
        self
    }

    /// The wall-clock limit, `None` when unbounded.
    ///
    /// Negative, non-finite and unrepresentably large values are treated as
    /// unbounded.
    pub fn time_limit(&self) -> Option<Duration> {
        if self.max_parsing_time > 0.0 {
            Duration::try_from_secs_f64(self.max_parsing_time).ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ParserOptions::default();
        assert!(opts.enable_gfm_extensions);
        assert!(!opts.strict_mode);
        assert_eq!(opts.max_nesting_depth, 32);
        assert!(opts.time_limit().is_none());
    }

    #[test]
    fn test_time_limit() {
        let opts = ParserOptions::default().with_timeout(0.5);
        assert_eq!(opts.time_limit(), Some(Duration::from_millis(500)));
        assert!(ParserOptions::default()
            .with_timeout(-1.0)
            .time_limit()
            .is_none());
        assert!(ParserOptions::default()
            .with_timeout(f64::NAN)
            .time_limit()
            .is_none());
        assert!(ParserOptions::default()
            .with_timeout(1e30)
            .time_limit()
            .is_none());
        assert!(ParserOptions::default()
            .with_timeout(f64::INFINITY)
            .time_limit()
            .is_none());
    }

    #[test]
    fn test_commonmark_disables_gfm() {
        assert!(!ParserOptions::commonmark().enable_gfm_extensions);
    }
}
