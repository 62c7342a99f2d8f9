//! Error types for markast

use std::time::Duration;
use thiserror::Error;

/// Which parsing loop raised a guard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Block-level document loop
    Block,
    /// Inline loop inside a single block
    Inline,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Block => write!(f, "block"),
            Phase::Inline => write!(f, "inline"),
        }
    }
}

/// Hard parsing failure.
///
/// Only the anti-runaway guards raise this. Malformed markdown never does:
/// it degrades to literal text instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The configured wall-clock budget ran out
    #[error("{phase} parsing timed out after {elapsed:?} (limit {limit:?}) at token {position}")]
    Timeout {
        phase: Phase,
        elapsed: Duration,
        limit: Duration,
        position: usize,
    },

    /// The cursor did not move for too many consecutive iterations
    #[error("{phase} parsing made no progress for {iterations} iterations at token {position}")]
    Stalled {
        phase: Phase,
        iterations: usize,
        position: usize,
    },

    /// Too many consecutive iterations produced no node
    #[error("{phase} parsing produced {count} consecutive empty results at token {position}")]
    EmptyResults {
        phase: Phase,
        count: usize,
        position: usize,
    },
}

impl ParseError {
    /// The loop that raised the failure.
    pub fn phase(&self) -> Phase {
        match self {
            ParseError::Timeout { phase, .. }
            | ParseError::Stalled { phase, .. }
            | ParseError::EmptyResults { phase, .. } => *phase,
        }
    }

    /// Token index where the failure was detected.
    pub fn position(&self) -> usize {
        match self {
            ParseError::Timeout { position, .. }
            | ParseError::Stalled { position, .. }
            | ParseError::EmptyResults { position, .. } => *position,
        }
    }
}

/// Main error type for markast tooling
#[derive(Error, Debug)]
pub enum Error {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse error during markdown processing
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Render error during output generation
    #[error("Render error: {0}")]
    Render(String),
}

/// Result type alias for markast operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_diagnostics() {
        let err = ParseError::Stalled {
            phase: Phase::Inline,
            iterations: 64,
            position: 12,
        };
        assert_eq!(err.phase(), Phase::Inline);
        assert_eq!(err.position(), 12);
        assert_eq!(
            err.to_string(),
            "inline parsing made no progress for 64 iterations at token 12"
        );
    }

    #[test]
    fn test_error_wraps_parse_error() {
        let err: Error = ParseError::EmptyResults {
            phase: Phase::Block,
            count: 256,
            position: 3,
        }
        .into();
        assert!(err.to_string().starts_with("Parse error: block parsing produced 256"));
    }
}
