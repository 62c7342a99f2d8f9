//! Progress guards shared by the block and inline parsers.
//!
//! Every parser loop ticks a [`ProgressGuard`] once per iteration. The guard
//! fails the parse when the wall-clock budget is spent, when the cursor has
//! not moved for too many iterations, or when too many iterations in a row
//! produced nothing.

use std::time::{Duration, Instant};

use markast_core::{ParseError, ParserOptions, Phase};

/// Wall-clock budget for one parse call. Shared by both phases.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn from_options(options: &ParserOptions) -> Self {
        Self::new(options.time_limit())
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    /// Fail with `Timeout` once the budget is exceeded.
    pub fn check(&self, phase: Phase, position: usize) -> Result<(), ParseError> {
        if let Some(limit) = self.limit {
            let elapsed = self.elapsed();
            if elapsed > limit {
                return Err(ParseError::Timeout {
                    phase,
                    elapsed,
                    limit,
                    position,
                });
            }
        }
        Ok(())
    }
}

/// Thresholds for the stall and empty-result guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardLimits {
    pub max_stalled: usize,
    pub max_empty: usize,
}

impl GuardLimits {
    pub fn from_options(options: &ParserOptions) -> Self {
        Self {
            max_stalled: options.max_stalled_iterations.max(1),
            max_empty: options.max_empty_results.max(1),
        }
    }
}

impl Default for GuardLimits {
    fn default() -> Self {
        Self::from_options(&ParserOptions::default())
    }
}

/// Per-loop progress tracker.
#[derive(Debug, Clone)]
pub struct ProgressGuard {
    phase: Phase,
    deadline: Deadline,
    limits: GuardLimits,
    last_position: Option<usize>,
    stalled: usize,
    empty: usize,
}

impl ProgressGuard {
    pub fn new(phase: Phase, deadline: Deadline, limits: GuardLimits) -> Self {
        Self {
            phase,
            deadline,
            limits,
            last_position: None,
            stalled: 0,
            empty: 0,
        }
    }

    /// Called at the top of every loop iteration with the cursor position.
    pub fn tick(&mut self, position: usize) -> Result<(), ParseError> {
        self.deadline.check(self.phase, position)?;
        if self.last_position == Some(position) {
            self.stalled += 1;
            if self.stalled >= self.limits.max_stalled {
                log::warn!(
                    "{} parser stalled at token {} after {} iterations",
                    self.phase,
                    position,
                    self.stalled
                );
                return Err(ParseError::Stalled {
                    phase: self.phase,
                    iterations: self.stalled,
                    position,
                });
            }
        } else {
            self.last_position = Some(position);
            self.stalled = 0;
        }
        Ok(())
    }

    /// Record an iteration that produced a node.
    pub fn produced(&mut self) {
        self.empty = 0;
    }

    /// Record an iteration that produced nothing.
    pub fn empty(&mut self, position: usize) -> Result<(), ParseError> {
        self.empty += 1;
        if self.empty >= self.limits.max_empty {
            return Err(ParseError::EmptyResults {
                phase: self.phase,
                count: self.empty,
                position,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_stalled: usize, max_empty: usize) -> GuardLimits {
        GuardLimits {
            max_stalled,
            max_empty,
        }
    }

    #[test]
    fn test_advancing_never_stalls() {
        let mut guard = ProgressGuard::new(Phase::Block, Deadline::unbounded(), limits(2, 2));
        for pos in 0..100 {
            assert!(guard.tick(pos).is_ok());
        }
    }

    #[test]
    fn test_stall_detected() {
        let mut guard = ProgressGuard::new(Phase::Inline, Deadline::unbounded(), limits(3, 10));
        assert!(guard.tick(5).is_ok());
        assert!(guard.tick(5).is_ok());
        assert!(guard.tick(5).is_ok());
        let err = guard.tick(5).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Stalled {
                phase: Phase::Inline,
                iterations: 3,
                position: 5
            }
        ));
    }

    #[test]
    fn test_empty_results_reset_on_produce() {
        let mut guard = ProgressGuard::new(Phase::Block, Deadline::unbounded(), limits(10, 2));
        assert!(guard.empty(1).is_ok());
        guard.produced();
        assert!(guard.empty(2).is_ok());
        let err = guard.empty(3).unwrap_err();
        assert!(matches!(err, ParseError::EmptyResults { count: 2, .. }));
    }

    #[test]
    fn test_timeout() {
        let deadline = Deadline::new(Some(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(2));
        let mut guard = ProgressGuard::new(Phase::Block, deadline, GuardLimits::default());
        let err = guard.tick(0).unwrap_err();
        assert!(matches!(err, ParseError::Timeout { phase: Phase::Block, .. }));
    }

    #[test]
    fn test_limits_from_options() {
        let opts = ParserOptions {
            max_stalled_iterations: 0,
            ..ParserOptions::default()
        };
        assert_eq!(GuardLimits::from_options(&opts).max_stalled, 1);
    }
}
