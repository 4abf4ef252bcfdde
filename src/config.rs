use crate::MAX_K;
use crate::error::{HarnessError, Result};

/// Runs per implementation when nothing else is asked for.
pub const DEFAULT_RUNS: usize = 5;

/// Inputs shared by every harness run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    /// How many times each implementation is run and compared against itself.
    pub runs: usize,
    /// Inclusive upper bound of the k range.
    pub max_k: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            max_k: MAX_K,
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(HarnessError::NoRuns);
        }
        if self.max_k > MAX_K {
            return Err(HarnessError::MaxKOutOfRange {
                max_k: self.max_k,
                limit: MAX_K,
            });
        }
        Ok(())
    }
}
