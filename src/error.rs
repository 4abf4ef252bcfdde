use thiserror::Error;

/// Failures the harness reports instead of propagating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// A strategy panicked during one of its runs.
    #[error("{name} failed: {message}")]
    ImplementationFailed { name: &'static str, message: String },

    /// `runs` was zero.
    #[error("at least one run per implementation is required")]
    NoRuns,

    /// `max_k` is past the range the searches are defined for.
    #[error("max_k {max_k} exceeds the searchable limit {limit}")]
    MaxKOutOfRange { max_k: u32, limit: u32 },
}

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;
