use thiserror::Error;

/// Authentication failure as seen by callers.
///
/// Every deterministic failure cause — bad credentials, a provider rejection,
/// a missing profile row — collapses to `Failed` so callers cannot tell which
/// sub-cause occurred. The distinction is logged, never returned.
/// `Unavailable` is the recoverable transport kind: the provider or registry
/// could not be reached at all; retry policy belongs to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication failed")]
    Failed,

    #[error("identity backend unavailable: {0}")]
    Unavailable(String),
}
