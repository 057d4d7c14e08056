//! Error types shared by the collaborator layers
//!
//! The simulation itself has no fallible operations; these only describe
//! what can go wrong at the edges (score submission, storage, config).

use thiserror::Error;

/// Rejected locally before any leaderboard call is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your initials")]
    EmptyInitials,
    #[error("Initials must be at most {max} characters")]
    InitialsTooLong { max: usize },
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

/// Failure talking to the remote leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("leaderboard service not configured")]
    NotConfigured,
    #[error("leaderboard service unreachable: {0}")]
    Unreachable(String),
    /// The service answered but refused the request
    #[error("leaderboard rejected request: {0}")]
    Rejected(String),
}

impl ServiceError {
    /// Whether the player-facing flow should fall back to demo results
    pub fn is_degraded(&self) -> bool {
        !matches!(self, ServiceError::Rejected(_))
    }
}

/// Balance values the simulation cannot run with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("{field} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    #[error("points_per_level must be greater than zero")]
    ZeroPointsPerLevel,
}

/// Settings or tuning file rejected at load
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config format error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),
}

/// Local persistence failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage format error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}
