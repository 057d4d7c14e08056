//! Remote leaderboard contract
//!
//! The service itself is external; this module owns local validation, the
//! offline/demo fallback, the cached table shown by the UI and the
//! fire-and-forget client that keeps network calls off the tick loop.

mod board;
mod client;

pub use board::{LeaderboardView, MAX_BOARD_ENTRIES};
pub use client::{LeaderboardClient, Reply, ReplyKind};

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ValidationError};

/// Maximum initials length
pub const MAX_INITIALS: usize = 3;

/// Message shown when a submission was only simulated
pub const DEMO_SUBMIT_MESSAGE: &str = "Score submitted (demo mode)";

/// One row of the public table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub initials: String,
    pub masked_email: String,
    pub score: u64,
}

/// A validated submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub initials: String,
    pub email: String,
    pub score: u64,
}

impl Submission {
    /// Validate player-entered fields; initials are trimmed and upper-cased
    pub fn new(initials: &str, email: &str, score: u64) -> Result<Self, ValidationError> {
        let initials = initials.trim().to_uppercase();
        if initials.is_empty() {
            return Err(ValidationError::EmptyInitials);
        }
        if initials.chars().count() > MAX_INITIALS {
            return Err(ValidationError::InitialsTooLong { max: MAX_INITIALS });
        }
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Self {
            initials,
            email: email.to_string(),
            score,
        })
    }
}

/// Result of `submit_score`, shaped for the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitOutcome {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            error: None,
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
        }
    }
}

/// Result of `get_top_scores`, shaped for the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopScoresOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<ScoreEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Data is local demo content rather than the live table
    #[serde(default)]
    pub demo: bool,
}

/// Remote score storage. Implementations may block; callers in the game
/// loop go through [`LeaderboardClient`].
pub trait LeaderboardService: Send + Sync {
    fn submit_score(&self, submission: &Submission) -> Result<(), ServiceError>;

    /// Best scores, highest first
    fn top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, ServiceError>;
}

/// Local-part/domain/TLD shape check, no whitespace, exactly one `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // some dot with at least one character on each side
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Hide most of the local part: `demo@example.com` becomes `d**o@example.com`
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return "***".to_string();
    };
    let mut chars = local.chars();
    let first = chars.next();
    let last = chars.next_back();
    match (first, last) {
        (Some(first), Some(last)) => format!("{first}**{last}@{domain}"),
        (Some(first), None) => format!("{first}**@{domain}"),
        _ => format!("**@{domain}"),
    }
}

/// Table shown when the service is unavailable
pub fn demo_scores(limit: usize) -> Vec<ScoreEntry> {
    [
        ("AAA", "player1@example.com", 500),
        ("BBB", "player2@example.com", 400),
        ("CCC", "player3@example.com", 300),
        ("DDD", "player4@example.com", 250),
        ("EEE", "player5@example.com", 200),
    ]
    .into_iter()
    .take(limit)
    .map(|(initials, email, score)| ScoreEntry {
        initials: initials.to_string(),
        masked_email: mask_email(email),
        score,
    })
    .collect()
}

/// Validate and submit. Never fails hard: an absent or unreachable service
/// reports a demo-mode success; only validation problems and explicit
/// rejections come back unsuccessful.
pub fn submit_score(
    service: Option<&dyn LeaderboardService>,
    initials: &str,
    email: &str,
    score: u64,
) -> SubmitOutcome {
    let submission = match Submission::new(initials, email, score) {
        Ok(submission) => submission,
        Err(e) => return SubmitOutcome::failed(e),
    };

    let Some(service) = service else {
        log::info!("Leaderboard not configured - using mock submission");
        return SubmitOutcome::ok(DEMO_SUBMIT_MESSAGE);
    };

    match service.submit_score(&submission) {
        Ok(()) => SubmitOutcome::ok("Score submitted successfully!"),
        Err(e) if e.is_degraded() => {
            log::warn!("Leaderboard degraded ({}), using mock submission", e);
            SubmitOutcome::ok(DEMO_SUBMIT_MESSAGE)
        }
        Err(e) => SubmitOutcome::failed(e),
    }
}

/// Fetch the best `limit` scores, falling back to demo data when degraded
pub fn get_top_scores(service: Option<&dyn LeaderboardService>, limit: usize) -> TopScoresOutcome {
    let demo = || TopScoresOutcome {
        success: true,
        data: Some(demo_scores(limit)),
        error: None,
        demo: true,
    };

    let Some(service) = service else {
        log::info!("Leaderboard not configured - using mock leaderboard data");
        return demo();
    };

    match service.top_scores(limit) {
        Ok(mut scores) => {
            scores.sort_by(|a, b| b.score.cmp(&a.score));
            scores.truncate(limit);
            TopScoresOutcome {
                success: true,
                data: Some(scores),
                error: None,
                demo: false,
            }
        }
        Err(e) if e.is_degraded() => {
            log::warn!("Leaderboard degraded ({}), using mock leaderboard data", e);
            demo()
        }
        Err(e) => TopScoresOutcome {
            success: false,
            data: None,
            error: Some(e.to_string()),
            demo: false,
        },
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// In-memory service for tests
    #[derive(Default)]
    pub struct FakeService {
        pub entries: Mutex<Vec<ScoreEntry>>,
        pub fail_with: Option<ServiceError>,
    }

    impl FakeService {
        pub fn failing(error: ServiceError) -> Self {
            Self {
                fail_with: Some(error),
                ..Self::default()
            }
        }
    }

    impl LeaderboardService for FakeService {
        fn submit_score(&self, submission: &Submission) -> Result<(), ServiceError> {
            if let Some(e) = &self.fail_with {
                return Err(e.clone());
            }
            let mut entries = self.entries.lock().map_err(|_| ServiceError::Unreachable("poisoned".into()))?;
            entries.push(ScoreEntry {
                initials: submission.initials.clone(),
                masked_email: mask_email(&submission.email),
                score: submission.score,
            });
            Ok(())
        }

        fn top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, ServiceError> {
            if let Some(e) = &self.fail_with {
                return Err(e.clone());
            }
            let mut entries = self
                .entries
                .lock()
                .map_err(|_| ServiceError::Unreachable("poisoned".into()))?
                .clone();
            entries.sort_by(|a, b| b.score.cmp(&a.score));
            entries.truncate(limit);
            Ok(entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeService;
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("demo@example.com"), "d**o@example.com");
        assert_eq!(mask_email("x@example.com"), "x**@example.com");
    }

    #[test]
    fn test_offline_submit_is_demo_success() {
        let outcome = submit_score(None, "AAA", "a@b.com", 500);
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some(DEMO_SUBMIT_MESSAGE));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_validation_happens_before_service() {
        let service = FakeService::default();
        let outcome = submit_score(Some(&service), "", "a@b.com", 500);
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Please enter your initials"));

        let outcome = submit_score(Some(&service), "AB", "not-an-email", 500);
        assert!(!outcome.success);
        assert!(service.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unreachable_service_degrades() {
        let service = FakeService::failing(ServiceError::Unreachable("timeout".into()));
        assert!(submit_score(Some(&service), "abc", "a@b.com", 10).success);

        let top = get_top_scores(Some(&service), 10);
        assert!(top.success && top.demo);
        assert_eq!(top.data.map(|d| d.len()), Some(5));
    }

    #[test]
    fn test_rejection_is_reported() {
        let service = FakeService::failing(ServiceError::Rejected("duplicate".into()));
        let outcome = submit_score(Some(&service), "abc", "a@b.com", 10);
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("duplicate"));
    }

    #[test]
    fn test_live_scores_sorted_descending() {
        let service = FakeService::default();
        for (initials, score) in [("lo", 10), ("hi", 900), ("mid", 300)] {
            assert!(submit_score(Some(&service), initials, "p@x.io", score).success);
        }
        let top = get_top_scores(Some(&service), 2);
        let scores: Vec<u64> = top.data.unwrap().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 300]);
        assert!(!top.demo);
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_string(&submit_score(None, "AAA", "a@b.com", 1)).unwrap();
        assert_eq!(json, r#"{"success":true,"message":"Score submitted (demo mode)"}"#);
    }
}
