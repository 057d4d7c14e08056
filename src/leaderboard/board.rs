//! Cached leaderboard table
//!
//! Holds the last fetched top scores for the game-over screen and answers
//! whether a final score would make the table.

use super::{ScoreEntry, TopScoresOutcome};

/// Size of the visible table
pub const MAX_BOARD_ENTRIES: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct LeaderboardView {
    pub entries: Vec<ScoreEntry>,
    /// A request is in flight
    pub loading: bool,
    /// Last failure message, cleared on the next successful refresh
    pub error: Option<String>,
    /// Entries are local demo data
    pub demo: bool,
}

impl LeaderboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached table with a fetch result
    pub fn apply(&mut self, outcome: TopScoresOutcome) {
        self.loading = false;
        if outcome.success {
            let mut entries = outcome.data.unwrap_or_default();
            entries.sort_by(|a, b| b.score.cmp(&a.score));
            entries.truncate(MAX_BOARD_ENTRIES);
            self.entries = entries;
            self.error = None;
            self.demo = outcome.demo;
        } else {
            self.error = Some(
                outcome
                    .error
                    .unwrap_or_else(|| "Failed to fetch scores".to_string()),
            );
        }
    }

    /// Rank a score would take (1-indexed), `None` if it misses the table.
    /// In demo mode every score is treated as a top score.
    pub fn player_rank(&self, score: u64) -> Option<usize> {
        if self.demo || self.entries.is_empty() {
            return Some(1);
        }
        if let Some(i) = self.entries.iter().position(|e| score > e.score) {
            return Some(i + 1);
        }
        if self.entries.len() < MAX_BOARD_ENTRIES {
            return Some(self.entries.len() + 1);
        }
        None
    }

    pub fn is_top_score(&self, score: u64) -> bool {
        self.player_rank(score).is_some()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(scores: &[u64]) -> LeaderboardView {
        let mut view = LeaderboardView::new();
        view.apply(TopScoresOutcome {
            success: true,
            data: Some(
                scores
                    .iter()
                    .map(|&score| ScoreEntry {
                        initials: "ZZZ".into(),
                        masked_email: "z**z@x.io".into(),
                        score,
                    })
                    .collect(),
            ),
            error: None,
            demo: false,
        });
        view
    }

    #[test]
    fn test_empty_board_ranks_first() {
        assert_eq!(LeaderboardView::new().player_rank(0), Some(1));
    }

    #[test]
    fn test_rank_insertion_point() {
        let view = live(&[300, 500, 100]);
        assert_eq!(view.top_score(), Some(500));
        assert_eq!(view.player_rank(600), Some(1));
        assert_eq!(view.player_rank(400), Some(2));
        // ties do not displace
        assert_eq!(view.player_rank(300), Some(3));
        assert_eq!(view.player_rank(50), Some(4));
    }

    #[test]
    fn test_full_board_rejects_low_scores() {
        let scores: Vec<u64> = (1..=12).map(|i| i * 100).collect();
        let view = live(&scores);
        assert_eq!(view.entries.len(), MAX_BOARD_ENTRIES);
        assert!(!view.is_top_score(300));
        assert!(view.is_top_score(301));
    }

    #[test]
    fn test_demo_board_accepts_everything() {
        let mut view = live(&[1000; 10]);
        view.demo = true;
        assert_eq!(view.player_rank(1), Some(1));
    }

    #[test]
    fn test_failed_refresh_keeps_entries() {
        let mut view = live(&[100]);
        view.apply(TopScoresOutcome {
            success: false,
            data: None,
            error: Some("leaderboard rejected request: bad key".into()),
            demo: false,
        });
        assert_eq!(view.entries.len(), 1);
        assert!(view.error.is_some());
    }
}
