//! Non-blocking leaderboard client
//!
//! Calls run on worker threads and report back over a channel. Every request
//! carries the session generation it was issued for; replies from an older
//! generation are dropped on arrival so a slow answer can never touch a
//! session that has since been reset.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use super::{
    LeaderboardService, LeaderboardView, SubmitOutcome, TopScoresOutcome, get_top_scores,
    submit_score,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKind {
    Submitted(SubmitOutcome),
    TopScores(TopScoresOutcome),
}

/// Worker result tagged with the generation that asked for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub generation: u64,
    pub kind: ReplyKind,
}

pub struct LeaderboardClient {
    service: Option<Arc<dyn LeaderboardService>>,
    limit: usize,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
    view: LeaderboardView,
    last_submit: Option<SubmitOutcome>,
}

impl LeaderboardClient {
    pub fn new(service: Option<Arc<dyn LeaderboardService>>, limit: usize) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            service,
            limit,
            tx,
            rx,
            view: LeaderboardView::new(),
            last_submit: None,
        }
    }

    /// Client with no backing service; everything resolves to demo results
    pub fn offline(limit: usize) -> Self {
        Self::new(None, limit)
    }

    pub fn view(&self) -> &LeaderboardView {
        &self.view
    }

    pub fn last_submit(&self) -> Option<&SubmitOutcome> {
        self.last_submit.as_ref()
    }

    /// Request a fresh top-scores table
    pub fn refresh(&mut self, generation: u64) {
        self.view.loading = true;
        let service = self.service.clone();
        let limit = self.limit;
        self.dispatch(generation, move || {
            ReplyKind::TopScores(get_top_scores(service.as_deref(), limit))
        });
    }

    /// Submit a final score; validation happens on the worker too, so the
    /// outcome always arrives through `poll`. A reply that lands after the
    /// session left GAME_OVER carries the old generation and is dropped.
    pub fn submit(&mut self, generation: u64, initials: &str, email: &str, score: u64) {
        let service = self.service.clone();
        let initials = initials.to_string();
        let email = email.to_string();
        self.dispatch(generation, move || {
            ReplyKind::Submitted(submit_score(service.as_deref(), &initials, &email, score))
        });
    }

    /// Drain finished requests, keeping only those for `current_generation`
    pub fn poll(&mut self, current_generation: u64) -> Vec<Reply> {
        let pending: Vec<Reply> = self.rx.try_iter().collect();
        pending
            .into_iter()
            .filter_map(|reply| self.accept(reply, current_generation))
            .collect()
    }

    /// Block until one reply for `current_generation` arrives or the timeout
    /// elapses (headless runs only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn wait(&mut self, current_generation: u64, timeout: std::time::Duration) -> Option<Reply> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            let reply = self.rx.recv_timeout(remaining).ok()?;
            if let Some(reply) = self.accept(reply, current_generation) {
                return Some(reply);
            }
        }
    }

    fn accept(&mut self, reply: Reply, current_generation: u64) -> Option<Reply> {
        if reply.generation != current_generation {
            log::debug!(
                "Dropping leaderboard reply for generation {} (current {})",
                reply.generation,
                current_generation
            );
            return None;
        }

        match &reply.kind {
            ReplyKind::TopScores(outcome) => {
                self.view.apply(outcome.clone());
            }
            ReplyKind::Submitted(outcome) => {
                if outcome.success {
                    log::info!("Score submitted: {:?}", outcome.message);
                    self.refresh(current_generation);
                } else {
                    log::warn!("Score submission failed: {:?}", outcome.error);
                }
                self.last_submit = Some(outcome.clone());
            }
        }
        Some(reply)
    }

    /// One detached thread per request. Nothing joins it; the reply channel
    /// is the only handle, and a send to a dropped client is ignored.
    #[cfg(not(target_arch = "wasm32"))]
    fn dispatch<F>(&self, generation: u64, job: F)
    where
        F: FnOnce() -> ReplyKind + Send + 'static,
    {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let _ = tx.send(Reply {
                generation,
                kind: job(),
            });
        });
    }

    /// No threads in the browser; the job runs inline and is still delivered
    /// through the channel
    #[cfg(target_arch = "wasm32")]
    fn dispatch<F>(&self, generation: u64, job: F)
    where
        F: FnOnce() -> ReplyKind + Send + 'static,
    {
        let _ = self.tx.send(Reply {
            generation,
            kind: job(),
        });
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::ServiceError;
    use crate::leaderboard::DEMO_SUBMIT_MESSAGE;
    use crate::leaderboard::testing::FakeService;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_offline_refresh_fills_demo_table() {
        let mut client = LeaderboardClient::offline(10);
        client.refresh(1);
        assert!(client.view().loading);

        let reply = client.wait(1, TIMEOUT).expect("reply");
        assert!(matches!(reply.kind, ReplyKind::TopScores(_)));
        assert!(!client.view().loading);
        assert!(client.view().demo);
        assert_eq!(client.view().top_score(), Some(500));
    }

    #[test]
    fn test_offline_submit_then_refresh() {
        let mut client = LeaderboardClient::offline(10);
        client.submit(3, "aaa", "a@b.com", 500);

        let reply = client.wait(3, TIMEOUT).expect("submit reply");
        match reply.kind {
            ReplyKind::Submitted(outcome) => {
                assert!(outcome.success);
                assert_eq!(outcome.message.as_deref(), Some(DEMO_SUBMIT_MESSAGE));
            }
            other => panic!("unexpected reply {other:?}"),
        }

        // successful submit schedules a refresh
        let reply = client.wait(3, TIMEOUT).expect("refresh reply");
        assert!(matches!(reply.kind, ReplyKind::TopScores(_)));
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut client = LeaderboardClient::offline(10);
        client.refresh(1);
        assert!(client.wait(2, Duration::from_millis(500)).is_none());
        assert!(client.view().entries.is_empty());
    }

    #[test]
    fn test_submit_after_reset_is_dropped() {
        let mut client = LeaderboardClient::offline(10);
        client.submit(4, "abc", "a@b.com", 900);
        // session moved on to generation 5 before the reply arrived
        assert!(client.wait(5, Duration::from_millis(500)).is_none());
        assert!(client.last_submit().is_none());
    }

    #[test]
    fn test_rejected_submit_recorded() {
        let service: Arc<dyn LeaderboardService> =
            Arc::new(FakeService::failing(ServiceError::Rejected("banned".into())));
        let mut client = LeaderboardClient::new(Some(service), 10);
        client.submit(0, "abc", "a@b.com", 10);
        client.wait(0, TIMEOUT).expect("reply");
        let outcome = client.last_submit().expect("outcome");
        assert!(!outcome.success);
        assert!(client.poll(0).is_empty());
    }

    #[test]
    fn test_live_service_round_trip() {
        let service: Arc<dyn LeaderboardService> = Arc::new(FakeService::default());
        let mut client = LeaderboardClient::new(Some(service), 10);
        client.submit(7, "xy", "x@y.io", 1234);
        client.wait(7, TIMEOUT).expect("submit");
        client.wait(7, TIMEOUT).expect("refresh");
        assert!(!client.view().demo);
        assert_eq!(client.view().entries[0].initials, "XY");
        assert_eq!(client.view().player_rank(2000), Some(1));
    }
}
