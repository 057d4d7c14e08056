//! Space Defender entry point
//!
//! Native: headless run driven by the autopilot, logging as it goes.
//! Web: exposes a `WebGame` handle; the page owns input and drawing.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use space_defender::Settings;
    use space_defender::leaderboard::LeaderboardClient;
    use space_defender::persistence::LocalStorageStore;
    use space_defender::sim::{GameEvent, Session, TickInput};

    /// Browser-facing session handle
    #[wasm_bindgen]
    pub struct WebGame {
        session: Session,
        leaderboard: LeaderboardClient,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new() -> WebGame {
            let settings = Settings::load();
            let seed = settings.seed_or(js_sys::Date::now() as u64);
            log::info!("Space Defender starting (seed {})", seed);

            let session = Session::new(
                seed,
                settings.tuning.clone(),
                Box::new(LocalStorageStore::load()),
            );
            let mut leaderboard = LeaderboardClient::offline(settings.leaderboard_limit);
            leaderboard.refresh(session.generation());
            WebGame {
                session,
                leaderboard,
            }
        }

        /// Advance one tick and return the frame as JSON
        pub fn tick(
            &mut self,
            move_left: bool,
            move_right: bool,
            move_up: bool,
            move_down: bool,
            fire: bool,
            confirm: bool,
        ) -> String {
            let input = TickInput {
                move_left,
                move_right,
                move_up,
                move_down,
                fire,
                confirm,
            };
            let restarted = self
                .session
                .tick(&input)
                .iter()
                .any(|e| matches!(e, GameEvent::SessionStarted { .. }));
            if restarted {
                self.leaderboard.refresh(self.session.generation());
            }
            self.leaderboard.poll(self.session.generation());
            self.session.snapshot().to_json().unwrap_or_default()
        }

        /// Whether the final score would make the table
        pub fn is_top_score(&self, score: u64) -> bool {
            self.leaderboard.view().is_top_score(score)
        }

        pub fn submit_score(&mut self, initials: &str, email: &str, score: u64) {
            self.leaderboard
                .submit(self.session.generation(), initials, email, score);
        }

        /// Last submission result as JSON, empty until one arrives
        pub fn submit_result(&self) -> String {
            self.leaderboard
                .last_submit()
                .and_then(|outcome| serde_json::to_string(outcome).ok())
                .unwrap_or_default()
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use space_defender::Settings;
    use space_defender::leaderboard::{LeaderboardClient, ReplyKind};
    use space_defender::persistence::FileStore;
    use space_defender::platform::{Autopilot, InputSource, LogRenderer, Renderer};
    use space_defender::sim::{GameEvent, Session};

    env_logger::init();
    log::info!("Space Defender (native) starting...");

    let settings = Settings::load();
    let clock = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let seed = settings.seed_or(clock);
    log::info!("Seed {}", seed);

    let store = FileStore::open(&settings.high_score_path);
    let mut session = Session::new(seed, settings.tuning.clone(), Box::new(store));
    let mut pilot = Autopilot::new();
    let mut renderer = LogRenderer::new();
    let mut leaderboard = LeaderboardClient::offline(settings.leaderboard_limit);
    leaderboard.refresh(session.generation());

    let mut games = 0u32;
    for _ in 0..settings.max_ticks {
        let snapshot = session.snapshot();
        renderer.draw(&snapshot);
        pilot.draw(&snapshot);

        let input = pilot.poll();
        let events = session.tick(&input).to_vec();
        for event in &events {
            match event {
                GameEvent::GameOver { score } => {
                    games += 1;
                    if leaderboard.view().is_top_score(*score) {
                        leaderboard.submit(
                            session.generation(),
                            &settings.player_initials,
                            &settings.player_email,
                            *score,
                        );
                    }
                }
                GameEvent::SessionStarted { generation } => leaderboard.refresh(*generation),
                GameEvent::HostileSpawned { .. } | GameEvent::Explosion { .. } => {}
                other => log::debug!("{:?}", other),
            }
        }

        for reply in leaderboard.poll(session.generation()) {
            if let ReplyKind::Submitted(outcome) = reply.kind {
                log::info!(
                    "Leaderboard: {}",
                    outcome.message.or(outcome.error).unwrap_or_default()
                );
            }
        }
    }

    // Let any in-flight request for the current session land
    while let Some(reply) = leaderboard.wait(session.generation(), Duration::from_millis(250)) {
        log::debug!("Late leaderboard reply: {:?}", reply.kind);
    }

    let progression = session.progression();
    log::info!(
        "Finished after {} ticks: {} games, phase {:?}, score {}, level {}, high score {}",
        session.ticks(),
        games,
        session.phase(),
        progression.score,
        progression.level,
        progression.high_score
    );
    for (rank, entry) in leaderboard.view().entries.iter().enumerate() {
        log::info!(
            "{:>2}. {} {:<20} {}",
            rank + 1,
            entry.initials,
            entry.masked_email,
            entry.score
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
