//! Game session lifecycle
//!
//! A session owns the board and the countdown. It moves from not-started to
//! running on `start`, and to over when the board is cleared, a shot reaches
//! the bottom, or time runs out. `advance` is the fixed-timestep driver: feed
//! it real frame deltas and it runs whole simulation ticks and whole
//! countdown seconds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::MAX_FRAME_DT;
use crate::sim::{
    self, BoardEvent, BoardOutcome, BoardState, Bubble, BubbleColor, PopAnimation, Projectile,
};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Every bubble popped
    Won,
    /// A shot fell to the bottom boundary
    ReachedBottom,
    /// The countdown hit zero
    TimeUp,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Board is laid out, waiting for `start`
    NotStarted,
    /// Shots and countdown are live
    Running,
    /// Terminal until `reset`
    Over(GameOverCause),
}

/// Read-only view of everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub bubbles: Vec<Bubble>,
    pub projectile: Option<Projectile>,
    pub animations: Vec<PopAnimation>,
    pub next_color: BubbleColor,
    pub launcher: Vec2,
    pub score: u64,
    pub time_left: u32,
}

/// One game from layout to game over
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: BoardState,
    phase: SessionPhase,
    /// Whole seconds remaining
    time_left: u32,
    /// Real time not yet consumed by ticks
    tick_accumulator: f32,
    /// Real time not yet consumed by the countdown
    countdown_accumulator: f32,
    /// Simulation ticks while running
    ticks: u64,
}

impl GameSession {
    /// Create a session with a freshly generated board
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let board = BoardState::new(config.clone(), seed);
        Self::with_board(board)
    }

    /// Create a session around a prepared board
    pub fn with_board(board: BoardState) -> Self {
        let config = board.config.clone();
        Self {
            time_left: config.countdown_seconds,
            config,
            board,
            phase: SessionPhase::NotStarted,
            tick_accumulator: 0.0,
            countdown_accumulator: 0.0,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Seconds played so far
    pub fn elapsed_seconds(&self) -> u32 {
        self.config.countdown_seconds.saturating_sub(self.time_left)
    }

    pub fn score(&self) -> u64 {
        self.board.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Begin play. Ignored unless the session has not started yet.
    pub fn start(&mut self) {
        if self.phase != SessionPhase::NotStarted {
            return;
        }
        self.phase = SessionPhase::Running;
        self.time_left = self.config.countdown_seconds;
        self.halt_driver();
        log::info!(
            "Session started: {} bubbles, {}s on the clock",
            self.board.bubbles.len(),
            self.time_left
        );
    }

    /// Stop everything and lay out a new board from the next seed
    pub fn reset(&mut self) {
        let seed = self.board.successor_seed();
        self.reset_with_seed(seed);
    }

    /// Stop everything and lay out a new board from `seed`
    pub fn reset_with_seed(&mut self, seed: u64) {
        // Drop pending time first so no stale tick or second lands on the new board
        self.halt_driver();
        self.board = BoardState::new(self.config.clone(), seed);
        self.phase = SessionPhase::NotStarted;
        self.time_left = self.config.countdown_seconds;
        self.ticks = 0;
        log::info!("Session reset with seed {}", seed);
    }

    fn halt_driver(&mut self) {
        self.tick_accumulator = 0.0;
        self.countdown_accumulator = 0.0;
    }

    /// Fire the next bubble. Returns `false` when the shot is not allowed.
    pub fn fire(&mut self, direction: Vec2, power: f32) -> bool {
        if !self.is_running() {
            return false;
        }
        sim::fire(&mut self.board, direction, power)
    }

    /// One fixed simulation step: shot first, then animation aging
    pub fn tick(&mut self) {
        if self.is_running() {
            self.ticks += 1;
            if let Some(resolution) = sim::tick(&mut self.board) {
                log::debug!("Shot resolved: {:?}", resolution);
            }
            let outcome = self.board.outcome;
            match outcome {
                Some(BoardOutcome::Cleared) => self.finish(GameOverCause::Won),
                Some(BoardOutcome::ReachedBottom) => self.finish(GameOverCause::ReachedBottom),
                None => {}
            }
        }
        if self.phase != SessionPhase::NotStarted {
            sim::tick_animations(&mut self.board);
        }
    }

    /// One countdown second. At zero the session ends and any shot in flight
    /// is dropped unresolved.
    pub fn countdown_tick(&mut self) {
        if !self.is_running() {
            return;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            if self.board.discard_projectile().is_some() {
                log::debug!("Shot in flight discarded at time up");
            }
            self.finish(GameOverCause::TimeUp);
        }
    }

    /// Advance by `dt` seconds of real time.
    ///
    /// Runs ticks at the configured rate (never fewer than `max_substeps` per
    /// call, and always enough for a full clamped frame), then whole countdown
    /// seconds. Leftover time past the cap is dropped. Returns the number of
    /// ticks run.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.phase == SessionPhase::NotStarted {
            return 0;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let step = self.config.tick_dt();

        // The cap always covers one full clamped frame at the configured rate
        let max_substeps = self
            .config
            .max_substeps
            .max((MAX_FRAME_DT / step).ceil() as u32);

        self.tick_accumulator += dt;
        let mut substeps = 0;
        while self.tick_accumulator >= step && substeps < max_substeps {
            self.tick();
            self.tick_accumulator -= step;
            substeps += 1;
        }
        if substeps == max_substeps {
            // Drop the backlog instead of carrying it into later frames
            self.tick_accumulator = self.tick_accumulator.min(step);
        }

        if self.is_running() {
            self.countdown_accumulator += dt;
            while self.countdown_accumulator >= 1.0 && self.is_running() {
                self.countdown_accumulator -= 1.0;
                self.countdown_tick();
            }
        }

        substeps
    }

    fn finish(&mut self, cause: GameOverCause) {
        self.phase = SessionPhase::Over(cause);
        self.countdown_accumulator = 0.0;
        log::info!(
            "Game over ({:?}): score {}, {}s played",
            cause,
            self.board.score,
            self.elapsed_seconds()
        );
    }

    /// Take board events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.board.drain_events()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            bubbles: self.board.bubbles.clone(),
            projectile: self.board.projectile.clone(),
            animations: self.board.animations.clone(),
            next_color: self.board.next_color,
            launcher: self.config.launcher(),
            score: self.board.score,
            time_left: self.time_left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UP: Vec2 = Vec2::new(0.0, -1.0);

    fn pair_board(color: BubbleColor) -> BoardState {
        let mut board = BoardState::empty(GameConfig::default(), 5);
        board.insert_bubble(0, 5, color);
        board.insert_bubble(0, 6, color);
        board.next_color = color;
        board
    }

    fn run_until_idle(session: &mut GameSession) {
        for _ in 0..1000 {
            if !session.board().in_flight() {
                return;
            }
            session.tick();
        }
        panic!("Shot never resolved");
    }

    #[test]
    fn test_starts_not_started() {
        let session = GameSession::new(GameConfig::default(), 1);
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.time_left(), 180);
        assert_eq!(session.board().bubbles.len(), 60);
    }

    #[test]
    fn test_fire_requires_start() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        assert!(!session.fire(UP, 1.0));
        session.start();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert!(session.fire(UP, 1.0));
    }

    #[test]
    fn test_shot_into_empty_lane() {
        let mut board = BoardState::empty(GameConfig::default(), 5);
        board.insert_bubble(0, 0, BubbleColor::Lime);
        board.insert_bubble(0, 1, BubbleColor::Lime);
        let mut session = GameSession::with_board(board);
        session.start();

        assert!(session.fire(UP, 1.0));
        run_until_idle(&mut session);

        assert_eq!(session.board().bubbles.len(), 3);
        assert_eq!(session.score(), 0);
        assert_eq!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_clearing_board_wins() {
        let mut session = GameSession::with_board(pair_board(BubbleColor::Magenta));
        session.start();

        assert!(session.fire(UP, 1.0));
        run_until_idle(&mut session);

        assert_eq!(session.phase(), SessionPhase::Over(GameOverCause::Won));
        assert_eq!(session.score(), 30);
        assert_eq!(session.time_left(), 180);
        assert!(!session.fire(UP, 1.0));
    }

    #[test]
    fn test_reaching_bottom_loses() {
        let mut session = GameSession::with_board(pair_board(BubbleColor::Cyan));
        session.start();

        assert!(session.fire(Vec2::new(0.0, 1.0), 1.0));
        run_until_idle(&mut session);

        assert_eq!(
            session.phase(),
            SessionPhase::Over(GameOverCause::ReachedBottom)
        );
    }

    #[test]
    fn test_time_up_discards_shot_in_flight() {
        let mut session = GameSession::with_board(pair_board(BubbleColor::Cyan));
        session.start();
        assert!(session.fire(UP, 1.0));
        for _ in 0..5 {
            session.tick();
        }
        assert!(session.board().in_flight());

        for _ in 0..180 {
            session.countdown_tick();
        }

        assert_eq!(session.phase(), SessionPhase::Over(GameOverCause::TimeUp));
        assert_eq!(session.time_left(), 0);
        assert!(!session.board().in_flight());
        assert_eq!(session.board().bubbles.len(), 2);
        assert_eq!(session.score(), 0);

        // Further ticks leave the board alone
        session.tick();
        assert_eq!(session.board().bubbles.len(), 2);
    }

    #[test]
    fn test_countdown_only_runs_while_running() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        session.countdown_tick();
        assert_eq!(session.time_left(), 180);
        session.start();
        session.countdown_tick();
        assert_eq!(session.time_left(), 179);
        assert_eq!(session.elapsed_seconds(), 1);
    }

    #[test]
    fn test_advance_counts_down_whole_seconds() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        assert_eq!(session.advance(0.0625), 0);
        session.start();

        for _ in 0..15 {
            session.advance(0.0625);
        }
        assert_eq!(session.time_left(), 180);
        session.advance(0.0625);
        assert_eq!(session.time_left(), 179);
        assert!(session.ticks() >= 59);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        session.start();
        // Huge frame is clamped to 0.1s, which is six ticks at 60 Hz
        let ran = session.advance(5.0);
        assert!(ran <= session.config().max_substeps);
        assert!(ran >= 5);
    }

    #[test]
    fn test_high_tick_rate_keeps_pace() {
        let config = GameConfig {
            tick_rate: 240.0,
            ..GameConfig::default()
        };
        let mut session = GameSession::new(config, 1);
        session.start();

        let step = session.config().tick_dt();
        for _ in 0..100 {
            session.advance(0.1);
            assert!(session.tick_accumulator <= step);
        }

        // Ten seconds of frames at 240 Hz
        assert!(session.ticks() >= 2390, "ran {} ticks", session.ticks());
        assert!(session.ticks() <= 2401, "ran {} ticks", session.ticks());
        assert!((169..=170).contains(&session.time_left()));
    }

    #[test]
    fn test_substep_cap_drops_backlog() {
        let config = GameConfig {
            max_substeps: 2,
            ..GameConfig::default()
        };
        let mut session = GameSession::new(config, 1);
        session.start();
        let step = session.config().tick_dt();

        // A configured cap of two still lets a full 0.1s frame (six ticks) run
        let ran = session.advance(0.1);
        assert!(ran >= 5);
        assert!(session.tick_accumulator <= step);
    }

    #[test]
    fn test_reset_halts_countdown() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        session.start();
        session.advance(0.09375);
        session.advance(0.09375);
        session.advance(0.09375);
        session.advance(0.09375);
        session.advance(0.09375);
        session.advance(0.09375);
        session.advance(0.09375);
        session.advance(0.09375);

        session.reset();
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.ticks(), 0);

        session.start();
        // 0.75s pending before the reset would have tipped over a second here
        session.advance(0.09375);
        session.advance(0.09375);
        session.advance(0.09375);
        assert_eq!(session.time_left(), 180);
    }

    #[test]
    fn test_reset_restores_fresh_board() {
        let mut session = GameSession::with_board(pair_board(BubbleColor::Lime));
        session.start();
        session.fire(UP, 1.0);
        run_until_idle(&mut session);
        assert!(matches!(session.phase(), SessionPhase::Over(_)));

        session.reset_with_seed(77);

        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_left(), 180);
        assert!(session.board().projectile.is_none());
        assert!(session.board().animations.is_empty());
        assert_eq!(
            session.board().bubbles,
            BoardState::new(GameConfig::default(), 77).bubbles
        );
    }

    #[test]
    fn test_animations_age_after_game_over() {
        let mut session = GameSession::with_board(pair_board(BubbleColor::Orange));
        session.start();
        session.fire(UP, 1.0);
        run_until_idle(&mut session);
        assert_eq!(session.board().animations.len(), 3);

        for _ in 0..20 {
            session.tick();
        }
        assert!(session.board().animations.is_empty());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = GameSession::new(GameConfig::default(), 3);
        session.start();
        session.fire(UP, 1.0);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Running);
        assert_eq!(snapshot.bubbles.len(), 60);
        assert!(snapshot.projectile.is_some());
        assert_eq!(snapshot.launcher, Vec2::new(240.0, 560.0));
        assert_eq!(snapshot.time_left, 180);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"Running\""));
    }
}
