use std::time::{Duration, Instant};

use crate::game::RunStatus;

/// Statistics kept across games in one session
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    pub games_won: u32,
    /// Set once the current game has ended; the clock stops
    finished: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            games_won: 0,
            finished: false,
        }
    }

    /// Refresh the game clock
    pub fn update(&mut self) {
        if !self.finished {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.finished = false;
    }

    /// Record a finished game. Calls for a game already recorded are ignored.
    pub fn on_game_over(&mut self, status: RunStatus, final_score: u32) {
        if self.finished || !status.is_terminal() {
            return;
        }
        self.update();
        self.finished = true;
        self.games_played += 1;
        if status == RunStatus::Won {
            self.games_won += 1;
        }
        self.high_score = self.high_score.max(final_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
