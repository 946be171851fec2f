use std::time::{Duration, Instant};

use crate::game::GameOverReason;

/// Statistics kept across rounds for the lifetime of the program
pub struct SessionStats {
    pub round_start: Instant,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub rounds_played: u32,
    /// Score and cause of the most recently finished round
    pub last_round: Option<(u32, GameOverReason)>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            round_start: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            rounds_played: 0,
            last_round: None,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.round_start.elapsed();
    }

    pub fn on_round_start(&mut self) {
        self.round_start = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_round_over(&mut self, final_score: u32, reason: GameOverReason) {
        self.rounds_played += 1;
        self.best_score = self.best_score.max(final_score);
        self.last_round = Some((final_score, reason));
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut stats = SessionStats::new();
        stats.elapsed_time = Duration::from_secs(125);
        assert_eq!(stats.format_time(), "02:05");

        stats.elapsed_time = Duration::from_secs(0);
        assert_eq!(stats.format_time(), "00:00");

        stats.elapsed_time = Duration::from_secs(3661);
        assert_eq!(stats.format_time(), "61:01");
    }

    #[test]
    fn test_best_score_tracking() {
        let mut stats = SessionStats::new();

        stats.on_round_over(10, GameOverReason::Wall);
        assert_eq!(stats.best_score, 10);
        assert_eq!(stats.rounds_played, 1);

        stats.on_round_over(5, GameOverReason::SelfCollision);
        assert_eq!(stats.best_score, 10); // Should not decrease
        assert_eq!(stats.rounds_played, 2);
        assert_eq!(stats.last_round, Some((5, GameOverReason::SelfCollision)));

        stats.on_round_over(15, GameOverReason::Wall);
        assert_eq!(stats.best_score, 15);
        assert_eq!(stats.rounds_played, 3);
    }

    #[test]
    fn test_round_start_resets_time() {
        let mut stats = SessionStats::new();
        std::thread::sleep(Duration::from_millis(50));
        stats.update();

        assert!(stats.elapsed_time.as_millis() >= 50);

        stats.on_round_start();
        stats.update();
        assert!(stats.elapsed_time.as_millis() < 50);
    }
}
