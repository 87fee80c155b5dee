//! Score collaborator.

use serde::Deserialize;

/// Keeps score and decides when the game is won.
pub trait ScoreKeeper: Send + Sync {
    fn add_score(&mut self);
    fn check_win(&self) -> bool;
    fn score(&self) -> u32;
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ScoreConfig {
    /// Completed containers needed to win
    pub win_threshold: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self { win_threshold: 5 }
    }
}

/// Counts completed containers against a fixed threshold.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    pub score: u32,
    pub win_threshold: u32,
}

impl Scoreboard {
    pub fn new(config: &ScoreConfig) -> Self {
        Self {
            score: 0,
            win_threshold: config.win_threshold,
        }
    }
}

impl ScoreKeeper for Scoreboard {
    fn add_score(&mut self) {
        self.score += 1;
    }

    fn check_win(&self) -> bool {
        self.score >= self.win_threshold
    }

    fn score(&self) -> u32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wins_at_threshold() {
        let mut board = Scoreboard::new(&ScoreConfig { win_threshold: 2 });
        board.add_score();
        assert!(!board.check_win());
        board.add_score();
        assert!(board.check_win());
        assert_eq!(board.score(), 2);
    }
}
