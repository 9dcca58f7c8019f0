use thiserror::Error;

use crate::card::Rank;
use crate::round::GamePhase;

/// Rejections returned by the round engine. A rejected call never changes state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{action} is only allowed in {expected:?} phase (current phase: {actual:?})")]
    WrongPhase {
        action: &'static str,
        expected: GamePhase,
        actual: GamePhase,
    },
    #[error("{action} is not allowed: {reason}")]
    InvalidAction {
        action: &'static str,
        reason: &'static str,
    },
    #[error("Invalid bet: {reason}")]
    InvalidBet { reason: String },
}

impl GameError {
    /// True for actions requested while phase or hand preconditions are unmet.
    pub fn is_invalid_action(&self) -> bool {
        matches!(
            self,
            GameError::WrongPhase { .. } | GameError::InvalidAction { .. }
        )
    }

    pub fn is_invalid_bet(&self) -> bool {
        matches!(self, GameError::InvalidBet { .. })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShoeError {
    #[error("No {0:?} left to place on top of the shoe")]
    NotEnoughCards(Rank),
}
