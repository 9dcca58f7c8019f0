//! A single-player blackjack round engine: shoe, hands, dealer play, settlement,
//! basic-strategy advice and session progression.
//!
//! [`RoundEngine`] is the entry point. It is driven by method calls and reports every
//! state change to a [`RoundEventHandler`].

pub mod card;
pub mod dealer;
pub mod error;
pub mod payout;
pub mod progression;
pub mod round;
pub mod strategy;

use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

pub use card::{Card, Rank, Suit};
pub use error::{GameError, ShoeError};
pub use payout::{Outcome, RoundSummary, Settlement};
pub use round::hand::Hand;
pub use round::shoe::Shoe;
pub use round::{AvailableActions, GamePhase, RoundEngine, RoundEventHandler, Seat};
pub use strategy::Tip;

pub const STARTING_BANKROLL: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum Decision {
    #[serde(rename = "HIT")]
    Hit,
    #[serde(rename = "STAND")]
    Stand,
    #[serde(rename = "DOUBLE")]
    Double,
    #[serde(rename = "SPLIT")]
    Split,
}

/// Table settings that stay fixed for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub number_of_decks: u8,
    pub starting_bankroll: u32,
    /// Fixes the shuffle order when set.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            number_of_decks: round::shoe::DEFAULT_NUMBER_OF_DECKS,
            starting_bankroll: STARTING_BANKROLL,
            seed: None,
        }
    }
}
