use serde::Serialize;

use crate::card::Card;

pub const BLACKJACK: u8 = 21;

/// One hand on the table: the dealer's, or one of the player's (several after splits).
///
/// Score is derived from the cards on every read. Face-down cards count for nothing
/// until revealed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    cards: Vec<Card>,
    pub bet: u32,
    pub stood: bool,
    pub doubled: bool,
    /// The hand came from splitting Aces. It takes one card and can never be a blackjack.
    pub split_aces: bool,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(4),
            ..Default::default()
        }
    }

    pub fn with_bet(bet: u32) -> Hand {
        Hand {
            bet,
            ..Hand::new()
        }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub(crate) fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    pub(crate) fn take_second_card(&mut self) -> Option<Card> {
        if self.cards.len() == 2 {
            self.cards.pop()
        } else {
            None
        }
    }

    pub fn score(&self) -> u8 {
        self.compute_score().0
    }

    pub fn is_soft(&self) -> bool {
        self.compute_score().1
    }

    pub fn is_bust(&self) -> bool {
        self.score() > BLACKJACK
    }

    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.score() == BLACKJACK && !self.split_aces
    }

    /// Two cards of equal rank, or any two ten-valued cards.
    pub fn can_split(&self) -> bool {
        match self.cards.as_slice() {
            [a, b] => {
                a.rank == b.rank || (a.blackjack_value() == 10 && b.blackjack_value() == 10)
            }
            _ => false,
        }
    }

    pub fn has_hidden_card(&self) -> bool {
        self.cards.iter().any(|card| card.is_face_down())
    }

    /// The first face-up card. For the dealer this is the upcard.
    pub fn first_visible(&self) -> Option<&Card> {
        self.cards.iter().find(|card| !card.is_face_down())
    }

    /// Reveals every face-down card and returns how many were turned.
    pub fn reveal_all(&mut self) -> usize {
        let mut revealed = 0;
        for card in self.cards.iter_mut().filter(|card| card.is_face_down()) {
            card.reveal();
            revealed += 1;
        }
        revealed
    }

    /// The label a table shows for the hand: `"7/17"` while an Ace counts as 11,
    /// `"BJ!"`, `"23 BUST"`, or the plain total.
    pub fn score_label(&self) -> String {
        if self.cards.iter().all(|card| card.is_face_down()) {
            return String::new();
        }
        let (total, soft) = self.compute_score();
        if !self.has_hidden_card() {
            if self.is_blackjack() {
                return String::from("BJ!");
            }
            if total > BLACKJACK {
                return format!("{} BUST", total);
            }
        }
        if soft {
            format!("{}/{}", total - 10, total)
        } else {
            total.to_string()
        }
    }

    /// Returns (total, soft). Aces start at 11 and drop to 1 one at a time while the
    /// total is over 21.
    fn compute_score(&self) -> (u8, bool) {
        let mut total = 0u8;
        let mut aces = 0u8;
        for card in self.cards.iter().filter(|card| !card.is_face_down()) {
            if card.rank.is_ace() {
                aces += 1;
                total += 11;
            } else {
                total += card.blackjack_value();
            }
        }

        while total > BLACKJACK && aces > 0 {
            total -= 10;
            aces -= 1;
        }
        (total, aces > 0 && total <= BLACKJACK)
    }
}
