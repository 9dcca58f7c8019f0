use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Suit {
    Spade = 0,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    pub fn symbol(&self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Heart => '♥',
            Suit::Diamond => '♦',
            Suit::Club => '♣',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// The hard blackjack value of the rank: Ace is 1, face cards are 10.
    pub fn blackjack_value(&self) -> u8 {
        match self {
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => *other as u8,
        }
    }

    pub fn is_ace(&self) -> bool {
        *self == Rank::Ace
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// Represents a card on the table. Suit and rank never change; `face_down` only
/// ever goes from `true` to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    face_down: bool,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Card {
            suit,
            rank,
            face_down: false,
        }
    }

    pub(crate) fn dealt(suit: Suit, rank: Rank, face_down: bool) -> Self {
        Card {
            suit,
            rank,
            face_down,
        }
    }

    /// Every value the card may count for. Only an Ace has two.
    pub fn values(&self) -> &'static [u8] {
        match self.rank {
            Rank::Ace => &[1, 11],
            Rank::Two => &[2],
            Rank::Three => &[3],
            Rank::Four => &[4],
            Rank::Five => &[5],
            Rank::Six => &[6],
            Rank::Seven => &[7],
            Rank::Eight => &[8],
            Rank::Nine => &[9],
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => &[10],
        }
    }

    pub fn blackjack_value(&self) -> u8 {
        self.rank.blackjack_value()
    }

    pub fn is_face_down(&self) -> bool {
        self.face_down
    }

    /// Turns the card face up. A revealed card is never hidden again.
    pub fn reveal(&mut self) {
        self.face_down = false;
    }
}

impl Default for Card {
    fn default() -> Self {
        Card::new(Suit::Spade, Rank::Ace)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.face_down {
            return write!(f, "??");
        }
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn values_follow_blackjack_rules() {
        assert_eq!(Card::new(Suit::Heart, Rank::Ace).values(), &[1, 11]);
        assert_eq!(Card::new(Suit::Club, Rank::King).values(), &[10]);
        assert_eq!(Card::new(Suit::Club, Rank::Ten).values(), &[10]);
        assert_eq!(Card::new(Suit::Diamond, Rank::Seven).values(), &[7]);
    }

    #[test]
    fn hard_value_matches_lowest_value() {
        for rank in Rank::iter() {
            let card = Card::new(Suit::Spade, rank);
            assert_eq!(card.blackjack_value(), card.values()[0]);
        }
    }

    #[test]
    fn reveal_only_turns_face_up() {
        let mut card = Card::dealt(Suit::Heart, Rank::Queen, true);
        assert!(card.is_face_down());
        assert_eq!(card.to_string(), "??");
        card.reveal();
        assert!(!card.is_face_down());
        card.reveal();
        assert!(!card.is_face_down());
        assert_eq!(card.to_string(), "Q♥");
    }
}
