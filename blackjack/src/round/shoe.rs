use crate::card::{Card, Rank, Suit};
use crate::error::ShoeError;

use strum::IntoEnumIterator;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_NUMBER_OF_DECKS: u8 = 6;
/// The shoe is rebuilt before a deal whenever fewer cards than this remain.
pub const REBUILD_THRESHOLD: usize = 52;

/// Represents a shoe in the real world: `number_of_decks` standard decks shuffled together.
#[derive(Debug, Clone)]
pub struct Shoe {
    number_of_decks: u8,
    cards: Vec<Card>,
    current_index: usize,
    rng: ChaCha8Rng,
}

impl Shoe {
    /// Creates a shuffled shoe seeded from OS entropy.
    pub fn new(number_of_decks: u8) -> Shoe {
        Shoe::with_rng(number_of_decks, ChaCha8Rng::from_entropy())
    }

    /// Creates a shuffled shoe whose whole card sequence, rebuilds included, is
    /// determined by `seed`.
    pub fn with_seed(number_of_decks: u8, seed: u64) -> Shoe {
        Shoe::with_rng(number_of_decks, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(number_of_decks: u8, rng: ChaCha8Rng) -> Shoe {
        let number_of_decks = number_of_decks.max(1);
        let mut shoe = Shoe {
            number_of_decks,
            cards: Vec::new(),
            current_index: 0,
            rng,
        };
        shoe.rebuild();
        shoe
    }

    /// Deals the next card with the given orientation. Rebuilds first if fewer than
    /// 52 cards remain, so a deal always succeeds.
    pub fn deal(&mut self, face_down: bool) -> Card {
        if self.remaining() < REBUILD_THRESHOLD {
            log::info!(
                "Rebuilding shoe of {} decks ({} cards were left)",
                self.number_of_decks,
                self.remaining()
            );
            self.rebuild();
        }
        let card = self.cards[self.current_index];
        self.current_index += 1;
        Card::dealt(card.suit, card.rank, face_down)
    }

    /// Throws away whatever is left and shuffles a fresh set of decks.
    pub fn rebuild(&mut self) {
        self.cards = ordered_cards(self.number_of_decks);
        self.cards.shuffle(&mut self.rng);
        self.current_index = 0;
    }

    /// Rebuilds the shoe so the given ranks are dealt first, in order. The remaining
    /// cards are shuffled. Fails without touching the shoe if the decks do not hold
    /// enough copies of a rank.
    pub fn stack(&mut self, firsts: &[Rank]) -> Result<(), ShoeError> {
        let mut pool = ordered_cards(self.number_of_decks);
        let mut stacked = Vec::with_capacity(pool.len());
        for rank in firsts {
            let position = pool
                .iter()
                .position(|card| card.rank == *rank)
                .ok_or(ShoeError::NotEnoughCards(*rank))?;
            stacked.push(pool.swap_remove(position));
        }

        pool.shuffle(&mut self.rng);
        stacked.extend(pool);
        self.cards = stacked;
        self.current_index = 0;
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.current_index
    }

    pub fn number_of_decks(&self) -> u8 {
        self.number_of_decks
    }
}

fn ordered_cards(number_of_decks: u8) -> Vec<Card> {
    let mut cards = Vec::with_capacity(number_of_decks as usize * 52);
    for _ in 0..number_of_decks {
        for suit in Suit::iter() {
            for rank in Rank::iter() {
                cards.push(Card::new(suit, rank));
            }
        }
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn number_of_cards_is_correct(shoe: &Shoe) -> bool {
        let mut counts: HashMap<(Suit, Rank), u8> = HashMap::new();
        for card in &shoe.cards {
            *counts.entry((card.suit, card.rank)).or_default() += 1;
        }
        counts.len() == 52 && counts.values().all(|c| *c == shoe.number_of_decks)
    }

    #[test]
    fn new_shoe_holds_every_card_once_per_deck() {
        let shoe = Shoe::with_seed(6, 7);
        assert_eq!(shoe.remaining(), 312);
        assert!(number_of_cards_is_correct(&shoe));
    }

    #[test]
    fn same_seed_same_order() {
        let mut a = Shoe::with_seed(6, 42);
        let mut b = Shoe::with_seed(6, 42);
        for _ in 0..400 {
            assert_eq!(a.deal(false), b.deal(false));
        }
    }

    #[test]
    fn deal_sets_orientation() {
        let mut shoe = Shoe::with_seed(2, 1);
        assert!(shoe.deal(true).is_face_down());
        assert!(!shoe.deal(false).is_face_down());
    }

    #[test]
    fn rebuilds_before_dropping_below_one_deck() {
        let mut shoe = Shoe::with_seed(2, 3);
        for _ in 0..52 {
            shoe.deal(false);
        }
        assert_eq!(shoe.remaining(), 52);
        shoe.deal(false);
        assert_eq!(shoe.remaining(), 51);
        shoe.deal(false);
        assert_eq!(shoe.remaining(), 103);
        assert!(shoe.cards.iter().all(|card| !card.is_face_down()));
    }

    #[test]
    fn never_runs_dry() {
        let mut shoe = Shoe::with_seed(1, 9);
        for _ in 0..10_000 {
            shoe.deal(false);
            assert!(shoe.remaining() < 52);
        }
    }

    #[test]
    fn zero_decks_is_treated_as_one() {
        let mut shoe = Shoe::with_seed(0, 9);
        assert_eq!(shoe.number_of_decks(), 1);
        shoe.deal(false);
    }

    #[test]
    fn test_stack() {
        let mut shoe = Shoe::with_seed(6, 5);
        let firsts = [Rank::Ten, Rank::Nine, Rank::Six, Rank::King, Rank::Five];
        shoe.stack(&firsts).unwrap();
        assert!(number_of_cards_is_correct(&shoe));
        for rank in firsts {
            assert_eq!(shoe.deal(false).rank, rank);
        }
    }

    #[test]
    fn stacking_too_many_of_a_rank_fails_and_keeps_shoe() {
        let mut shoe = Shoe::with_seed(1, 5);
        shoe.deal(false);
        let before = shoe.cards.clone();
        assert_eq!(
            shoe.stack(&[Rank::Ace; 5]),
            Err(ShoeError::NotEnoughCards(Rank::Ace))
        );
        assert_eq!(shoe.cards, before);
        assert_eq!(shoe.remaining(), 51);
    }

    #[test]
    fn first_card_rank_is_uniform() {
        let trials = 13_000;
        let mut counts: HashMap<Rank, u32> = HashMap::new();
        for seed in 0..trials {
            let mut shoe = Shoe::with_seed(1, seed);
            *counts.entry(shoe.deal(false).rank).or_default() += 1;
        }
        assert_eq!(counts.len(), 13);
        for (rank, count) in counts {
            assert!(
                (850..=1150).contains(&count),
                "{:?} came first {} times out of {}",
                rank,
                count,
                trials
            );
        }
    }

    #[test]
    fn last_position_suit_is_uniform() {
        let trials = 8_000;
        let mut counts: HashMap<Suit, u32> = HashMap::new();
        for seed in 0..trials {
            let shoe = Shoe::with_seed(1, seed);
            *counts.entry(shoe.cards[51].suit).or_default() += 1;
        }
        for (suit, count) in counts {
            assert!((1800..=2200).contains(&count), "{:?}: {}", suit, count);
        }
    }
}
