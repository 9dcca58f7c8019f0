use serde::Serialize;

use crate::card::Card;
use crate::round::hand::Hand;
use crate::Decision;

/// Advice for the current decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tip {
    pub situation: String,
    pub action: Decision,
    pub reason: String,
}

impl Tip {
    fn new(situation: String, action: Decision, reason: impl Into<String>) -> Self {
        Tip {
            situation,
            action,
            reason: reason.into(),
        }
    }
}

/// Basic strategy for a dealer that hits soft 17. Pure: it only reads the hand, the
/// dealer's upcard and whether doubling and splitting are currently legal.
pub fn advise(hand: &Hand, dealer_up_card: &Card, can_double: bool, can_split: bool) -> Tip {
    let up = up_card_value(dealer_up_card);
    let up_label = if dealer_up_card.rank.is_ace() {
        String::from("A")
    } else {
        up.to_string()
    };

    if can_split {
        if let Some(tip) = advise_pair(hand, up, &up_label) {
            return tip;
        }
    }

    let score = hand.score();
    if hand.is_soft() {
        advise_soft(score, up, &up_label, can_double)
    } else {
        advise_hard(score, up, &up_label, can_double)
    }
}

/// Aces count as 11 when reading the chart.
fn up_card_value(card: &Card) -> u8 {
    if card.rank.is_ace() {
        11
    } else {
        card.blackjack_value()
    }
}

fn advise_pair(hand: &Hand, up: u8, up_label: &str) -> Option<Tip> {
    let first = hand.cards().first()?;
    let rank = first.rank.symbol();
    let situation = format!("Pair of {}s vs dealer {}", rank, up_label);
    let split = |reason: String| Some(Tip::new(situation.clone(), Decision::Split, reason));

    if first.rank.is_ace() {
        return split(String::from("Always split Aces."));
    }
    match first.blackjack_value() {
        8 => split(String::from("Always split 8s. 16 is the worst hand.")),
        9 if up != 7 && up < 10 => split(String::from("Split 9s vs dealer 2-6, 8-9.")),
        2 | 3 | 7 if (2..=7).contains(&up) => split(format!("Split {}s vs dealer 2-7.", rank)),
        6 if (2..=6).contains(&up) => split(String::from("Split 6s vs dealer 2-6.")),
        // Tens, 5s and 4s are played as hard totals.
        _ => None,
    }
}

fn advise_soft(score: u8, up: u8, up_label: &str, can_double: bool) -> Tip {
    let situation = format!("Soft {} vs dealer {}", score, up_label);
    let (action, reason) = match score {
        19.. => (Decision::Stand, format!("Soft {} is strong. Always stand.", score)),
        18 if can_double && (3..=6).contains(&up) => (
            Decision::Double,
            String::from("Soft 18 doubles vs dealer 3-6."),
        ),
        18 if up >= 9 => (
            Decision::Hit,
            String::from("Soft 18 hits vs dealer 9, 10, A."),
        ),
        18 => (
            Decision::Stand,
            String::from("Soft 18 stands vs dealer 2, 7, 8."),
        ),
        17 if can_double && (3..=6).contains(&up) => (
            Decision::Double,
            String::from("Soft 17 doubles vs dealer 3-6."),
        ),
        17 => (Decision::Hit, String::from("Soft 17 always hits otherwise.")),
        15 | 16 if can_double && (4..=6).contains(&up) => (
            Decision::Double,
            format!("Soft {} doubles vs dealer 4-6.", score),
        ),
        13 | 14 if can_double && (5..=6).contains(&up) => (
            Decision::Double,
            format!("Soft {} doubles vs dealer 5-6.", score),
        ),
        13..=16 => (Decision::Hit, format!("Soft {} hits otherwise.", score)),
        _ => (Decision::Hit, format!("Hit soft {}.", score)),
    };
    Tip::new(situation, action, reason)
}

fn advise_hard(score: u8, up: u8, up_label: &str, can_double: bool) -> Tip {
    let situation = format!("Hard {} vs dealer {}", score, up_label);
    let double_or_hit = if can_double {
        Decision::Double
    } else {
        Decision::Hit
    };
    let (action, reason) = match score {
        17.. => (Decision::Stand, String::from("Hard 17+ always stands.")),
        13..=16 if up <= 6 => (
            Decision::Stand,
            format!("Hard {} stands. Dealer is weak (2-6).", score),
        ),
        13..=16 => (
            Decision::Hit,
            format!("Hard {} hits. Dealer is strong (7+).", score),
        ),
        12 if (4..=6).contains(&up) => (
            Decision::Stand,
            String::from("Hard 12 stands vs dealer 4-6."),
        ),
        12 => (
            Decision::Hit,
            String::from("Hard 12 hits vs dealer 2-3 and 7+."),
        ),
        11 => (
            double_or_hit,
            String::from("Hard 11 is the best doubling hand in the game."),
        ),
        10 if up <= 9 => (double_or_hit, String::from("Double 10 vs dealer 2-9.")),
        10 => (Decision::Hit, String::from("Hit 10 vs dealer 10 or A.")),
        9 if can_double && (3..=6).contains(&up) => {
            (Decision::Double, String::from("Double 9 vs dealer 3-6."))
        }
        9 => (Decision::Hit, String::from("Hit 9 vs dealer 2 and 7+.")),
        _ => (Decision::Hit, format!("Always hit {} or less.", score)),
    };
    Tip::new(situation, action, reason)
}
