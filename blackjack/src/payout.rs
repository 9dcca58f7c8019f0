use serde::Serialize;

use crate::round::hand::Hand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Blackjack,
    Win,
    Push,
    Loss,
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Blackjack | Outcome::Win)
    }
}

/// How one player hand settled. `payout` is what goes back to the bankroll; the bet
/// was already taken when it was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub outcome: Outcome,
    pub bet: u32,
    pub payout: u32,
}

/// Settles one player hand against the dealer. The checks run in a fixed order and
/// the first match wins.
pub fn resolve(hand: &Hand, dealer: &Hand) -> Settlement {
    let bet = hand.bet;
    let (outcome, payout) = if hand.is_bust() {
        (Outcome::Loss, 0)
    } else if hand.is_blackjack() && dealer.is_blackjack() {
        (Outcome::Push, bet)
    } else if hand.is_blackjack() {
        // 3:2, rounded down.
        (Outcome::Blackjack, clamp(u64::from(bet) * 5 / 2))
    } else if dealer.is_blackjack() {
        (Outcome::Loss, 0)
    } else if dealer.is_bust() || hand.score() > dealer.score() {
        (Outcome::Win, bet.saturating_mul(2))
    } else if hand.score() == dealer.score() {
        (Outcome::Push, bet)
    } else {
        (Outcome::Loss, 0)
    };
    Settlement {
        outcome,
        bet,
        payout,
    }
}

fn clamp(amount: u64) -> u32 {
    u32::try_from(amount).unwrap_or(u32::MAX)
}

/// The single outcome shown for a whole round.
///
/// With several hands this is a display simplification, not a money statement: one
/// win and one loss nets zero but still reads as a win.
pub fn classify_round(outcomes: &[Outcome]) -> Outcome {
    match outcomes {
        [single] => *single,
        _ if outcomes.iter().all(|o| *o == Outcome::Loss) => Outcome::Loss,
        _ if outcomes.iter().all(|o| *o == Outcome::Push) => Outcome::Push,
        _ if outcomes.iter().any(Outcome::is_win) => Outcome::Win,
        _ => Outcome::Push,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub settlements: Vec<Settlement>,
    pub outcome: Outcome,
    pub total_wagered: u32,
    pub total_payout: u32,
    pub all_bust: bool,
}

impl RoundSummary {
    pub fn settle(hands: &[Hand], dealer: &Hand) -> RoundSummary {
        let settlements: Vec<Settlement> = hands.iter().map(|h| resolve(h, dealer)).collect();
        let outcomes: Vec<Outcome> = settlements.iter().map(|s| s.outcome).collect();
        RoundSummary {
            outcome: classify_round(&outcomes),
            total_wagered: settlements
                .iter()
                .fold(0u32, |sum, s| sum.saturating_add(s.bet)),
            total_payout: settlements
                .iter()
                .fold(0u32, |sum, s| sum.saturating_add(s.payout)),
            all_bust: hands.iter().all(Hand::is_bust),
            settlements,
        }
    }

    pub fn net_gain(&self) -> i64 {
        self.total_payout as i64 - self.total_wagered as i64
    }

    pub fn headline(&self) -> &'static str {
        match self.outcome {
            Outcome::Blackjack => "BLACKJACK!",
            Outcome::Win => "YOU WIN!",
            Outcome::Push => "PUSH",
            Outcome::Loss if self.all_bust => "BUST!",
            Outcome::Loss => "YOU LOSE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rank, Suit};
    use proptest::prelude::*;

    fn hand_of(ranks: &[Rank], bet: u32) -> Hand {
        let mut hand = Hand::with_bet(bet);
        for rank in ranks {
            hand.add(Card::new(Suit::Spade, *rank));
        }
        hand
    }

    fn dealer_of(ranks: &[Rank]) -> Hand {
        hand_of(ranks, 0)
    }

    #[test]
    fn bust_loses_even_if_dealer_busts() {
        let player = hand_of(&[Rank::King, Rank::Six, Rank::Nine], 100);
        let dealer = dealer_of(&[Rank::King, Rank::Six, Rank::Eight]);
        let settlement = resolve(&player, &dealer);
        assert_eq!(settlement.outcome, Outcome::Loss);
        assert_eq!(settlement.payout, 0);
    }

    #[test]
    fn blackjack_against_blackjack_pushes() {
        let player = hand_of(&[Rank::Ace, Rank::Queen], 100);
        let dealer = dealer_of(&[Rank::King, Rank::Ace]);
        assert_eq!(
            resolve(&player, &dealer),
            Settlement {
                outcome: Outcome::Push,
                bet: 100,
                payout: 100
            }
        );
    }

    #[test]
    fn blackjack_pays_three_to_two_rounded_down() {
        let dealer = dealer_of(&[Rank::Nine, Rank::Eight]);
        let player = hand_of(&[Rank::Ace, Rank::King], 100);
        assert_eq!(resolve(&player, &dealer).payout, 250);
        let player = hand_of(&[Rank::Ace, Rank::King], 25);
        assert_eq!(resolve(&player, &dealer).payout, 25 + 37);
        assert_eq!(resolve(&player, &dealer).outcome, Outcome::Blackjack);
    }

    #[test]
    fn dealer_blackjack_beats_twenty_one() {
        let player = hand_of(&[Rank::Seven, Rank::Seven, Rank::Seven], 50);
        let dealer = dealer_of(&[Rank::Ace, Rank::Jack]);
        assert_eq!(resolve(&player, &dealer).outcome, Outcome::Loss);
    }

    #[test]
    fn split_aces_twenty_one_is_plain_win() {
        let mut player = hand_of(&[Rank::Ace, Rank::King], 50);
        player.split_aces = true;
        let dealer = dealer_of(&[Rank::Ten, Rank::Nine]);
        let settlement = resolve(&player, &dealer);
        assert_eq!(settlement.outcome, Outcome::Win);
        assert_eq!(settlement.payout, 100);
    }

    #[test]
    fn score_comparisons() {
        let dealer = dealer_of(&[Rank::Ten, Rank::Nine]);
        let win = hand_of(&[Rank::Ten, Rank::Six, Rank::Five], 100);
        let push = hand_of(&[Rank::Ten, Rank::Nine], 100);
        let loss = hand_of(&[Rank::Ten, Rank::Eight], 100);
        assert_eq!(resolve(&win, &dealer).payout, 200);
        assert_eq!(resolve(&push, &dealer).payout, 100);
        assert_eq!(resolve(&loss, &dealer).payout, 0);

        let busted_dealer = dealer_of(&[Rank::Ten, Rank::Six, Rank::Queen]);
        assert_eq!(resolve(&loss, &busted_dealer).outcome, Outcome::Win);
    }

    #[test]
    fn round_classification() {
        use Outcome::*;
        assert_eq!(classify_round(&[Blackjack]), Blackjack);
        assert_eq!(classify_round(&[Loss, Loss]), Loss);
        assert_eq!(classify_round(&[Push, Push, Push]), Push);
        assert_eq!(classify_round(&[Win, Loss]), Win);
        assert_eq!(classify_round(&[Loss, Push]), Push);
    }

    #[test]
    fn summary_headlines() {
        let dealer = dealer_of(&[Rank::Ten, Rank::Nine]);
        let hands = vec![
            hand_of(&[Rank::Ten, Rank::Five, Rank::Nine], 50),
            hand_of(&[Rank::Ten, Rank::Four, Rank::Queen], 50),
        ];
        let summary = RoundSummary::settle(&hands, &dealer);
        assert!(summary.all_bust);
        assert_eq!(summary.headline(), "BUST!");
        assert_eq!(summary.net_gain(), -100);

        let hands = vec![
            hand_of(&[Rank::Ten, Rank::Queen], 100),
            hand_of(&[Rank::Ten, Rank::Eight, Rank::Five], 100),
        ];
        let summary = RoundSummary::settle(&hands, &dealer);
        assert_eq!(summary.outcome, Outcome::Win);
        assert_eq!(summary.headline(), "YOU WIN!");
        assert_eq!(summary.total_payout, 200);
        assert_eq!(summary.net_gain(), 0);
    }

    #[test]
    fn huge_bets_saturate() {
        let dealer = dealer_of(&[Rank::Ten, Rank::Seven]);
        let natural = hand_of(&[Rank::Ace, Rank::King], u32::MAX / 2);
        assert_eq!(resolve(&natural, &dealer).payout, u32::MAX);
        let win = hand_of(&[Rank::Ten, Rank::Nine], u32::MAX - 1);
        assert_eq!(resolve(&win, &dealer).payout, u32::MAX);
        let summary = RoundSummary::settle(&[win.clone(), win], &dealer);
        assert_eq!(summary.total_payout, u32::MAX);
        assert_eq!(summary.total_wagered, u32::MAX);
    }

    proptest! {
        #[test]
        fn bust_always_loses(bet in 1u32..10_000, extra in 2u8..=10, dealer_bust in any::<bool>()) {
            let third = match extra {
                2 => Rank::Two,
                3 => Rank::Three,
                4 => Rank::Four,
                5 => Rank::Five,
                6 => Rank::Six,
                7 => Rank::Seven,
                8 => Rank::Eight,
                9 => Rank::Nine,
                _ => Rank::Ten,
            };
            let player = hand_of(&[Rank::King, Rank::Queen, third], bet);
            let dealer = if dealer_bust {
                dealer_of(&[Rank::King, Rank::Six, Rank::Nine])
            } else {
                dealer_of(&[Rank::Ace, Rank::King])
            };
            let settlement = resolve(&player, &dealer);
            prop_assert_eq!(settlement.outcome, Outcome::Loss);
            prop_assert_eq!(settlement.payout, 0);
        }

        #[test]
        fn blackjack_payout_is_bet_plus_floor_half_again(bet in 0u32..1_000_000) {
            let player = hand_of(&[Rank::Ace, Rank::Jack], bet);
            let dealer = dealer_of(&[Rank::Ten, Rank::Seven]);
            prop_assert_eq!(resolve(&player, &dealer).payout, bet + (bet as u64 * 3 / 2) as u32);
        }
    }
}
