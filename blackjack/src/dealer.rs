use crate::round::hand::Hand;
use crate::Decision;

pub const DEALER_STAND_TOTAL: u8 = 17;

/// The dealer's fixed drawing rule: hit below 17 and on soft 17, stand otherwise.
/// Meant for a hand whose hole card has already been revealed.
pub fn decide(hand: &Hand) -> Decision {
    let score = hand.score();
    if score < DEALER_STAND_TOTAL || (score == DEALER_STAND_TOTAL && hand.is_soft()) {
        Decision::Hit
    } else {
        Decision::Stand
    }
}
