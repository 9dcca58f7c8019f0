use blackjack::payout::Settlement;
use blackjack::progression::{LevelInfo, LevelProgress, SessionStats};
use blackjack::round::CHIP_VALUES;
use blackjack::{
    Card, Decision, GameError, GamePhase, RoundEngine, RoundEventHandler, RoundSummary, Seat,
};
use blackjack_drivers::ConfigAutoplay;

/// Logs the table as it plays and keeps the few numbers the final report needs.
#[derive(Debug, Clone, Default)]
pub struct TableLog {
    pub rounds: u32,
    pub splits: u32,
    pub doubles: u32,
    pub net: i64,
    pub bankrupt: bool,
}

impl RoundEventHandler for TableLog {
    fn on_phase_change(&mut self, phase: GamePhase) {
        log::trace!("Phase: {:?}", phase);
    }

    fn on_card_dealt(&mut self, seat: Seat, card: &Card) {
        log::debug!("{:?} <- {}", seat, card);
    }

    fn on_hole_card_revealed(&mut self, card: &Card) {
        log::debug!("Dealer reveals {}", card);
    }

    fn on_score_changed(&mut self, seat: Seat, label: &str) {
        log::trace!("{:?} shows {}", seat, label);
    }

    fn on_split(&mut self, hand_index: usize) {
        self.splits += 1;
        log::debug!("Hand {} split", hand_index);
    }

    fn on_hand_settled(&mut self, hand_index: usize, settlement: &Settlement) {
        log::debug!(
            "Hand {}: {:?}, bet {}, paid {}",
            hand_index,
            settlement.outcome,
            settlement.bet,
            settlement.payout
        );
    }

    fn on_round_summary(&mut self, summary: &RoundSummary, stats: &SessionStats) {
        self.rounds += 1;
        self.net += summary.net_gain();
        log::info!(
            "Round {}: {} ({:+}), streak {}",
            self.rounds,
            summary.headline(),
            summary.net_gain(),
            stats.streak
        );
    }

    fn on_xp_awarded(&mut self, xp: u32, progress: &LevelProgress) {
        log::trace!("+{} XP, {:.0}% to next level", xp, progress.percent);
    }

    fn on_level_up(&mut self, level: &LevelInfo) {
        log::info!("Reached level {} ({})", level.level, level.rank);
    }

    fn on_bankruptcy(&mut self) {
        self.bankrupt = true;
        log::warn!("Out of chips after {} rounds", self.rounds);
    }
}

/// Plays up to `rounds` rounds, stopping early when the bankroll cannot cover a bet.
pub fn play(
    engine: &mut RoundEngine<TableLog>,
    autoplay: &ConfigAutoplay,
    fixed_decision: Option<Decision>,
    rounds: u32,
) -> Result<(), GameError> {
    for _ in 0..rounds {
        if engine.handler().bankrupt {
            break;
        }
        if engine.phase() == GamePhase::Result {
            engine.advance_after_result(autoplay.rebet)?;
        }
        if engine.phase() == GamePhase::Betting {
            if place_chips(engine, autoplay.bet)? == 0 {
                log::warn!("Bankroll {} cannot cover a chip", engine.bankroll());
                break;
            }
            engine.deal_round()?;
        }
        while engine.phase() == GamePhase::PlayerTurn {
            let decision = choose(engine, fixed_decision)?;
            if decision == Decision::Double {
                engine.handler_mut().doubles += 1;
            }
            match decision {
                Decision::Hit => engine.player_hit()?,
                Decision::Stand => engine.player_stand()?,
                Decision::Double => engine.player_double()?,
                Decision::Split => engine.player_split()?,
            }
        }
    }
    Ok(())
}

/// Stacks the largest chips first up to `target`, capped by the bankroll.
fn place_chips(engine: &mut RoundEngine<TableLog>, target: u32) -> Result<u32, GameError> {
    let target = target.min(engine.bankroll());
    for chip in CHIP_VALUES.iter().rev() {
        while engine.current_bet() + chip <= target {
            engine.add_chip(*chip)?;
        }
    }
    Ok(engine.current_bet())
}

fn choose(
    engine: &RoundEngine<TableLog>,
    fixed_decision: Option<Decision>,
) -> Result<Decision, GameError> {
    let actions = engine.available_actions();
    let legal = |decision: Decision| match decision {
        Decision::Hit => actions.hit,
        Decision::Stand => actions.stand,
        Decision::Double => actions.double,
        Decision::Split => actions.split,
    };
    match fixed_decision {
        Some(decision) if legal(decision) => Ok(decision),
        Some(_) => Ok(Decision::Stand),
        None => {
            let tip = engine.get_advisor_tip()?;
            log::debug!("{}: {:?}. {}", tip.situation, tip.action, tip.reason);
            Ok(tip.action)
        }
    }
}
