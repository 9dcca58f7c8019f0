pub mod hand;
pub mod shoe;

use blackjack_macros::allowed_phase;
use serde::Serialize;

use crate::card::Card;
use crate::dealer;
use crate::error::GameError;
use crate::payout::{RoundSummary, Settlement};
use crate::progression::{LevelInfo, LevelProgress, ProgressionTracker, SessionStats};
use crate::strategy::{self, Tip};
use crate::{Decision, TableConfig};

use self::{hand::Hand, shoe::Shoe};

/// Chip denominations accepted at the table.
pub const CHIP_VALUES: [u32; 4] = [10, 20, 50, 100];
/// Most hands the player may hold in one round after splitting.
pub const MAX_HANDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    Betting,
    Dealing,
    PlayerTurn,
    DealerTurn,
    Result,
}

/// Where a card or a score lives on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Seat {
    Dealer,
    Player(usize),
}

/// Which player actions the active hand accepts right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AvailableActions {
    pub hit: bool,
    pub stand: bool,
    pub double: bool,
    pub split: bool,
}

/// Receives every state change of the engine, in the order it happens. The engine
/// never waits on a handler; pacing and rendering are the handler's business.
pub trait RoundEventHandler {
    fn on_phase_change(&mut self, _phase: GamePhase) {}
    fn on_bet_changed(&mut self, _current_bet: u32) {}
    fn on_bankroll_changed(&mut self, _bankroll: u32) {}
    fn on_card_dealt(&mut self, _seat: Seat, _card: &Card) {}
    fn on_hole_card_revealed(&mut self, _card: &Card) {}
    fn on_score_changed(&mut self, _seat: Seat, _label: &str) {}
    fn on_split(&mut self, _hand_index: usize) {}
    fn on_active_hand_changed(&mut self, _hand_index: usize) {}
    fn on_hand_settled(&mut self, _hand_index: usize, _settlement: &Settlement) {}
    fn on_round_summary(&mut self, _summary: &RoundSummary, _stats: &SessionStats) {}
    fn on_xp_awarded(&mut self, _xp: u32, _progress: &LevelProgress) {}
    fn on_level_up(&mut self, _level: &LevelInfo) {}
    fn on_bankruptcy(&mut self) {}
}

impl RoundEventHandler for () {}

/// Runs a single-player blackjack session round by round.
///
/// Every call either applies fully or is rejected with a [`GameError`] and leaves the
/// engine untouched. The engine exclusively owns the shoe and the bankroll.
pub struct RoundEngine<H: RoundEventHandler = ()> {
    config: TableConfig,

    // Round state
    phase: GamePhase,
    bankroll: u32,
    current_bet: u32,
    last_bet: u32,
    shoe: Shoe,
    player_hands: Vec<Hand>,
    active_hand_index: usize,
    dealer_hand: Hand,
    last_summary: Option<RoundSummary>,

    // Session
    stats: SessionStats,
    progression: ProgressionTracker,
    handler: H,
}

impl RoundEngine<()> {
    pub fn new(config: TableConfig) -> Self {
        RoundEngine::with_handler(config, ())
    }
}

impl<H: RoundEventHandler> RoundEngine<H> {
    pub fn with_handler(config: TableConfig, handler: H) -> Self {
        let shoe = match config.seed {
            Some(seed) => Shoe::with_seed(config.number_of_decks, seed),
            None => Shoe::new(config.number_of_decks),
        };
        RoundEngine::with_shoe(config, shoe, handler)
    }

    /// Uses the given shoe instead of building one from the config, e.g. a stacked shoe.
    pub fn with_shoe(config: TableConfig, shoe: Shoe, handler: H) -> Self {
        Self {
            config,
            phase: GamePhase::Betting,
            bankroll: config.starting_bankroll,
            current_bet: 0,
            last_bet: 0,
            shoe,
            player_hands: Vec::with_capacity(MAX_HANDS),
            active_hand_index: 0,
            dealer_hand: Hand::new(),
            last_summary: None,
            stats: Default::default(),
            progression: ProgressionTracker::new(),
            handler,
        }
    }

    /// Adds a chip to the current bet. Returns the new bet.
    #[allowed_phase(Betting)]
    pub fn add_chip(&mut self, value: u32) -> Result<u32, GameError> {
        if !CHIP_VALUES.contains(&value) {
            return Err(GameError::InvalidBet {
                reason: format!("{} is not a chip denomination", value),
            });
        }
        if self.bankroll - self.current_bet < value {
            return Err(GameError::InvalidBet {
                reason: format!(
                    "a {} chip would raise the bet above the bankroll of {}",
                    value, self.bankroll
                ),
            });
        }
        self.set_current_bet(self.current_bet + value);
        Ok(self.current_bet)
    }

    #[allowed_phase(Betting)]
    pub fn clear_bet(&mut self) -> Result<(), GameError> {
        self.set_current_bet(0);
        Ok(())
    }

    /// Sets the bet back to the last round's bet, capped by the bankroll. Returns the
    /// new bet.
    #[allowed_phase(Betting)]
    pub fn rebet(&mut self) -> Result<u32, GameError> {
        if self.last_bet == 0 {
            return Err(GameError::InvalidBet {
                reason: String::from("there is no previous bet to repeat"),
            });
        }
        self.set_current_bet(self.last_bet.min(self.bankroll));
        Ok(self.current_bet)
    }

    /// Takes the bet and deals player, dealer, player, dealer (hole card face down).
    /// A blackjack on either side settles the round at once.
    #[allowed_phase(Betting)]
    pub fn deal_round(&mut self) -> Result<(), GameError> {
        if self.current_bet == 0 {
            return Err(GameError::InvalidBet {
                reason: String::from("cannot deal without a bet"),
            });
        }
        if self.current_bet > self.bankroll {
            return Err(GameError::InvalidBet {
                reason: format!(
                    "bet of {} exceeds the bankroll of {}",
                    self.current_bet, self.bankroll
                ),
            });
        }

        let bet = self.current_bet;
        self.set_phase(GamePhase::Dealing);
        self.last_bet = bet;
        self.set_bankroll(self.bankroll - bet);
        self.set_current_bet(0);
        log::info!("Dealing a round with a bet of {}", bet);

        self.player_hands.clear();
        self.player_hands.push(Hand::with_bet(bet));
        self.active_hand_index = 0;
        self.dealer_hand = Hand::new();
        self.last_summary = None;

        self.deal_to(Seat::Player(0), false);
        self.deal_to(Seat::Dealer, false);
        self.deal_to(Seat::Player(0), false);
        self.deal_to(Seat::Dealer, true);

        let player_blackjack = self.player_hands[0].is_blackjack();
        if player_blackjack || self.dealer_peeks_blackjack() {
            log::info!(
                "Blackjack on the deal (player: {}), settling now",
                player_blackjack
            );
            self.reveal_dealer();
            self.settle();
        } else {
            self.set_phase(GamePhase::PlayerTurn);
            self.handler.on_active_hand_changed(0);
        }
        Ok(())
    }

    #[allowed_phase(PlayerTurn)]
    pub fn player_hit(&mut self) -> Result<(), GameError> {
        let index = self.active_hand_index;
        if self.active_hand_or_err("player_hit")?.stood {
            return Err(GameError::InvalidAction {
                action: "player_hit",
                reason: "the active hand already stands",
            });
        }

        self.deal_to(Seat::Player(index), false);
        let hand = &self.player_hands[index];
        if hand.is_bust() || hand.split_aces {
            self.advance_hand();
        }
        Ok(())
    }

    #[allowed_phase(PlayerTurn)]
    pub fn player_stand(&mut self) -> Result<(), GameError> {
        let index = self.active_hand_index;
        self.active_hand_or_err("player_stand")?;
        self.player_hands[index].stood = true;
        self.advance_hand();
        Ok(())
    }

    /// Doubles the active hand's bet, draws exactly one card and moves on, bust or not.
    #[allowed_phase(PlayerTurn)]
    pub fn player_double(&mut self) -> Result<(), GameError> {
        let index = self.active_hand_index;
        let hand = self.active_hand_or_err("player_double")?;
        if let Some(reason) = self.double_refusal(hand) {
            return Err(GameError::InvalidAction {
                action: "player_double",
                reason,
            });
        }

        let bet = hand.bet;
        self.set_bankroll(self.bankroll - bet);
        let hand = &mut self.player_hands[index];
        hand.bet += bet;
        hand.doubled = true;
        self.deal_to(Seat::Player(index), false);
        self.advance_hand();
        Ok(())
    }

    /// Splits the active pair into two hands with equal bets, each topped up with one
    /// card. Split Aces take their one card and stand.
    #[allowed_phase(PlayerTurn)]
    pub fn player_split(&mut self) -> Result<(), GameError> {
        let index = self.active_hand_index;
        let hand = self.active_hand_or_err("player_split")?;
        if let Some(reason) = self.split_refusal(hand) {
            return Err(GameError::InvalidAction {
                action: "player_split",
                reason,
            });
        }

        let hand = &mut self.player_hands[index];
        let bet = hand.bet;
        let is_aces = hand.cards()[0].rank.is_ace();
        let second = hand.take_second_card().ok_or(GameError::InvalidAction {
            action: "player_split",
            reason: "the active hand is not a pair",
        })?;
        hand.split_aces = is_aces;

        let mut new_hand = Hand::with_bet(bet);
        new_hand.split_aces = is_aces;
        new_hand.add(second);
        self.player_hands.insert(index + 1, new_hand);
        self.set_bankroll(self.bankroll - bet);
        log::debug!("Split hand {} (aces: {})", index, is_aces);
        self.handler.on_split(index);

        self.deal_to(Seat::Player(index), false);
        self.deal_to(Seat::Player(index + 1), false);

        if is_aces {
            self.player_hands[index].stood = true;
            self.player_hands[index + 1].stood = true;
            self.advance_hand();
        }
        Ok(())
    }

    /// Basic-strategy advice for the active hand. Never changes state.
    #[allowed_phase(PlayerTurn)]
    pub fn get_advisor_tip(&self) -> Result<Tip, GameError> {
        let hand = self.active_hand_or_err("get_advisor_tip")?;
        let up_card = self
            .dealer_hand
            .first_visible()
            .ok_or(GameError::InvalidAction {
                action: "get_advisor_tip",
                reason: "the dealer shows no card",
            })?;
        let actions = self.available_actions();
        Ok(strategy::advise(hand, up_card, actions.double, actions.split))
    }

    /// Leaves the result screen. With `keep_bet` the last bet is re-armed (capped by
    /// the bankroll) and, if anything is left to bet, the next round is dealt at once.
    #[allowed_phase(Result)]
    pub fn advance_after_result(&mut self, keep_bet: bool) -> Result<(), GameError> {
        self.start_betting();
        if keep_bet {
            self.set_current_bet(self.last_bet.min(self.bankroll));
            if self.current_bet > 0 {
                return self.deal_round();
            }
        }
        Ok(())
    }

    /// Starts over with a fresh bankroll, counters and progression, whatever the phase.
    pub fn reset_session(&mut self) {
        log::info!(
            "Resetting session (bankroll {} -> {})",
            self.bankroll,
            self.config.starting_bankroll
        );
        self.stats = Default::default();
        self.progression.reset();
        self.last_bet = 0;
        self.set_bankroll(self.config.starting_bankroll);
        self.start_betting();
    }

    pub fn available_actions(&self) -> AvailableActions {
        let hand = match self.active_hand() {
            Some(hand) if self.phase == GamePhase::PlayerTurn && !hand.stood => hand,
            _ => return AvailableActions::default(),
        };
        AvailableActions {
            hit: true,
            stand: true,
            double: self.double_refusal(hand).is_none(),
            split: self.split_refusal(hand).is_none(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn bankroll(&self) -> u32 {
        self.bankroll
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn last_bet(&self) -> u32 {
        self.last_bet
    }

    pub fn player_hands(&self) -> &[Hand] {
        &self.player_hands
    }

    pub fn active_hand_index(&self) -> usize {
        self.active_hand_index
    }

    pub fn active_hand(&self) -> Option<&Hand> {
        self.player_hands.get(self.active_hand_index)
    }

    /// The dealer's hand, or `None` between rounds.
    pub fn dealer_hand(&self) -> Option<&Hand> {
        if self.dealer_hand.cards().is_empty() {
            None
        } else {
            Some(&self.dealer_hand)
        }
    }

    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.last_summary.as_ref()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn progression(&self) -> &ProgressionTracker {
        &self.progression
    }

    pub fn is_bankrupt(&self) -> bool {
        self.bankroll == 0 && self.phase == GamePhase::Result
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    /// For stacking the next cards between rounds.
    pub fn shoe_mut(&mut self) -> &mut Shoe {
        &mut self.shoe
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    fn active_hand_or_err(&self, action: &'static str) -> Result<&Hand, GameError> {
        self.active_hand().ok_or(GameError::InvalidAction {
            action,
            reason: "there is no active hand",
        })
    }

    fn double_refusal(&self, hand: &Hand) -> Option<&'static str> {
        if hand.stood {
            Some("the active hand already stands")
        } else if hand.cards().len() != 2 {
            Some("doubling needs exactly two cards")
        } else if hand.doubled {
            Some("the hand is already doubled")
        } else if self.bankroll < hand.bet {
            Some("the bankroll cannot cover the extra bet")
        } else {
            None
        }
    }

    fn split_refusal(&self, hand: &Hand) -> Option<&'static str> {
        if hand.stood {
            Some("the active hand already stands")
        } else if !hand.can_split() {
            Some("the active hand is not a pair")
        } else if self.player_hands.len() >= MAX_HANDS {
            Some("the hand limit is reached")
        } else if hand.split_aces {
            Some("split Aces cannot be split again")
        } else if self.bankroll < hand.bet {
            Some("the bankroll cannot cover the extra bet")
        } else {
            None
        }
    }

    /// Checks the dealer's two cards, hole card included, for a natural.
    fn dealer_peeks_blackjack(&self) -> bool {
        let mut peeked = self.dealer_hand.clone();
        peeked.reveal_all();
        peeked.is_blackjack()
    }

    /// Moves to the lowest later hand that is neither standing nor bust. With none
    /// left the dealer plays, unless every hand busted.
    fn advance_hand(&mut self) {
        let next = self
            .player_hands
            .iter()
            .enumerate()
            .skip(self.active_hand_index + 1)
            .find(|(_, hand)| !hand.stood && !hand.is_bust())
            .map(|(index, _)| index);

        if let Some(index) = next {
            self.active_hand_index = index;
            self.handler.on_active_hand_changed(index);
            return;
        }

        if self.player_hands.iter().all(Hand::is_bust) {
            log::debug!("Every hand is bust, the dealer does not draw");
        } else {
            self.play_dealer();
        }
        self.settle();
    }

    fn play_dealer(&mut self) {
        self.set_phase(GamePhase::DealerTurn);
        self.reveal_dealer();
        while dealer::decide(&self.dealer_hand) == Decision::Hit {
            self.deal_to(Seat::Dealer, false);
        }
        log::debug!("Dealer stands on {}", self.dealer_hand.score());
    }

    fn settle(&mut self) {
        self.set_phase(GamePhase::Result);
        self.reveal_dealer();

        let summary = RoundSummary::settle(&self.player_hands, &self.dealer_hand);
        for (index, settlement) in summary.settlements.iter().enumerate() {
            self.handler.on_hand_settled(index, settlement);
        }
        self.set_bankroll(self.bankroll.saturating_add(summary.total_payout));

        self.stats.record(&summary);
        let award = self.progression.award(summary.outcome, self.stats.streak);
        log::info!(
            "Round settled: {:?}, paid {} of {} wagered, +{} XP",
            summary.outcome,
            summary.total_payout,
            summary.total_wagered,
            award.xp
        );
        self.handler.on_round_summary(&summary, &self.stats);
        self.handler
            .on_xp_awarded(award.xp, &self.progression.progress());
        if let Some(level) = award.level_up {
            log::info!("Level up: {} (level {})", level.rank, level.level);
            self.handler.on_level_up(&level);
        }
        self.last_summary = Some(summary);

        if self.bankroll == 0 {
            log::warn!("Bankroll is empty");
            self.handler.on_bankruptcy();
        }
    }

    fn start_betting(&mut self) {
        self.player_hands.clear();
        self.active_hand_index = 0;
        self.dealer_hand = Hand::new();
        self.last_summary = None;
        self.set_current_bet(0);
        self.set_phase(GamePhase::Betting);
    }

    fn deal_to(&mut self, seat: Seat, face_down: bool) {
        let card = self.shoe.deal(face_down);
        log::debug!("Dealt {} to {:?}", card, seat);
        let hand = match seat {
            Seat::Dealer => &mut self.dealer_hand,
            Seat::Player(index) => &mut self.player_hands[index],
        };
        hand.add(card);
        let label = hand.score_label();
        self.handler.on_card_dealt(seat, &card);
        self.handler.on_score_changed(seat, &label);
    }

    fn reveal_dealer(&mut self) {
        let mut revealed = Vec::new();
        for card in self.dealer_hand.cards_mut() {
            if card.is_face_down() {
                card.reveal();
                revealed.push(*card);
            }
        }
        if revealed.is_empty() {
            return;
        }
        for card in &revealed {
            self.handler.on_hole_card_revealed(card);
        }
        let label = self.dealer_hand.score_label();
        self.handler.on_score_changed(Seat::Dealer, &label);
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.handler.on_phase_change(phase);
    }

    fn set_bankroll(&mut self, bankroll: u32) {
        self.bankroll = bankroll;
        self.handler.on_bankroll_changed(bankroll);
    }

    fn set_current_bet(&mut self, current_bet: u32) {
        self.current_bet = current_bet;
        self.handler.on_bet_changed(current_bet);
    }
}
