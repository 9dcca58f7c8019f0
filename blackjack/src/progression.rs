use serde::Serialize;

use crate::payout::{Outcome, RoundSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    pub level: u8,
    pub min_xp: u32,
    pub rank: &'static str,
}

const fn level(level: u8, min_xp: u32, rank: &'static str) -> LevelInfo {
    LevelInfo {
        level,
        min_xp,
        rank,
    }
}

/// Ascending by `min_xp`.
pub static LEVELS: [LevelInfo; 13] = [
    level(1, 0, "Rookie"),
    level(2, 100, "Rookie"),
    level(3, 250, "Amateur"),
    level(4, 450, "Amateur"),
    level(5, 700, "Sharp"),
    level(6, 1000, "Sharp"),
    level(7, 1400, "Pro"),
    level(8, 1900, "Pro"),
    level(9, 2500, "Expert"),
    level(10, 3200, "Expert"),
    level(11, 4000, "Master"),
    level(12, 5000, "Master"),
    level(13, 6500, "Legend"),
];

pub const XP_BLACKJACK: u32 = 50;
pub const XP_WIN: u32 = 30;
pub const XP_PUSH: u32 = 10;
pub const XP_LOSS: u32 = 5;
pub const XP_STREAK_BONUS: u32 = 10;
pub const STREAK_FOR_BONUS: u32 = 3;

/// Experience for a round outcome. `streak` is the win streak after this round has
/// been counted.
pub fn xp_for(outcome: Outcome, streak: u32) -> u32 {
    match outcome {
        Outcome::Blackjack | Outcome::Win => {
            let base = if outcome == Outcome::Blackjack {
                XP_BLACKJACK
            } else {
                XP_WIN
            };
            if streak >= STREAK_FOR_BONUS {
                base + XP_STREAK_BONUS
            } else {
                base
            }
        }
        Outcome::Push => XP_PUSH,
        Outcome::Loss => XP_LOSS,
    }
}

/// The highest level whose threshold is reached.
pub fn level_for(total_xp: u32) -> &'static LevelInfo {
    LEVELS
        .iter()
        .rev()
        .find(|info| info.min_xp <= total_xp)
        .unwrap_or(&LEVELS[0])
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelProgress {
    pub current: LevelInfo,
    pub next: Option<LevelInfo>,
    /// Percentage of the way from `current` to `next`; 100 at the top level.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub xp: u32,
    pub level_up: Option<LevelInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressionTracker {
    total_xp: u32,
}

impl ProgressionTracker {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn total_xp(&self) -> u32 {
        self.total_xp
    }

    pub fn level(&self) -> &'static LevelInfo {
        level_for(self.total_xp)
    }

    pub fn award(&mut self, outcome: Outcome, streak: u32) -> Award {
        let before = self.level().level;
        let xp = xp_for(outcome, streak);
        self.total_xp += xp;
        let after = self.level();
        Award {
            xp,
            level_up: (after.level > before).then_some(*after),
        }
    }

    pub fn progress(&self) -> LevelProgress {
        let current = *self.level();
        let next = LEVELS.iter().find(|info| info.level == current.level + 1).copied();
        let percent = match next {
            Some(next) => {
                let span = (next.min_xp - current.min_xp) as f64;
                (((self.total_xp - current.min_xp) as f64 / span) * 100.0).min(100.0)
            }
            None => 100.0,
        };
        LevelProgress {
            current,
            next,
            percent,
        }
    }

    pub fn reset(&mut self) {
        self.total_xp = 0;
    }
}

/// Session-wide round counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub streak: u32,
    /// Best net gain of a single winning round.
    pub best_win: u32,
}

impl SessionStats {
    pub fn record(&mut self, summary: &RoundSummary) {
        match summary.outcome {
            Outcome::Blackjack | Outcome::Win => {
                self.wins += 1;
                self.streak += 1;
                let net = summary.net_gain();
                if net > self.best_win as i64 {
                    self.best_win = net as u32;
                }
            }
            Outcome::Push => {
                self.pushes += 1;
                self.streak = 0;
            }
            Outcome::Loss => {
                self.losses += 1;
                self.streak = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payout::Settlement;

    #[test]
    fn xp_table() {
        assert_eq!(xp_for(Outcome::Blackjack, 1), 50);
        assert_eq!(xp_for(Outcome::Win, 2), 30);
        assert_eq!(xp_for(Outcome::Win, 3), 40);
        assert_eq!(xp_for(Outcome::Blackjack, 7), 60);
        assert_eq!(xp_for(Outcome::Push, 0), 10);
        assert_eq!(xp_for(Outcome::Loss, 0), 5);
    }

    #[test]
    fn level_lookup() {
        assert_eq!(level_for(0).level, 1);
        assert_eq!(level_for(99).level, 1);
        assert_eq!(level_for(100).level, 2);
        assert_eq!(level_for(6499).rank, "Master");
        assert_eq!(level_for(6500).rank, "Legend");
        assert_eq!(level_for(u32::MAX).level, 13);
    }

    #[test]
    fn award_reports_level_up_once() {
        let mut tracker = ProgressionTracker::new();
        let mut level_ups = 0;
        for _ in 0..3 {
            let award = tracker.award(Outcome::Win, 1);
            assert_eq!(award.xp, 30);
            if award.level_up.is_some() {
                level_ups += 1;
            }
        }
        assert_eq!(tracker.total_xp(), 90);
        assert_eq!(level_ups, 0);
        let award = tracker.award(Outcome::Push, 0);
        assert_eq!(award.level_up.map(|l| l.level), Some(2));
        assert_eq!(tracker.award(Outcome::Loss, 0).level_up, None);
    }

    #[test]
    fn progress_toward_next_level() {
        let mut tracker = ProgressionTracker::new();
        tracker.award(Outcome::Blackjack, 1);
        let progress = tracker.progress();
        assert_eq!(progress.current.level, 1);
        assert_eq!(progress.next.map(|l| l.min_xp), Some(100));
        assert!((progress.percent - 50.0).abs() < 1e-9);

        tracker.total_xp = 7000;
        let progress = tracker.progress();
        assert_eq!(progress.next, None);
        assert_eq!(progress.percent, 100.0);

        tracker.reset();
        assert_eq!(tracker.level().level, 1);
    }

    fn summary(outcome: Outcome, wagered: u32, payout: u32) -> RoundSummary {
        RoundSummary {
            settlements: vec![Settlement {
                outcome,
                bet: wagered,
                payout,
            }],
            outcome,
            total_wagered: wagered,
            total_payout: payout,
            all_bust: false,
        }
    }

    #[test]
    fn stats_track_streak_and_best_win() {
        let mut stats = SessionStats::default();
        stats.record(&summary(Outcome::Win, 100, 200));
        stats.record(&summary(Outcome::Blackjack, 100, 250));
        assert_eq!(stats.streak, 2);
        assert_eq!(stats.best_win, 150);
        stats.record(&summary(Outcome::Win, 50, 100));
        assert_eq!(stats.best_win, 150);
        stats.record(&summary(Outcome::Push, 50, 50));
        assert_eq!(stats.streak, 0);
        stats.record(&summary(Outcome::Loss, 50, 0));
        assert_eq!(
            stats,
            SessionStats {
                wins: 3,
                losses: 1,
                pushes: 1,
                streak: 0,
                best_win: 150,
            }
        );
    }
}
