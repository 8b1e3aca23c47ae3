//! End-of-battle detection
//!
//! The battle itself never stops; the host watches for a wiped side and,
//! after a grace delay that lets death effects play out, reports the winner
//! exactly once.

use super::state::Battle;
use crate::model::Faction;

#[derive(Debug, Clone, Default)]
pub struct OutcomeMonitor {
    ending: bool,
    delay: u32,
    reported: Option<Faction>,
}

impl OutcomeMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget any pending or reported outcome (call alongside `Battle::init`)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True once a wipe has been accepted
    pub fn is_ending(&self) -> bool {
        self.ending
    }

    /// Winner, once reported
    pub fn winner(&self) -> Option<Faction> {
        self.reported
    }

    /// Check the battle after a tick
    ///
    /// Returns the winner on the single tick the grace delay runs out (the
    /// `ending_delay_ticks`-th observation after the wipe, counting the wipe
    /// tick) and `None` before and after. A wipe is only accepted once the battle is
    /// older than `min_battle_ticks`; a simultaneous wipe goes to the enemy.
    pub fn observe(&mut self, battle: &Battle) -> Option<Faction> {
        if self.reported.is_some() {
            return None;
        }

        if !self.ending {
            let wiped = !battle.has_living(Faction::Player) || !battle.has_living(Faction::Enemy);
            if wiped && battle.time_ticks > battle.tuning.min_battle_ticks {
                self.ending = true;
                self.delay = battle.tuning.ending_delay_ticks;
                log::info!("Side wiped at tick {}, ending battle", battle.time_ticks);
            } else {
                return None;
            }
        }

        // The accepting observation counts toward the delay
        self.delay = self.delay.saturating_sub(1);
        if self.delay > 0 {
            return None;
        }

        let winner = if battle.has_living(Faction::Player) {
            Faction::Player
        } else {
            Faction::Enemy
        };
        self.reported = Some(winner);
        log::info!("Battle over at tick {}: {:?} wins", battle.time_ticks, winner);
        Some(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, UnitModel, UnitRole, UnitStats};
    use crate::tuning::Tuning;

    fn roster(count: u32) -> Vec<Option<Card>> {
        let model = UnitModel::new(
            "militia",
            "Militia",
            UnitRole::Melee,
            12.0,
            UnitStats::new(35.0, 3.0, 10.0, 40.0, 1.5, "#94a3b8"),
        );
        vec![Some(Card::new("c", model, count))]
    }

    fn run(monitor: &mut OutcomeMonitor, battle: &mut Battle, ticks: u32) -> Vec<Faction> {
        let mut reports = Vec::new();
        for _ in 0..ticks {
            battle.update();
            reports.extend(monitor.observe(battle));
        }
        reports
    }

    #[test]
    fn test_no_report_before_min_ticks() {
        let mut battle = Battle::new(Tuning::default(), 1);
        battle.init(&roster(2), &[]);
        let mut monitor = OutcomeMonitor::new();

        let reports = run(&mut monitor, &mut battle, 60);
        assert!(reports.is_empty());
        assert!(!monitor.is_ending());

        battle.update();
        assert_eq!(monitor.observe(&battle), None);
        assert!(monitor.is_ending());
    }

    #[test]
    fn test_reports_once_after_delay() {
        let mut tuning = Tuning::default();
        tuning.min_battle_ticks = 0;
        tuning.ending_delay_ticks = 5;
        let mut battle = Battle::new(tuning, 1);
        battle.init(&roster(2), &[]);
        let mut monitor = OutcomeMonitor::new();

        // The wipe tick is the first of five
        let reports = run(&mut monitor, &mut battle, 4);
        assert!(reports.is_empty());
        assert!(monitor.is_ending());
        let reports = run(&mut monitor, &mut battle, 1);
        assert_eq!(reports, vec![Faction::Player]);
        assert!(run(&mut monitor, &mut battle, 100).is_empty());
        assert_eq!(monitor.winner(), Some(Faction::Player));
    }

    #[test]
    fn test_default_delay_reports_on_sixtieth_tick() {
        let mut tuning = Tuning::default();
        tuning.min_battle_ticks = 0;
        let delay = tuning.ending_delay_ticks;
        let mut battle = Battle::new(tuning, 1);
        battle.init(&roster(1), &[]);
        let mut monitor = OutcomeMonitor::new();

        let mut reported_at = None;
        for tick in 1..=200u32 {
            battle.update();
            if monitor.observe(&battle).is_some() {
                reported_at = Some(tick);
                break;
            }
        }
        assert_eq!(reported_at, Some(delay));
    }

    #[test]
    fn test_simultaneous_wipe_is_enemy_win() {
        let mut tuning = Tuning::default();
        tuning.min_battle_ticks = 0;
        tuning.ending_delay_ticks = 0;
        let mut battle = Battle::new(tuning, 1);
        battle.init(&[], &[]);
        let mut monitor = OutcomeMonitor::new();

        battle.update();
        assert_eq!(monitor.observe(&battle), Some(Faction::Enemy));
        assert_eq!(monitor.observe(&battle), None);
    }

    #[test]
    fn test_reset_clears_report() {
        let mut tuning = Tuning::default();
        tuning.min_battle_ticks = 0;
        tuning.ending_delay_ticks = 0;
        let mut battle = Battle::new(tuning, 1);
        battle.init(&[], &roster(1));
        let mut monitor = OutcomeMonitor::new();
        battle.update();
        assert_eq!(monitor.observe(&battle), Some(Faction::Enemy));

        monitor.reset();
        assert_eq!(monitor.winner(), None);
        assert!(!monitor.is_ending());
    }
}
