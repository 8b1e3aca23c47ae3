//! Built-in unit templates
//!
//! Base stats for every recruitable card and every enemy unit. Upgrades and
//! traits are applied by the shop layer before cards reach a battle.

use crate::model::{BuffStats, Card, Flourish, UnitModel, UnitRole, UnitStats};

/// One row of a template table
#[derive(Debug, Clone, Copy)]
struct Template {
    id: &'static str,
    name: &'static str,
    role: UnitRole,
    value: f32,
    unit_count: u32,
    /// hp, damage, range, cooldown, move speed
    stats: [f32; 5],
    color: &'static str,
    aoe: Option<f32>,
    aura: Option<(f32, BuffStats)>,
    flourish: Flourish,
    heavy: bool,
}

impl Template {
    const fn new(
        id: &'static str,
        name: &'static str,
        role: UnitRole,
        value: f32,
        unit_count: u32,
        stats: [f32; 5],
        color: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            role,
            value,
            unit_count,
            stats,
            color,
            aoe: None,
            aura: None,
            flourish: Flourish::Plain,
            heavy: false,
        }
    }

    const fn aoe(mut self, radius: f32) -> Self {
        self.aoe = Some(radius);
        self
    }

    const fn aura(mut self, radius: f32, damage: f32, attack_speed: f32) -> Self {
        self.aura = Some((radius, BuffStats::new(damage, attack_speed)));
        self
    }

    const fn range_aura(mut self, radius: f32, range: f32) -> Self {
        self.aura = Some((radius, BuffStats::new(0.0, 0.0).with_range(range)));
        self
    }

    const fn power(mut self) -> Self {
        self.flourish = Flourish::Power;
        self
    }

    const fn magic(mut self) -> Self {
        self.flourish = Flourish::Magic;
        self
    }

    const fn heavy(mut self) -> Self {
        self.heavy = true;
        self
    }

    fn model(&self) -> UnitModel {
        let [hp, damage, range, cooldown, speed] = self.stats;
        let mut stats = UnitStats::new(hp, damage, range, cooldown, speed, self.color);
        if let Some(radius) = self.aoe {
            stats = stats.with_aoe(radius);
        }
        if let Some((radius, buff)) = self.aura {
            stats = stats.with_aura(radius, buff);
        }

        let mut model = UnitModel::new(self.id, self.name, self.role, self.value, stats)
            .with_flourish(self.flourish);
        model.heavy_hitter = self.heavy;
        model
    }

    fn card(&self) -> Card {
        Card::new(self.id, self.model(), self.unit_count)
    }

    fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id.eq_ignore_ascii_case(key)
            || self.name.eq_ignore_ascii_case(key)
            || self
                .id
                .split_once('_')
                .is_some_and(|(_, short)| short.eq_ignore_ascii_case(key))
    }
}

use UnitRole::*;

#[rustfmt::skip]
const PLAYER_CARDS: &[Template] = &[
    // Tier 1
    Template::new("c_militia", "Militia", Melee, 10.0, 3, [35.0, 3.0, 10.0, 40.0, 1.5], "#94a3b8"),
    Template::new("c_archers", "Archers", Ranged, 15.0, 2, [35.0, 8.0, 125.0, 45.0, 1.2], "#22c55e"),
    Template::new("c_ranger", "Ranger", Ranged, 20.0, 1, [120.0, 45.0, 100.0, 135.0, 1.4], "#f59e0b").power(),
    Template::new("c_ballista", "Ballista", Splasher, 18.0, 1, [80.0, 16.0, 140.0, 110.0, 0.8], "#ea580c").aoe(30.0),
    // Tier 2
    Template::new("c_shielder", "Shielder", Melee, 25.0, 2, [90.0, 4.0, 10.0, 60.0, 1.0], "#0ea5e9"),
    Template::new("c_scouts", "Scouts", Ranged, 22.0, 3, [35.0, 6.0, 90.0, 30.0, 1.6], "#14b8a6"),
    Template::new("c_mage", "Mage", Splasher, 30.0, 1, [50.0, 8.0, 110.0, 80.0, 1.0], "#8b5cf6").aoe(50.0).magic(),
    Template::new("c_veteran", "Veteran", Buffer, 40.0, 1, [160.0, 8.0, 15.0, 50.0, 1.1], "#e11d48").aura(75.0, 1.0, 0.0),
    // Tier 3
    Template::new("c_centurion", "Centurion", Melee, 35.0, 2, [110.0, 8.0, 12.0, 50.0, 1.2], "#b91c1c").heavy(),
    Template::new("c_crossbow", "Crossbowmen", Ranged, 32.0, 2, [40.0, 14.0, 130.0, 70.0, 1.0], "#4d7c0f"),
    Template::new("c_mangonel", "Mangonel", Splasher, 45.0, 1, [120.0, 25.0, 150.0, 130.0, 0.7], "#c2410c").aoe(40.0),
    Template::new("c_observer", "Observer", Buffer, 50.0, 1, [80.0, 5.0, 200.0, 60.0, 1.5], "#06b6d4").range_aura(100.0, 100.0),
    // Tier 4
    Template::new("c_commander", "High Commander", Hero, 80.0, 1, [300.0, 25.0, 20.0, 40.0, 1.3], "#facc15"),
    Template::new("c_merc", "Mercenary", Melee, 60.0, 3, [90.0, 10.0, 12.0, 35.0, 1.4], "#3f3f46"),
    Template::new("c_arcanist", "Arcanist", Splasher, 75.0, 1, [80.0, 8.0, 200.0, 80.0, 0.5], "#1e3a8a").aoe(70.0).magic(),
    Template::new("c_musketeer", "Musketeer", Ranged, 70.0, 5, [60.0, 55.0, 140.0, 160.0, 1.0], "#1e293b").power(),
    // Token
    Template::new("c_escort", "Escort", Melee, 5.0, 1, [50.0, 4.0, 10.0, 45.0, 1.3], "#57534e"),
];

#[rustfmt::skip]
const ENEMY_UNITS: &[Template] = &[
    Template::new("e_goblin_scavenger", "Goblin Scavenger", Melee, 5.0, 8, [20.0, 2.0, 10.0, 50.0, 1.2], "#ef4444"),
    Template::new("e_orc_grunt", "Orc Grunt", Melee, 12.0, 6, [45.0, 4.0, 10.0, 60.0, 1.0], "#b91c1c"),
    Template::new("e_goblin_archer", "Goblin Archer", Ranged, 12.0, 6, [15.0, 4.0, 100.0, 60.0, 1.0], "#ea580c"),
    Template::new("e_kobold_thief", "Kobold Thief", Melee, 20.0, 13, [15.0, 8.0, 10.0, 20.0, 2.8], "#fde047"),
    Template::new("e_orc_drummer", "Orc Drummer", Buffer, 30.0, 2, [120.0, 2.0, 10.0, 70.0, 0.8], "#7f1d1d").aura(100.0, 2.0, 0.1),
    Template::new("e_warg_alpha", "Warg Impaler", Ranged, 40.0, 3, [120.0, 35.0, 150.0, 90.0, 1.2], "#be185d").power(),
    Template::new("e_warg_pack", "Warg Pack", Melee, 40.0, 17, [40.0, 4.0, 10.0, 25.0, 2.4], "#4b5563"),
    Template::new("e_siege_ballista", "Siege Ballista", Splasher, 60.0, 3, [80.0, 15.0, 160.0, 90.0, 0.5], "#7f1d1d").aoe(40.0),
    Template::new("e_elite_archer", "Elite Archer", Ranged, 35.0, 10, [30.0, 8.0, 130.0, 45.0, 1.1], "#c2410c"),
    Template::new("e_shield_bearer", "Shield Bearer", Melee, 40.0, 12, [120.0, 3.0, 10.0, 60.0, 0.8], "#374151"),
    Template::new("e_gatekeeper", "The Gatekeeper", Hero, 150.0, 1, [700.0, 25.0, 15.0, 50.0, 0.8], "#581c87"),
    Template::new("e_gate_guard", "Gate Guard", Melee, 40.0, 10, [100.0, 8.0, 10.0, 55.0, 0.9], "#6b21a8"),
    Template::new("e_void_mage", "Void Mage", Splasher, 50.0, 5, [40.0, 12.0, 120.0, 70.0, 1.0], "#a855f7").magic(),
    Template::new("e_voidling_swarm", "Voidling Swarm", Melee, 10.0, 15, [30.0, 4.0, 10.0, 40.0, 1.5], "#a855f7"),
    Template::new("e_assassin", "Assassin", Melee, 60.0, 20, [50.0, 15.0, 10.0, 25.0, 2.5], "#0f172a"),
    Template::new("e_shadow_dancer", "Shadow Dancer", Buffer, 50.0, 5, [100.0, 5.0, 10.0, 40.0, 1.5], "#1e293b").aura(100.0, 0.0, 0.3),
    Template::new("e_iron_golem", "Iron Golem", Melee, 100.0, 8, [400.0, 15.0, 10.0, 80.0, 0.6], "#475569"),
    Template::new("e_support_bot", "Support Bot", Buffer, 60.0, 5, [50.0, 2.0, 100.0, 60.0, 1.0], "#cbd5e1").aura(500.0, 3.0, 0.15),
    Template::new("e_musketeer_enemy", "Enemy Musketeer", Ranged, 60.0, 22, [40.0, 15.0, 150.0, 90.0, 0.8], "#334155").power(),
    Template::new("e_grand_wizard", "Grand Wizard", Splasher, 100.0, 3, [150.0, 40.0, 140.0, 80.0, 0.8], "#4338ca").aoe(70.0),
    Template::new("e_mana_wisp", "Mana Wisp", Buffer, 40.0, 20, [20.0, 1.0, 10.0, 30.0, 2.0], "#818cf8").aura(60.0, 5.0, 0.0),
    Template::new("e_spellblade", "Spellblade", Melee, 60.0, 17, [90.0, 15.0, 10.0, 45.0, 1.3], "#6366f1"),
    Template::new("e_legion_commander", "Legion Commander", Buffer, 100.0, 4, [300.0, 20.0, 10.0, 50.0, 1.0], "#b91c1c").aura(100.0, 5.0, 0.1),
    Template::new("e_legionnaire", "Legionnaire", Melee, 60.0, 26, [180.0, 12.0, 10.0, 55.0, 1.0], "#991b1b"),
    Template::new("e_legion_archer", "Legion Archer", Ranged, 60.0, 20, [60.0, 15.0, 140.0, 50.0, 1.0], "#c2410c"),
    Template::new("e_void_behemoth", "Void Behemoth", Melee, 200.0, 5, [1000.0, 40.0, 15.0, 90.0, 0.7], "#2e1065").heavy(),
    Template::new("e_voidling", "Voidling", Ranged, 30.0, 55, [45.0, 14.0, 125.0, 45.0, 1.4], "#a855f7"),
    Template::new("e_warlord_supreme", "The Warlord Supreme", Hero, 1000.0, 1, [6000.0, 80.0, 35.0, 40.0, 1.1], "#450a0a"),
    Template::new("e_royal_guard_elite", "Royal Guard Elite", Buffer, 100.0, 10, [400.0, 20.0, 10.0, 55.0, 1.0], "#7f1d1d").aura(80.0, 10.0, 0.0),
    Template::new("e_war_machine", "War Machine", Splasher, 100.0, 5, [200.0, 40.0, 200.0, 100.0, 0.5], "#57534e").aoe(60.0),
    Template::new("e_grunt_swarm", "Grunt Swarm", Melee, 20.0, 54, [60.0, 8.0, 10.0, 50.0, 1.3], "#b91c1c"),
    Template::new("e_endless_horde", "Endless Horde", Melee, 20.0, 30, [60.0, 8.0, 10.0, 50.0, 1.3], "#b91c1c"),
];

/// Every recruitable card at its base unit count
pub fn player_cards() -> Vec<Card> {
    PLAYER_CARDS.iter().map(Template::card).collect()
}

/// Look up a recruitable card by template id, short id (`militia`) or name
pub fn player_card(key: &str) -> Option<Card> {
    PLAYER_CARDS.iter().find(|t| t.matches(key)).map(Template::card)
}

/// Every enemy unit at its codex unit count
pub fn enemy_cards() -> Vec<Card> {
    ENEMY_UNITS.iter().map(Template::card).collect()
}

/// Look up an enemy unit by template id, short id or name
pub fn enemy_card(key: &str) -> Option<Card> {
    ENEMY_UNITS.iter().find(|t| t.matches(key)).map(Template::card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for t in PLAYER_CARDS.iter().chain(ENEMY_UNITS) {
            assert!(seen.insert(t.id), "duplicate template id {}", t.id);
        }
    }

    #[test]
    fn test_lookup_by_any_key() {
        let by_id = player_card("c_militia").unwrap();
        let by_short = player_card("militia").unwrap();
        let by_name = player_card("High Commander").unwrap();
        assert_eq!(by_id, by_short);
        assert_eq!(by_id.unit_count, 3);
        assert_eq!(by_name.model.role, UnitRole::Hero);
        assert!(player_card("goblin_scavenger").is_none());
        assert_eq!(enemy_card("goblin_scavenger").unwrap().model.stats.hp, 20.0);
    }

    #[test]
    fn test_flourish_tags() {
        assert_eq!(player_card("ranger").unwrap().model.flourish, Flourish::Power);
        assert_eq!(player_card("arcanist").unwrap().model.flourish, Flourish::Magic);
        assert!(player_card("centurion").unwrap().model.heavy_hitter);
        let voidling = enemy_card("voidling").unwrap().model;
        assert_eq!(voidling.flourish, Flourish::Plain);
        assert!(!voidling.fires_projectiles);
        assert!(player_cards().iter().all(|c| !c.model.fires_projectiles));
    }

    #[test]
    fn test_auras_and_splash() {
        let observer = player_card("observer").unwrap();
        let (radius, buff) = observer.model.stats.aura().unwrap();
        assert_eq!(radius, 100.0);
        assert_eq!(buff.range, Some(100.0));

        for card in player_cards().iter().chain(enemy_cards().iter()) {
            let stats = &card.model.stats;
            assert!(stats.hp > 0.0 && stats.attack_cooldown > 0.0, "{}", card.id);
            if card.model.role == UnitRole::Buffer {
                assert!(stats.aura().is_some(), "{} has no aura", card.id);
            }
        }
    }
}
