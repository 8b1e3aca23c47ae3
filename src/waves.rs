//! Scripted enemy waves
//!
//! Rounds 1 through 12 are hand-built encounters; every later round is an
//! ever larger, ever tougher horde.

use crate::model::Card;
use crate::templates::enemy_card;

/// Number of hand-built rounds before the endless horde takes over
pub const SCRIPTED_ROUNDS: u32 = 12;

#[rustfmt::skip]
const WAVES: [&[(&str, u32)]; SCRIPTED_ROUNDS as usize] = [
    &[("e_goblin_scavenger", 8)],
    &[("e_orc_grunt", 6), ("e_goblin_archer", 6)],
    &[("e_orc_drummer", 2), ("e_kobold_thief", 13)],
    &[("e_warg_alpha", 3), ("e_warg_pack", 17)],
    &[("e_siege_ballista", 3), ("e_elite_archer", 10), ("e_shield_bearer", 12)],
    &[("e_gatekeeper", 1), ("e_gate_guard", 10), ("e_void_mage", 5), ("e_voidling_swarm", 15)],
    &[("e_assassin", 20), ("e_shadow_dancer", 5)],
    &[("e_iron_golem", 8), ("e_support_bot", 5), ("e_musketeer_enemy", 22)],
    &[("e_grand_wizard", 3), ("e_mana_wisp", 20), ("e_spellblade", 17)],
    &[("e_legion_commander", 4), ("e_legionnaire", 26), ("e_legion_archer", 20)],
    &[("e_void_behemoth", 5), ("e_voidling", 55)],
    &[("e_warlord_supreme", 1), ("e_royal_guard_elite", 10), ("e_war_machine", 5), ("e_grunt_swarm", 54)],
];

/// Enemy roster for `round` (1-based; round 0 is treated as round 1)
pub fn enemy_wave(round: u32) -> Vec<Option<Card>> {
    let round = round.max(1);
    if round > SCRIPTED_ROUNDS {
        return vec![endless_horde(round)];
    }

    WAVES[(round - 1) as usize]
        .iter()
        .enumerate()
        .map(|(i, &(template, count))| {
            let card = enemy_card(template);
            if card.is_none() {
                log::warn!("Wave {round} references unknown enemy {template}");
            }
            card.map(|mut card| {
                card.id = format!("r{round}_{}", i + 1);
                card.unit_count = count;
                card
            })
        })
        .collect()
}

/// Scaled horde for rounds past the scripted ones
fn endless_horde(round: u32) -> Option<Card> {
    let r = round as f32;
    enemy_card("e_endless_horde").map(|mut card| {
        card.id = "inf_1".to_string();
        card.unit_count = 30 + round * 5;
        card.model.value = 50.0 + r * 5.0;
        card.model.stats.hp = 50.0 + r * 20.0;
        card.model.stats.damage = 10.0 + r;
        card
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_wave() {
        let wave = enemy_wave(1);
        assert_eq!(wave.len(), 1);
        let card = wave[0].as_ref().unwrap();
        assert_eq!(card.id, "r1_1");
        assert_eq!(card.model.name, "Goblin Scavenger");
        assert_eq!(card.unit_count, 8);
        assert_eq!(enemy_wave(0), wave);
    }

    #[test]
    fn test_every_scripted_wave_resolves() {
        for round in 1..=SCRIPTED_ROUNDS {
            let wave = enemy_wave(round);
            assert!(!wave.is_empty());
            assert!(wave.iter().all(Option::is_some), "round {round}");
        }
    }

    #[test]
    fn test_endless_scaling() {
        let wave = enemy_wave(15);
        let card = wave[0].as_ref().unwrap();
        assert_eq!(card.unit_count, 105);
        assert_eq!(card.model.stats.hp, 350.0);
        assert_eq!(card.model.stats.damage, 25.0);
        assert_eq!(card.model.value, 125.0);
    }
}
