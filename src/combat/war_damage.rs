//! War turn damage

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tables::{Tactic, Terrain, Weather};

pub const MIN_WAR_DAMAGE: i64 = 10;
const POWER_TO_DAMAGE: f64 = 0.1;
const DAMAGE_SPREAD: f64 = 50.0;
const SURPRISE_PER_AMBUSH: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarHit {
    pub damage: u64,
    /// Terrain x weather x tactic ratio
    pub modifier: f64,
    pub surprise: bool,
}

/// Combined multiplier for one side attacking the other
pub fn war_modifier(terrain: Terrain, weather: Weather, attacker: Tactic, defender: Tactic) -> f64 {
    terrain.composite_factor() * weather.combat_factor() * attacker.modifiers().damage / defender.modifiers().damage
}

/// Damage dealt by the side with `attacker_power` using `attacker_tactic`
///
/// `defender_tactic` is the stance the other side last chose.
pub fn calculate_war_damage(
    attacker_power: u64,
    terrain: Terrain,
    weather: Weather,
    attacker_tactic: Tactic,
    defender_tactic: Tactic,
    rng: &mut impl Rng,
) -> WarHit {
    let base = attacker_power as f64 * POWER_TO_DAMAGE + rng.gen_range(-DAMAGE_SPREAD..=DAMAGE_SPREAD);
    let modifier = war_modifier(terrain, weather, attacker_tactic, defender_tactic);
    let mut damage = ((base * modifier).round() as i64).max(MIN_WAR_DAMAGE);

    let surprise_chance = (terrain.modifiers().ambush * SURPRISE_PER_AMBUSH).clamp(0.0, 1.0);
    let surprise = rng.gen_bool(surprise_chance);
    if surprise {
        damage = (damage as f64 * rng.gen_range(1.3..=1.8)).round() as i64;
    }

    WarHit {
        damage: damage.max(0) as u64,
        modifier,
        surprise,
    }
}
