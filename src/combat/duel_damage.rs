//! Duel damage
//!
//! A hit is a base roll plus a stat bonus shaped by the action's primary
//! stat, the attacker's units, terrain and weather, less the defender's
//! resistance, then jittered. Crits scale the final figure.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::army::Army;
use crate::progression::{Commander, Stat, Stats};
use crate::tables::{Affinity, Terrain, Weather};

pub const MIN_DUEL_DAMAGE: i64 = 5;
const BASE_DAMAGE_MIN: i64 = 15;
const BASE_DAMAGE_MAX: i64 = 35;
const DEFENSE_FACTOR: f64 = 1.8;
const CRIT_CHANCE_PER_POINT: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuelAction {
    PowerStrike,
    MagicBolt,
    QuickStrike,
    CavalryCharge,
    ArcherVolley,
    ShieldWall,
    FlankingManeuver,
}

/// What an action scales with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionProfile {
    pub stat: Stat,
    pub multiplier: f64,
    pub affinity: Affinity,
}

impl DuelAction {
    pub const ALL: [DuelAction; 7] = [
        DuelAction::PowerStrike,
        DuelAction::MagicBolt,
        DuelAction::QuickStrike,
        DuelAction::CavalryCharge,
        DuelAction::ArcherVolley,
        DuelAction::ShieldWall,
        DuelAction::FlankingManeuver,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DuelAction::PowerStrike => "power_strike",
            DuelAction::MagicBolt => "magic_bolt",
            DuelAction::QuickStrike => "quick_strike",
            DuelAction::CavalryCharge => "cavalry_charge",
            DuelAction::ArcherVolley => "archer_volley",
            DuelAction::ShieldWall => "shield_wall",
            DuelAction::FlankingManeuver => "flanking_maneuver",
        }
    }

    /// Accepts `power_strike`, `power strike` or `Power-Strike`
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL.iter().copied().find(|a| a.name() == normalized)
    }

    pub fn profile(&self) -> ActionProfile {
        let (stat, multiplier, affinity) = match self {
            DuelAction::PowerStrike => (Stat::Strength, 2.2, Affinity::Infantry),
            DuelAction::MagicBolt => (Stat::Intelligence, 2.8, Affinity::Archery),
            DuelAction::QuickStrike => (Stat::Agility, 2.0, Affinity::Cavalry),
            DuelAction::CavalryCharge => (Stat::Strength, 2.5, Affinity::Cavalry),
            DuelAction::ArcherVolley => (Stat::Agility, 2.3, Affinity::Archery),
            DuelAction::ShieldWall => (Stat::Vitality, 1.5, Affinity::Defense),
            DuelAction::FlankingManeuver => (Stat::Agility, 2.1, Affinity::Cavalry),
        };
        ActionProfile {
            stat,
            multiplier,
            affinity,
        }
    }

    /// Stat the defender resists this action with
    pub fn defense_stat(&self) -> Stat {
        match self {
            DuelAction::MagicBolt => Stat::Intelligence,
            _ => Stat::Vitality,
        }
    }
}

/// The parts of a commander and army a duel reads, taken live each turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fighter {
    pub stats: Stats,
    pub knights: u32,
    pub archers: u32,
    pub cavalry: u32,
}

impl Fighter {
    pub fn new(commander: &Commander, army: &Army) -> Self {
        Self {
            stats: commander.stats,
            knights: army.knights,
            archers: army.archers,
            cavalry: army.cavalry,
        }
    }

    /// Flat bonus the fighter's units add to an action of this affinity
    pub fn unit_bonus(&self, affinity: Affinity) -> f64 {
        let knights = self.knights as f64 * 3.0;
        let archers = self.archers as f64 * 2.0;
        match affinity {
            Affinity::Infantry => knights,
            Affinity::Archery => archers,
            Affinity::Cavalry => self.cavalry as f64 * 2.5,
            Affinity::Defense => knights + archers,
        }
    }

    pub fn crit_chance(&self) -> f64 {
        let points = self.stats.agility + self.stats.luck + self.knights / 10;
        (points as f64 * CRIT_CHANCE_PER_POINT).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuelHit {
    pub action: DuelAction,
    pub damage: u32,
    pub critical: bool,
    pub stat_bonus: f64,
    pub defense_bonus: f64,
}

/// Stat bonus after terrain and weather, before the defender's resistance
pub fn stat_bonus(attacker: &Fighter, action: DuelAction, terrain: Terrain, weather: Weather) -> f64 {
    let profile = action.profile();
    (attacker.stats.get(profile.stat) as f64 + attacker.unit_bonus(profile.affinity))
        * profile.multiplier
        * terrain.modifier(profile.affinity)
        * weather.combat_factor()
}

pub fn calculate_damage(
    attacker: &Fighter,
    defender: &Fighter,
    action: DuelAction,
    terrain: Terrain,
    weather: Weather,
    rng: &mut impl Rng,
) -> DuelHit {
    let base = rng.gen_range(BASE_DAMAGE_MIN..=BASE_DAMAGE_MAX) as f64;
    let bonus = stat_bonus(attacker, action, terrain, weather);
    let defense = defender.stats.get(action.defense_stat()) as f64 * DEFENSE_FACTOR;

    let jitter = rng.gen_range(0.7..=1.3);
    let mut damage = (((base + bonus - defense) * jitter).round() as i64).max(MIN_DUEL_DAMAGE);

    let critical = rng.gen_bool(attacker.crit_chance());
    if critical {
        damage = (damage as f64 * rng.gen_range(1.5..=2.5)).floor() as i64;
    }

    tracing::debug!(action = action.name(), damage, critical, bonus, defense, "Duel hit");

    DuelHit {
        action,
        damage: damage.clamp(0, u32::MAX as i64) as u32,
        critical,
        stat_bonus: bonus,
        defense_bonus: defense,
    }
}
