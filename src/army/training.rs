//! Training: recruits become soldiers and specialists, some desert
//!
//! Desertion is rolled per recruit; the survivors are split across unit
//! categories by a weighted table skewed by the army's specialization.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::army::model::Army;
use crate::core::config::GameConfig;
use crate::core::error::{Rejection, Result};
use crate::core::types::CommanderKey;
use crate::tables::ArmyType;

/// Base category weights before the specialization multiplier
const INFANTRY_WEIGHT: f64 = 0.70;
const ARCHER_WEIGHT: f64 = 0.15;
const CAVALRY_WEIGHT: f64 = 0.10;
const SIEGE_WEIGHT: f64 = 0.03;

/// Probability that any single recruit deserts during training
///
/// Rises as morale or supplies fall and as the army grows; always within
/// `[desertion_base, desertion_cap]`.
pub fn desertion_rate(morale: u32, supplies: u32, effective_size: u64, config: &GameConfig) -> f64 {
    let morale_term = (100.0 - morale.min(100) as f64) / 500.0;
    let supply_term = ((50.0 - supplies as f64) / 250.0).max(0.0);
    let size_term = effective_size as f64 / 10_000.0;
    (config.desertion_base + morale_term + supply_term + size_term).min(config.desertion_cap)
}

/// Share of survivors that may become knights
pub fn knight_chance(amount: u32, level: u32, config: &GameConfig) -> f64 {
    let volume = (amount as f64 / config.knight_volume_divisor).min(config.knight_volume_cap);
    (config.knight_chance_base + volume + level as f64 * config.knight_chance_per_level).min(config.knight_chance_cap)
}

/// Head counts per unit category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitSplit {
    pub infantry: u32,
    pub knights: u32,
    pub archers: u32,
    pub cavalry: u32,
    pub siege: u32,
}

impl UnitSplit {
    pub fn total(&self) -> u32 {
        self.infantry + self.knights + self.archers + self.cavalry + self.siege
    }
}

/// Split `total` survivors across categories
///
/// Specialist counts are truncated; whatever truncation leaves over goes
/// to infantry, so the split always sums to `total`.
pub fn distribute_units(total: u32, knight_chance: f64, army_type: ArmyType) -> UnitSplit {
    let bonus = army_type.bonuses();
    let weights = [
        INFANTRY_WEIGHT * bonus.infantry,
        knight_chance,
        ARCHER_WEIGHT * bonus.archers,
        CAVALRY_WEIGHT * bonus.cavalry,
        SIEGE_WEIGHT * bonus.siege,
    ];
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return UnitSplit {
            infantry: total,
            ..UnitSplit::default()
        };
    }

    let share = |w: f64| (total as f64 * w / sum).floor() as u32;
    let knights = share(weights[1]);
    let archers = share(weights[2]);
    let cavalry = share(weights[3]);
    let siege = share(weights[4]);
    let specialists = (knights + archers + cavalry + siege).min(total);

    UnitSplit {
        infantry: total - specialists,
        knights,
        archers,
        cavalry,
        siege,
    }
}

/// Append-only training history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub commander: CommanderKey,
    pub requested: u32,
    pub trained: u32,
    pub deserted: u32,
    /// Infantry that would not fit under the soldier cap, counted in `deserted`
    pub overflow: u32,
    pub gained: UnitSplit,
    pub desertion_rate: f64,
    pub knight_chance: f64,
    pub supply_cost: u32,
    /// trained / requested * 100
    pub success_rate: f64,
    pub at: DateTime<Utc>,
}

/// Train `amount` recruits
///
/// `trained + deserted == amount` holds for every successful call.
pub fn train(
    army: &mut Army,
    commander_level: u32,
    amount: i64,
    config: &GameConfig,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Result<TrainingRecord> {
    if amount <= 0 {
        return Err(Rejection::NonPositiveAmount.into());
    }
    if amount > army.current_recruits as i64 {
        return Err(Rejection::NotEnoughRecruits {
            have: army.current_recruits,
        }
        .into());
    }
    let amount = amount as u32;

    let supply_cost = (amount / config.recruits_per_training_supply).max(1);
    if supply_cost > army.supplies {
        return Err(Rejection::InsufficientSupplies {
            need: supply_cost,
            have: army.supplies,
        }
        .into());
    }

    let rate = desertion_rate(army.morale, army.supplies, army.effective_size(), config);
    let chance = knight_chance(amount, commander_level, config);

    let mut deserted = (0..amount).filter(|_| rng.gen_bool(rate)).count() as u32;
    let mut gained = distribute_units(amount - deserted, chance, army.army_type);

    let space = army.max_soldiers.saturating_sub(army.current_soldiers);
    let overflow = gained.infantry.saturating_sub(space);
    gained.infantry -= overflow;
    deserted += overflow;

    army.current_recruits -= amount;
    army.current_soldiers += gained.infantry;
    army.knights += gained.knights;
    army.archers += gained.archers;
    army.cavalry += gained.cavalry;
    army.siege += gained.siege;
    army.spend_supplies(supply_cost);
    army.raise_morale(config.training_morale_gain);

    let trained = gained.total();
    tracing::debug!(
        army = %army.key,
        requested = amount,
        trained,
        deserted,
        overflow,
        rate,
        "Training complete"
    );

    Ok(TrainingRecord {
        commander: army.key,
        requested: amount,
        trained,
        deserted,
        overflow,
        gained,
        desertion_rate: rate,
        knight_chance: chance,
        supply_cost,
        success_rate: trained as f64 / amount as f64 * 100.0,
        at: now,
    })
}
