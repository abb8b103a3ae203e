//! Supply upkeep
//!
//! Consumption is charged in whole days measured from `last_supply_check`,
//! which only advances by the days actually charged. Running the charge
//! twice within the same day therefore costs nothing extra.

use chrono::{DateTime, Duration, Utc};

use crate::army::model::Army;

/// Fraction of effective size eaten per day
pub const DAILY_UPKEEP_RATE: f64 = 0.01;

/// At or below this many supplies the army starts to starve
pub const STARVATION_THRESHOLD: u32 = 10;

pub const STARVATION_MORALE_PENALTY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupplyReport {
    pub days: i64,
    pub consumed: u32,
    pub starving: bool,
}

/// floor(effective_size * 0.01 * days)
pub fn supply_consumption(effective_size: u64, days: i64) -> u64 {
    if days <= 0 {
        return 0;
    }
    (effective_size as f64 * DAILY_UPKEEP_RATE * days as f64).floor() as u64
}

/// Charge upkeep for every whole day since the last check
pub fn apply_supply_consumption(army: &mut Army, now: DateTime<Utc>) -> SupplyReport {
    let days = (now - army.last_supply_check).num_days();
    if days <= 0 {
        return SupplyReport::default();
    }

    let consumed = supply_consumption(army.effective_size(), days).min(army.supplies as u64) as u32;
    army.spend_supplies(consumed);
    army.last_supply_check += Duration::days(days);

    let starving = army.supplies <= STARVATION_THRESHOLD;
    if starving {
        army.lower_morale(STARVATION_MORALE_PENALTY);
    }

    SupplyReport {
        days,
        consumed,
        starving,
    }
}
