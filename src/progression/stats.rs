//! Stat point allocation

use crate::core::error::{Rejection, Result};
use crate::progression::commander::{Commander, Stat};

/// Spend unspent points on one base stat, returning the stat's new value
///
/// The name is resolved before any point check so an unknown stat is
/// always reported as such.
pub fn allocate_stat(commander: &mut Commander, stat_name: &str, amount: i64) -> Result<(Stat, u32)> {
    let stat = Stat::parse(stat_name).ok_or_else(|| Rejection::UnknownStat(stat_name.to_string()))?;

    if amount <= 0 {
        return Err(Rejection::NonPositiveAmount.into());
    }
    if amount > commander.stat_points as i64 {
        return Err(Rejection::InsufficientStatPoints {
            have: commander.stat_points,
        }
        .into());
    }

    let amount = amount as u32;
    commander.stat_points -= amount;
    let value = commander.stats.get_mut(stat);
    *value += amount;

    Ok((stat, *value))
}
