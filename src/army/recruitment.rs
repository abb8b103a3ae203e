//! Recruitment: eligibility and the weekly recruit draw

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::army::model::Army;
use crate::army::resets::maybe_reset_weekly;
use crate::core::config::GameConfig;
use crate::core::error::{Rejection, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecruitReport {
    pub recruited: u32,
    pub supply_cost: u32,
    pub weekly_used: u32,
    pub weekly_remaining: u32,
}

/// Whether the army may recruit right now
///
/// Applies a due weekly reset first, so a dormant army is never locked
/// out by a stale counter.
pub fn can_recruit(army: &mut Army, config: &GameConfig, now: DateTime<Utc>) -> Result<()> {
    maybe_reset_weekly(army, now);

    if army.weekly_recruitment_used >= config.weekly_recruit_quota {
        return Err(Rejection::WeeklyQuotaReached.into());
    }
    if army.morale < config.recruit_min_morale {
        return Err(Rejection::MoraleTooLow {
            need: config.recruit_min_morale,
            have: army.morale,
        }
        .into());
    }
    if army.supplies < config.recruit_min_supplies {
        return Err(Rejection::InsufficientSupplies {
            need: config.recruit_min_supplies,
            have: army.supplies,
        }
        .into());
    }

    Ok(())
}

/// Draw the morale-scaled recruit count
pub fn roll_recruits(morale: u32, config: &GameConfig, rng: &mut impl Rng) -> u32 {
    let base = rng.gen_range(config.recruit_base_min..=config.recruit_base_max);
    let jitter = rng.gen_range(-config.recruit_jitter..=config.recruit_jitter);
    let drawn = (base + jitter).max(config.recruit_floor);
    (drawn as u64 * morale as u64 / 100) as u32
}

/// One supply per `recruits_per_supply` recruits, at least 1
pub fn recruit_supply_cost(recruits: u32, config: &GameConfig) -> u32 {
    (recruits / config.recruits_per_supply).max(1)
}

/// Recruit a random batch of untrained troops
///
/// Rejections leave the army untouched apart from a due weekly reset.
pub fn recruit(army: &mut Army, config: &GameConfig, rng: &mut impl Rng, now: DateTime<Utc>) -> Result<RecruitReport> {
    can_recruit(army, config, now)?;

    let recruited = roll_recruits(army.morale, config, rng);
    let supply_cost = recruit_supply_cost(recruited, config);

    let remaining = config.weekly_recruit_quota - army.weekly_recruitment_used;
    if recruited > remaining {
        return Err(Rejection::QuotaExceeded { remaining }.into());
    }
    let available = army.max_recruits.saturating_sub(army.current_recruits);
    if recruited > available {
        return Err(Rejection::RecruitCapacityFull { available }.into());
    }
    if supply_cost > army.supplies {
        return Err(Rejection::InsufficientSupplies {
            need: supply_cost,
            have: army.supplies,
        }
        .into());
    }

    army.current_recruits += recruited;
    army.weekly_recruitment_used += recruited;
    army.spend_supplies(supply_cost);
    army.recruitment_reset_at = Some(now + Duration::days(config.recruit_cooldown_days));
    army.lower_morale(1);

    tracing::debug!(
        army = %army.key,
        recruited,
        supply_cost,
        weekly_used = army.weekly_recruitment_used,
        "Recruited"
    );

    Ok(RecruitReport {
        recruited,
        supply_cost,
        weekly_used: army.weekly_recruitment_used,
        weekly_remaining: config.weekly_recruit_quota - army.weekly_recruitment_used,
    })
}
