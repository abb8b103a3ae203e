//! Lazy counter resets
//!
//! Both the eligibility checks and the periodic sweep call these; running
//! them again before the reset instant is a no-op.

use chrono::{DateTime, Duration, Utc};

use crate::army::model::Army;
use crate::core::config::GameConfig;
use crate::core::error::{Rejection, Result};

/// Clear the weekly recruitment counter if its cooldown has elapsed
///
/// Returns true when a reset happened.
pub fn maybe_reset_weekly(army: &mut Army, now: DateTime<Utc>) -> bool {
    match army.recruitment_reset_at {
        Some(reset_at) if now >= reset_at => {
            army.weekly_recruitment_used = 0;
            army.recruitment_reset_at = None;
            true
        }
        _ => false,
    }
}

/// Clear the daily action counter if its window has elapsed
pub fn maybe_reset_daily(army: &mut Army, now: DateTime<Utc>) -> bool {
    match army.daily_reset_at {
        Some(reset_at) if now >= reset_at => {
            army.daily_actions_used = 0;
            army.daily_reset_at = None;
            true
        }
        _ => false,
    }
}

/// Spend one daily action, opening a new window on the first use
pub fn consume_daily_action(army: &mut Army, config: &GameConfig, now: DateTime<Utc>) -> Result<u32> {
    maybe_reset_daily(army, now);

    if army.daily_actions_used >= config.daily_actions {
        return Err(Rejection::DailyLimitReached.into());
    }

    army.daily_actions_used += 1;
    if army.daily_reset_at.is_none() {
        army.daily_reset_at = Some(now + Duration::hours(config.daily_window_hours));
    }

    Ok(config.daily_actions - army.daily_actions_used)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CommanderKey;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn army() -> Army {
        Army::new(CommanderKey::new(1, 1), &GameConfig::default(), t0())
    }

    #[test]
    fn test_weekly_reset_only_after_deadline() {
        let mut a = army();
        a.weekly_recruitment_used = 700;
        a.recruitment_reset_at = Some(t0() + Duration::days(7));

        assert!(!maybe_reset_weekly(&mut a, t0() + Duration::days(6)));
        assert_eq!(a.weekly_recruitment_used, 700);

        assert!(maybe_reset_weekly(&mut a, t0() + Duration::days(7)));
        assert_eq!(a.weekly_recruitment_used, 0);

        // idempotent
        assert!(!maybe_reset_weekly(&mut a, t0() + Duration::days(8)));
    }

    #[test]
    fn test_daily_actions_exhaust_and_reset() {
        let config = GameConfig::default();
        let mut a = army();

        assert_eq!(consume_daily_action(&mut a, &config, t0()).unwrap(), 2);
        assert_eq!(consume_daily_action(&mut a, &config, t0()).unwrap(), 1);
        assert_eq!(consume_daily_action(&mut a, &config, t0()).unwrap(), 0);
        assert!(consume_daily_action(&mut a, &config, t0() + Duration::hours(23)).is_err());

        let next_day = t0() + Duration::hours(24);
        assert_eq!(consume_daily_action(&mut a, &config, next_day).unwrap(), 2);
        assert_eq!(a.daily_reset_at, Some(next_day + Duration::hours(24)));
    }
}
