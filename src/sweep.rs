//! Periodic background sweeps
//!
//! Resets and upkeep are applied lazily whenever an army is touched, and
//! stale invitations are ignored when read, so the sweeps only keep idle
//! rows current. Each row is processed in its own transaction; one failing
//! row is logged and skipped.

use std::fmt::Display;

use chrono::{DateTime, Utc};

use crate::army::{apply_supply_consumption, maybe_reset_daily, maybe_reset_weekly, Army};
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{DuelId, WarId};
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub processed: usize,
    /// Rows whose state actually changed
    pub changed: usize,
    pub failed: usize,
}

fn sweep_each(
    store: &Store,
    sweep: &'static str,
    mut f: impl FnMut(&mut Army) -> bool,
) -> Result<SweepReport> {
    let mut report = SweepReport::default();

    for key in store.army_keys()? {
        let result = store.transaction(|tx| {
            let Some(mut army) = tx.army(key) else {
                return Ok(false);
            };
            let changed = f(&mut army);
            if changed {
                tx.put_army(army);
            }
            Ok(changed)
        });

        report.tally(sweep, key, result);
    }

    report.finish(sweep)
}

impl SweepReport {
    fn tally(&mut self, sweep: &str, row: impl Display, result: Result<bool>) {
        match result {
            Ok(changed) => {
                self.processed += 1;
                if changed {
                    self.changed += 1;
                }
            }
            Err(e) => {
                self.failed += 1;
                log_failure(sweep, row, &e);
            }
        }
    }

    fn finish(self, sweep: &str) -> Result<SweepReport> {
        tracing::debug!(
            sweep,
            processed = self.processed,
            changed = self.changed,
            failed = self.failed,
            "Sweep finished"
        );
        Ok(self)
    }
}

fn log_failure(sweep: &str, row: impl Display, e: &GameError) {
    tracing::warn!(sweep, row = %row, error = %e, "Sweep skipped row");
}

/// Charge upkeep for every army
pub fn supply_sweep(store: &Store, now: DateTime<Utc>) -> Result<SweepReport> {
    sweep_each(store, "supply", |army| apply_supply_consumption(army, now).days > 0)
}

/// Clear expired weekly and daily counters for every army
pub fn reset_sweep(store: &Store, now: DateTime<Utc>) -> Result<SweepReport> {
    sweep_each(store, "reset", |army| {
        let weekly = maybe_reset_weekly(army, now);
        let daily = maybe_reset_daily(army, now);
        weekly || daily
    })
}

/// Drop expired challenges and call off lapsed war declarations
pub fn session_sweep(store: &Store, config: &GameConfig, now: DateTime<Utc>) -> Result<SweepReport> {
    let (challenges, wars) = store.read(|t| {
        let challenges: Vec<DuelId> = t
            .challenges
            .values()
            .filter(|c| c.is_expired(config, now))
            .map(|c| c.id)
            .collect();
        let wars: Vec<WarId> = t.wars.values().filter(|w| w.is_lapsed(config, now)).map(|w| w.id).collect();
        (challenges, wars)
    })?;

    let mut report = SweepReport::default();
    for id in challenges {
        let result = store.transaction(|tx| {
            let expired = tx.challenge(id).is_some_and(|c| c.is_expired(config, now));
            if expired {
                tx.remove_challenge(id);
            }
            Ok(expired)
        });
        report.tally("session", id, result);
    }
    for id in wars {
        let result = store.transaction(|tx| {
            let Some(mut war) = tx.war(id) else {
                return Ok(false);
            };
            if !war.is_lapsed(config, now) {
                return Ok(false);
            }
            war.call_off(now);
            tracing::info!(war = %id, name = %war.name, "War declaration lapsed");
            tx.put_war(war);
            Ok(true)
        });
        report.tally("session", id, result);
    }

    report.finish("session")
}
