//! Operation boundary
//!
//! Each public method is one player action: identity in, typed report out,
//! executed as a single store transaction. Rejections are returned as-is;
//! anything else is logged here before it leaves the service.

pub mod commands;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Mutex;

pub use commands::{execute, Command, Response};

use crate::army::{
    self, apply_supply_consumption, calculate_army_power, maybe_reset_daily, maybe_reset_weekly, status_effects, Army,
    ArmyPower, FortificationRecord, RecruitReport, StatusEffect, SupplyReport, TrainingRecord,
};
use crate::combat::{DuelAction, Fighter};
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Rejection, Result};
use crate::core::types::CommanderKey;
use crate::progression::{self, AchievementId, Commander, ExperienceGain, Registration, Stat};
use crate::session::{
    settle_duel, settle_war, Duel, DuelChallenge, DuelSettlement, DuelTurn, War, WarStatus, WarTurn,
};
use crate::store::{Store, Transaction};
use crate::tables::{ArmyType, Formation, Tactic};

/// A result value plus any achievements it unlocked
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub achievements: Vec<AchievementId>,
}

#[derive(Debug, Clone)]
pub struct StatusReport {
    pub commander: Commander,
    pub army: Army,
    pub power: ArmyPower,
    pub effects: Vec<StatusEffect>,
    pub weekly_remaining: u32,
    pub daily_remaining: u32,
}

#[derive(Debug, Clone)]
pub struct DuelActionReport {
    pub duel: Duel,
    pub turn: DuelTurn,
    pub settlement: Option<DuelSettlement>,
}

#[derive(Debug, Clone)]
pub struct WarTurnReport {
    pub war: War,
    pub turn: WarTurn,
    /// XP for team A and team B once the war is over
    pub settlement: Option<(ExperienceGain, ExperienceGain)>,
}

/// Lazy resets and upkeep, applied whenever an army is touched
fn upkeep(army: &mut Army, now: DateTime<Utc>) -> SupplyReport {
    maybe_reset_weekly(army, now);
    maybe_reset_daily(army, now);
    apply_supply_consumption(army, now)
}

pub struct GameService {
    config: GameConfig,
    store: Store,
    rng: Mutex<ChaCha8Rng>,
}

impl GameService {
    pub fn new(config: GameConfig, store: Store) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            store,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn run<T>(
        &self,
        key: CommanderKey,
        operation: &'static str,
        f: impl FnOnce(&mut Transaction<'_>, &mut ChaCha8Rng) -> Result<T>,
    ) -> Result<T> {
        let result = match self.rng.lock() {
            Ok(mut rng) => self.store.transaction(|tx| f(tx, &mut *rng)),
            Err(_) => Err(GameError::Storage("rng lock poisoned".to_string())),
        };

        match &result {
            Err(e) if e.is_rejection() => {
                tracing::debug!(commander = %key, operation, reason = %e, "Rejected");
            }
            Err(e) => {
                tracing::error!(commander = %key, operation, error = %e, "Operation failed");
            }
            Ok(_) => {}
        }
        result
    }

    /// Load a registered commander and army, applying due upkeep
    fn load(tx: &Transaction<'_>, key: CommanderKey, now: DateTime<Utc>) -> Result<(Commander, Army)> {
        let (mut commander, mut army) = tx.require_profile(key)?;
        upkeep(&mut army, now);
        commander.last_active = now;
        Ok((commander, army))
    }

    pub fn register(&self, key: CommanderKey, registration: Registration, now: DateTime<Utc>) -> Result<Commander> {
        self.run(key, "register", |tx, _| {
            if tx.commander(key).is_some() {
                return Err(Rejection::AlreadyRegistered.into());
            }
            let commander = Commander::new(key, registration, &self.config, now);
            tx.put_commander(commander.clone());
            tx.put_army(Army::new(key, &self.config, now));
            tracing::info!(commander = %key, name = %commander.name, "Commander registered");
            Ok(commander)
        })
    }

    pub fn status(&self, key: CommanderKey, now: DateTime<Utc>) -> Result<StatusReport> {
        self.run(key, "status", |tx, _| {
            let (commander, army) = Self::load(tx, key, now)?;
            let report = StatusReport {
                power: calculate_army_power(&army, &self.config),
                effects: status_effects(&army),
                weekly_remaining: self.config.weekly_recruit_quota.saturating_sub(army.weekly_recruitment_used),
                daily_remaining: self.config.daily_actions.saturating_sub(army.daily_actions_used),
                commander: commander.clone(),
                army: army.clone(),
            };
            tx.put_commander(commander);
            tx.put_army(army);
            Ok(report)
        })
    }

    pub fn recruit(&self, key: CommanderKey, now: DateTime<Utc>) -> Result<Outcome<RecruitReport>> {
        self.run(key, "recruit", |tx, rng| {
            let (mut commander, mut army) = Self::load(tx, key, now)?;
            let report = army::recruit(&mut army, &self.config, rng, now)?;
            commander.total_recruited += report.recruited as u64;
            let achievements = progression::check_achievements(&mut commander, &army);
            tx.put_commander(commander);
            tx.put_army(army);
            Ok(Outcome {
                value: report,
                achievements,
            })
        })
    }

    pub fn train(&self, key: CommanderKey, amount: i64, now: DateTime<Utc>) -> Result<Outcome<TrainingRecord>> {
        self.run(key, "train", |tx, rng| {
            let (mut commander, mut army) = Self::load(tx, key, now)?;
            let record = army::train(&mut army, commander.level, amount, &self.config, rng, now)?;
            let achievements = progression::check_achievements(&mut commander, &army);
            tx.record_training(record.clone());
            tx.put_commander(commander);
            tx.put_army(army);
            Ok(Outcome {
                value: record,
                achievements,
            })
        })
    }

    pub fn allocate_stat(&self, key: CommanderKey, stat: &str, amount: i64) -> Result<(Stat, u32)> {
        self.run(key, "allocate_stat", |tx, _| {
            let mut commander = tx.require_commander(key)?;
            let allocated = progression::allocate_stat(&mut commander, stat, amount)?;
            tx.put_commander(commander);
            Ok(allocated)
        })
    }

    pub fn change_army_type(&self, key: CommanderKey, name: &str, now: DateTime<Utc>) -> Result<ArmyType> {
        self.run(key, "change_army_type", |tx, _| {
            let (_, mut army) = Self::load(tx, key, now)?;
            let army_type = army::change_army_type(&mut army, name)?;
            tx.put_army(army);
            Ok(army_type)
        })
    }

    pub fn change_formation(&self, key: CommanderKey, name: &str, now: DateTime<Utc>) -> Result<Formation> {
        self.run(key, "change_formation", |tx, _| {
            let (_, mut army) = Self::load(tx, key, now)?;
            let formation = army::change_formation(&mut army, name)?;
            tx.put_army(army);
            Ok(formation)
        })
    }

    pub fn build_fortification(&self, key: CommanderKey, now: DateTime<Utc>) -> Result<Outcome<FortificationRecord>> {
        self.run(key, "build_fortification", |tx, rng| {
            let (mut commander, mut army) = Self::load(tx, key, now)?;
            let record = army::build_fortification(&mut army, &self.config, rng, now)?;
            let achievements = progression::check_achievements(&mut commander, &army);
            tx.record_fortification(record.clone());
            tx.put_commander(commander);
            tx.put_army(army);
            Ok(Outcome {
                value: record,
                achievements,
            })
        })
    }

    pub fn check_achievements(&self, key: CommanderKey, now: DateTime<Utc>) -> Result<Vec<AchievementId>> {
        self.run(key, "check_achievements", |tx, _| {
            let (mut commander, army) = Self::load(tx, key, now)?;
            let awarded = progression::check_achievements(&mut commander, &army);
            tx.put_commander(commander);
            tx.put_army(army);
            Ok(awarded)
        })
    }

    // -- duels --

    /// Issue a challenge; costs one daily action
    pub fn challenge_duel(
        &self,
        challenger: CommanderKey,
        defender: CommanderKey,
        wager: u32,
        now: DateTime<Utc>,
    ) -> Result<DuelChallenge> {
        self.run(challenger, "challenge_duel", |tx, _| {
            if challenger == defender {
                return Err(Rejection::SelfChallenge.into());
            }
            let (commander, mut army) = Self::load(tx, challenger, now)?;
            tx.require_commander(defender)?;

            if commander.prestige < wager {
                return Err(Rejection::WagerNotCovered {
                    wager,
                    have: commander.prestige,
                }
                .into());
            }
            if tx.active_duel_for(challenger).is_some() || tx.active_duel_for(defender).is_some() {
                return Err(Rejection::AlreadyEngaged.into());
            }
            army::consume_daily_action(&mut army, &self.config, now)?;

            let challenge = DuelChallenge::new(challenger, defender, wager, now)?;
            tx.put_challenge(challenge.clone());
            tx.put_commander(commander);
            tx.put_army(army);
            Ok(challenge)
        })
    }

    /// Accept the oldest challenge addressed to `defender` that can still
    /// be honoured
    ///
    /// Expired challenges, and challenges whose challenger can no longer
    /// cover the wager, are dropped on the way even when nothing ends up
    /// accepted. A challenge held back only by the defender's prestige or a
    /// busy challenger stays queued.
    pub fn accept_duel(&self, defender: CommanderKey, now: DateTime<Utc>) -> Result<Duel> {
        let accepted = self.run(defender, "accept_duel", |tx, rng| {
            let defending = tx.require_commander(defender)?;
            let mut refusal = None;

            for challenge in tx.challenges_for(defender) {
                if challenge.is_expired(&self.config, now) {
                    tx.remove_challenge(challenge.id);
                    continue;
                }
                let Some(challenging) = tx.commander(challenge.challenger) else {
                    tx.remove_challenge(challenge.id);
                    continue;
                };
                if challenging.prestige < challenge.wager {
                    tracing::info!(duel = %challenge.id, challenger = %challenge.challenger, "Dropped uncovered challenge");
                    tx.remove_challenge(challenge.id);
                    refusal.get_or_insert(Rejection::WagerNotCovered {
                        wager: challenge.wager,
                        have: challenging.prestige,
                    });
                    continue;
                }
                if tx.active_duel_for(defender).is_some() {
                    return Ok(Err(Rejection::AlreadyEngaged));
                }
                if defending.prestige < challenge.wager {
                    refusal.get_or_insert(Rejection::WagerNotCovered {
                        wager: challenge.wager,
                        have: defending.prestige,
                    });
                    continue;
                }
                if tx.active_duel_for(challenge.challenger).is_some() {
                    refusal.get_or_insert(Rejection::AlreadyEngaged);
                    continue;
                }

                let duel = Duel::begin(&challenge, &self.config, rng, now);
                tx.remove_challenge(challenge.id);
                tx.put_duel(duel.clone());
                tracing::info!(
                    duel = %duel.id,
                    challenger = %duel.challenger,
                    defender = %duel.defender,
                    terrain = duel.terrain.name(),
                    weather = duel.weather.name(),
                    "Duel started"
                );
                return Ok(Ok(duel));
            }

            Ok(Err(refusal.unwrap_or(Rejection::SessionNotFound)))
        })?;

        accepted.map_err(|reason| {
            tracing::debug!(commander = %defender, operation = "accept_duel", reason = %reason, "Rejected");
            reason.into()
        })
    }

    /// Turn down the oldest live challenge addressed to `defender`
    pub fn decline_duel(&self, defender: CommanderKey, now: DateTime<Utc>) -> Result<DuelChallenge> {
        self.run(defender, "decline_duel", |tx, _| {
            tx.require_commander(defender)?;
            let challenge = tx
                .challenges_for(defender)
                .into_iter()
                .find(|c| !c.is_expired(&self.config, now))
                .ok_or(Rejection::SessionNotFound)?;
            tx.remove_challenge(challenge.id);
            tracing::info!(duel = %challenge.id, challenger = %challenge.challenger, defender = %defender, "Challenge declined");
            Ok(challenge)
        })
    }

    pub fn duel_action(&self, key: CommanderKey, action: &str, now: DateTime<Utc>) -> Result<DuelActionReport> {
        self.run(key, "duel_action", |tx, rng| {
            let mut duel = tx.active_duel_for(key).ok_or(Rejection::SessionNotFound)?;
            let action = DuelAction::parse(action).ok_or_else(|| Rejection::UnknownAction(action.to_string()))?;
            let opponent = duel
                .opponent_of(key)
                .ok_or_else(|| GameError::Invariant(format!("duel {} lost participant {key}", duel.id)))?;

            let (mut attacker, attacker_army) = Self::load(tx, key, now)?;
            let (mut defender, defender_army) = Self::load(tx, opponent, now)?;
            let turn = duel.act(
                key,
                action,
                &Fighter::new(&attacker, &attacker_army),
                &Fighter::new(&defender, &defender_army),
                rng,
                now,
            )?;
            attacker.total_damage += turn.hit.damage as u64;

            let settlement = match turn.outcome {
                Some(outcome) => {
                    debug_assert_eq!(outcome.winner, key);
                    let settlement = settle_duel(
                        (&mut attacker, &attacker_army),
                        (&mut defender, &defender_army),
                        duel.wager,
                        &self.config,
                        now,
                    );
                    tx.record_xp(settlement.winner_xp.record.clone());
                    tx.record_xp(settlement.loser_xp.record.clone());
                    Some(settlement)
                }
                None => None,
            };

            tx.put_commander(attacker);
            tx.put_commander(defender);
            tx.put_army(attacker_army);
            tx.put_army(defender_army);
            tx.put_duel(duel.clone());
            Ok(DuelActionReport {
                duel,
                turn,
                settlement,
            })
        })
    }

    // -- wars --

    /// Active wars and unexpired declarations both tie a leader up
    fn engaged_in_war(&self, tx: &Transaction<'_>, key: CommanderKey, now: DateTime<Utc>) -> bool {
        !tx.wars_for(key, |w| w.is_open(&self.config, now)).is_empty()
    }

    pub fn declare_war(
        &self,
        attacker: CommanderKey,
        target: CommanderKey,
        name: String,
        now: DateTime<Utc>,
    ) -> Result<War> {
        self.run(attacker, "declare_war", |tx, rng| {
            if attacker == target {
                return Err(Rejection::SelfChallenge.into());
            }
            let (attacking, attacker_army) = Self::load(tx, attacker, now)?;
            let (_, target_army) = Self::load(tx, target, now)?;
            if self.engaged_in_war(tx, attacker, now) || self.engaged_in_war(tx, target, now) {
                return Err(Rejection::AlreadyEngaged.into());
            }

            let name = if name.trim().is_empty() {
                format!("War of {}", attacking.army_name)
            } else {
                name
            };
            let war = War::declare(name, attacker, &attacker_army, target, &target_army, &self.config, rng, now)?;
            tx.put_war(war.clone());
            tracing::info!(war = %war.id, attacker = %attacker, target = %target, "War declared");
            Ok(war)
        })
    }

    /// Accept the oldest pending war declared against `key`
    pub fn accept_war(&self, key: CommanderKey, now: DateTime<Utc>) -> Result<War> {
        self.run(key, "accept_war", |tx, _| {
            let mut war = tx
                .wars_for(key, |w| {
                    w.status == WarStatus::Preparing && !w.is_lapsed(&self.config, now) && w.side_b.leader == key
                })
                .into_iter()
                .next()
                .ok_or(Rejection::SessionNotFound)?;
            war.accept(key, now)?;
            tx.put_war(war.clone());
            Ok(war)
        })
    }

    /// Call off the open war `key` leads a side of, before it begins
    pub fn withdraw_war(&self, key: CommanderKey, now: DateTime<Utc>) -> Result<War> {
        self.run(key, "withdraw_war", |tx, _| {
            let mut war = tx
                .wars_for(key, |w| w.is_open(&self.config, now))
                .into_iter()
                .next()
                .ok_or(Rejection::SessionNotFound)?;
            war.withdraw(key, now)?;
            tx.put_war(war.clone());
            Ok(war)
        })
    }

    pub fn war_turn(&self, key: CommanderKey, tactic: &str, now: DateTime<Utc>) -> Result<WarTurnReport> {
        self.run(key, "war_turn", |tx, rng| {
            let mut war = tx
                .wars_for(key, |w| w.status == WarStatus::Active)
                .into_iter()
                .next()
                .ok_or(Rejection::SessionNotFound)?;
            let tactic = Tactic::parse(tactic).ok_or_else(|| Rejection::UnknownTactic(tactic.to_string()))?;

            let team = war
                .team_of(key)
                .ok_or_else(|| GameError::Invariant(format!("war {} lost participant {key}", war.id)))?;
            let opponent = war.side(team.other()).leader;
            let (_, own_army) = Self::load(tx, key, now)?;
            let (_, enemy_army) = Self::load(tx, opponent, now)?;
            let own_power = calculate_army_power(&own_army, &self.config).total;
            let enemy_power = calculate_army_power(&enemy_army, &self.config).total;

            let turn = war.apply_turn(key, tactic, own_power, enemy_power, rng, now)?;
            tx.record_war_action(turn.action.clone());
            for record in turn.casualties.iter().cloned() {
                tx.record_casualty(record);
            }

            tx.put_army(own_army);
            tx.put_army(enemy_army);

            let settlement = match turn.outcome {
                Some(outcome) => {
                    let (mut a, army_a) = Self::load(tx, war.side_a.leader, now)?;
                    let (mut b, army_b) = Self::load(tx, war.side_b.leader, now)?;
                    let gains = settle_war(outcome, (&mut a, &army_a), (&mut b, &army_b), &self.config, now);
                    tx.record_xp(gains.0.record.clone());
                    tx.record_xp(gains.1.record.clone());
                    tx.put_commander(a);
                    tx.put_commander(b);
                    Some(gains)
                }
                None => None,
            };

            tx.put_war(war.clone());
            Ok(WarTurnReport {
                war,
                turn,
                settlement,
            })
        })
    }
}
