//! Duel lifecycle
//!
//! challenge -> (accepted) Active -> Ended
//!
//! A challenge can also be declined, or expires unanswered.
//!
//! A duel exists only once the defender accepts. Each turn the current
//! player strikes, the opponent's HP drops (never below zero) and the turn
//! passes. The first strike that empties a pool ends the duel.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::army::Army;
use crate::combat::{calculate_damage, DuelAction, DuelHit, Fighter};
use crate::core::config::GameConfig;
use crate::core::error::{Rejection, Result};
use crate::core::types::{CommanderKey, DuelId};
use crate::progression::{add_experience, check_achievements, AchievementId, Commander, ExperienceGain, XpSource};
use crate::tables::{Terrain, Weather};

/// An issued, not yet accepted challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelChallenge {
    pub id: DuelId,
    pub challenger: CommanderKey,
    pub defender: CommanderKey,
    /// Prestige staked by both sides
    pub wager: u32,
    pub issued_at: DateTime<Utc>,
}

impl DuelChallenge {
    pub fn new(challenger: CommanderKey, defender: CommanderKey, wager: u32, now: DateTime<Utc>) -> Result<Self> {
        if challenger == defender {
            return Err(Rejection::SelfChallenge.into());
        }
        Ok(Self {
            id: DuelId::new(),
            challenger,
            defender,
            wager,
            issued_at: now,
        })
    }

    /// Left unanswered past `challenge_expiry_hours`
    pub fn is_expired(&self, config: &GameConfig, now: DateTime<Utc>) -> bool {
        now >= self.issued_at + Duration::hours(config.challenge_expiry_hours)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelStatus {
    Active,
    Ended,
}

/// One logged strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelStrike {
    pub turn: u32,
    pub hit: DuelHit,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duel {
    pub id: DuelId,
    pub challenger: CommanderKey,
    pub defender: CommanderKey,
    pub challenger_hp: u32,
    pub defender_hp: u32,
    pub turn: u32,
    pub current: CommanderKey,
    pub terrain: Terrain,
    pub weather: Weather,
    pub status: DuelStatus,
    pub wager: u32,
    pub challenger_log: Vec<DuelStrike>,
    pub defender_log: Vec<DuelStrike>,
    pub winner: Option<CommanderKey>,
    /// Advisory only; turns are never forfeited by the engine
    pub round_timeout_secs: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Result of one turn
#[derive(Debug, Clone, PartialEq)]
pub struct DuelTurn {
    pub hit: DuelHit,
    pub target_hp: u32,
    pub outcome: Option<DuelOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelOutcome {
    pub winner: CommanderKey,
    pub loser: CommanderKey,
}

impl Duel {
    /// Start the duel from an accepted challenge; the battlefield is rolled once
    pub fn begin(challenge: &DuelChallenge, config: &GameConfig, rng: &mut impl Rng, now: DateTime<Utc>) -> Self {
        Self {
            id: challenge.id,
            challenger: challenge.challenger,
            defender: challenge.defender,
            challenger_hp: config.duel_starting_hp,
            defender_hp: config.duel_starting_hp,
            turn: 1,
            current: challenge.challenger,
            terrain: Terrain::random(rng),
            weather: Weather::random(rng),
            status: DuelStatus::Active,
            wager: challenge.wager,
            challenger_log: Vec::new(),
            defender_log: Vec::new(),
            winner: None,
            round_timeout_secs: config.duel_round_timeout_secs,
            started_at: now,
            ended_at: None,
        }
    }

    pub fn involves(&self, key: CommanderKey) -> bool {
        self.challenger == key || self.defender == key
    }

    pub fn opponent_of(&self, key: CommanderKey) -> Option<CommanderKey> {
        if key == self.challenger {
            Some(self.defender)
        } else if key == self.defender {
            Some(self.challenger)
        } else {
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == DuelStatus::Active
    }

    /// Resolve the current player's action against the opponent
    ///
    /// `attacker` and `defender` are built from live commander and army
    /// state at call time.
    pub fn act(
        &mut self,
        actor: CommanderKey,
        action: DuelAction,
        attacker: &Fighter,
        defender: &Fighter,
        rng: &mut impl Rng,
        now: DateTime<Utc>,
    ) -> Result<DuelTurn> {
        if self.status == DuelStatus::Ended {
            return Err(Rejection::SessionEnded.into());
        }
        if !self.involves(actor) {
            return Err(Rejection::NotParticipant.into());
        }
        if actor != self.current {
            return Err(Rejection::NotYourTurn.into());
        }

        let hit = calculate_damage(attacker, defender, action, self.terrain, self.weather, rng);
        let strike = DuelStrike {
            turn: self.turn,
            hit,
            at: now,
        };

        let (target, target_key) = if actor == self.challenger {
            self.challenger_log.push(strike);
            (&mut self.defender_hp, self.defender)
        } else {
            self.defender_log.push(strike);
            (&mut self.challenger_hp, self.challenger)
        };
        *target = target.saturating_sub(hit.damage);
        let target_hp = *target;

        let outcome = if target_hp == 0 {
            self.status = DuelStatus::Ended;
            self.winner = Some(actor);
            self.ended_at = Some(now);
            tracing::info!(duel = %self.id, winner = %actor, turns = self.turn, "Duel ended");
            Some(DuelOutcome {
                winner: actor,
                loser: target_key,
            })
        } else {
            self.current = target_key;
            self.turn += 1;
            None
        };

        Ok(DuelTurn {
            hit,
            target_hp,
            outcome,
        })
    }
}

/// Rewards and records produced by a finished duel
#[derive(Debug, Clone, PartialEq)]
pub struct DuelSettlement {
    pub winner_xp: ExperienceGain,
    pub loser_xp: ExperienceGain,
    pub prestige_transferred: u32,
    pub achievements: Vec<AchievementId>,
}

/// Apply win/loss counters, experience and the wager
pub fn settle_duel(
    winner: (&mut Commander, &Army),
    loser: (&mut Commander, &Army),
    wager: u32,
    config: &GameConfig,
    now: DateTime<Utc>,
) -> DuelSettlement {
    let (winner, winner_army) = winner;
    let (loser, loser_army) = loser;

    winner.record_win();
    loser.record_loss();
    winner.last_duel = Some(now);
    loser.last_duel = Some(now);

    let prestige_transferred = wager.min(loser.prestige);
    loser.prestige -= prestige_transferred;
    winner.prestige = winner.prestige.saturating_add(prestige_transferred);

    let winner_xp = add_experience(winner, winner_army, config.duel_winner_xp, XpSource::DuelVictory, now);
    let loser_xp = add_experience(loser, loser_army, config.duel_loser_xp, XpSource::DuelDefeat, now);

    let mut achievements = winner_xp.achievements.clone();
    achievements.extend(check_achievements(winner, winner_army));

    DuelSettlement {
        winner_xp,
        loser_xp,
        prestige_transferred,
        achievements,
    }
}
