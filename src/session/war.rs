//! War lifecycle
//!
//! declare -> Preparing -> (accepted) Active -> Ended
//!
//! A Preparing war can also be withdrawn by either leader, or lapses once
//! the declaration is older than `war_declaration_expiry_hours`. Both end
//! it without an outcome.
//!
//! Team A is the declaring leader. Turns alternate between the teams;
//! after the configured number of rounds the higher war score wins.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::army::{calculate_army_power, Army};
use crate::combat::{calculate_casualties, calculate_war_damage};
use crate::core::config::GameConfig;
use crate::core::error::{Rejection, Result};
use crate::core::types::{CommanderKey, Team, WarId};
use crate::progression::{add_experience, check_achievements, Commander, ExperienceGain, XpSource};
use crate::tables::{Tactic, Terrain, Weather};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarStatus {
    Preparing,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryConditions {
    /// The war ends once this turn has been played
    pub rounds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarOutcome {
    Victory(Team),
    Draw,
}

/// One team's state inside a war
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarSide {
    pub leader: CommanderKey,
    /// Army power at declaration, reduced by casualties
    pub strength: u64,
    /// Army morale at declaration, shifted by each tactic played
    pub morale: u32,
    pub supplies: u32,
    pub score: i64,
    pub tactic: Tactic,
}

impl WarSide {
    fn snapshot(leader: CommanderKey, army: &Army, config: &GameConfig) -> Self {
        Self {
            leader,
            strength: calculate_army_power(army, config).total,
            morale: army.morale,
            supplies: army.supplies,
            score: 0,
            tactic: Tactic::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CasualtyKind {
    Primary,
    Counterattack,
}

/// Append-only casualty history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasualtyRecord {
    pub war: WarId,
    pub turn: u32,
    pub team: Team,
    pub commander: CommanderKey,
    pub kind: CasualtyKind,
    pub losses: u64,
    pub rate: f64,
    pub at: DateTime<Utc>,
}

/// Append-only war action history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarActionRecord {
    pub war: WarId,
    pub turn: u32,
    pub team: Team,
    pub commander: CommanderKey,
    pub tactic: Tactic,
    pub damage: u64,
    pub surprise: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarTurn {
    pub action: WarActionRecord,
    pub casualties: [CasualtyRecord; 2],
    pub outcome: Option<WarOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct War {
    pub id: WarId,
    pub name: String,
    pub side_a: WarSide,
    pub side_b: WarSide,
    pub turn: u32,
    pub current_team: Team,
    pub terrain: Terrain,
    pub weather: Weather,
    pub status: WarStatus,
    pub victory: VictoryConditions,
    pub outcome: Option<WarOutcome>,
    pub declared_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl War {
    /// Declare a war; nothing can be played until the target accepts
    #[allow(clippy::too_many_arguments)]
    pub fn declare(
        name: String,
        attacker: CommanderKey,
        attacker_army: &Army,
        target: CommanderKey,
        target_army: &Army,
        config: &GameConfig,
        rng: &mut impl Rng,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if attacker == target {
            return Err(Rejection::SelfChallenge.into());
        }
        Ok(Self {
            id: WarId::new(),
            name,
            side_a: WarSide::snapshot(attacker, attacker_army, config),
            side_b: WarSide::snapshot(target, target_army, config),
            turn: 1,
            current_team: Team::A,
            terrain: Terrain::random(rng),
            weather: Weather::random(rng),
            status: WarStatus::Preparing,
            victory: VictoryConditions {
                rounds: config.war_rounds,
            },
            outcome: None,
            declared_at: now,
            started_at: None,
            ended_at: None,
        })
    }

    pub fn side(&self, team: Team) -> &WarSide {
        match team {
            Team::A => &self.side_a,
            Team::B => &self.side_b,
        }
    }

    fn side_mut(&mut self, team: Team) -> &mut WarSide {
        match team {
            Team::A => &mut self.side_a,
            Team::B => &mut self.side_b,
        }
    }

    pub fn team_of(&self, key: CommanderKey) -> Option<Team> {
        if key == self.side_a.leader {
            Some(Team::A)
        } else if key == self.side_b.leader {
            Some(Team::B)
        } else {
            None
        }
    }

    /// Leader of the team whose turn it is
    pub fn current_leader(&self) -> CommanderKey {
        self.side(self.current_team).leader
    }

    /// Only the declared target may accept
    pub fn accept(&mut self, by: CommanderKey, now: DateTime<Utc>) -> Result<()> {
        match self.status {
            WarStatus::Preparing => {}
            WarStatus::Active => return Err(Rejection::SessionNotFound.into()),
            WarStatus::Ended => return Err(Rejection::SessionEnded.into()),
        }
        if by != self.side_b.leader {
            return Err(Rejection::NotParticipant.into());
        }

        self.status = WarStatus::Active;
        self.turn = 1;
        self.current_team = Team::A;
        self.side_a.score = 0;
        self.side_b.score = 0;
        self.started_at = Some(now);
        tracing::info!(war = %self.id, name = %self.name, terrain = self.terrain.name(), "War begun");
        Ok(())
    }

    /// A declaration nobody answered in time
    pub fn is_lapsed(&self, config: &GameConfig, now: DateTime<Utc>) -> bool {
        self.status == WarStatus::Preparing
            && now >= self.declared_at + Duration::hours(config.war_declaration_expiry_hours)
    }

    /// Whether this war still ties up its leaders
    pub fn is_open(&self, config: &GameConfig, now: DateTime<Utc>) -> bool {
        match self.status {
            WarStatus::Active => true,
            WarStatus::Preparing => !self.is_lapsed(config, now),
            WarStatus::Ended => false,
        }
    }

    /// Either leader may call off a war that has not begun
    pub fn withdraw(&mut self, by: CommanderKey, now: DateTime<Utc>) -> Result<()> {
        if self.team_of(by).is_none() {
            return Err(Rejection::NotParticipant.into());
        }
        match self.status {
            WarStatus::Preparing => {}
            WarStatus::Active => return Err(Rejection::WarAlreadyBegun.into()),
            WarStatus::Ended => return Err(Rejection::SessionEnded.into()),
        }
        self.call_off(now);
        tracing::info!(war = %self.id, by = %by, "War withdrawn");
        Ok(())
    }

    /// End a Preparing war without an outcome
    pub fn call_off(&mut self, now: DateTime<Utc>) {
        self.status = WarStatus::Ended;
        self.outcome = None;
        self.ended_at = Some(now);
    }

    /// Play one turn for the current team
    ///
    /// Powers are the live army powers of the acting side and the other side.
    pub fn apply_turn(
        &mut self,
        actor: CommanderKey,
        tactic: Tactic,
        attacker_power: u64,
        defender_power: u64,
        rng: &mut impl Rng,
        now: DateTime<Utc>,
    ) -> Result<WarTurn> {
        match self.status {
            WarStatus::Preparing => return Err(Rejection::WarNotStarted.into()),
            WarStatus::Ended => return Err(Rejection::SessionEnded.into()),
            WarStatus::Active => {}
        }
        let team = self.team_of(actor).ok_or(Rejection::NotParticipant)?;
        if team != self.current_team {
            return Err(Rejection::NotYourTurn.into());
        }

        let defender_tactic = self.side(team.other()).tactic;
        let hit = calculate_war_damage(attacker_power, self.terrain, self.weather, tactic, defender_tactic, rng);
        let losses = calculate_casualties(attacker_power, defender_power, hit.damage, self.terrain, self.weather);
        let damage = hit.damage.min(i64::MAX as u64) as i64;

        {
            let attacking = self.side_mut(team);
            attacking.score = attacking.score.saturating_add(damage);
            attacking.strength = attacking.strength.saturating_sub(losses.attacker);
            attacking.morale = ((attacking.morale as f64 * tactic.modifiers().morale).round() as u32).min(100);
            attacking.tactic = tactic;
        }
        {
            let defending = self.side_mut(team.other());
            defending.score = defending.score.saturating_sub(damage);
            defending.strength = defending.strength.saturating_sub(losses.defender);
        }

        let turn = self.turn;
        let action = WarActionRecord {
            war: self.id,
            turn,
            team,
            commander: actor,
            tactic,
            damage: hit.damage,
            surprise: hit.surprise,
            at: now,
        };
        let casualties = [
            CasualtyRecord {
                war: self.id,
                turn,
                team: team.other(),
                commander: self.side(team.other()).leader,
                kind: CasualtyKind::Primary,
                losses: losses.defender,
                rate: losses.rate,
                at: now,
            },
            CasualtyRecord {
                war: self.id,
                turn,
                team,
                commander: actor,
                kind: CasualtyKind::Counterattack,
                losses: losses.attacker,
                rate: losses.rate * crate::combat::casualties::COUNTERATTACK_FACTOR,
                at: now,
            },
        ];

        self.current_team = team.other();
        let outcome = if turn >= self.victory.rounds {
            Some(self.finish(now))
        } else {
            self.turn += 1;
            None
        };

        Ok(WarTurn {
            action,
            casualties,
            outcome,
        })
    }

    fn finish(&mut self, now: DateTime<Utc>) -> WarOutcome {
        let outcome = match self.side_a.score.cmp(&self.side_b.score) {
            std::cmp::Ordering::Greater => WarOutcome::Victory(Team::A),
            std::cmp::Ordering::Less => WarOutcome::Victory(Team::B),
            std::cmp::Ordering::Equal => WarOutcome::Draw,
        };
        self.status = WarStatus::Ended;
        self.outcome = Some(outcome);
        self.ended_at = Some(now);
        tracing::info!(
            war = %self.id,
            score_a = self.side_a.score,
            score_b = self.side_b.score,
            ?outcome,
            "War ended"
        );
        outcome
    }
}

/// Award war experience and victory counters
///
/// Returns the XP gains for team A and team B in that order.
pub fn settle_war(
    outcome: WarOutcome,
    side_a: (&mut Commander, &Army),
    side_b: (&mut Commander, &Army),
    config: &GameConfig,
    now: DateTime<Utc>,
) -> (ExperienceGain, ExperienceGain) {
    let (a, army_a) = side_a;
    let (b, army_b) = side_b;

    let award = |team: Team| match outcome {
        WarOutcome::Victory(winner) if winner == team => (config.war_winner_xp, XpSource::WarVictory),
        _ => (config.war_participation_xp, XpSource::WarParticipation),
    };

    match outcome {
        WarOutcome::Victory(Team::A) => a.war_wins += 1,
        WarOutcome::Victory(Team::B) => b.war_wins += 1,
        WarOutcome::Draw => {
            a.record_draw();
            b.record_draw();
        }
    }

    let (xp_a, src_a) = award(Team::A);
    let (xp_b, src_b) = award(Team::B);
    let mut gain_a = add_experience(a, army_a, xp_a, src_a, now);
    let mut gain_b = add_experience(b, army_b, xp_b, src_b, now);
    gain_a.achievements.extend(check_achievements(a, army_a));
    gain_b.achievements.extend(check_achievements(b, army_b));

    (gain_a, gain_b)
}
