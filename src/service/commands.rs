//! Text commands and player-facing responses
//!
//! The chat front end hands over one command line per action; this module
//! parses it, runs the matching service operation and renders the result
//! as a `(success, message)` pair. Errors never escape as anything else.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use crate::core::error::{GameError, Result};
use crate::core::types::CommanderKey;
use crate::progression::{AchievementId, Registration};
use crate::service::GameService;
use crate::session::{WarOutcome, WarStatus};
use crate::tables::{ArmyType, Formation, Tactic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub success: bool,
    pub message: String,
}

impl Response {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<GameError> for Response {
    fn from(e: GameError) -> Self {
        Response::fail(e.user_message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register {
        name: String,
        army_name: String,
        title: Option<String>,
        faction: Option<String>,
    },
    Status,
    Recruit,
    Train(i64),
    Allocate { stat: String, amount: i64 },
    ArmyType(String),
    Formation(String),
    Fortify,
    Achievements,
    Duel { opponent: u64, wager: u32 },
    AcceptDuel,
    DeclineDuel,
    Strike(String),
    War { opponent: u64, name: String },
    AcceptWar,
    WithdrawWar,
    Tactic(String),
    Help,
}

pub const USAGE: &str = "\
register <name> <army> [title] [faction]
status | recruit | train <n> | allocate <stat> <n>
armytype <type> | formation <name> | fortify | achievements
duel <player> [wager] | accept | decline | strike <action>
war <player> [name] | acceptwar | withdraw | tactic <tactic>";

fn parse_int<T: std::str::FromStr>(word: Option<&str>, what: &str) -> std::result::Result<T, String> {
    let word = word.ok_or_else(|| format!("Missing {what}"))?;
    word.parse().map_err(|_| format!("'{word}' is not a valid {what}"))
}

impl Command {
    /// Parse `<command> [args...]`; the error is a usage hint
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or_else(|| USAGE.to_string())?.to_ascii_lowercase();
        let rest = |words: std::str::SplitWhitespace<'_>| words.collect::<Vec<_>>().join(" ");

        let command = match head.as_str() {
            "register" => {
                let name = words.next().ok_or("Missing character name")?.to_string();
                let army_name = words.next().ok_or("Missing army name")?.to_string();
                Command::Register {
                    name,
                    army_name,
                    title: words.next().map(str::to_string),
                    faction: words.next().map(str::to_string),
                }
            }
            "status" => Command::Status,
            "recruit" => Command::Recruit,
            "train" => Command::Train(parse_int(words.next(), "amount")?),
            "allocate" => {
                let stat = words.next().ok_or("Missing stat")?.to_string();
                let amount = parse_int(words.next(), "amount")?;
                Command::Allocate { stat, amount }
            }
            "armytype" => Command::ArmyType(rest(words)),
            "formation" => Command::Formation(rest(words)),
            "fortify" => Command::Fortify,
            "achievements" => Command::Achievements,
            "duel" => {
                let opponent = parse_int(words.next(), "player id")?;
                let wager = match words.next() {
                    Some(w) => parse_int(Some(w), "wager")?,
                    None => 0,
                };
                Command::Duel { opponent, wager }
            }
            "accept" => Command::AcceptDuel,
            "decline" => Command::DeclineDuel,
            "strike" => Command::Strike(rest(words)),
            "war" => {
                let opponent = parse_int(words.next(), "player id")?;
                Command::War {
                    opponent,
                    name: rest(words),
                }
            }
            "acceptwar" => Command::AcceptWar,
            "withdraw" => Command::WithdrawWar,
            "tactic" => Command::Tactic(rest(words)),
            "help" => Command::Help,
            other => return Err(format!("Unknown command '{other}'\n{USAGE}")),
        };
        Ok(command)
    }
}

fn achievement_lines(out: &mut String, achievements: &[AchievementId]) {
    for id in achievements {
        let a = id.info();
        let _ = write!(out, "\nAchievement unlocked: {} (+{} prestige)", a.name, a.reward);
    }
}

/// Run one command for `key` and render the outcome
pub fn execute(service: &GameService, key: CommanderKey, command: Command, now: DateTime<Utc>) -> Response {
    match render(service, key, command, now) {
        Ok(message) => Response::ok(message),
        Err(e) => e.into(),
    }
}

fn render(service: &GameService, key: CommanderKey, command: Command, now: DateTime<Utc>) -> Result<String> {
    let mut out = String::new();

    match command {
        Command::Register {
            name,
            army_name,
            title,
            faction,
        } => {
            let c = service.register(
                key,
                Registration {
                    character_name: name,
                    army_name,
                    title,
                    faction,
                },
                now,
            )?;
            let _ = write!(
                out,
                "{} of the {} rises! Army '{}' stands ready.",
                c.display_name(),
                c.faction,
                c.army_name
            );
        }
        Command::Status => {
            let s = service.status(key, now)?;
            let (c, a) = (&s.commander, &s.army);
            let _ = writeln!(out, "{} | Level {} ({}/{} XP)", c.display_name(), c.level, c.experience, c.experience_needed);
            let _ = writeln!(
                out,
                "STR {} AGI {} INT {} VIT {} CHA {} LCK {} | {} unspent",
                c.stats.strength, c.stats.agility, c.stats.intelligence, c.stats.vitality, c.stats.charisma, c.stats.luck,
                c.stat_points
            );
            let _ = writeln!(
                out,
                "Record {}W/{}L/{}D | Prestige {}",
                c.wins, c.losses, c.draws, c.prestige
            );
            let _ = writeln!(
                out,
                "Soldiers {}/{} | Recruits {}/{} | Knights {} Archers {} Cavalry {} Siege {}",
                a.current_soldiers, a.max_soldiers, a.current_recruits, a.max_recruits, a.knights, a.archers, a.cavalry,
                a.siege
            );
            let _ = writeln!(
                out,
                "Morale {} | Supplies {} | Fortifications {} | {} / {} | Power {}",
                a.morale,
                a.supplies,
                a.fortifications,
                a.army_type.name(),
                a.formation.name(),
                s.power.total
            );
            let _ = write!(
                out,
                "Recruits left this week: {} | Actions left today: {}",
                s.weekly_remaining, s.daily_remaining
            );
            for effect in &s.effects {
                let _ = write!(out, "\n* {effect}");
            }
        }
        Command::Recruit => {
            let o = service.recruit(key, now)?;
            let r = o.value;
            let _ = write!(
                out,
                "{} recruits answer the call for {} supplies. {} more may join this week.",
                r.recruited, r.supply_cost, r.weekly_remaining
            );
            achievement_lines(&mut out, &o.achievements);
        }
        Command::Train(amount) => {
            let o = service.train(key, amount, now)?;
            let r = &o.value;
            let _ = write!(
                out,
                "Trained {} of {} recruits ({:.1}% success), {} deserted.\n+{} infantry, +{} knights, +{} archers, +{} cavalry, +{} siege",
                r.trained,
                r.requested,
                r.success_rate,
                r.deserted,
                r.gained.infantry,
                r.gained.knights,
                r.gained.archers,
                r.gained.cavalry,
                r.gained.siege
            );
            achievement_lines(&mut out, &o.achievements);
        }
        Command::Allocate { stat, amount } => {
            let (stat, value) = service.allocate_stat(key, &stat, amount)?;
            let _ = write!(out, "{} is now {}", stat.name(), value);
        }
        Command::ArmyType(name) => {
            let t = service.change_army_type(key, &name, now)?;
            let _ = write!(out, "Army reorganised as {}", t.name());
        }
        Command::Formation(name) => {
            let f: Formation = service.change_formation(key, &name, now)?;
            let _ = write!(out, "Formation set to {}: {}", f.name(), f.description());
        }
        Command::Fortify => {
            let o = service.build_fortification(key, now)?;
            let _ = write!(
                out,
                "Fortifications raised by {} to {} (cost {} supplies)",
                o.value.added, o.value.level_after, o.value.supply_cost
            );
            achievement_lines(&mut out, &o.achievements);
        }
        Command::Achievements => {
            let awarded = service.check_achievements(key, now)?;
            if awarded.is_empty() {
                out.push_str("No new achievements");
            }
            achievement_lines(&mut out, &awarded);
        }
        Command::Duel { opponent, wager } => {
            let c = service.challenge_duel(key, key.with_player(opponent), wager, now)?;
            let _ = write!(out, "Challenge issued to {} (wager {} prestige)", c.defender, c.wager);
        }
        Command::AcceptDuel => {
            let d = service.accept_duel(key, now)?;
            let _ = write!(
                out,
                "The duel begins on {} under {}. {} strikes first.",
                d.terrain.name(),
                d.weather.name(),
                d.current
            );
        }
        Command::DeclineDuel => {
            let c = service.decline_duel(key, now)?;
            let _ = write!(out, "Thou hast declined the challenge from {}", c.challenger);
        }
        Command::Strike(action) => {
            let r = service.duel_action(key, &action, now)?;
            let hit = r.turn.hit;
            let _ = write!(
                out,
                "{}{} deals {} damage. Opponent HP: {}",
                hit.action.name(),
                if hit.critical { " (CRITICAL)" } else { "" },
                hit.damage,
                r.turn.target_hp
            );
            if let Some(s) = r.settlement {
                let _ = write!(
                    out,
                    "\nVictory! +{} XP, {} prestige won",
                    s.winner_xp.record.amount, s.prestige_transferred
                );
                if s.winner_xp.leveled_up() {
                    let _ = write!(out, "\nLevel up! (+{})", s.winner_xp.levels_gained);
                }
                achievement_lines(&mut out, &s.achievements);
            }
        }
        Command::War { opponent, name } => {
            let w = service.declare_war(key, key.with_player(opponent), name, now)?;
            let _ = write!(out, "'{}' declared against {}. Awaiting their answer.", w.name, w.side_b.leader);
        }
        Command::AcceptWar => {
            let w = service.accept_war(key, now)?;
            let _ = write!(
                out,
                "War '{}' begins on {} under {}. Team A moves first.",
                w.name,
                w.terrain.name(),
                w.weather.name()
            );
        }
        Command::WithdrawWar => {
            let w = service.withdraw_war(key, now)?;
            let _ = write!(out, "'{}' is called off before a blow is struck", w.name);
        }
        Command::Tactic(name) => {
            let r = service.war_turn(key, &name, now)?;
            let a = &r.turn.action;
            let _ = write!(
                out,
                "Turn {}: {} deals {} damage{}. Enemy losses {}, own losses {}. Score A {} / B {}",
                a.turn,
                a.tactic.name(),
                a.damage,
                if a.surprise { " (SURPRISE)" } else { "" },
                r.turn.casualties[0].losses,
                r.turn.casualties[1].losses,
                r.war.side_a.score,
                r.war.side_b.score
            );
            let _ = write!(
                out,
                "\nStrength A {} (morale {}) / B {} (morale {})",
                r.war.side_a.strength, r.war.side_a.morale, r.war.side_b.strength, r.war.side_b.morale
            );
            if r.war.status == WarStatus::Ended {
                match r.war.outcome {
                    Some(WarOutcome::Victory(team)) => {
                        let _ = write!(out, "\nThe war is over. Team {team} is victorious!");
                    }
                    _ => out.push_str("\nThe war is over. Neither side prevails."),
                }
            }
        }
        Command::Help => {
            out.push_str(USAGE);
            let _ = write!(
                out,
                "\nArmy types: {}\nFormations: {}\nTactics: {}",
                ArmyType::names(),
                Formation::ALL.iter().map(|f| f.name()).collect::<Vec<_>>().join(", "),
                Tactic::ALL.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
            );
        }
    }

    Ok(out)
}
