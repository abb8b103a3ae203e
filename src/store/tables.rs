//! Committed table storage and its on-disk snapshot form

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::army::{Army, FortificationRecord, TrainingRecord};
use crate::core::types::{CommanderKey, DuelId, WarId};
use crate::progression::{Commander, XpRecord};
use crate::session::{CasualtyRecord, Duel, DuelChallenge, War, WarActionRecord};
use crate::store::catalog::Catalog;

/// Append-only audit tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    pub training: Vec<TrainingRecord>,
    pub casualties: Vec<CasualtyRecord>,
    pub war_actions: Vec<WarActionRecord>,
    pub xp: Vec<XpRecord>,
    pub fortifications: Vec<FortificationRecord>,
}

/// Row counts of each history table, used to undo appends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryMark {
    training: usize,
    casualties: usize,
    war_actions: usize,
    xp: usize,
    fortifications: usize,
}

impl History {
    pub fn mark(&self) -> HistoryMark {
        HistoryMark {
            training: self.training.len(),
            casualties: self.casualties.len(),
            war_actions: self.war_actions.len(),
            xp: self.xp.len(),
            fortifications: self.fortifications.len(),
        }
    }

    pub fn append(&mut self, other: History) {
        self.training.extend(other.training);
        self.casualties.extend(other.casualties);
        self.war_actions.extend(other.war_actions);
        self.xp.extend(other.xp);
        self.fortifications.extend(other.fortifications);
    }

    pub fn truncate_to(&mut self, mark: HistoryMark) {
        self.training.truncate(mark.training);
        self.casualties.truncate(mark.casualties);
        self.war_actions.truncate(mark.war_actions);
        self.xp.truncate(mark.xp);
        self.fortifications.truncate(mark.fortifications);
    }

    pub fn is_empty(&self) -> bool {
        self.mark() == HistoryMark::default()
    }
}

/// Every committed row
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub commanders: AHashMap<CommanderKey, Commander>,
    pub armies: AHashMap<CommanderKey, Army>,
    pub challenges: AHashMap<DuelId, DuelChallenge>,
    pub duels: AHashMap<DuelId, Duel>,
    pub wars: AHashMap<WarId, War>,
    pub history: History,
    pub catalog: Catalog,
}

/// Serializable form of `Tables`
///
/// Rows are stored as lists because JSON object keys must be strings.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub commanders: Vec<Commander>,
    pub armies: Vec<Army>,
    pub challenges: Vec<DuelChallenge>,
    pub duels: Vec<Duel>,
    pub wars: Vec<War>,
    pub history: History,
    pub catalog: Catalog,
}

impl Tables {
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            commanders: self.commanders.values().cloned().collect(),
            armies: self.armies.values().cloned().collect(),
            challenges: self.challenges.values().cloned().collect(),
            duels: self.duels.values().cloned().collect(),
            wars: self.wars.values().cloned().collect(),
            history: self.history.clone(),
            catalog: self.catalog.clone(),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            commanders: snapshot.commanders.into_iter().map(|c| (c.key, c)).collect(),
            armies: snapshot.armies.into_iter().map(|a| (a.key, a)).collect(),
            challenges: snapshot.challenges.into_iter().map(|c| (c.id, c)).collect(),
            duels: snapshot.duels.into_iter().map(|d| (d.id, d)).collect(),
            wars: snapshot.wars.into_iter().map(|w| (w.id, w)).collect(),
            history: snapshot.history,
            catalog: snapshot.catalog,
        }
    }
}
