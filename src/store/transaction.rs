//! Read-modify-write transactions over the committed tables
//!
//! Reads see staged writes first, then committed rows. Nothing reaches
//! the committed tables until the owning `Store` commits the overlay.

use ahash::AHashMap;

use crate::army::{Army, FortificationRecord, TrainingRecord};
use crate::core::error::{GameError, Rejection, Result};
use crate::core::types::{CommanderKey, DuelId, WarId};
use crate::progression::{Commander, XpRecord};
use crate::session::{CasualtyRecord, Duel, DuelChallenge, War, WarActionRecord};
use crate::store::tables::{History, Tables};

/// Staged changes, applied in one step on commit
#[derive(Debug, Default)]
pub struct Changes {
    pub commanders: AHashMap<CommanderKey, Commander>,
    pub armies: AHashMap<CommanderKey, Army>,
    /// `None` deletes the challenge
    pub challenges: AHashMap<DuelId, Option<DuelChallenge>>,
    pub duels: AHashMap<DuelId, Duel>,
    pub wars: AHashMap<WarId, War>,
    pub history: History,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.commanders.is_empty()
            && self.armies.is_empty()
            && self.challenges.is_empty()
            && self.duels.is_empty()
            && self.wars.is_empty()
            && self.history.is_empty()
    }
}

pub struct Transaction<'a> {
    base: &'a Tables,
    changes: Changes,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(base: &'a Tables) -> Self {
        Self {
            base,
            changes: Changes::default(),
        }
    }

    pub(crate) fn into_changes(self) -> Changes {
        self.changes
    }

    // -- commanders and armies --

    pub fn commander(&self, key: CommanderKey) -> Option<Commander> {
        self.changes
            .commanders
            .get(&key)
            .or_else(|| self.base.commanders.get(&key))
            .cloned()
    }

    /// The commander, or a NotRegistered rejection
    pub fn require_commander(&self, key: CommanderKey) -> Result<Commander> {
        self.commander(key).ok_or_else(|| Rejection::NotRegistered.into())
    }

    pub fn put_commander(&mut self, commander: Commander) {
        self.changes.commanders.insert(commander.key, commander);
    }

    pub fn army(&self, key: CommanderKey) -> Option<Army> {
        self.changes.armies.get(&key).or_else(|| self.base.armies.get(&key)).cloned()
    }

    /// The army of a commander already known to exist
    ///
    /// A missing row here is an invariant violation, not a user error.
    pub fn require_army(&self, key: CommanderKey) -> Result<Army> {
        self.army(key)
            .ok_or_else(|| GameError::Invariant(format!("army row missing for registered commander {key}")))
    }

    pub fn put_army(&mut self, army: Army) {
        self.changes.armies.insert(army.key, army);
    }

    /// Commander and army together, rejecting unregistered keys
    pub fn require_profile(&self, key: CommanderKey) -> Result<(Commander, Army)> {
        let commander = self.require_commander(key)?;
        let army = self.require_army(key)?;
        Ok((commander, army))
    }

    // -- duels --

    pub fn challenge(&self, id: DuelId) -> Option<DuelChallenge> {
        match self.changes.challenges.get(&id) {
            Some(staged) => staged.clone(),
            None => self.base.challenges.get(&id).cloned(),
        }
    }

    pub fn put_challenge(&mut self, challenge: DuelChallenge) {
        self.changes.challenges.insert(challenge.id, Some(challenge));
    }

    pub fn remove_challenge(&mut self, id: DuelId) {
        self.changes.challenges.insert(id, None);
    }

    /// Open challenges addressed to `defender`, oldest first
    pub fn challenges_for(&self, defender: CommanderKey) -> Vec<DuelChallenge> {
        let mut found: Vec<DuelChallenge> = self
            .base
            .challenges
            .values()
            .filter(|c| !self.changes.challenges.contains_key(&c.id))
            .chain(self.changes.challenges.values().flatten())
            .filter(|c| c.defender == defender)
            .cloned()
            .collect();
        found.sort_by_key(|c| c.issued_at);
        found
    }

    pub fn duel(&self, id: DuelId) -> Option<Duel> {
        self.changes.duels.get(&id).or_else(|| self.base.duels.get(&id)).cloned()
    }

    pub fn put_duel(&mut self, duel: Duel) {
        self.changes.duels.insert(duel.id, duel);
    }

    /// The active duel `key` is fighting in, if any
    pub fn active_duel_for(&self, key: CommanderKey) -> Option<Duel> {
        self.base
            .duels
            .values()
            .filter(|d| !self.changes.duels.contains_key(&d.id))
            .chain(self.changes.duels.values())
            .find(|d| d.is_active() && d.involves(key))
            .cloned()
    }

    // -- wars --

    pub fn war(&self, id: WarId) -> Option<War> {
        self.changes.wars.get(&id).or_else(|| self.base.wars.get(&id)).cloned()
    }

    pub fn put_war(&mut self, war: War) {
        self.changes.wars.insert(war.id, war);
    }

    /// Wars `key` leads a side of that satisfy `filter`
    pub fn wars_for(&self, key: CommanderKey, filter: impl Fn(&War) -> bool) -> Vec<War> {
        let mut found: Vec<War> = self
            .base
            .wars
            .values()
            .filter(|w| !self.changes.wars.contains_key(&w.id))
            .chain(self.changes.wars.values())
            .filter(|w| w.team_of(key).is_some() && filter(w))
            .cloned()
            .collect();
        found.sort_by_key(|w| w.declared_at);
        found
    }

    // -- history --

    pub fn record_training(&mut self, record: TrainingRecord) {
        self.changes.history.training.push(record);
    }

    pub fn record_casualty(&mut self, record: CasualtyRecord) {
        self.changes.history.casualties.push(record);
    }

    pub fn record_war_action(&mut self, record: WarActionRecord) {
        self.changes.history.war_actions.push(record);
    }

    pub fn record_xp(&mut self, record: XpRecord) {
        self.changes.history.xp.push(record);
    }

    pub fn record_fortification(&mut self, record: FortificationRecord) {
        self.changes.history.fortifications.push(record);
    }
}
