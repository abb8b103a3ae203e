//! Transactional persistence
//!
//! A single-writer store: every operation runs inside `Store::transaction`,
//! which stages its writes and commits them together or not at all. When
//! backed by a file, each commit rewrites a JSON snapshot; a failed write
//! rolls the commit back.

pub mod catalog;
pub mod tables;
pub mod transaction;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub use catalog::{Catalog, SeedReport};
pub use tables::{History, Snapshot, Tables};
pub use transaction::{Changes, Transaction};

use crate::army::Army;
use crate::core::error::{GameError, Result};
use crate::core::types::{CommanderKey, DuelId, WarId};
use crate::progression::Commander;
use crate::session::{Duel, DuelChallenge, War};

/// Prior values of every row a commit touched
#[derive(Default)]
struct UndoLog {
    commanders: Vec<(CommanderKey, Option<Commander>)>,
    armies: Vec<(CommanderKey, Option<Army>)>,
    challenges: Vec<(DuelId, Option<DuelChallenge>)>,
    duels: Vec<(DuelId, Option<Duel>)>,
    wars: Vec<(WarId, Option<War>)>,
    history: tables::HistoryMark,
}

fn restore<K: std::hash::Hash + Eq, V>(table: &mut ahash::AHashMap<K, V>, entries: Vec<(K, Option<V>)>) {
    for (key, prior) in entries {
        match prior {
            Some(value) => {
                table.insert(key, value);
            }
            None => {
                table.remove(&key);
            }
        }
    }
}

impl UndoLog {
    fn apply(changes: Changes, tables: &mut Tables) -> Self {
        let mut undo = UndoLog {
            history: tables.history.mark(),
            ..UndoLog::default()
        };
        for (key, row) in changes.commanders {
            undo.commanders.push((key, tables.commanders.insert(key, row)));
        }
        for (key, row) in changes.armies {
            undo.armies.push((key, tables.armies.insert(key, row)));
        }
        for (id, row) in changes.challenges {
            let prior = match row {
                Some(row) => tables.challenges.insert(id, row),
                None => tables.challenges.remove(&id),
            };
            undo.challenges.push((id, prior));
        }
        for (id, row) in changes.duels {
            undo.duels.push((id, tables.duels.insert(id, row)));
        }
        for (id, row) in changes.wars {
            undo.wars.push((id, tables.wars.insert(id, row)));
        }
        tables.history.append(changes.history);
        undo
    }

    fn revert(self, tables: &mut Tables) {
        restore(&mut tables.commanders, self.commanders);
        restore(&mut tables.armies, self.armies);
        restore(&mut tables.challenges, self.challenges);
        restore(&mut tables.duels, self.duels);
        restore(&mut tables.wars, self.wars);
        tables.history.truncate_to(self.history);
    }
}

pub struct Store {
    tables: Mutex<Tables>,
    path: Option<PathBuf>,
}

impl Store {
    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            path: None,
        }
    }

    /// Open a file-backed store, loading the snapshot if one exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            tracing::info!(
                path = %path.display(),
                commanders = snapshot.commanders.len(),
                "Loaded store snapshot"
            );
            Tables::from_snapshot(snapshot)
        } else {
            tracing::info!(path = %path.display(), "Starting a new store");
            Tables::default()
        };

        let store = Self {
            tables: Mutex::new(tables),
            path: Some(path),
        };
        {
            let tables = store.lock()?;
            store.persist(&tables)?;
        }
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| GameError::Storage("store lock poisoned".to_string()))
    }

    fn persist(&self, tables: &Tables) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string(&tables.to_snapshot())?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .and_then(|_| std::fs::rename(&tmp, path))
            .map_err(|e| GameError::Storage(format!("failed to write {}: {e}", path.display())))
    }

    /// Run `f` as one atomic read-modify-write
    ///
    /// `Ok` commits every staged write; `Err` discards them all.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut tables = self.lock()?;

        let (value, changes) = {
            let mut tx = Transaction::new(&tables);
            let value = f(&mut tx)?;
            (value, tx.into_changes())
        };
        if changes.is_empty() {
            return Ok(value);
        }

        let undo = UndoLog::apply(changes, &mut tables);
        if let Err(e) = self.persist(&tables) {
            undo.revert(&mut tables);
            tracing::error!(error = %e, "Commit rolled back");
            return Err(e);
        }
        Ok(value)
    }

    /// Read committed state without staging anything
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T> {
        let tables = self.lock()?;
        Ok(f(&tables))
    }

    /// Every army key, for the sweeps
    pub fn army_keys(&self) -> Result<Vec<CommanderKey>> {
        self.read(|t| {
            let mut keys: Vec<CommanderKey> = t.armies.keys().copied().collect();
            keys.sort();
            keys
        })
    }

    /// Insert missing catalog defaults; existing rows are untouched
    pub fn seed_catalogs(&self) -> Result<SeedReport> {
        let mut tables = self.lock()?;
        let before = tables.catalog.clone();
        let report = tables.catalog.seed_defaults();
        if report.total() == 0 {
            return Ok(report);
        }
        if let Err(e) = self.persist(&tables) {
            tables.catalog = before;
            return Err(e);
        }
        tracing::info!(
            formations = report.formations,
            siege_engines = report.siege_engines,
            achievements = report.achievements,
            "Seeded catalogs"
        );
        Ok(report)
    }
}
