//! Integration tests for the file-backed store
//!
//! A service writes through a snapshot file; reopening the file must bring
//! back exactly what was committed and nothing that was rejected.

use chrono::{TimeZone, Utc};

use warband::core::config::GameConfig;
use warband::core::types::CommanderKey;
use warband::progression::Registration;
use warband::service::GameService;
use warband::store::Store;

fn registration() -> Registration {
    Registration {
        character_name: "Aldric".into(),
        army_name: "Iron Vanguard".into(),
        title: Some("Marshal".into()),
        faction: None,
    }
}

#[test]
fn test_commits_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warband.json");
    let key = CommanderKey::new(5, 9);
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

    {
        let service = GameService::new(GameConfig::default(), Store::open(&path).unwrap());
        service.register(key, registration(), now).unwrap();
        service.allocate_stat(key, "vit", 2).unwrap();
        // Rejected: must leave no trace in the file
        assert!(service.allocate_stat(key, "vit", 10).is_err());
    }

    let store = Store::open(&path).unwrap();
    let (commander, has_army) = store
        .read(|t| (t.commanders.get(&key).cloned(), t.armies.contains_key(&key)))
        .unwrap();
    let commander = commander.expect("commander should be persisted");
    assert_eq!(commander.title, "Marshal");
    assert_eq!(commander.stats.vitality, 7);
    assert_eq!(commander.stat_points, 3);
    assert!(has_army);
}

#[test]
fn test_catalog_seeding_is_idempotent_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warband.json");

    let first = Store::open(&path).unwrap().seed_catalogs().unwrap();
    assert!(first.total() > 0);
    assert_eq!(first.achievements, 10);

    let second = Store::open(&path).unwrap().seed_catalogs().unwrap();
    assert_eq!(second.total(), 0);
}

#[test]
fn test_corrupt_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warband.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Store::open(&path).is_err());
}

#[test]
fn test_history_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warband.json");
    let key = CommanderKey::new(5, 9);
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

    {
        let service = GameService::new(
            GameConfig {
                seed: Some(3),
                ..GameConfig::default()
            },
            Store::open(&path).unwrap(),
        );
        service.register(key, registration(), now).unwrap();
        service.build_fortification(key, now).unwrap();
    }

    let store = Store::open(&path).unwrap();
    let fortifications = store.read(|t| t.history.fortifications.len()).unwrap();
    assert_eq!(fortifications, 1);
}
