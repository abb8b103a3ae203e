//! Integration tests for duels and wars
//!
//! These drive whole sessions through `GameService`: challenge, accept,
//! alternate turns until the session ends, then check the settlement.

use chrono::{DateTime, Duration, TimeZone, Utc};

use warband::core::config::GameConfig;
use warband::core::error::{GameError, Rejection};
use warband::core::types::{CommanderKey, Team};
use warband::progression::{AchievementId, Registration};
use warband::service::GameService;
use warband::session::{WarOutcome, WarStatus};
use warband::store::Store;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

fn rejection<T: std::fmt::Debug>(result: Result<T, GameError>) -> Rejection {
    match result {
        Err(GameError::Rejected(r)) => r,
        other => panic!("expected rejection, got {:?}", other),
    }
}

/// Service with two registered commanders in scope 7
fn arena() -> (GameService, CommanderKey, CommanderKey) {
    let config = GameConfig {
        seed: Some(2024),
        ..GameConfig::default()
    };
    let service = GameService::new(config, Store::in_memory());
    let a = CommanderKey::new(1, 7);
    let b = CommanderKey::new(2, 7);
    for (key, name) in [(a, "Aldric"), (b, "Brenna")] {
        service
            .register(
                key,
                Registration {
                    character_name: name.into(),
                    army_name: format!("{name}'s Host"),
                    title: None,
                    faction: None,
                },
                t0(),
            )
            .unwrap();
    }
    (service, a, b)
}

/// Register one more commander in the arena's scope
fn enlist(service: &GameService, player: u64, name: &str) -> CommanderKey {
    let key = CommanderKey::new(player, 7);
    service
        .register(
            key,
            Registration {
                character_name: name.into(),
                army_name: format!("{name}'s Host"),
                title: None,
                faction: None,
            },
            t0(),
        )
        .unwrap();
    key
}

fn pending_challenges(service: &GameService) -> usize {
    service.store().read(|t| t.challenges.len()).unwrap()
}

fn set_prestige(service: &GameService, key: CommanderKey, prestige: u32) {
    service
        .store()
        .transaction(|tx| {
            let mut c = tx.require_commander(key)?;
            c.prestige = prestige;
            tx.put_commander(c);
            Ok(())
        })
        .unwrap();
}

fn arm(service: &GameService, key: CommanderKey, soldiers: u32) {
    service
        .store()
        .transaction(|tx| {
            let mut army = tx.require_army(key)?;
            army.current_soldiers = soldiers;
            army.archers = soldiers / 10;
            tx.put_army(army);
            Ok(())
        })
        .unwrap();
}

// ============================================================================
// Duels
// ============================================================================

#[test]
fn test_full_duel_with_wager() {
    let (service, a, b) = arena();
    set_prestige(&service, a, 20);
    set_prestige(&service, b, 20);

    service.challenge_duel(a, b, 10, t0()).unwrap();
    let duel = service.accept_duel(b, t0()).unwrap();
    assert_eq!(duel.current, a);
    assert_eq!((duel.challenger_hp, duel.defender_hp), (100, 100));

    let mut current = duel.current;
    let mut settlement = None;
    for _ in 0..100 {
        let report = service.duel_action(current, "power strike", t0()).unwrap();
        assert!(report.turn.hit.damage >= 5);
        if report.settlement.is_some() {
            settlement = report.settlement;
            break;
        }
        current = report.duel.current;
    }
    let settlement = settlement.expect("duel should finish within 100 strikes");
    assert_eq!(settlement.prestige_transferred, 10);
    assert!(settlement.achievements.contains(&AchievementId::FirstBlood));

    let winner = service.status(current, t0()).unwrap().commander;
    let loser_key = if current == a { b } else { a };
    let loser = service.status(loser_key, t0()).unwrap().commander;

    assert_eq!((winner.wins, winner.losses), (1, 0));
    assert_eq!((loser.wins, loser.losses), (0, 1));
    assert_eq!(winner.experience, 50);
    assert_eq!(loser.experience, 15);
    // 20 + 10 wager + 100 for First Blood
    assert_eq!(winner.prestige, 130);
    assert_eq!(loser.prestige, 10);

    // The finished duel no longer accepts strikes
    assert_eq!(
        rejection(service.duel_action(current, "quick strike", t0())),
        Rejection::SessionNotFound
    );
}

#[test]
fn test_duel_turn_order_enforced() {
    let (service, a, b) = arena();
    service.challenge_duel(a, b, 0, t0()).unwrap();
    service.accept_duel(b, t0()).unwrap();

    assert_eq!(
        rejection(service.duel_action(b, "quick strike", t0())),
        Rejection::NotYourTurn
    );
    assert!(matches!(
        rejection(service.duel_action(a, "moonwalk", t0())),
        Rejection::UnknownAction(_)
    ));
    service.duel_action(a, "quick strike", t0()).unwrap();
    assert_eq!(
        rejection(service.duel_action(a, "quick strike", t0())),
        Rejection::NotYourTurn
    );
}

#[test]
fn test_challenge_rejections() {
    let (service, a, b) = arena();

    assert_eq!(rejection(service.challenge_duel(a, a, 0, t0())), Rejection::SelfChallenge);
    assert_eq!(
        rejection(service.challenge_duel(a, b, 50, t0())),
        Rejection::WagerNotCovered { wager: 50, have: 0 }
    );
    assert_eq!(
        rejection(service.challenge_duel(a, CommanderKey::new(3, 7), 0, t0())),
        Rejection::NotRegistered
    );
    assert_eq!(rejection(service.accept_duel(a, t0())), Rejection::SessionNotFound);
}

#[test]
fn test_defender_must_cover_wager_at_accept() {
    let (service, a, b) = arena();
    set_prestige(&service, a, 40);

    service.challenge_duel(a, b, 25, t0()).unwrap();
    assert_eq!(
        rejection(service.accept_duel(b, t0())),
        Rejection::WagerNotCovered { wager: 25, have: 0 }
    );
}

#[test]
fn test_daily_challenge_limit() {
    let (service, a, b) = arena();
    for _ in 0..3 {
        service.challenge_duel(a, b, 0, t0()).unwrap();
    }
    assert_eq!(
        rejection(service.challenge_duel(a, b, 0, t0())),
        Rejection::DailyLimitReached
    );

    let tomorrow = t0() + chrono::Duration::hours(25);
    service.challenge_duel(a, b, 0, tomorrow).unwrap();
}

#[test]
fn test_uncovered_challenge_is_dropped_for_the_next_one() {
    let (service, a, b) = arena();
    let c = enlist(&service, 3, "Cedric");
    set_prestige(&service, a, 100);

    service.challenge_duel(a, b, 100, t0()).unwrap();
    set_prestige(&service, a, 0);
    service.challenge_duel(c, b, 0, t0() + Duration::minutes(1)).unwrap();

    let duel = service.accept_duel(b, t0() + Duration::minutes(2)).unwrap();
    assert_eq!(duel.challenger, c);
    assert_eq!(pending_challenges(&service), 0);
}

#[test]
fn test_uncovered_challenge_is_dropped_even_when_nothing_is_accepted() {
    let (service, a, b) = arena();
    set_prestige(&service, a, 100);
    service.challenge_duel(a, b, 100, t0()).unwrap();
    set_prestige(&service, a, 0);

    assert_eq!(
        rejection(service.accept_duel(b, t0())),
        Rejection::WagerNotCovered { wager: 100, have: 0 }
    );
    assert_eq!(pending_challenges(&service), 0);
    assert_eq!(rejection(service.accept_duel(b, t0())), Rejection::SessionNotFound);
}

#[test]
fn test_defender_short_on_prestige_keeps_the_challenge() {
    let (service, a, b) = arena();
    set_prestige(&service, a, 40);
    service.challenge_duel(a, b, 25, t0()).unwrap();

    assert!(service.accept_duel(b, t0()).is_err());
    assert_eq!(pending_challenges(&service), 1);

    set_prestige(&service, b, 30);
    assert_eq!(service.accept_duel(b, t0()).unwrap().challenger, a);
}

#[test]
fn test_decline_then_accept_the_next_challenge() {
    let (service, a, b) = arena();
    let c = enlist(&service, 3, "Cedric");
    service.challenge_duel(a, b, 0, t0()).unwrap();
    service.challenge_duel(c, b, 0, t0() + Duration::minutes(1)).unwrap();

    let declined = service.decline_duel(b, t0() + Duration::minutes(2)).unwrap();
    assert_eq!(declined.challenger, a);
    assert_eq!(service.accept_duel(b, t0() + Duration::minutes(3)).unwrap().challenger, c);
    assert_eq!(rejection(service.decline_duel(b, t0())), Rejection::SessionNotFound);
}

#[test]
fn test_expired_challenge_cannot_be_accepted() {
    let (service, a, b) = arena();
    service.challenge_duel(a, b, 0, t0()).unwrap();

    let next_day = t0() + Duration::hours(25);
    assert_eq!(rejection(service.accept_duel(b, next_day)), Rejection::SessionNotFound);
    assert_eq!(pending_challenges(&service), 0);
}

#[test]
fn test_engaged_commander_cannot_be_challenged() {
    let (service, a, b) = arena();
    service.challenge_duel(a, b, 0, t0()).unwrap();
    service.accept_duel(b, t0()).unwrap();
    assert_eq!(rejection(service.challenge_duel(b, a, 0, t0())), Rejection::AlreadyEngaged);
}

// ============================================================================
// Wars
// ============================================================================

#[test]
fn test_full_war() {
    let (service, a, b) = arena();
    arm(&service, a, 400);
    arm(&service, b, 300);

    let war = service.declare_war(a, b, String::new(), t0()).unwrap();
    assert_eq!(war.status, WarStatus::Preparing);
    assert_eq!(war.name, "War of Aldric's Host");

    // Nothing to play until the target accepts, and only the target may accept
    assert_eq!(rejection(service.war_turn(a, "frontal assault", t0())), Rejection::SessionNotFound);
    assert_eq!(rejection(service.accept_war(a, t0())), Rejection::SessionNotFound);

    let war = service.accept_war(b, t0()).unwrap();
    assert_eq!(war.status, WarStatus::Active);
    assert_eq!(war.current_team, Team::A);

    assert_eq!(rejection(service.war_turn(b, "frontal assault", t0())), Rejection::NotYourTurn);

    let mut actor = a;
    let mut last = None;
    for _ in 0..10 {
        let report = service.war_turn(actor, "frontal assault", t0()).unwrap();
        assert!(report.turn.action.damage >= 10);
        assert_eq!(report.war.side_a.score, -report.war.side_b.score);
        actor = if actor == a { b } else { a };
        last = Some(report);
    }
    let last = last.unwrap();
    assert_eq!(last.war.status, WarStatus::Ended);
    let (gain_a, gain_b) = last.settlement.expect("war should settle after the final round");

    match last.war.outcome {
        Some(WarOutcome::Victory(Team::A)) => {
            assert_eq!((gain_a.record.amount, gain_b.record.amount), (200, 50));
        }
        Some(WarOutcome::Victory(Team::B)) => {
            assert_eq!((gain_a.record.amount, gain_b.record.amount), (50, 200));
        }
        _ => assert_eq!((gain_a.record.amount, gain_b.record.amount), (50, 50)),
    }

    let (actions, casualties) = service
        .store()
        .read(|t| (t.history.war_actions.len(), t.history.casualties.len()))
        .unwrap();
    assert_eq!(actions, 10);
    assert_eq!(casualties, 20);

    // Armies themselves are not depleted by war casualties
    assert_eq!(service.status(a, t0()).unwrap().army.current_soldiers, 400);

    assert_eq!(rejection(service.war_turn(a, "frontal assault", t0())), Rejection::SessionNotFound);
}

#[test]
fn test_war_rejections() {
    let (service, a, b) = arena();
    assert_eq!(
        rejection(service.declare_war(a, a, "Folly".into(), t0())),
        Rejection::SelfChallenge
    );

    service.declare_war(a, b, "Border Feud".into(), t0()).unwrap();
    assert_eq!(
        rejection(service.declare_war(b, a, "Reprisal".into(), t0())),
        Rejection::AlreadyEngaged
    );

    service.accept_war(b, t0()).unwrap();
    assert!(matches!(
        rejection(service.war_turn(a, "tea party", t0())),
        Rejection::UnknownTactic(_)
    ));
}

#[test]
fn test_unanswered_declaration_lapses() {
    let (service, a, b) = arena();
    let c = enlist(&service, 3, "Cedric");
    service.declare_war(a, b, "Border Feud".into(), t0()).unwrap();
    assert_eq!(
        rejection(service.declare_war(c, b, "Opportunism".into(), t0())),
        Rejection::AlreadyEngaged
    );

    let later = t0() + Duration::hours(72);
    assert_eq!(rejection(service.accept_war(b, later)), Rejection::SessionNotFound);
    service.declare_war(c, b, "Opportunism".into(), later).unwrap();
    let d = enlist(&service, 4, "Dagna");
    service.declare_war(a, d, String::new(), later).unwrap();
}

#[test]
fn test_withdrawn_war_frees_both_leaders() {
    let (service, a, b) = arena();
    service.declare_war(a, b, "Border Feud".into(), t0()).unwrap();

    let war = service.withdraw_war(b, t0()).unwrap();
    assert_eq!(war.status, WarStatus::Ended);
    assert_eq!(war.outcome, None);
    assert_eq!(rejection(service.accept_war(b, t0())), Rejection::SessionNotFound);

    service.declare_war(b, a, "Reprisal".into(), t0()).unwrap();
    service.accept_war(a, t0()).unwrap();
    assert_eq!(rejection(service.withdraw_war(b, t0())), Rejection::WarAlreadyBegun);
}
