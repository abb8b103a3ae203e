//! Property tests for the pure rules

use chrono::Utc;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use warband::army::{calculate_army_power, desertion_rate, distribute_units, knight_chance, recruit, train, Army};
use warband::combat::casualties::{MAX_CASUALTY_RATE, MIN_CASUALTY_RATE};
use warband::combat::{calculate_damage, casualty_rate, DuelAction, Fighter};
use warband::core::config::GameConfig;
use warband::core::types::CommanderKey;
use warband::progression::{experience_needed, Stats};
use warband::session::{Duel, DuelChallenge, War};
use warband::tables::{ArmyType, Tactic, Terrain, Weather};

fn any_terrain() -> impl Strategy<Value = Terrain> {
    prop::sample::select(Terrain::ALL.to_vec())
}

fn any_weather() -> impl Strategy<Value = Weather> {
    prop::sample::select(Weather::ALL.to_vec())
}

fn any_army_type() -> impl Strategy<Value = ArmyType> {
    prop::sample::select(ArmyType::ALL.to_vec())
}

proptest! {
    #[test]
    fn distribution_conserves_units(total in 0u32..20_000, chance in 0.0f64..0.15, army_type in any_army_type()) {
        let split = distribute_units(total, chance, army_type);
        prop_assert_eq!(split.total(), total);
    }

    #[test]
    fn desertion_never_exceeds_cap(morale in 0u32..=100, supplies in 0u32..=100, size in 0u64..1_000_000) {
        let config = GameConfig::default();
        let rate = desertion_rate(morale, supplies, size, &config);
        prop_assert!(rate >= 0.0);
        prop_assert!(rate <= config.desertion_cap);
    }

    #[test]
    fn knight_chance_is_capped(amount in 0u32..100_000, level in 1u32..200) {
        let config = GameConfig::default();
        let chance = knight_chance(amount, level, &config);
        prop_assert!(chance >= config.knight_chance_base);
        prop_assert!(chance <= config.knight_chance_cap);
    }

    #[test]
    fn casualty_rate_is_clamped(
        power in 0u64..1_000_000,
        damage in 0u64..1_000_000,
        terrain in any_terrain(),
        weather in any_weather(),
    ) {
        let rate = casualty_rate(power, damage, terrain, weather);
        prop_assert!((MIN_CASUALTY_RATE..=MAX_CASUALTY_RATE).contains(&rate));
    }

    #[test]
    fn duel_damage_has_a_floor(seed in any::<u64>(), vitality in 0u32..500, terrain in any_terrain(), weather in any_weather()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let attacker = Fighter { stats: Stats::default(), knights: 0, archers: 0, cavalry: 0 };
        let defender = Fighter {
            stats: Stats { vitality, ..Stats::default() },
            knights: 100,
            archers: 100,
            cavalry: 0,
        };
        for action in DuelAction::ALL {
            let hit = calculate_damage(&attacker, &defender, action, terrain, weather, &mut rng);
            prop_assert!(hit.damage >= 5);
        }
    }

    #[test]
    fn training_conserves_recruits(seed in any::<u64>(), recruits in 1u32..=500, soldiers in 0u32..=500, morale in 1u32..=100) {
        let config = GameConfig::default();
        let mut army = Army::new(CommanderKey::new(1, 1), &config, Utc::now());
        army.current_recruits = recruits;
        army.current_soldiers = soldiers;
        army.morale = morale;
        let before_units = army.total_units();

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let record = train(&mut army, 1, recruits as i64, &config, &mut rng, Utc::now()).unwrap();
        prop_assert_eq!(record.trained + record.deserted, recruits);
        prop_assert_eq!(army.total_units(), before_units + record.trained as u64);
        prop_assert!(army.current_soldiers <= army.max_soldiers);
    }

    #[test]
    fn power_grows_with_soldiers(soldiers in 0u32..10_000, extra in 1u32..1000) {
        let config = GameConfig::default();
        let mut army = Army::new(CommanderKey::new(1, 1), &config, Utc::now());
        army.current_soldiers = soldiers;
        let before = calculate_army_power(&army, &config).total;
        army.current_soldiers += extra;
        prop_assert!(calculate_army_power(&army, &config).total >= before);
    }

    #[test]
    fn experience_curve_is_increasing(level in 1u32..60) {
        prop_assert!(experience_needed(level + 1) > experience_needed(level));
    }

    #[test]
    fn desertion_monotone_in_morale_and_supplies(
        morale in 1u32..=100,
        supplies in 1u32..=100,
        size in 0u64..5_000,
    ) {
        let config = GameConfig::default();
        let rate = desertion_rate(morale, supplies, size, &config);
        prop_assert!(desertion_rate(morale - 1, supplies, size, &config) >= rate);
        prop_assert!(desertion_rate(morale, supplies - 1, size, &config) >= rate);
    }

    #[test]
    fn power_monotone_in_specialists(knights in 0u32..2_000, archers in 0u32..2_000, army_type in any_army_type()) {
        let config = GameConfig::default();
        let mut army = Army::new(CommanderKey::new(1, 1), &config, Utc::now());
        army.army_type = army_type;
        army.knights = knights;
        army.archers = archers;
        let before = calculate_army_power(&army, &config).total;
        army.knights += 1;
        army.archers += 1;
        prop_assert!(calculate_army_power(&army, &config).total >= before);
    }

    #[test]
    fn recruitment_respects_caps(seed in any::<u64>(), calls in 1usize..40, max_recruits in 50u32..1000) {
        let config = GameConfig::default();
        let mut army = Army::new(CommanderKey::new(1, 1), &config, Utc::now());
        army.max_recruits = max_recruits;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let now = Utc::now();
        for _ in 0..calls {
            let _ = recruit(&mut army, &config, &mut rng, now);
            prop_assert!(army.current_recruits <= army.max_recruits);
            prop_assert!(army.weekly_recruitment_used <= config.weekly_recruit_quota);
            prop_assert!(army.supplies <= 100);
        }
    }

    #[test]
    fn duel_ends_exactly_once(seed in any::<u64>(), strength in 0u32..200) {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (a, b) = (CommanderKey::new(1, 1), CommanderKey::new(2, 1));
        let challenge = DuelChallenge::new(a, b, 0, Utc::now()).unwrap();
        let mut duel = Duel::begin(&challenge, &config, &mut rng, Utc::now());
        let fighter = Fighter { stats: Stats { strength, ..Stats::default() }, knights: 0, archers: 0, cavalry: 0 };

        let mut endings = 0;
        for _ in 0..100 {
            match duel.act(duel.current, DuelAction::PowerStrike, &fighter, &fighter, &mut rng, Utc::now()) {
                Ok(turn) => {
                    if turn.outcome.is_some() {
                        endings += 1;
                        prop_assert_eq!(turn.target_hp, 0);
                    }
                }
                Err(_) => break,
            }
        }
        prop_assert_eq!(endings, 1);
        prop_assert!(!duel.is_active());
    }

    #[test]
    fn war_scores_are_antisymmetric(seed in any::<u64>(), power_a in 0u64..50_000, power_b in 0u64..50_000) {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (a, b) = (CommanderKey::new(1, 1), CommanderKey::new(2, 1));
        let army_a = Army::new(a, &config, Utc::now());
        let army_b = Army::new(b, &config, Utc::now());
        let mut war = War::declare("Skirmish".into(), a, &army_a, b, &army_b, &config, &mut rng, Utc::now()).unwrap();
        war.accept(b, Utc::now()).unwrap();

        let mut ended = 0;
        for round in 0..config.war_rounds {
            let (actor, own, enemy) = if round % 2 == 0 { (a, power_a, power_b) } else { (b, power_b, power_a) };
            let turn = war.apply_turn(actor, Tactic::ALL[round as usize % Tactic::ALL.len()], own, enemy, &mut rng, Utc::now()).unwrap();
            prop_assert_eq!(war.side_a.score, -war.side_b.score);
            if turn.outcome.is_some() {
                ended += 1;
            }
        }
        prop_assert_eq!(ended, 1);
        prop_assert!(war.apply_turn(a, Tactic::FrontalAssault, power_a, power_b, &mut rng, Utc::now()).is_err());
    }
}
