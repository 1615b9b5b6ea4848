//! Integration tests for whole action flows.
//!
//! Exercises: register → crime attempts → jail → bail / bust → prestige,
//! all through the in-memory store with seeded or scripted randomness.

use mobrank_logic::actions;
use mobrank_logic::admin::StatEdit;
use mobrank_logic::config::GameRules;
use mobrank_logic::crimes::{catalog, find_crime, CashReward};
use mobrank_logic::dice::Roll;
use mobrank_logic::error::{ActionError, ErrorKind};
use mobrank_logic::ledger::job_kinds;
use mobrank_logic::player::{PlayerId, PlayerState};
use mobrank_logic::prison::{self, Custody};
use mobrank_logic::ranks::{get_rank, RANKS};
use mobrank_logic::store::{MemoryStore, PlayerStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ────────────────────────────────────────────────────────────

/// Plays back a fixed list of success/failure results.
struct Script {
    results: Vec<bool>,
}

impl Script {
    fn new(results: &[bool]) -> Self {
        Self {
            results: results.iter().rev().copied().collect(),
        }
    }
}

impl Roll for Script {
    fn chance(&mut self, _p: f64) -> bool {
        self.results.pop().unwrap_or(false)
    }
    fn between(&mut self, min: i64, max: i64) -> i64 {
        (min + max) / 2
    }
}

fn setup(experience: u64) -> (MemoryStore, PlayerId, GameRules) {
    let rules = GameRules::default();
    let mut store = MemoryStore::new();
    let (id, mut p) = actions::register(&mut store, "Vito", 0, &rules).unwrap();
    p.experience = experience;
    store.save(id, &p).unwrap();
    (store, id, rules)
}

// ── Rank table ─────────────────────────────────────────────────────────

#[test]
fn rank_lookup_examples() {
    assert_eq!(get_rank(0), "Street Rat");
    assert_eq!(get_rank(99), "Street Rat");
    assert_eq!(get_rank(100), "Errand Boy");
    assert_eq!(get_rank(249_999), "Boss");
    assert_eq!(get_rank(250_000), "Godfather");
}

#[test]
fn rank_is_greatest_threshold_at_or_below() {
    for exp in (0..300_000u64).step_by(37) {
        let expected = RANKS
            .iter()
            .filter(|r| r.min_experience <= exp)
            .max_by_key(|r| r.min_experience)
            .unwrap();
        assert_eq!(get_rank(exp), expected.name, "exp {}", exp);
    }
}

// ── Gates ──────────────────────────────────────────────────────────────

#[test]
fn below_unlock_rank_never_mutates() {
    let (mut store, id, rules) = setup(0);
    let before = store.load(id).unwrap();
    for crime in catalog().iter().filter(|c| c.unlock_rank > 0) {
        let mut roll = Script::new(&[true]);
        let err =
            actions::attempt_crime(&mut store, id, crime.id, 10, &rules, &mut roll).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected, "{}", crime.id);
        assert!(matches!(err, ActionError::RankTooLow { .. }));
    }
    assert_eq!(store.load(id).unwrap(), before);
    assert_eq!(store.history(id).len(), 1);
}

#[test]
fn incarcerated_rejected_for_every_crime() {
    let (mut store, id, rules) = setup(300_000);
    let mut p = store.load(id).unwrap();
    p.jailed_until = Some(1_000);
    store.save(id, &p).unwrap();
    for crime in catalog() {
        let mut roll = Script::new(&[true]);
        let err =
            actions::attempt_crime(&mut store, id, crime.id, 999, &rules, &mut roll).unwrap_err();
        assert_eq!(err, ActionError::Incarcerated { seconds_left: 1 });
    }
    assert_eq!(store.load(id).unwrap(), p);
}

#[test]
fn unknown_crime_is_input_error() {
    let (mut store, id, rules) = setup(0);
    let err = actions::attempt_crime(&mut store, id, "arson", 0, &rules, &mut Script::new(&[true]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
}

// ── Outcomes ───────────────────────────────────────────────────────────

#[test]
fn seeded_outcomes_respect_bounds() {
    let rules = GameRules::default();
    let crime = find_crime("steal_car").unwrap();
    let CashReward::Range { min, max } = crime.cash else {
        panic!("steal_car pays a range");
    };
    let mut rng = StdRng::seed_from_u64(2024);
    let mut successes = 0;
    let mut failures = 0;

    for i in 0..2_000 {
        let mut p = PlayerState::new("Vito", &rules);
        p.experience = 300;
        p.heat = i % 3;
        let now = 10_000 + i;
        let out =
            mobrank_logic::progression::resolve_crime(&p, crime.id, now, &rules, &mut rng).unwrap();
        if out.succeeded {
            successes += 1;
            assert!((min..=max).contains(&out.cash_delta));
            assert_eq!(out.player.cash, p.cash + out.cash_delta);
            assert_eq!(out.player.experience, p.experience + crime.experience);
            assert_eq!(out.player.heat, (p.heat + crime.heat).max(0));
            assert_eq!(out.player.jailed_until, None);
        } else {
            failures += 1;
            assert_eq!(out.player.jailed_until, Some(now + crime.jail_secs));
            assert_eq!(out.player.cash, p.cash);
            assert_eq!(out.player.experience, p.experience);
            assert_eq!(out.player.heat, p.heat);
        }
    }
    assert!(successes > 0 && failures > 0);
}

#[test]
fn failure_then_bail_flow() {
    let (mut store, id, rules) = setup(0);
    let mut roll = Script::new(&[false]);
    let out = actions::attempt_crime(&mut store, id, "shoplift", 1_000, &rules, &mut roll).unwrap();
    assert!(!out.succeeded);
    let p = store.load(id).unwrap();
    assert_eq!(p.custody(1_000), Custody::Incarcerated { until: 1_120 });

    // 2 minutes left → $200.
    let bail = actions::pay_bail(&mut store, id, 1_000, &rules).unwrap();
    assert_eq!(bail.cost, 200);
    let p = store.load(id).unwrap();
    assert_eq!(p.cash, 800);
    assert_eq!(p.custody(1_000), Custody::Free);

    let kinds: Vec<_> = store.history(id).iter().map(|e| e.kind.clone()).collect();
    assert_eq!(kinds, vec![job_kinds::REGISTER, "shoplift", job_kinds::BAIL]);
}

#[test]
fn bail_boundary_five_minutes() {
    let (mut store, id, rules) = setup(0);
    let mut p = store.load(id).unwrap();
    p.jailed_until = Some(2_300);
    p.cash = 499;
    store.save(id, &p).unwrap();

    let err = actions::pay_bail(&mut store, id, 2_000, &rules).unwrap_err();
    assert_eq!(err, ActionError::InsufficientCash { cost: 500, cash: 499 });
    assert_eq!(store.load(id).unwrap().jailed_until, Some(2_300));

    p.cash = 500;
    store.save(id, &p).unwrap();
    actions::pay_bail(&mut store, id, 2_000, &rules).unwrap();
    let p = store.load(id).unwrap();
    assert_eq!(p.cash, 0);
    assert_eq!(p.jailed_until, None);
}

#[test]
fn prestige_rollover_through_store() {
    let (mut store, id, rules) = setup(249_990);
    let out = actions::attempt_crime(
        &mut store,
        id,
        "hijack_shipment",
        0,
        &rules,
        &mut Script::new(&[true]),
    )
    .unwrap();
    assert!(out.prestiged);
    let p = store.load(id).unwrap();
    assert_eq!(p.experience, 0);
    assert_eq!(p.rank(), "Street Rat");
    assert_eq!(p.prestige, 1);
}

// ── Busts ──────────────────────────────────────────────────────────────

#[test]
fn bust_rate_converges_for_muscle() {
    let rules = GameRules::default();
    let mut rescuer = PlayerState::new("Luca", &rules);
    rescuer.experience = 800;
    assert_eq!(rescuer.rank_index(), 3);
    let mut target = PlayerState::new("Fredo", &rules);
    target.jailed_until = Some(10_000);

    let mut rng = StdRng::seed_from_u64(77);
    let trials = 20_000;
    let mut wins = 0;
    for _ in 0..trials {
        let out = prison::attempt_bust(1, &rescuer, 2, &target, 0, &rules, &mut rng).unwrap();
        assert!((out.chance - 0.35).abs() < 1e-9);
        if out.succeeded {
            wins += 1;
        }
    }
    let rate = wins as f64 / trials as f64;
    assert!((rate - 0.35).abs() < 0.02, "empirical rate {}", rate);
}

#[test]
fn bust_flow_success_and_failure() {
    let rules = GameRules::default();
    let mut store = MemoryStore::new();
    let (luca, _) = actions::register(&mut store, "Luca", 0, &rules).unwrap();
    let (fredo, mut f) = actions::register(&mut store, "Fredo", 0, &rules).unwrap();
    f.jailed_until = Some(5_000);
    store.save(fredo, &f).unwrap();

    let mut roll = Script::new(&[false]);
    let out = actions::bust_by_name(&mut store, luca, "fredo", 100, &rules, &mut roll).unwrap();
    assert!(!out.succeeded);
    assert_eq!(store.load(luca).unwrap().jailed_until, Some(400));
    assert_eq!(store.load(fredo).unwrap().jailed_until, Some(5_000));
    assert_eq!(store.history(luca).last().unwrap().kind, job_kinds::BUST_FAIL);

    // Still jailed, Luca may try again.
    let mut roll = Script::new(&[true]);
    let out = actions::bust(&mut store, luca, fredo, 200, &rules, &mut roll).unwrap();
    assert!(out.succeeded);
    assert_eq!(store.load(fredo).unwrap().jailed_until, None);
    assert_eq!(store.load(luca).unwrap().respect, rules.bust_respect);
    assert_eq!(store.history(luca).last().unwrap().kind, job_kinds::BUST);
    assert_eq!(store.history(fredo).len(), 1);

    let mut roll = Script::new(&[true]);
    let err = actions::bust(&mut store, luca, fredo, 300, &rules, &mut roll).unwrap_err();
    assert_eq!(err, ActionError::TargetNotIncarcerated("Fredo".into()));
}

#[test]
fn admin_extremes_never_wrap() {
    let (mut store, id, rules) = setup(0);
    let before = store.load(id).unwrap();
    let err = actions::admin_jail(&mut store, true, id, i64::MAX, 1_700_000_000).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
    assert_eq!(store.load(id).unwrap(), before);

    let edit = StatEdit {
        cash: Some(i64::MAX),
        respect: Some(i64::MAX),
        ..StatEdit::default()
    };
    actions::admin_edit(&mut store, true, id, &edit, 0).unwrap();
    for now in [10, 20, 30] {
        let mut roll = Script::new(&[true]);
        let out = actions::attempt_crime(&mut store, id, "pickpocket", now, &rules, &mut roll)
            .unwrap();
        assert!(out.succeeded);
        assert_eq!(out.player.cash, i64::MAX);
        assert_eq!(out.player.respect, i64::MAX);
    }
}

// ── Round trip ─────────────────────────────────────────────────────────

#[test]
fn sequential_attempts_round_trip() {
    let (mut store, id, rules) = setup(0);
    let mut rng = StdRng::seed_from_u64(5);
    let mut now = 0;
    for _ in 0..200 {
        let before = store.load(id).unwrap();
        let jobs_before = store.history(id).len();
        match actions::attempt_crime(&mut store, id, "pickpocket", now, &rules, &mut rng) {
            Ok(out) => {
                let after = store.load(id).unwrap();
                assert_eq!(after, out.player);
                assert_eq!(store.history(id).len(), jobs_before + 1);
                assert_eq!(store.history(id).last().unwrap().message, out.message);
                if out.succeeded {
                    assert_eq!(after.cash, before.cash + out.cash_delta);
                }
            }
            Err(ActionError::Incarcerated { .. }) => {
                assert_eq!(store.load(id).unwrap(), before);
                assert_eq!(store.history(id).len(), jobs_before);
            }
            Err(e) => panic!("unexpected error {e}"),
        }
        now += 30;
    }
}
