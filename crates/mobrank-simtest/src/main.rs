//! Mobrank Headless Simulation Harness
//!
//! Drives the game rules against an in-memory store and checks the
//! invariants a live server depends on. Runs entirely in-process: no DB,
//! no networking.
//!
//! Usage:
//!   cargo run -p mobrank-simtest
//!   cargo run -p mobrank-simtest -- --verbose
//!   cargo run -p mobrank-simtest -- --rules my_rules.json --seed 7 --json

use mobrank_logic::actions;
use mobrank_logic::admin::StatEdit;
use mobrank_logic::config::{validate_rules, GameRules};
use mobrank_logic::crimes::{self, available_crimes, catalog, find_crime, CashReward};
use mobrank_logic::dice::Roll;
use mobrank_logic::error::{ActionError, ErrorKind};
use mobrank_logic::ledger::job_kinds;
use mobrank_logic::player::{PlayerId, PlayerState};
use mobrank_logic::prison::{self, Custody};
use mobrank_logic::progression::{self, prestige_threshold, success_chance};
use mobrank_logic::ranks::{self, get_rank, RANKS, TOP_RANK};
use mobrank_logic::store::{MemoryStore, PlayerStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

// ── Shipped rules (same JSON the server seeds from) ─────────────────────
const RULES_JSON: &str = include_str!("../../../data/game_rules.json");

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: impl Into<String>, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    rules: &'a GameRules,
    passed: usize,
    failed: usize,
    results: &'a [TestResult],
}

struct Options {
    verbose: bool,
    json: bool,
    rules_path: Option<String>,
    seed: u64,
}

impl Options {
    /// Whether human-readable progress lines should be printed.
    fn chatty(&self) -> bool {
        self.verbose && !self.json
    }
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        verbose: false,
        json: false,
        rules_path: None,
        seed: 1984,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => opts.verbose = true,
            "--json" => opts.json = true,
            "--rules" => {
                opts.rules_path = Some(args.next().ok_or("--rules needs a path")?);
            }
            "--seed" => {
                let raw = args.next().ok_or("--seed needs a number")?;
                opts.seed = raw
                    .parse()
                    .map_err(|_| format!("--seed: '{}' is not a number", raw))?;
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }
    Ok(opts)
}

fn load_rules(opts: &Options) -> Result<GameRules, String> {
    let Some(path) = &opts.rules_path else {
        return serde_json::from_str(RULES_JSON).map_err(|e| format!("shipped rules: {}", e));
    };
    let raw = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    serde_json::from_str(&raw).map_err(|e| format!("{}: {}", path, e))
}

type Section = fn(&GameRules, &Options) -> Vec<TestResult>;

fn main() {
    let opts = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let rules = match load_rules(&opts) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("cannot load rules: {}", e);
            std::process::exit(2);
        }
    };

    if !opts.json {
        println!("=== Mobrank Simulation Harness (seed {}) ===\n", opts.seed);
    }

    let sections: [(&str, Section); 9] = [
        ("Game Rules", validate_game_rules),
        ("Rank Table", validate_rank_table),
        ("Crime Catalog", validate_catalog),
        ("Crime Resolution", validate_crime_resolution),
        ("Prison & Bail", validate_prison),
        ("Busts", validate_busts),
        ("Prestige", validate_prestige),
        ("Admin", validate_admin),
        ("Random Walk", validate_random_walk),
    ];

    let mut results = Vec::new();
    for (title, run) in sections {
        if !opts.json {
            println!("--- {} ---", title);
        }
        results.extend(run(&rules, &opts));
    }

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    if opts.json {
        let report = Report {
            seed: opts.seed,
            rules: &rules,
            passed,
            failed,
            results: &results,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("cannot encode report: {}", e);
                std::process::exit(2);
            }
        }
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || opts.verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed,
            results.len(),
            failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Fixed outcome for every roll; `between` returns the lower bound.
struct Always(bool);

impl Roll for Always {
    fn chance(&mut self, _p: f64) -> bool {
        self.0
    }
    fn between(&mut self, min: i64, _max: i64) -> i64 {
        min
    }
}

fn player_with(experience: u64, rules: &GameRules) -> PlayerState {
    let mut p = PlayerState::new("Sim", rules);
    p.experience = experience;
    p
}

fn rng_for(opts: &Options, salt: u64) -> StdRng {
    StdRng::seed_from_u64(opts.seed.wrapping_mul(1_000_003).wrapping_add(salt))
}

// ── 1. Game Rules ───────────────────────────────────────────────────────

fn validate_game_rules(rules: &GameRules, opts: &Options) -> Vec<TestResult> {
    let mut results = Vec::new();

    let shipped: Result<GameRules, _> = serde_json::from_str(RULES_JSON);
    results.push(match shipped {
        Ok(shipped) => check(
            "rules_shipped_match_defaults",
            shipped == GameRules::default(),
            "data/game_rules.json equals GameRules::default()",
        ),
        Err(e) => check("rules_shipped_match_defaults", false, format!("parse error: {}", e)),
    });

    let errors = validate_rules(rules);
    results.push(check(
        "rules_active_valid",
        errors.is_empty(),
        if errors.is_empty() {
            format!(
                "active rules from {}",
                opts.rules_path.as_deref().unwrap_or("data/game_rules.json")
            )
        } else {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    ));

    if opts.chatty() {
        println!(
            "  start ${}, bail ${}/min, bust {:.2}+{:.2}/rank, prestige at {} XP",
            rules.starting_cash,
            rules.bail_per_minute,
            rules.bust_base_chance,
            rules.bust_chance_per_rank,
            rules.prestige_base_experience
        );
    }
    results
}

// ── 2. Rank Table ───────────────────────────────────────────────────────

fn validate_rank_table(_rules: &GameRules, opts: &Options) -> Vec<TestResult> {
    let mut results = Vec::new();

    results.push(check(
        "ranks_ten_rungs",
        RANKS.len() == 10 && RANKS[0].min_experience == 0,
        format!("{} ranks, first at {} XP", RANKS.len(), RANKS[0].min_experience),
    ));

    let ascending = RANKS
        .windows(2)
        .all(|w| w[0].min_experience < w[1].min_experience);
    results.push(check(
        "ranks_strictly_ascending",
        ascending,
        "thresholds strictly increase",
    ));

    let examples = [
        (0, "Street Rat"),
        (99, "Street Rat"),
        (100, "Errand Boy"),
        (249_999, "Boss"),
        (250_000, "Godfather"),
    ];
    let wrong: Vec<String> = examples
        .iter()
        .filter(|(exp, name)| get_rank(*exp) != *name)
        .map(|(exp, name)| format!("{} → {} (want {})", exp, get_rank(*exp), name))
        .collect();
    results.push(check(
        "ranks_boundary_examples",
        wrong.is_empty(),
        if wrong.is_empty() {
            "all boundary lookups correct".to_string()
        } else {
            wrong.join(", ")
        },
    ));

    // Greatest threshold at or below, by brute force
    let mut mismatches = 0;
    let mut samples = 0;
    for exp in (0..=400_000u64).step_by(7) {
        samples += 1;
        let brute = RANKS
            .iter()
            .filter(|r| r.min_experience <= exp)
            .last()
            .map(|r| r.name);
        if brute != Some(get_rank(exp)) {
            mismatches += 1;
        }
    }
    results.push(check(
        "ranks_lookup_sweep",
        mismatches == 0,
        format!("{} samples, {} mismatches", samples, mismatches),
    ));

    let unnamed: Vec<&str> = RANKS
        .iter()
        .enumerate()
        .filter(|(i, r)| ranks::rank_index(r.name) != Some(*i))
        .map(|(_, r)| r.name)
        .collect();
    results.push(check(
        "ranks_names_resolve",
        unnamed.is_empty() && ranks::rank_index("Don").is_none(),
        if unnamed.is_empty() {
            "every rank name maps back to its rung".to_string()
        } else {
            format!("unresolved: {}", unnamed.join(", "))
        },
    ));

    results.push(check(
        "ranks_top_has_no_next",
        ranks::next_rank(TOP_RANK).is_none() && ranks::next_rank(0).is_some(),
        format!("top rank is {}", RANKS[TOP_RANK].name),
    ));

    if opts.chatty() {
        for (i, r) in RANKS.iter().enumerate() {
            println!("    {:>2} {:12} {:>7} XP", i, r.name, r.min_experience);
        }
    }
    results
}

// ── 3. Crime Catalog ────────────────────────────────────────────────────

fn validate_catalog(_rules: &GameRules, opts: &Options) -> Vec<TestResult> {
    let mut results = Vec::new();
    let all = catalog();

    results.push(check(
        "catalog_size",
        all.len() == 12,
        format!("{} crimes", all.len()),
    ));

    let mut ids: Vec<&str> = all.iter().map(|c| c.id).collect();
    ids.sort_unstable();
    ids.dedup();
    results.push(check(
        "catalog_unique_ids",
        ids.len() == all.len(),
        format!("{} distinct ids", ids.len()),
    ));

    let bad: Vec<&str> = all
        .iter()
        .filter(|c| {
            let range_ok = match c.cash {
                CashReward::Range { min, max } => 0 <= min && min <= max,
                CashReward::Fixed(_) => true,
            };
            !range_ok
                || c.unlock_rank > TOP_RANK
                || c.jail_secs <= 0
                || !(c.success_rate > 0.0 && c.success_rate <= 1.0)
        })
        .map(|c| c.id)
        .collect();
    results.push(check(
        "catalog_definitions_sane",
        bad.is_empty(),
        if bad.is_empty() {
            "ranges, unlock ranks, jail times and rates in bounds".to_string()
        } else {
            format!("bad: {}", bad.join(", "))
        },
    ));

    let unlocked_by_rank: Vec<usize> = RANKS
        .iter()
        .map(|r| available_crimes(r.min_experience).len())
        .collect();
    let monotone = unlocked_by_rank.windows(2).all(|w| w[0] <= w[1]);
    results.push(check(
        "catalog_unlocks_monotone",
        monotone && unlocked_by_rank.last() == Some(&all.len()),
        format!("unlocked per rank: {:?}", unlocked_by_rank),
    ));

    results.push(check(
        "catalog_unknown_id",
        find_crime("arson").is_none() && find_crime("rob_bank").is_some(),
        "unknown ids are not found",
    ));

    if opts.chatty() {
        for c in all {
            println!(
                "    {:16} {:12} {:>5} XP  p={:.2}  jail {}",
                c.id,
                c.unlock_rank_name(),
                c.experience,
                c.success_rate,
                prison::format_duration(c.jail_secs)
            );
        }
    }
    results
}

// ── 4. Crime Resolution ─────────────────────────────────────────────────

const CRIME_TRIALS: u32 = 3_000;

fn validate_crime_resolution(rules: &GameRules, opts: &Options) -> Vec<TestResult> {
    let mut results = Vec::new();

    for (idx, crime) in catalog().iter().enumerate() {
        let mut rng = rng_for(opts, idx as u64);
        let player = player_with(RANKS[crime.unlock_rank].min_experience, rules);
        let expected = success_chance(crime, 0, rules);
        let mut wins = 0u32;
        let mut violations = Vec::new();

        for i in 0..CRIME_TRIALS {
            let now = 1_000 + i64::from(i);
            let out = match progression::resolve_crime(&player, crime.id, now, rules, &mut rng) {
                Ok(out) => out,
                Err(e) => {
                    violations.push(format!("unexpected error: {}", e));
                    break;
                }
            };
            if out.succeeded {
                wins += 1;
                if let CashReward::Range { min, max } = crime.cash {
                    if !(min..=max).contains(&out.cash_delta) {
                        violations.push(format!(
                            "cash {} outside {}..={}",
                            out.cash_delta, min, max
                        ));
                    }
                }
                if out.player.heat < 0 {
                    violations.push("negative heat".to_string());
                }
            } else if out.player.jailed_until != Some(now + crime.jail_secs) {
                violations.push(format!("jailed until {:?}", out.player.jailed_until));
            }
        }

        let rate = f64::from(wins) / f64::from(CRIME_TRIALS);
        results.push(check(
            format!("crime_rate_{}", crime.id),
            violations.is_empty() && (rate - expected).abs() < 0.035,
            if violations.is_empty() {
                format!("empirical {:.3} vs {:.2}", rate, expected)
            } else {
                violations.join("; ")
            },
        ));
    }

    // Rank gate
    let mut leaks = Vec::new();
    for crime in catalog().iter().filter(|c| c.unlock_rank > 0) {
        let below = RANKS[crime.unlock_rank].min_experience - 1;
        let player = player_with(below, rules);
        let out = progression::resolve_crime(&player, crime.id, 0, rules, &mut Always(true));
        if !matches!(out, Err(ActionError::RankTooLow { .. })) {
            leaks.push(crime.id);
        }
    }
    results.push(check(
        "crime_rank_gate",
        leaks.is_empty(),
        if leaks.is_empty() {
            "every crime rejects one XP below its unlock rank".to_string()
        } else {
            format!("gate leaks: {}", leaks.join(", "))
        },
    ));

    // Custody gate
    let mut jailed = player_with(RANKS[TOP_RANK].min_experience, rules);
    jailed.jailed_until = Some(500);
    let blocked = catalog().iter().all(|c| {
        matches!(
            progression::resolve_crime(&jailed, c.id, 499, rules, &mut Always(true)),
            Err(ActionError::Incarcerated { seconds_left: 1 })
        )
    });
    results.push(check(
        "crime_blocked_in_jail",
        blocked,
        "every crime rejected with 1s left",
    ));

    // Fixed-cost crimes need the cash up front
    let mut broke = player_with(RANKS[2].min_experience, rules);
    broke.cash = 199;
    let refused = matches!(
        progression::resolve_crime(&broke, "bribe_cop", 0, rules, &mut Always(true)),
        Err(ActionError::InsufficientCash { cost: 200, cash: 199 })
    );
    results.push(check("crime_fixed_cost_gate", refused, "bribe with $199 refused"));

    results
}

// ── 5. Prison & Bail ────────────────────────────────────────────────────

fn validate_prison(rules: &GameRules, opts: &Options) -> Vec<TestResult> {
    let mut results = Vec::new();

    // Started minutes, rounded up
    let table = [(300, 5), (299, 5), (241, 5), (240, 4), (61, 2), (60, 1), (1, 1)];
    let wrong: Vec<String> = table
        .iter()
        .filter(|(secs, mins)| prison::bail_cost(*secs, rules) != mins * rules.bail_per_minute)
        .map(|(secs, _)| format!("{}s → ${}", secs, prison::bail_cost(*secs, rules)))
        .collect();
    results.push(check(
        "bail_started_minutes",
        wrong.is_empty(),
        if wrong.is_empty() {
            format!("${} per started minute", rules.bail_per_minute)
        } else {
            wrong.join(", ")
        },
    ));

    let lazy = prison::custody(Some(1_000), 1_000) == Custody::Free
        && prison::custody(Some(1_000), 999) == Custody::Incarcerated { until: 1_000 }
        && prison::custody(None, 0) == Custody::Free;
    results.push(check(
        "custody_lazy_expiry",
        lazy,
        "free exactly at the expiry instant",
    ));

    // Full flow through the store
    let mut store = MemoryStore::new();
    let flow = (|| -> Result<String, ActionError> {
        let (id, _) = actions::register(&mut store, "Tommy", 0, rules)?;
        if !matches!(
            actions::pay_bail(&mut store, id, 0, rules),
            Err(ActionError::NotIncarcerated)
        ) {
            return Ok("bail while free was accepted".into());
        }
        actions::admin_jail(&mut store, true, id, 300, 100)?;
        let cost = rules.bail_per_minute * 5;

        let mut p = store.load(id).ok_or(ActionError::NotRegistered)?;
        p.cash = cost - 1;
        store.save(id, &p)?;
        let err = actions::pay_bail(&mut store, id, 100, rules).err();
        if err != Some(ActionError::InsufficientCash { cost, cash: cost - 1 }) {
            return Ok(format!("short on cash gave {:?}", err));
        }

        p.cash = cost;
        store.save(id, &p)?;
        let out = actions::pay_bail(&mut store, id, 100, rules)?;
        let after = store.load(id).ok_or(ActionError::NotRegistered)?;
        let kinds: Vec<&str> = store.history(id).iter().map(|e| e.kind.as_str()).collect();
        if out.cost != cost || after.cash != 0 || after.custody(100) != Custody::Free {
            return Ok(format!("bail left {:?}", after));
        }
        if kinds != [job_kinds::REGISTER, job_kinds::ADMIN_JAIL, job_kinds::BAIL] {
            return Ok(format!("ledger {:?}", kinds));
        }
        Ok(String::new())
    })();
    results.push(match flow {
        Ok(problem) if problem.is_empty() => check(
            "bail_flow",
            true,
            "free → jailed → short on cash → bailed, 3 ledger entries",
        ),
        Ok(problem) => check("bail_flow", false, problem),
        Err(e) => check("bail_flow", false, format!("error: {}", e)),
    });

    if opts.chatty() {
        for secs in [45, 300, 3_900] {
            println!(
                "    {} left → ${}",
                prison::format_duration(secs),
                prison::bail_cost(secs, rules)
            );
        }
    }
    results
}

// ── 6. Busts ────────────────────────────────────────────────────────────

const BUST_TRIALS: u32 = 10_000;

fn validate_busts(rules: &GameRules, opts: &Options) -> Vec<TestResult> {
    let mut results = Vec::new();

    let linear = (0..RANKS.len()).all(|i| {
        let want = rules.bust_base_chance + rules.bust_chance_per_rank * i as f64;
        (prison::bust_chance(i, rules) - want).abs() < 1e-9
    });
    results.push(check(
        "bust_chance_linear",
        linear,
        format!(
            "{:.2} at rank 0 up to {:.2} at rank {}",
            prison::bust_chance(0, rules),
            prison::bust_chance(TOP_RANK, rules),
            TOP_RANK
        ),
    ));

    let mut target = PlayerState::new("Fredo", rules);
    target.jailed_until = Some(1_000_000);

    for rank in [0, 3, TOP_RANK] {
        let rescuer = player_with(RANKS[rank].min_experience, rules);
        let expected = prison::bust_chance(rank, rules).clamp(0.0, 1.0);
        let mut rng = rng_for(opts, 100 + rank as u64);
        let mut wins = 0u32;
        let mut bad_jail = 0u32;
        for _ in 0..BUST_TRIALS {
            match prison::attempt_bust(1, &rescuer, 2, &target, 0, rules, &mut rng) {
                Ok(out) if out.succeeded => {
                    wins += 1;
                    if out.target.jailed_until.is_some() {
                        bad_jail += 1;
                    }
                }
                Ok(out) => {
                    if out.rescuer.jailed_until != Some(rules.bust_fail_jail_secs)
                        || out.target.jailed_until != target.jailed_until
                    {
                        bad_jail += 1;
                    }
                }
                Err(_) => bad_jail += 1,
            }
        }
        let rate = f64::from(wins) / f64::from(BUST_TRIALS);
        results.push(check(
            format!("bust_rate_{}", RANKS[rank].name.to_lowercase().replace(' ', "_")),
            bad_jail == 0 && (rate - expected).abs() < 0.02,
            format!("empirical {:.3} vs {:.2}, {} bad outcomes", rate, expected, bad_jail),
        ));
    }

    let rescuer = player_with(0, rules);
    let free = PlayerState::new("Clemenza", rules);
    let self_bust = prison::attempt_bust(7, &target, 7, &target, 0, rules, &mut Always(true));
    let free_target = prison::attempt_bust(1, &rescuer, 2, &free, 0, rules, &mut Always(true));
    results.push(check(
        "bust_preconditions",
        matches!(self_bust, Err(ActionError::SelfBust))
            && matches!(free_target, Err(ActionError::TargetNotIncarcerated(_))),
        "self-bust and free targets rejected",
    ));

    results
}

// ── 7. Prestige ─────────────────────────────────────────────────────────

const GRIND_STEPS: u32 = 50_000;

fn validate_prestige(rules: &GameRules, opts: &Options) -> Vec<TestResult> {
    let mut results = Vec::new();
    let base = rules.prestige_base_experience;

    results.push(check(
        "prestige_threshold_doubles",
        prestige_threshold(0, rules) == base
            && prestige_threshold(1, rules) == base.saturating_mul(2)
            && prestige_threshold(3, rules) == base.saturating_mul(8),
        format!(
            "{} / {} / {}",
            prestige_threshold(0, rules),
            prestige_threshold(1, rules),
            prestige_threshold(3, rules)
        ),
    ));

    let first = &catalog()[0];
    let bonus = success_chance(first, 2, rules) / success_chance(first, 0, rules);
    results.push(check(
        "prestige_success_bonus",
        (bonus - (1.0 + 2.0 * rules.prestige_success_bonus)).abs() < 1e-9,
        format!("prestige 2 multiplies success by {:.3}", bonus),
    ));

    // Grind one player from nothing until the first rollover
    let mut store = MemoryStore::new();
    let mut rng = rng_for(opts, 200);
    let grind = (|| -> Result<(u32, i64, String), ActionError> {
        let (id, _) = actions::register(&mut store, "Grinder", 0, rules)?;
        let mut now = 0i64;
        for step in 0..GRIND_STEPS {
            let p = store.load(id).ok_or(ActionError::NotRegistered)?;
            if p.prestige >= 1 {
                return Ok((step, now, String::new()));
            }
            if p.rank() != get_rank(p.experience) || p.heat < 0 || p.cash < 0 {
                return Ok((step, now, format!("invariant broken: {:?}", p)));
            }
            if p.experience >= prestige_threshold(p.prestige, rules) {
                return Ok((step, now, format!("missed rollover at {} XP", p.experience)));
            }
            if let Custody::Incarcerated { until } = p.custody(now) {
                if actions::pay_bail(&mut store, id, now, rules).is_err() {
                    now = until;
                }
                continue;
            }
            let Some(best) = available_crimes(p.experience)
                .into_iter()
                .filter(|c| c.cash.cost() == 0)
                .max_by_key(|c| c.experience)
            else {
                return Ok((step, now, "nothing to attempt".into()));
            };
            actions::attempt_crime(&mut store, id, best.id, now, rules, &mut rng)?;
            now += 10;
        }
        Ok((GRIND_STEPS, now, "no rollover within step budget".into()))
    })();
    results.push(match grind {
        Ok((steps, now, problem)) if problem.is_empty() => check(
            "prestige_grind_rollover",
            true,
            format!(
                "first prestige after {} steps ({} game time)",
                steps,
                prison::format_duration(now)
            ),
        ),
        Ok((steps, _, problem)) => check(
            "prestige_grind_rollover",
            false,
            format!("step {}: {}", steps, problem),
        ),
        Err(e) => check("prestige_grind_rollover", false, format!("error: {}", e)),
    });

    let edge = player_with(base.saturating_sub(1), rules);
    let hijack = crimes::find_crime("hijack_shipment");
    let rolled = hijack
        .filter(|c| crimes::can_attempt(c, edge.experience))
        .map(|c| progression::resolve_crime(&edge, c.id, 0, rules, &mut Always(true)));
    results.push(match rolled {
        Some(Ok(out)) => check(
            "prestige_rollover_resets",
            out.prestiged
                && out.player.prestige == 1
                && out.player.experience == 0
                && out.player.rank() == RANKS[0].name,
            out.message,
        ),
        Some(Err(e)) => check("prestige_rollover_resets", false, e.to_string()),
        None => check(
            "prestige_rollover_resets",
            false,
            format!("hijack_shipment not available at {} XP", edge.experience),
        ),
    });

    results
}

// ── 8. Admin ────────────────────────────────────────────────────────────

fn validate_admin(rules: &GameRules, _opts: &Options) -> Vec<TestResult> {
    let mut results = Vec::new();
    let mut store = MemoryStore::new();
    let id = match actions::register(&mut store, "Carlo", 0, rules) {
        Ok((id, _)) => id,
        Err(e) => return vec![check("admin_setup", false, e.to_string())],
    };

    let edit = StatEdit {
        experience: Some(5_000),
        heat: Some(0),
        ..StatEdit::default()
    };
    let denied = actions::admin_edit(&mut store, false, id, &edit, 0);
    results.push(check(
        "admin_requires_grant",
        matches!(&denied, Err(e) if e.kind() == ErrorKind::Forbidden),
        "non-admin edit is Forbidden",
    ));

    let applied = actions::admin_edit(&mut store, true, id, &edit, 0);
    let rank = store.load(id).map(|p| p.rank());
    results.push(check(
        "admin_edit_recomputes_rank",
        applied.is_ok() && rank == Some("Caporegime"),
        format!("rank after edit: {:?}", rank),
    ));

    let before = store.load(id);
    let negative = StatEdit {
        heat: Some(-1),
        ..StatEdit::default()
    };
    let rejected = actions::admin_edit(&mut store, true, id, &negative, 0);
    results.push(check(
        "admin_edit_rejects_negative",
        matches!(rejected, Err(ActionError::InvalidStat { field: "heat", .. }))
            && store.load(id) == before,
        "negative heat rejected without writing",
    ));

    let release_free = actions::admin_release(&mut store, true, id, 0);
    let zero_jail = actions::admin_jail(&mut store, true, id, 0, 0);
    results.push(check(
        "admin_jail_release_guards",
        matches!(release_free, Err(ActionError::TargetNotIncarcerated(_)))
            && matches!(zero_jail, Err(ActionError::InvalidStat { .. })),
        "release of a free player and zero-second jail rejected",
    ));

    let kinds: Vec<&str> = store.history(id).iter().map(|e| e.kind.as_str()).collect();
    results.push(check(
        "admin_ledger",
        kinds == [job_kinds::REGISTER, job_kinds::ADMIN_EDIT],
        format!("{:?}", kinds),
    ));

    results
}

// ── 9. Random Walk ──────────────────────────────────────────────────────

const WALK_STEPS: u32 = 5_000;

/// Several players taking random actions; every call must either write
/// exactly one ledger entry or leave everything untouched.
fn validate_random_walk(rules: &GameRules, opts: &Options) -> Vec<TestResult> {
    let mut store = MemoryStore::new();
    let mut rng = rng_for(opts, 300);
    let mut ids: Vec<PlayerId> = Vec::new();
    for name in ["Sonny", "Fredo", "Michael", "Connie"] {
        match actions::register(&mut store, name, 0, rules) {
            Ok((id, _)) => ids.push(id),
            Err(e) => return vec![check("walk_setup", false, e.to_string())],
        }
    }

    let mut now = 0i64;
    let mut ok = 0u32;
    let mut rejected = 0u32;
    let mut violations: Vec<String> = Vec::new();

    for step in 0..WALK_STEPS {
        let actor = ids[rng.gen_range(0..ids.len())];
        let snapshot: Vec<Option<PlayerState>> = ids.iter().map(|id| store.load(*id)).collect();
        let jobs_before = store.job_count();

        let result = match rng.gen_range(0..10) {
            0..=6 => {
                let crime = &catalog()[rng.gen_range(0..catalog().len())];
                actions::attempt_crime(&mut store, actor, crime.id, now, rules, &mut rng)
                    .map(|_| ())
            }
            7 => actions::pay_bail(&mut store, actor, now, rules).map(|_| ()),
            _ => {
                let target = ids[rng.gen_range(0..ids.len())];
                actions::bust(&mut store, actor, target, now, rules, &mut rng).map(|_| ())
            }
        };

        match result {
            Ok(()) => {
                ok += 1;
                if store.job_count() != jobs_before + 1 {
                    violations.push(format!(
                        "step {}: success wrote {} entries",
                        step,
                        store.job_count() - jobs_before
                    ));
                }
            }
            Err(_) => {
                rejected += 1;
                let after: Vec<Option<PlayerState>> =
                    ids.iter().map(|id| store.load(*id)).collect();
                if after != snapshot || store.job_count() != jobs_before {
                    violations.push(format!("step {}: rejected action wrote state", step));
                }
            }
        }

        for id in &ids {
            if let Some(p) = store.load(*id) {
                let threshold = prestige_threshold(p.prestige, rules);
                if p.heat < 0 || p.cash < 0 || p.experience >= threshold {
                    violations.push(format!("step {}: {:?}", step, p));
                }
            }
        }
        if violations.len() > 5 {
            break;
        }
        now += rng.gen_range(1..=90);
    }

    if opts.chatty() {
        println!("  {} accepted, {} rejected over {} steps", ok, rejected, WALK_STEPS);
        for id in &ids {
            if let Some(p) = store.load(*id) {
                let s = p.summary(now, rules);
                println!(
                    "    {:8} {:12} ${:>8} heat {:>4} prestige {} {}",
                    s.name,
                    s.rank,
                    s.cash,
                    s.heat,
                    s.prestige,
                    if s.jailed { "(jailed)" } else { "" }
                );
            }
        }
    }

    vec![
        check(
            "walk_atomic_actions",
            violations.is_empty(),
            if violations.is_empty() {
                format!(
                    "{} accepted, {} rejected, ledger {} entries",
                    ok,
                    rejected,
                    store.job_count()
                )
            } else {
                violations.join("; ")
            },
        ),
        check(
            "walk_mixed_outcomes",
            ok > 0 && rejected > 0,
            format!("{} accepted / {} rejected", ok, rejected),
        ),
    ]
}
