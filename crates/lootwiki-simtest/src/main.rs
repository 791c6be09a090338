//! LootWiki Headless Validation Harness
//!
//! Validates pure site logic and reference data without SpacetimeDB.
//! Runs entirely in-process — no DB, no networking.
//!
//! Usage:
//!   cargo run -p lootwiki-simtest
//!   cargo run -p lootwiki-simtest -- --verbose

use lootwiki_logic::classes::{multiplier, scaling, CharacterClass, DerivedStat, StatPoint};
use lootwiki_logic::planner::PlannerLimits;
use lootwiki_logic::stats::{project, round2, DerivedStats, StatAllocation};
use lootwiki_logic::votes::{apply_vote, tally_votes, VoteCounters, VoteDirection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// ── Reference builds (hand-computed expected stats) ─────────────────────
const REFERENCE_JSON: &str = include_str!("../../../data/reference_builds.json");

#[derive(Debug, Deserialize)]
struct ReferenceBuild {
    name: String,
    class: CharacterClass,
    level: u32,
    allocation: StatAllocation,
    expected: DerivedStats,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== LootWiki Logic Harness ===\n");

    let mut results = Vec::new();

    // 1. Reference builds
    results.extend(validate_reference_builds(verbose));

    // 2. Scaling table shape
    results.extend(validate_scaling_table(verbose));

    // 3. Projection sweep
    results.extend(validate_projection_sweep(verbose));

    // 4. Vote state machine
    results.extend(validate_vote_transitions(verbose));

    // 5. Multi-voter simulation
    results.extend(validate_vote_simulation(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Reference Builds ─────────────────────────────────────────────────

fn validate_reference_builds(verbose: bool) -> Vec<TestResult> {
    println!("--- Reference Builds ---");
    let mut results = Vec::new();

    let builds: Vec<ReferenceBuild> = match serde_json::from_str(REFERENCE_JSON) {
        Ok(b) => b,
        Err(e) => {
            results.push(TestResult {
                name: "reference_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "reference_covers_all_classes".into(),
        passed: CharacterClass::ALL
            .iter()
            .all(|c| builds.iter().any(|b| b.class == *c)),
        detail: format!("{} reference builds loaded", builds.len()),
    });

    for b in &builds {
        let got = match project(b.class, b.level, &b.allocation) {
            Ok(s) => s,
            Err(e) => {
                results.push(TestResult {
                    name: format!("reference_{}", b.name),
                    passed: false,
                    detail: e.to_string(),
                });
                continue;
            }
        };

        let mismatches: Vec<String> = DerivedStat::ALL
            .iter()
            .filter(|s| (got.get(**s) - b.expected.get(**s)).abs() > 1e-9)
            .map(|s| {
                format!(
                    "{} got {} want {}",
                    s.name(),
                    got.get(*s),
                    b.expected.get(*s)
                )
            })
            .collect();

        if verbose {
            println!(
                "  {} {} L{} → hp {} mp {} atk {} matk {}",
                b.name, b.class, b.level, got.hp, got.mp, got.attack, got.magic_attack
            );
        }

        results.push(TestResult {
            name: format!("reference_{}", b.name),
            passed: mismatches.is_empty(),
            detail: if mismatches.is_empty() {
                "all nine stats match".into()
            } else {
                mismatches.join(", ")
            },
        });
    }

    results
}

// ── 2. Scaling Table ────────────────────────────────────────────────────

fn validate_scaling_table(_verbose: bool) -> Vec<TestResult> {
    println!("--- Scaling Table ---");
    let mut results = Vec::new();

    let mut negative = Vec::new();
    let mut empty = Vec::new();
    for class in CharacterClass::ALL {
        for point in StatPoint::ALL {
            let entries = scaling(class, point);
            if entries.is_empty() {
                empty.push(format!("{}/{}", class, point.name()));
            }
            for (stat, m) in entries {
                if *m < 0.0 {
                    negative.push(format!("{}/{}/{}", class, point.name(), stat.name()));
                }
            }
        }
    }

    results.push(TestResult {
        name: "scaling_non_negative".into(),
        passed: negative.is_empty(),
        detail: if negative.is_empty() {
            "all multipliers ≥ 0".into()
        } else {
            format!("negative: {}", negative.join(", "))
        },
    });

    results.push(TestResult {
        name: "scaling_every_point_contributes".into(),
        passed: empty.is_empty(),
        detail: if empty.is_empty() {
            "every class/point pair scales something".into()
        } else {
            format!("empty: {}", empty.join(", "))
        },
    });

    // Warrior gets the most HP per vig point.
    let best_hp: Vec<_> = CharacterClass::ALL
        .iter()
        .map(|c| multiplier(*c, StatPoint::Vig, DerivedStat::Hp))
        .collect();
    results.push(TestResult {
        name: "scaling_warrior_tankiest".into(),
        passed: best_hp.iter().all(|m| *m <= best_hp[0]),
        detail: format!("vig→hp per class: {:?}", best_hp),
    });

    results
}

// ── 3. Projection Sweep ─────────────────────────────────────────────────

fn validate_projection_sweep(verbose: bool) -> Vec<TestResult> {
    println!("--- Projection Sweep ---");
    let mut results = Vec::new();
    let limits = PlannerLimits::default();
    let mut rng = StdRng::seed_from_u64(2024);

    let mut runs = 0;
    let mut not_exact = 0;
    let mut non_monotone = 0;
    let mut nondeterministic = 0;

    for _ in 0..2_000 {
        let class = CharacterClass::ALL[rng.gen_range(0..CharacterClass::ALL.len())];
        let level = rng.gen_range(1..=limits.max_level);
        let alloc = StatAllocation::new(
            rng.gen_range(0..=limits.max_points_per_stat),
            rng.gen_range(0..=limits.max_points_per_stat),
            rng.gen_range(0..=limits.max_points_per_stat),
            rng.gen_range(0..=limits.max_points_per_stat),
        );
        let Ok(a) = project(class, level, &alloc) else {
            continue;
        };
        runs += 1;

        if project(class, level, &alloc).ok() != Some(a) {
            nondeterministic += 1;
        }
        if DerivedStat::ALL.iter().any(|s| round2(a.get(*s)) != a.get(*s)) {
            not_exact += 1;
        }

        let point = StatPoint::ALL[rng.gen_range(0..StatPoint::ALL.len())];
        let mut more = alloc;
        more.set(point, alloc.get(point) + 1);
        if let Ok(b) = project(class, level, &more) {
            if DerivedStat::ALL.iter().any(|s| b.get(*s) < a.get(*s)) {
                non_monotone += 1;
            }
        }
    }

    if verbose {
        println!("  {} projections", runs);
    }

    results.push(TestResult {
        name: "projection_deterministic".into(),
        passed: nondeterministic == 0,
        detail: format!("{}/{} repeat projections differed", nondeterministic, runs),
    });
    results.push(TestResult {
        name: "projection_two_decimals".into(),
        passed: not_exact == 0,
        detail: format!("{}/{} projections had sub-cent residue", not_exact, runs),
    });
    results.push(TestResult {
        name: "projection_monotone".into(),
        passed: non_monotone == 0,
        detail: format!("{}/{} point increases lowered a stat", non_monotone, runs),
    });

    let rejects_zero = project(CharacterClass::Warrior, 0, &StatAllocation::default()).is_err();
    results.push(TestResult {
        name: "projection_rejects_level_zero".into(),
        passed: rejects_zero,
        detail: "level 0 → InvalidArgument".into(),
    });

    results
}

// ── 4. Vote Transitions ─────────────────────────────────────────────────

fn validate_vote_transitions(_verbose: bool) -> Vec<TestResult> {
    println!("--- Vote Transitions ---");
    use VoteDirection::{Down, Up};

    let table = [
        (None, Up, Some(Up), 1, 0),
        (None, Down, Some(Down), 0, 1),
        (Some(Up), Up, None, -1, 0),
        (Some(Down), Down, None, 0, -1),
        (Some(Up), Down, Some(Down), -1, 1),
        (Some(Down), Up, Some(Up), 1, -1),
    ];

    table
        .iter()
        .map(|&(existing, requested, state, up, down)| {
            let o = apply_vote(existing, requested);
            let ok = o.new_state == state && o.upvote_delta == up && o.downvote_delta == down;
            TestResult {
                name: format!("vote_{:?}_{}", existing, requested),
                passed: ok,
                detail: format!(
                    "→ {:?} ({:+}, {:+})",
                    o.new_state, o.upvote_delta, o.downvote_delta
                ),
            }
        })
        .collect()
}

// ── 5. Vote Simulation ──────────────────────────────────────────────────

fn validate_vote_simulation(verbose: bool) -> Vec<TestResult> {
    println!("--- Vote Simulation ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(77);

    const VOTERS: usize = 50;
    const REQUESTS: usize = 10_000;

    let mut held: Vec<Option<VoteDirection>> = vec![None; VOTERS];
    let mut counters = VoteCounters::default();
    let mut first_mismatch = None;

    for step in 0..REQUESTS {
        let voter = rng.gen_range(0..VOTERS);
        let dir = if rng.gen_bool(0.6) {
            VoteDirection::Up
        } else {
            VoteDirection::Down
        };
        let o = apply_vote(held[voter], dir);
        counters.apply(&o);
        held[voter] = o.new_state;

        let exact = tally_votes(held.iter().flatten().copied());
        if first_mismatch.is_none() && exact != counters {
            first_mismatch = Some(step);
        }
    }

    if verbose {
        println!(
            "  final +{}/-{} score {}",
            counters.upvotes,
            counters.downvotes,
            counters.score()
        );
    }

    results.push(TestResult {
        name: "simulation_counters_match_tally".into(),
        passed: first_mismatch.is_none(),
        detail: match first_mismatch {
            None => format!("{} requests from {} voters stayed consistent", REQUESTS, VOTERS),
            Some(step) => format!("counters diverged at request {}", step),
        },
    });

    results.push(TestResult {
        name: "simulation_one_vote_per_voter".into(),
        passed: counters.total() <= VOTERS as u64,
        detail: format!("{} votes held by {} voters", counters.total(), VOTERS),
    });

    // Withdraw everything: every held vote repeated once.
    for h in held.iter_mut() {
        if let Some(dir) = *h {
            let o = apply_vote(Some(dir), dir);
            counters.apply(&o);
            *h = o.new_state;
        }
    }
    results.push(TestResult {
        name: "simulation_withdraw_all".into(),
        passed: counters == VoteCounters::default(),
        detail: format!("after withdrawal +{}/-{}", counters.upvotes, counters.downvotes),
    });

    results
}
