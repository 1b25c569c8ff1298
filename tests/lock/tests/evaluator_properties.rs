//! Path evaluator lock tests: determinism, reward monotonicity, budget
//! respect, sweep exactly-once, and the three-target example.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use lock_tests::fixtures::{generous_params, scattered, table, three_targets, tight_params};
use sweeproute_kernel::instance::target::TargetId;
use sweeproute_kernel::motion::evaluate::{evaluate, trace_route, TargetStatus, REWARD_WEIGHT};
use sweeproute_kernel::motion::params::MotionParams;

fn random_orders(n: usize, count: usize, seed: u64) -> Vec<Vec<TargetId>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let ids: Vec<TargetId> = (0..n).filter_map(|i| TargetId::try_from(i).ok()).collect();
    (0..count)
        .map(|_| {
            let mut order = ids.clone();
            order.shuffle(&mut rng);
            order
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn evaluation_is_bit_identical_across_calls() {
    let targets = scattered(20, 10.0, 1);
    let params = MotionParams::default();
    for order in random_orders(20, 50, 2) {
        let a = evaluate(&order, &targets, &params);
        let b = evaluate(&order, &targets, &params);
        assert_eq!(a.fitness.to_bits(), b.fitness.to_bits());
        assert_eq!(a.resource_used.to_bits(), b.resource_used.to_bits());
        assert_eq!(a.time_used.to_bits(), b.time_used.to_bits());
        assert_eq!(a.steps_executed, b.steps_executed);
    }
}

// ---------------------------------------------------------------------------
// Monotonicity
// ---------------------------------------------------------------------------

#[test]
fn reward_never_decreases_while_prefix_runs_to_completion() {
    // Positive rewards only: mass ≥ 0.5 keeps every reward non-negative.
    let rows: Vec<(f64, f64, f64)> = (0..12)
        .map(|i| {
            let f = f64::from(i);
            (f.sin() * 6.0, f.cos() * 6.0, 0.5 + f / 10.0)
        })
        .collect();
    let targets = table(&rows);
    let params = generous_params();

    for order in random_orders(12, 30, 3) {
        let mut previous = 0.0;
        for len in 1..=order.len() {
            let e = evaluate(&order[..len], &targets, &params);
            if e.halted_by_budget {
                break;
            }
            assert!(
                e.reward >= previous,
                "reward dropped from {previous} to {} at prefix length {len}",
                e.reward
            );
            previous = e.reward;
        }
    }
}

// ---------------------------------------------------------------------------
// Budget respect
// ---------------------------------------------------------------------------

#[test]
fn executed_prefixes_stay_within_budgets() {
    let targets = scattered(25, 15.0, 4);
    let params = tight_params();
    let mut halted = 0;
    for order in random_orders(25, 40, 5) {
        let e = evaluate(&order, &targets, &params);
        assert!(e.time_used <= params.time_budget);
        assert!(e.resource_used <= params.resource_budget);
        if e.halted_by_budget {
            halted += 1;
        }
    }
    assert!(halted > 0, "tight budgets should halt some routes");
}

#[test]
fn halted_route_equals_its_executed_prefix() {
    let targets = scattered(25, 15.0, 6);
    let params = tight_params();
    for order in random_orders(25, 20, 7) {
        let trace = trace_route(&order, &targets, &params);
        let replay = evaluate(&trace.targeted, &targets, &params);
        assert_eq!(replay.reward.to_bits(), trace.evaluation.reward.to_bits());
        assert_eq!(replay.resource_used.to_bits(), trace.evaluation.resource_used.to_bits());
        assert_eq!(replay.time_used.to_bits(), trace.evaluation.time_used.to_bits());
    }
}

// ---------------------------------------------------------------------------
// Sweep exactly once
// ---------------------------------------------------------------------------

#[test]
fn target_on_segment_is_collected_once_in_either_direction() {
    // Target 2 sits exactly between targets 0 and 1.
    let targets = table(&[(2.0, 2.0, 1.0), (6.0, 2.0, 1.0), (4.0, 2.0, 1.0)]);
    let params = generous_params();

    let forward = trace_route(&[0, 1, 2], &targets, &params);
    let backward = trace_route(&[1, 0, 2], &targets, &params);
    for trace in [&forward, &backward] {
        assert_eq!(trace.statuses[2], TargetStatus::Swept);
        assert_eq!(trace.swept, vec![2]);
        assert_eq!(trace.targeted.len(), 2, "the swept entry is skipped");
        assert!((trace.evaluation.reward - 3.0).abs() < 1e-12);
        assert_eq!(trace.evaluation.collected, 3);
    }
}

#[test]
fn every_target_is_collected_at_most_once() {
    let targets = scattered(30, 5.0, 8);
    let params = generous_params();
    for order in random_orders(30, 20, 9) {
        let trace = trace_route(&order, &targets, &params);
        let mut seen = vec![false; targets.len()];
        for &id in trace.targeted.iter().chain(&trace.swept) {
            let slot = &mut seen[id as usize];
            assert!(!*slot, "target {id} collected twice");
            *slot = true;
        }
        let expected: f64 = targets
            .iter()
            .filter(|t| seen[t.id as usize])
            .map(|t| t.reward)
            .sum();
        assert!((trace.evaluation.reward - expected).abs() < 1e-9);
    }
}

// ---------------------------------------------------------------------------
// Three-target example
// ---------------------------------------------------------------------------

#[test]
fn three_target_example_scores_full_collection() {
    let targets = three_targets();
    let params = generous_params();
    for order in [[0, 1, 2], [2, 0, 1], [1, 2, 0]] {
        let e = evaluate(&order, &targets, &params);
        assert!((e.reward - 3.0).abs() < 1e-12);
        assert!(e.fitness > 3.0 * REWARD_WEIGHT);
        assert!(e.fitness < 4.0 * REWARD_WEIGHT);
    }
}

#[test]
fn empty_route_and_empty_instance_score_zero_reward() {
    let params = MotionParams::default();
    let empty = evaluate(&[], &three_targets(), &params);
    assert!(empty.reward.abs() < f64::EPSILON);
    assert_eq!(empty.steps_executed, 0);
    let none = evaluate(&[], &table(&[]), &params);
    assert!(none.reward.abs() < f64::EPSILON);
}
