//! Property tests for the safety check
//!
//! Random well-formed snapshots are checked against the replay-based
//! invariants, plus a few properties the invariants do not cover.

use banker_core::{
    build_need, check_outcome, check_safety, simulate, validate, SafetyOutcome, Snapshot,
};
use proptest::prelude::*;

/// Strategy for snapshots that always pass validation.
fn arb_valid_snapshot() -> impl Strategy<Value = Snapshot> {
    (0usize..7, 0usize..4).prop_flat_map(|(n, m)| {
        let rows = proptest::collection::vec(
            proptest::collection::vec((0i64..8, 0i64..8), m),
            n,
        );
        let available = proptest::collection::vec(0i64..10, m);
        (rows, available).prop_map(|(rows, available)| {
            let allocation = rows
                .iter()
                .map(|row| row.iter().map(|&(held, _)| held).collect())
                .collect();
            let maximum = rows
                .iter()
                .map(|row| row.iter().map(|&(held, extra)| held + extra).collect())
                .collect();
            Snapshot::new(allocation, maximum, available)
        })
    })
}

/// Strategy for arbitrary (mostly invalid) snapshots.
fn arb_any_snapshot() -> impl Strategy<Value = Snapshot> {
    let matrix = proptest::collection::vec(proptest::collection::vec(-3i64..6, 0..4), 0..5);
    (
        matrix.clone(),
        matrix,
        proptest::collection::vec(-3i64..6, 0..4),
    )
        .prop_map(|(a, m, v)| Snapshot::new(a, m, v))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn prop_outcome_satisfies_invariants(snap in arb_valid_snapshot()) {
        let state = validate(&snap).unwrap();
        let need = build_need(&state);
        let outcome = simulate(&state, &need);

        let violations = check_outcome(&state, &need, &outcome);
        prop_assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn prop_safe_sequence_is_permutation(snap in arb_valid_snapshot()) {
        let n = snap.allocation.len();
        let report = check_safety(&snap).unwrap();

        if let SafetyOutcome::Safe { sequence } = &report.outcome {
            let mut sorted = sequence.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
        } else {
            prop_assert!(report.outcome.sequence().len() < n);
        }
    }

    #[test]
    fn prop_need_is_maximum_minus_allocation(snap in arb_valid_snapshot()) {
        let report = check_safety(&snap).unwrap();

        for (i, row) in report.need.rows().enumerate() {
            for (j, &need) in row.iter().enumerate() {
                prop_assert_eq!(need as i64, snap.maximum[i][j] - snap.allocation[i][j]);
            }
        }
    }

    #[test]
    fn prop_check_is_deterministic(snap in arb_valid_snapshot()) {
        let before = snap.clone();
        let first = check_safety(&snap).unwrap();
        let second = check_safety(&snap).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(snap, before);
    }

    #[test]
    fn prop_more_available_never_hurts(snap in arb_valid_snapshot(), bonus in 0i64..5) {
        let was_safe = check_safety(&snap).unwrap().outcome.is_safe();

        let mut richer = snap.clone();
        for units in richer.available.iter_mut() {
            *units += bonus;
        }
        let still_safe = check_safety(&richer).unwrap().outcome.is_safe();

        prop_assert!(!was_safe || still_safe);
    }

    #[test]
    fn prop_rejected_snapshots_contain_a_violation(snap in arb_any_snapshot()) {
        if check_safety(&snap).is_err() {
            let m = snap.available.len();
            let shape_ok = snap.allocation.len() == snap.maximum.len()
                && snap.allocation.iter().chain(&snap.maximum).all(|row| row.len() == m);
            let signs_ok = snap
                .allocation
                .iter()
                .chain(&snap.maximum)
                .flatten()
                .chain(&snap.available)
                .all(|&v| v >= 0);
            let dominance_ok = snap
                .allocation
                .iter()
                .zip(&snap.maximum)
                .all(|(a, mx)| a.iter().zip(mx).all(|(a, mx)| mx >= a));

            prop_assert!(!(shape_ok && signs_ok && dominance_ok));
        }
    }
}
