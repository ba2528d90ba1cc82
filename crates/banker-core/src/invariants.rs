//! Outcome invariants for verification
//!
//! Runtime-checkable properties every [`SafetyOutcome`] must satisfy,
//! checked independently of the simulator by replaying the reported order.
//! These are used for:
//! 1. Runtime assertion checking during development
//! 2. Property-based testing with proptest
//! 3. Formal verification with Kani
//!
//! # Invariants
//!
//! 1. **Membership**: every reported index is a process, reported once
//! 2. **Partition**: sequence and deadlocked set together cover all processes
//! 3. **Replay**: granting needs in sequence order never overdraws the pool
//! 4. **Lowest Index First**: at each step no lower-index process was feasible
//! 5. **Stall**: when unsafe, no deadlocked process fits the final pool

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::need::NeedMatrix;
use crate::safety::{is_feasible, SafetyOutcome};
use crate::types::ResourceState;

/// An invariant violation with details
#[derive(Clone, Debug)]
pub struct InvariantViolation {
    /// Name of the violated invariant
    pub invariant: &'static str,
    /// Description of what went wrong
    pub description: String,
}

/// Check all outcome invariants.
///
/// Returns a list of violations (empty if all invariants hold).
pub fn check_outcome(
    state: &ResourceState,
    need: &NeedMatrix,
    outcome: &SafetyOutcome,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    violations.extend(check_membership(state, outcome));
    violations.extend(check_partition(state, outcome));

    // Replay only makes sense over valid indices
    if violations.is_empty() {
        violations.extend(check_replay(state, need, outcome));
    }

    violations
}

/// Invariant 1: indices are in range and unique
fn check_membership(state: &ResourceState, outcome: &SafetyOutcome) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let n = state.processes();
    let mut seen = vec![false; n];

    for &i in outcome.sequence().iter().chain(outcome.deadlocked()) {
        if i >= n {
            violations.push(InvariantViolation {
                invariant: "membership",
                description: alloc::format!("Process {} reported but only {} exist", i, n),
            });
        } else if seen[i] {
            violations.push(InvariantViolation {
                invariant: "membership",
                description: alloc::format!("Process {} reported more than once", i),
            });
        } else {
            seen[i] = true;
        }
    }

    violations
}

/// Invariant 2: sequence and deadlocked set partition `0..n`
fn check_partition(state: &ResourceState, outcome: &SafetyOutcome) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let n = state.processes();
    let covered = outcome.sequence().len() + outcome.deadlocked().len();

    if covered != n {
        violations.push(InvariantViolation {
            invariant: "partition",
            description: alloc::format!("{} of {} processes accounted for", covered, n),
        });
    }

    match outcome {
        SafetyOutcome::Safe { sequence } if sequence.len() != n => {
            violations.push(InvariantViolation {
                invariant: "partition",
                description: alloc::format!(
                    "Safe outcome lists {} of {} processes",
                    sequence.len(),
                    n
                ),
            });
        }
        SafetyOutcome::Unsafe { deadlocked, .. } => {
            if deadlocked.is_empty() {
                violations.push(InvariantViolation {
                    invariant: "partition",
                    description: String::from("Unsafe outcome with empty deadlocked set"),
                });
            }
            if deadlocked.windows(2).any(|w| w[0] >= w[1]) {
                violations.push(InvariantViolation {
                    invariant: "partition",
                    description: String::from("Deadlocked set is not ascending"),
                });
            }
        }
        _ => {}
    }

    violations
}

/// Invariants 3-5: replay the sequence against the available pool
fn check_replay(
    state: &ResourceState,
    need: &NeedMatrix,
    outcome: &SafetyOutcome,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut work = state.available().to_vec();
    let mut finished = vec![false; state.processes()];

    for (step, &i) in outcome.sequence().iter().enumerate() {
        if !is_feasible(need.row(i), &work) {
            violations.push(InvariantViolation {
                invariant: "replay",
                description: alloc::format!(
                    "Step {}: process {} needs {:?} but only {:?} is free",
                    step,
                    i,
                    need.row(i),
                    work
                ),
            });
            return violations;
        }

        if let Some(lower) = (0..i).find(|&k| !finished[k] && is_feasible(need.row(k), &work)) {
            violations.push(InvariantViolation {
                invariant: "lowest_index_first",
                description: alloc::format!(
                    "Step {}: process {} chosen while process {} was feasible",
                    step,
                    i,
                    lower
                ),
            });
        }

        for (w, &held) in work.iter_mut().zip(state.allocation(i)) {
            *w = w.saturating_add(held);
        }
        finished[i] = true;
    }

    for &i in outcome.deadlocked() {
        if is_feasible(need.row(i), &work) {
            violations.push(InvariantViolation {
                invariant: "stall",
                description: alloc::format!(
                    "Process {} marked deadlocked but fits the final pool {:?}",
                    i,
                    work
                ),
            });
        }
    }

    violations
}

/// Assert all invariants hold (panic if not)
pub fn assert_outcome(state: &ResourceState, need: &NeedMatrix, outcome: &SafetyOutcome) {
    let violations = check_outcome(state, need, outcome);
    if let Some(v) = violations.first() {
        panic!("Invariant violated: {} ({})", v.invariant, v.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::need::build_need;
    use crate::safety::simulate;
    use crate::types::Snapshot;
    use crate::validate::validate;

    fn state(
        allocation: Vec<Vec<i64>>,
        maximum: Vec<Vec<i64>>,
        available: Vec<i64>,
    ) -> ResourceState {
        validate(&Snapshot::new(allocation, maximum, available)).unwrap()
    }

    fn names(violations: &[InvariantViolation]) -> Vec<&'static str> {
        violations.iter().map(|v| v.invariant).collect()
    }

    #[test]
    fn test_invariants_hold_for_simulated_outcomes() {
        let s = state(
            vec![vec![0, 1], vec![2, 0], vec![3, 0]],
            vec![vec![7, 5], vec![3, 2], vec![9, 0]],
            vec![3, 3],
        );
        let need = build_need(&s);
        let outcome = simulate(&s, &need);
        assert!(check_outcome(&s, &need, &outcome).is_empty());
        assert_outcome(&s, &need, &outcome);
    }

    #[test]
    fn test_duplicate_process_detected() {
        let s = state(vec![vec![0], vec![0]], vec![vec![1], vec![1]], vec![1]);
        let need = build_need(&s);
        let forged = SafetyOutcome::Safe {
            sequence: vec![0, 0],
        };
        assert!(names(&check_outcome(&s, &need, &forged)).contains(&"membership"));
    }

    #[test]
    fn test_out_of_range_process_detected() {
        let s = state(vec![vec![0]], vec![vec![1]], vec![1]);
        let need = build_need(&s);
        let forged = SafetyOutcome::Safe { sequence: vec![3] };
        assert!(names(&check_outcome(&s, &need, &forged)).contains(&"membership"));
    }

    #[test]
    fn test_short_safe_sequence_detected() {
        let s = state(vec![vec![0], vec![0]], vec![vec![1], vec![1]], vec![1]);
        let need = build_need(&s);
        let forged = SafetyOutcome::Safe { sequence: vec![0] };
        assert!(names(&check_outcome(&s, &need, &forged)).contains(&"partition"));
    }

    #[test]
    fn test_overdraw_detected() {
        // P1 needs 5 but only 1 is free
        let s = state(vec![vec![0], vec![0]], vec![vec![1], vec![5]], vec![1]);
        let need = build_need(&s);
        let forged = SafetyOutcome::Safe {
            sequence: vec![1, 0],
        };
        assert_eq!(names(&check_outcome(&s, &need, &forged)), vec!["replay"]);
    }

    #[test]
    fn test_tie_break_violation_detected() {
        let s = state(vec![vec![0], vec![0]], vec![vec![1], vec![1]], vec![2]);
        let need = build_need(&s);
        let forged = SafetyOutcome::Safe {
            sequence: vec![1, 0],
        };
        assert_eq!(
            names(&check_outcome(&s, &need, &forged)),
            vec!["lowest_index_first"]
        );
    }

    #[test]
    fn test_premature_stall_detected() {
        let s = state(vec![vec![0], vec![0]], vec![vec![1], vec![1]], vec![2]);
        let need = build_need(&s);
        let forged = SafetyOutcome::Unsafe {
            partial_sequence: vec![0],
            deadlocked: vec![1],
        };
        assert_eq!(names(&check_outcome(&s, &need, &forged)), vec!["stall"]);
    }

    #[test]
    #[should_panic(expected = "Invariant violated: stall")]
    fn test_assert_outcome_panics() {
        let s = state(vec![vec![0]], vec![vec![1]], vec![1]);
        let need = build_need(&s);
        let forged = SafetyOutcome::Unsafe {
            partial_sequence: vec![],
            deadlocked: vec![0],
        };
        assert_outcome(&s, &need, &forged);
    }
}
