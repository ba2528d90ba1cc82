//! Safety simulation - the heart of the safety check
//!
//! Starting from the available vector, repeatedly pick the lowest-index
//! unfinished process whose whole need fits in the work vector, let it
//! run to completion and return its allocation to the pool. The scan
//! restarts at index 0 after every completion, since released units may
//! unblock a lower-index process.
//!
//! # Design
//!
//! [`Simulation`] exposes one completion per [`Simulation::step`] so the
//! order can be traced; [`simulate`] drives it to the end. Either way the
//! result is deterministic: ties always go to the lowest process index.
//!
//! Unsafe is a normal outcome, not an error. The simulator cannot fail.

use alloc::vec;
use alloc::vec::Vec;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::need::NeedMatrix;
use crate::types::{ProcessIndex, ResourceState};

// ============================================================================
// Outcome
// ============================================================================

/// Result of one safety check
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SafetyOutcome {
    /// Every process can finish; `sequence` is a permutation of `0..n`
    Safe { sequence: Vec<ProcessIndex> },

    /// The simulation stalled before every process finished
    Unsafe {
        /// Processes proven completable before the stall, in order
        partial_sequence: Vec<ProcessIndex>,
        /// Processes that never became feasible, ascending
        deadlocked: Vec<ProcessIndex>,
    },
}

impl SafetyOutcome {
    /// True for [`SafetyOutcome::Safe`]
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyOutcome::Safe { .. })
    }

    /// The completion order, full or partial
    pub fn sequence(&self) -> &[ProcessIndex] {
        match self {
            SafetyOutcome::Safe { sequence } => sequence,
            SafetyOutcome::Unsafe {
                partial_sequence, ..
            } => partial_sequence,
        }
    }

    /// Processes that could not be proven completable (empty when safe)
    pub fn deadlocked(&self) -> &[ProcessIndex] {
        match self {
            SafetyOutcome::Safe { .. } => &[],
            SafetyOutcome::Unsafe { deadlocked, .. } => deadlocked,
        }
    }
}

/// Serializes to the two wire shapes:
/// `{"safe":true,"sequence":[..]}` or
/// `{"safe":false,"partial_sequence":[..],"deadlocked":[..]}`.
impl Serialize for SafetyOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SafetyOutcome::Safe { sequence } => {
                let mut s = serializer.serialize_struct("SafetyOutcome", 2)?;
                s.serialize_field("safe", &true)?;
                s.serialize_field("sequence", sequence)?;
                s.end()
            }
            SafetyOutcome::Unsafe {
                partial_sequence,
                deadlocked,
            } => {
                let mut s = serializer.serialize_struct("SafetyOutcome", 3)?;
                s.serialize_field("safe", &false)?;
                s.serialize_field("partial_sequence", partial_sequence)?;
                s.serialize_field("deadlocked", deadlocked)?;
                s.end()
            }
        }
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Feasibility test: every entry of `need` fits in `work`
pub fn is_feasible(need: &[u64], work: &[u64]) -> bool {
    need.iter().zip(work).all(|(n, w)| n <= w)
}

/// In-progress safety simulation over a validated state
pub struct Simulation<'a> {
    state: &'a ResourceState,
    need: &'a NeedMatrix,
    /// Working copy of the available vector
    work: Vec<u64>,
    finished: Vec<bool>,
    sequence: Vec<ProcessIndex>,
}

impl<'a> Simulation<'a> {
    /// Start a simulation. `need` must have been built from `state`.
    ///
    /// # Panics
    ///
    /// Panics if `need` does not have one row per process of `state`.
    pub fn new(state: &'a ResourceState, need: &'a NeedMatrix) -> Self {
        assert_eq!(
            state.processes(),
            need.len(),
            "need matrix was built from a different state"
        );
        Self {
            state,
            need,
            work: state.available().to_vec(),
            finished: vec![false; state.processes()],
            sequence: Vec::with_capacity(state.processes()),
        }
    }

    /// Complete the lowest-index feasible process and return it.
    ///
    /// Returns `None` once every process has finished or no unfinished
    /// process is feasible. Further calls keep returning `None`.
    pub fn step(&mut self) -> Option<ProcessIndex> {
        let next = (0..self.state.processes())
            .find(|&i| !self.finished[i] && is_feasible(self.need.row(i), &self.work))?;

        // Release everything the process holds. Needs never exceed
        // i64::MAX, so saturating cannot change a later feasibility test.
        for (w, &held) in self.work.iter_mut().zip(self.state.allocation(next)) {
            *w = w.saturating_add(held);
        }
        self.finished[next] = true;
        self.sequence.push(next);

        Some(next)
    }

    /// Current working vector
    pub fn work(&self) -> &[u64] {
        &self.work
    }

    /// Completion order so far
    pub fn sequence(&self) -> &[ProcessIndex] {
        &self.sequence
    }

    /// True once every process has finished
    pub fn is_complete(&self) -> bool {
        self.sequence.len() == self.state.processes()
    }

    /// Run to the end and produce the outcome.
    pub fn run(mut self) -> SafetyOutcome {
        while self.step().is_some() {}
        self.into_outcome()
    }

    fn into_outcome(self) -> SafetyOutcome {
        if self.is_complete() {
            return SafetyOutcome::Safe {
                sequence: self.sequence,
            };
        }

        let deadlocked = self
            .finished
            .iter()
            .enumerate()
            .filter_map(|(i, &done)| (!done).then_some(i))
            .collect();

        SafetyOutcome::Unsafe {
            partial_sequence: self.sequence,
            deadlocked,
        }
    }
}

/// Decide safety of a validated state.
///
/// `O(n^2 * m)` time, `O(n + m)` extra space.
pub fn simulate(state: &ResourceState, need: &NeedMatrix) -> SafetyOutcome {
    Simulation::new(state, need).run()
}

#[cfg(kani)]
mod proofs {
    use super::*;
    use crate::need::build_need;
    use crate::types::Snapshot;
    use crate::validate::validate;

    /// Proof: on a 2x1 state every process appears at most once and the
    /// sequence and deadlocked set partition the processes
    #[kani::proof]
    #[kani::unwind(4)]
    fn sequence_and_deadlocked_partition_processes() {
        let snap = Snapshot::new(
            vec![vec![kani::any::<u8>() as i64], vec![kani::any::<u8>() as i64]],
            vec![vec![kani::any::<u8>() as i64], vec![kani::any::<u8>() as i64]],
            vec![kani::any::<u8>() as i64],
        );

        if let Ok(state) = validate(&snap) {
            let need = build_need(&state);
            let outcome = simulate(&state, &need);
            let seq = outcome.sequence();
            let dead = outcome.deadlocked();

            kani::assert(seq.len() + dead.len() == 2, "partition covers all processes");
            kani::assert(
                seq.len() < 2 || seq[0] != seq[1],
                "no process completes twice",
            );
        }
    }
}
