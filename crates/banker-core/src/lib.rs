//! Banker's Algorithm Core - Pure Deadlock-Avoidance Safety Check
//!
//! Given what each process holds, the most it may ever hold, and what is
//! still free, decide whether every process can finish and in which order.
//!
//! # Design Principles
//!
//! 1. **No I/O or side effects**: Each check is a pure function of one snapshot
//! 2. **Deterministic**: Ties go to the lowest process index, always
//! 3. **Validate fully, then simulate**: Malformed input never reaches the simulator
//! 4. **Unsafe is a result**: Only validation can fail
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      banker-core                            │
//! │                                                             │
//! │   ┌───────────────┐    ┌───────────────┐    ┌────────────┐ │
//! │   │   validate()  │───▶│ build_need()  │───▶│ simulate() │ │
//! │   │   Snapshot →  │    │ ResourceState │    │  Safe /    │ │
//! │   │ ResourceState │    │  → NeedMatrix │    │  Unsafe    │ │
//! │   └───────────────┘    └───────────────┘    └────────────┘ │
//! │                                                             │
//! │   ┌───────────────┐                                         │
//! │   │  Invariants   │  replay-based outcome checks            │
//! │   └───────────────┘                                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              │ used by
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     banker-server                           │
//! │          POST /bankers, error mapping, logging              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - `types` - Snapshot, ResourceState, MatrixKind
//! - `validate` - Shape, sign and dominance checks
//! - `need` - Need matrix construction
//! - `safety` - The safety simulation and its outcome
//! - `invariants` - Outcome assertions for testing and verification

#![no_std]
extern crate alloc;

pub mod invariants;
pub mod need;
pub mod safety;
pub mod types;
pub mod validate;

// Re-export all public types for convenient access
pub use invariants::{assert_outcome, check_outcome, InvariantViolation};
pub use need::{build_need, NeedMatrix};
pub use safety::{is_feasible, simulate, SafetyOutcome, Simulation};
pub use types::{Matrix, MatrixKind, ProcessIndex, ResourceIndex, ResourceState, Snapshot};
pub use validate::{validate, ValidationError};

/// Everything one safety check produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafetyReport {
    /// Remaining demand per process
    pub need: NeedMatrix,
    /// Safe order, or partial order plus deadlocked set
    pub outcome: SafetyOutcome,
}

/// Run the full pipeline: validate, build the need matrix, simulate.
///
/// The snapshot is only borrowed; calling this twice on the same snapshot
/// yields identical reports.
pub fn check_safety(snapshot: &Snapshot) -> Result<SafetyReport, ValidationError> {
    let state = validate(snapshot)?;
    let need = build_need(&state);
    let outcome = simulate(&state, &need);
    Ok(SafetyReport { need, outcome })
}
