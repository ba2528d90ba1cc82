//! Need matrix construction
//!
//! `need[i][j] = maximum[i][j] - allocation[i][j]`, the most process `i`
//! could still ask for of resource `j`.

use alloc::vec::Vec;
use serde::Serialize;

use crate::types::{ProcessIndex, ResourceIndex, ResourceState};

/// Remaining demand per process, one row per process
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NeedMatrix(Vec<Vec<u64>>);

impl NeedMatrix {
    /// Remaining demand of `process`, one entry per resource class
    pub fn row(&self, process: ProcessIndex) -> &[u64] {
        &self.0[process]
    }

    /// Remaining demand of `process` for `resource`
    pub fn get(&self, process: ProcessIndex, resource: ResourceIndex) -> u64 {
        self.0[process][resource]
    }

    /// Number of rows (processes)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no processes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate rows in process order
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.0.iter().map(Vec::as_slice)
    }

    /// Consume into plain rows
    pub fn into_rows(self) -> Vec<Vec<u64>> {
        self.0
    }
}

/// Derive the need matrix from a validated state.
///
/// Total: validation guarantees `maximum >= allocation` entry-wise, so the
/// subtraction cannot underflow.
pub fn build_need(state: &ResourceState) -> NeedMatrix {
    let rows = state
        .maximum
        .iter()
        .zip(&state.allocation)
        .map(|(declared, held)| declared.iter().zip(held).map(|(&m, &a)| m - a).collect())
        .collect();
    NeedMatrix(rows)
}

#[cfg(kani)]
mod proofs {
    use super::*;
    use crate::types::Snapshot;
    use crate::validate::validate;
    use alloc::vec;

    /// Proof: a validated 1x2 state never yields a need above the maximum
    #[kani::proof]
    #[kani::unwind(4)]
    fn need_is_bounded_by_maximum() {
        let a: [i64; 2] = [kani::any(), kani::any()];
        let m: [i64; 2] = [kani::any(), kani::any()];
        let snap = Snapshot::new(vec![a.to_vec()], vec![m.to_vec()], vec![0, 0]);

        if let Ok(state) = validate(&snap) {
            let need = build_need(&state);
            for j in 0..2 {
                kani::assert(
                    need.get(0, j) <= state.maximum(0)[j],
                    "need never exceeds the declared maximum",
                );
                kani::assert(
                    need.get(0, j) + state.allocation(0)[j] == state.maximum(0)[j],
                    "need plus allocation equals maximum",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Snapshot;
    use crate::validate::validate;
    use alloc::vec;

    #[test]
    fn test_need_is_maximum_minus_allocation() {
        let snap = Snapshot::new(
            vec![vec![0, 1], vec![2, 0], vec![3, 0]],
            vec![vec![7, 5], vec![3, 2], vec![9, 0]],
            vec![3, 3],
        );
        let need = build_need(&validate(&snap).unwrap());

        assert_eq!(
            need.into_rows(),
            vec![vec![7, 4], vec![1, 2], vec![6, 0]]
        );
    }

    #[test]
    fn test_need_accessors() {
        let snap = Snapshot::new(vec![vec![1, 0]], vec![vec![1, 1]], vec![0, 0]);
        let need = build_need(&validate(&snap).unwrap());

        assert_eq!(need.len(), 1);
        assert!(!need.is_empty());
        assert_eq!(need.row(0), &[0, 1]);
        assert_eq!(need.get(0, 1), 1);
        assert_eq!(need.rows().count(), 1);
    }

    #[test]
    fn test_need_of_empty_state() {
        let need = build_need(&validate(&Snapshot::default()).unwrap());
        assert!(need.is_empty());
    }

    #[test]
    fn test_need_serializes_as_rows() {
        let snap = Snapshot::new(vec![vec![0, 0]], vec![vec![2, 1]], vec![0, 0]);
        let need = build_need(&validate(&snap).unwrap());
        assert_eq!(serde_json::to_string(&need).unwrap(), "[[2,1]]");
    }
}
