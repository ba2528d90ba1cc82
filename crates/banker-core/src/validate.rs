//! Input validation
//!
//! Every snapshot passes through [`validate`] before any simulation runs.
//! The checks run in a fixed order and the first failure wins:
//!
//! 1. **Row count**: allocation and maximum describe the same processes
//! 2. **Row width**: every row has one entry per resource class
//! 3. **Sign**: allocation, then maximum, then available hold no negatives
//! 4. **Dominance**: no process holds more than its declared maximum
//!
//! Nothing is clamped or inferred. A snapshot either converts into a
//! [`ResourceState`] unchanged or is rejected with its location.

use alloc::vec::Vec;
use core::fmt;

use crate::types::{MatrixKind, ProcessIndex, ResourceIndex, ResourceState, Snapshot};

/// Reasons a snapshot is rejected
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Allocation and maximum disagree on the number of processes
    RowCountMismatch {
        allocation_rows: usize,
        maximum_rows: usize,
    },

    /// A matrix row does not have one entry per resource class
    ColumnCountMismatch {
        matrix: MatrixKind,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// An entry is below zero (`row` is `None` for the available vector)
    NegativeEntry {
        matrix: MatrixKind,
        row: Option<usize>,
        column: usize,
        value: i64,
    },

    /// A process already holds more than its declared maximum
    MaximumBelowAllocation {
        process: ProcessIndex,
        resource: ResourceIndex,
        maximum: i64,
        allocation: i64,
    },
}

impl ValidationError {
    /// Stable machine-readable name of the failed check
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::RowCountMismatch { .. } => "row_count_mismatch",
            ValidationError::ColumnCountMismatch { .. } => "column_count_mismatch",
            ValidationError::NegativeEntry { .. } => "negative_entry",
            ValidationError::MaximumBelowAllocation { .. } => "maximum_below_allocation",
        }
    }

    /// The input the failure was found in.
    ///
    /// A row-count mismatch involves both matrices; it is attributed to
    /// `maximum`, which is checked against the allocation's row count.
    pub fn matrix(&self) -> MatrixKind {
        match self {
            ValidationError::RowCountMismatch { .. } => MatrixKind::Maximum,
            ValidationError::ColumnCountMismatch { matrix, .. } => *matrix,
            ValidationError::NegativeEntry { matrix, .. } => *matrix,
            ValidationError::MaximumBelowAllocation { .. } => MatrixKind::Maximum,
        }
    }

    /// Offending row, where one can be named
    pub fn row(&self) -> Option<usize> {
        match self {
            ValidationError::RowCountMismatch { .. } => None,
            ValidationError::ColumnCountMismatch { row, .. } => Some(*row),
            ValidationError::NegativeEntry { row, .. } => *row,
            ValidationError::MaximumBelowAllocation { process, .. } => Some(*process),
        }
    }

    /// Offending column, where one can be named
    pub fn column(&self) -> Option<usize> {
        match self {
            ValidationError::RowCountMismatch { .. } => None,
            ValidationError::ColumnCountMismatch { .. } => None,
            ValidationError::NegativeEntry { column, .. } => Some(*column),
            ValidationError::MaximumBelowAllocation { resource, .. } => Some(*resource),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::RowCountMismatch {
                allocation_rows,
                maximum_rows,
            } => write!(
                f,
                "Shape mismatch: allocation has {} rows, maximum has {}",
                allocation_rows, maximum_rows
            ),
            ValidationError::ColumnCountMismatch {
                matrix,
                row,
                expected,
                found,
            } => write!(
                f,
                "Shape mismatch: {} row {} has {} entries, expected {} (length of available)",
                matrix, row, found, expected
            ),
            ValidationError::NegativeEntry {
                matrix,
                row: Some(row),
                column,
                value,
            } => write!(
                f,
                "Negative entry: {}[{}][{}] = {}",
                matrix, row, column, value
            ),
            ValidationError::NegativeEntry {
                matrix,
                row: None,
                column,
                value,
            } => write!(f, "Negative entry: {}[{}] = {}", matrix, column, value),
            ValidationError::MaximumBelowAllocation {
                process,
                resource,
                maximum,
                allocation,
            } => write!(
                f,
                "Maximum below allocation: process {} resource {} has maximum {} < allocation {}",
                process, resource, maximum, allocation
            ),
        }
    }
}

impl core::error::Error for ValidationError {}

/// Check a snapshot and convert it into a [`ResourceState`].
///
/// # Invariants
/// - The snapshot is only read, never modified
/// - On `Ok`, `maximum[i][j] >= allocation[i][j]` for every entry
pub fn validate(snapshot: &Snapshot) -> Result<ResourceState, ValidationError> {
    let resources = snapshot.available.len();

    // 1. Both matrices describe the same processes
    if snapshot.allocation.len() != snapshot.maximum.len() {
        return Err(ValidationError::RowCountMismatch {
            allocation_rows: snapshot.allocation.len(),
            maximum_rows: snapshot.maximum.len(),
        });
    }

    // 2. Rectangular, with one column per resource class
    check_width(MatrixKind::Allocation, &snapshot.allocation, resources)?;
    check_width(MatrixKind::Maximum, &snapshot.maximum, resources)?;

    // 3. No negative entries anywhere
    let allocation = to_unsigned_matrix(MatrixKind::Allocation, &snapshot.allocation)?;
    let maximum = to_unsigned_matrix(MatrixKind::Maximum, &snapshot.maximum)?;
    let available = to_unsigned_row(MatrixKind::Available, None, &snapshot.available)?;

    // 4. Nobody holds more than they declared
    for (process, (held, declared)) in allocation.iter().zip(&maximum).enumerate() {
        for (resource, (&a, &m)) in held.iter().zip(declared).enumerate() {
            if m < a {
                return Err(ValidationError::MaximumBelowAllocation {
                    process,
                    resource,
                    maximum: snapshot.maximum[process][resource],
                    allocation: snapshot.allocation[process][resource],
                });
            }
        }
    }

    Ok(ResourceState {
        allocation,
        maximum,
        available,
    })
}

fn check_width(
    matrix: MatrixKind,
    rows: &[Vec<i64>],
    expected: usize,
) -> Result<(), ValidationError> {
    match rows.iter().position(|row| row.len() != expected) {
        Some(row) => Err(ValidationError::ColumnCountMismatch {
            matrix,
            row,
            expected,
            found: rows[row].len(),
        }),
        None => Ok(()),
    }
}

fn to_unsigned_matrix(
    matrix: MatrixKind,
    rows: &[Vec<i64>],
) -> Result<Vec<Vec<u64>>, ValidationError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| to_unsigned_row(matrix, Some(i), row))
        .collect()
}

fn to_unsigned_row(
    matrix: MatrixKind,
    row: Option<usize>,
    values: &[i64],
) -> Result<Vec<u64>, ValidationError> {
    values
        .iter()
        .enumerate()
        .map(|(column, &value)| {
            u64::try_from(value).map_err(|_| ValidationError::NegativeEntry {
                matrix,
                row,
                column,
                value,
            })
        })
        .collect()
}
