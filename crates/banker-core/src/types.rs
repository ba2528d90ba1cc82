//! Core safety-check types
//!
//! This module contains the value types that flow through the pipeline.
//! All types here are pure data snapshots - nothing is shared between
//! invocations and nothing is persisted.

use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Process identifier, an index into the rows of the allocation matrix
pub type ProcessIndex = usize;

/// Resource class identifier, an index into the available vector
pub type ResourceIndex = usize;

/// Row-major integer matrix as it arrives on the wire
pub type Matrix = Vec<Vec<i64>>;

/// The three inputs of one safety check, exactly as supplied by the caller.
///
/// Entries are signed so that negative values survive decoding and are
/// rejected by the validator with a precise location.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// `allocation[i][j]` = units of resource `j` held by process `i`
    pub allocation: Matrix,
    /// `maximum[i][j]` = most units of resource `j` process `i` will ever hold
    pub maximum: Matrix,
    /// `available[j]` = units of resource `j` held by nobody
    pub available: Vec<i64>,
}

impl Snapshot {
    /// Bundle the three inputs into a snapshot.
    pub fn new(allocation: Matrix, maximum: Matrix, available: Vec<i64>) -> Self {
        Self {
            allocation,
            maximum,
            available,
        }
    }
}

/// Which of the three inputs an error or location refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixKind {
    /// Allocation matrix `A`
    Allocation,
    /// Maximum matrix `M`
    Maximum,
    /// Available vector `V`
    Available,
}

impl MatrixKind {
    /// Wire name of the input
    pub fn as_str(&self) -> &'static str {
        match self {
            MatrixKind::Allocation => "allocation",
            MatrixKind::Maximum => "maximum",
            MatrixKind::Available => "available",
        }
    }
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot that has passed validation.
///
/// Only [`crate::validate::validate`] constructs this type, so holding one
/// proves the shape, sign and dominance checks succeeded. It owns unsigned
/// copies of the caller's data; the caller's snapshot is never touched again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceState {
    pub(crate) allocation: Vec<Vec<u64>>,
    pub(crate) maximum: Vec<Vec<u64>>,
    pub(crate) available: Vec<u64>,
}

impl ResourceState {
    /// Number of processes (`n`)
    pub fn processes(&self) -> usize {
        self.allocation.len()
    }

    /// Number of resource classes (`m`)
    pub fn resources(&self) -> usize {
        self.available.len()
    }

    /// Units currently held by `process`, one entry per resource class
    pub fn allocation(&self, process: ProcessIndex) -> &[u64] {
        &self.allocation[process]
    }

    /// Declared maximum of `process`, one entry per resource class
    pub fn maximum(&self, process: ProcessIndex) -> &[u64] {
        &self.maximum[process]
    }

    /// Units not held by any process
    pub fn available(&self) -> &[u64] {
        &self.available
    }
}
