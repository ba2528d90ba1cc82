//! HTTP routes
//!
//! `POST /bankers` runs one safety check per request. The check is pure but
//! `O(n^2 * m)`, so it runs on the blocking pool and never holds a runtime
//! worker while it simulates.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use banker_core::{check_safety, SafetyOutcome, Snapshot};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;

/// Decide safety of the posted snapshot
pub async fn check_bankers(
    payload: Result<Json<Snapshot>, JsonRejection>,
) -> Result<Json<SafetyOutcome>, ApiError> {
    let Json(snapshot) = payload?;
    debug!(
        processes = snapshot.allocation.len(),
        resources = snapshot.available.len(),
        "safety check requested"
    );

    let report = tokio::task::spawn_blocking(move || check_safety(&snapshot)).await??;
    info!(
        safe = report.outcome.is_safe(),
        completed = report.outcome.sequence().len(),
        deadlocked = report.outcome.deadlocked().len(),
        "safety check complete"
    );

    Ok(Json(report.outcome))
}

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    version: &'static str,
}

/// Liveness probe
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
