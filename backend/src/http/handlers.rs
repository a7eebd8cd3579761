//! HTTP handlers for the REST API.
//!
//! Each handler validates its input, delegates to the planner against the
//! shared read-only catalog, and shapes the JSON response.

use axum::{extract::State, Json};

use super::dto::{
    HealthResponse, MaintenanceWindow, OptimizeRequest, OptimizeResponse, Patch, VersionResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::OptimizationWeights;
use crate::planner::{self, OptimizeOptions};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /api/health
///
/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /api/version
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/windows
///
/// The read-only maintenance window catalog.
pub async fn list_windows(State(state): State<AppState>) -> Json<Vec<MaintenanceWindow>> {
    Json(state.catalog.windows().to_vec())
}

/// GET /api/patches
///
/// The read-only patch catalog.
pub async fn list_patches(State(state): State<AppState>) -> Json<Vec<Patch>> {
    Json(state.catalog.patches().to_vec())
}

/// POST /api/optimize
///
/// Run one optimization pass over the catalog with the supplied weights and
/// forced decisions. The solve is CPU-bound and runs on the blocking pool.
pub async fn optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> HandlerResult<OptimizeResponse> {
    validate_weights(&request.weights)?;

    let catalog = state.catalog.clone();
    let result = tokio::task::spawn_blocking(move || {
        let opts = OptimizeOptions {
            max_windows: request.max_windows,
            force_include: request.force_include,
            force_exclude: request.force_exclude,
        };
        planner::optimize_schedule(
            catalog.windows(),
            catalog.patches(),
            &request.weights,
            &opts,
        )
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(result.into()))
}

fn validate_weights(weights: &OptimizationWeights) -> Result<(), AppError> {
    for (name, value) in [
        ("risk", weights.risk),
        ("cost", weights.cost),
        ("outage", weights.outage),
    ] {
        if !value.is_finite() {
            return Err(AppError::BadRequest(format!(
                "weight '{}' must be a finite number",
                name
            )));
        }
        if value < 0.0 {
            return Err(AppError::BadRequest(format!(
                "weight '{}' must be non-negative, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_weights_rejects_negative() {
        let weights = OptimizationWeights {
            risk: 1.0,
            cost: -0.1,
            outage: 0.0,
        };
        assert!(validate_weights(&weights).is_err());
    }

    #[test]
    fn test_validate_weights_rejects_nan() {
        let weights = OptimizationWeights {
            risk: f64::NAN,
            cost: 0.0,
            outage: 0.0,
        };
        assert!(validate_weights(&weights).is_err());
    }

    #[test]
    fn test_validate_weights_accepts_all_zero() {
        // All-zero is valid; normalization falls back to uniform thirds.
        let weights = OptimizationWeights {
            risk: 0.0,
            cost: 0.0,
            outage: 0.0,
        };
        assert!(validate_weights(&weights).is_ok());
    }
}
