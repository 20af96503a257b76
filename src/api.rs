//! JSON request/response boundary.
//!
//! Wraps [`ReflowEngine::reflow`] for callers that exchange plain JSON,
//! turning errors into a failure payload instead of an `Err`.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::models::{ManufacturingOrder, ReflowResult, WorkCenter, WorkOrder};
use crate::scheduler::ReflowEngine;

/// Input to one reflow call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowRequest {
    /// Work orders to reflow.
    pub work_orders: Vec<WorkOrder>,
    /// Work centers they run on.
    pub work_centers: Vec<WorkCenter>,
    /// Passed through to the engine; may be omitted.
    #[serde(default)]
    pub manufacturing_orders: Vec<ManufacturingOrder>,
}

/// Output of one reflow call.
///
/// Serializes as the bare [`ReflowResult`] on success, or as
/// `{ "success": false, "status": "Error: ..." }` on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReflowResponse {
    Success(ReflowResult),
    Failure { success: bool, status: String },
}

impl ReflowResponse {
    /// Builds a failure response from any displayable error.
    pub fn failure(message: impl std::fmt::Display) -> Self {
        Self::Failure {
            success: false,
            status: format!("Error: {message}"),
        }
    }

    /// Whether the reflow succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The result, if the reflow succeeded.
    pub fn result(&self) -> Option<&ReflowResult> {
        match self {
            Self::Success(result) => Some(result),
            Self::Failure { .. } => None,
        }
    }
}

/// Runs `request` through `engine`. Never fails; errors become
/// [`ReflowResponse::Failure`].
pub fn handle(request: &ReflowRequest, engine: &ReflowEngine) -> ReflowResponse {
    match engine.reflow(
        &request.work_orders,
        &request.work_centers,
        &request.manufacturing_orders,
    ) {
        Ok(result) => ReflowResponse::Success(result),
        Err(e) => {
            error!(error = %e, "reflow failed");
            ReflowResponse::failure(e)
        }
    }
}
