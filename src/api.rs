use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Json, Redirect};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::directory::Catalog;
use crate::error::DirectoryError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn root() -> Redirect {
    Redirect::temporary("/static/index.html")
}

// --- Activities ---

#[derive(Debug, Deserialize)]
pub struct EmailParams {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn list_activities(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.directory().list().await)
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    Query(params): Query<EmailParams>,
) -> Result<Json<MessageResponse>, DirectoryError> {
    match state.directory().signup(&activity_name, &params.email).await {
        Ok(message) => {
            info!(activity = %activity_name, email = %params.email, "signed up");
            Ok(Json(MessageResponse { message }))
        }
        Err(e) => {
            warn!(activity = %activity_name, email = %params.email, error = %e, "signup rejected");
            Err(e)
        }
    }
}

pub async fn unregister(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    Query(params): Query<EmailParams>,
) -> Result<Json<MessageResponse>, DirectoryError> {
    match state
        .directory()
        .unregister(&activity_name, &params.email)
        .await
    {
        Ok(message) => {
            info!(activity = %activity_name, email = %params.email, "unregistered");
            Ok(Json(MessageResponse { message }))
        }
        Err(e) => {
            warn!(activity = %activity_name, email = %params.email, error = %e, "unregister rejected");
            Err(e)
        }
    }
}
