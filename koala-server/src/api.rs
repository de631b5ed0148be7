//! HTTP API handlers and routes using axum.
//!
//! Routes:
//! - GET /providers - Registered providers
//! - GET /providers/locations/{id} - Store information for a location
//! - GET /providers/locations/{id}/menu - Full menu with store information

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use koala_core::{
    model::{Menu, ProviderId, ProviderInfo, ProviderMeta},
    ports::PortError,
    service::MenuService,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Provider dispatch.
    pub service: Arc<MenuService>,
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/providers", get(list_providers))
        .route("/providers/locations/{id}", get(get_provider_info))
        .route("/providers/locations/{id}/menu", get(get_full_menu))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// List registered providers.
/// GET /providers
async fn list_providers(State(state): State<Arc<AppState>>) -> PrettyJson<Vec<ProviderMeta>> {
    PrettyJson(state.service.providers())
}

/// Store information for one location.
/// GET /providers/locations/{id}
async fn get_provider_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<PrettyJson<ProviderInfo>, ApiError> {
    let id = ProviderId(id);
    let meta = resolve(&state, &id)?;

    state
        .service
        .provider_info(&id)
        .await
        .map(PrettyJson)
        .map_err(|err| ApiError::provider(&meta, &err))
}

/// Full menu with embedded store information.
/// GET /providers/locations/{id}/menu
async fn get_full_menu(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<PrettyJson<Menu>, ApiError> {
    let id = ProviderId(id);
    let meta = resolve(&state, &id)?;

    state
        .service
        .full_menu(&id)
        .await
        .map(PrettyJson)
        .map_err(|err| ApiError::provider(&meta, &err))
}

// Unknown selectors are rejected before any provider is invoked.
fn resolve(state: &AppState, id: &ProviderId) -> Result<ProviderMeta, ApiError> {
    state.service.provider(id).map_err(|_err| {
        warn!(location = %id, "request for unknown location");
        ApiError::UnknownLocation
    })
}

/// JSON body pretty-printed with two-space indentation.
pub struct PrettyJson<T>(pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec_pretty(&self.0) {
            Ok(mut body) => {
                body.push(b'\n');
                ([(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            Err(err) => {
                error!(error = %err, "failed to serialize response");
                ApiError::Internal.into_response()
            }
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// API error types.
#[derive(Debug)]
pub enum ApiError {
    /// The selector names no registered provider.
    UnknownLocation,
    /// A provider could not be reached or returned malformed data.
    Provider {
        /// Display name of the failing provider.
        name: String,
    },
    /// The response could not be produced.
    Internal,
}

impl ApiError {
    fn provider(meta: &ProviderMeta, err: &PortError) -> Self {
        error!(provider = %meta.name, error = %err, "provider request failed");
        Self::Provider {
            name: meta.name.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::UnknownLocation => "No items found for this location!".to_owned(),
            ApiError::Provider { name } => {
                format!("Trouble connecting to {name} provider, please try again!")
            }
            ApiError::Internal => "Internal server error".to_owned(),
        };

        let body = Json(ErrorResponse { error: message });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}
