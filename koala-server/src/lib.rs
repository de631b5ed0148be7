//! REST surface, configuration, and logging for the koala menu aggregator.

/// HTTP routes and handlers.
pub mod api;
/// Command line and TOML configuration.
pub mod config;
/// Logging setup.
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use koala_core::{
    fetch::DefaultFetcher,
    plugin::ProviderRegistry,
    ports::{PortError, SourceFetcher},
    service::MenuService,
};
use koala_provider_eatery as eatery;
use koala_provider_grill as grill;

pub use api::{AppState, create_router};
pub use config::{AppConfig, Cli, ConfigError};

/// Wire both providers behind a [`MenuService`] using the configured sources.
///
/// # Errors
///
/// Returns [`PortError::Internal`] when the HTTP client cannot be built.
pub fn build_service(config: &AppConfig) -> Result<MenuService, PortError> {
    let fetcher: Arc<dyn SourceFetcher> = Arc::new(DefaultFetcher::with_defaults()?);

    let plugins = vec![
        grill::plugin(Arc::clone(&fetcher), config.grill.clone()),
        eatery::plugin(fetcher, config.eatery.clone()),
    ];
    let registry = Arc::new(ProviderRegistry::new(plugins));

    Ok(MenuService::new(registry))
}

/// Build the complete router for `config`.
///
/// # Errors
///
/// Returns [`PortError::Internal`] when the HTTP client cannot be built.
pub fn build_app(config: &AppConfig) -> Result<Router, PortError> {
    let service = build_service(config)?;
    Ok(create_router(AppState {
        service: Arc::new(service),
    }))
}
