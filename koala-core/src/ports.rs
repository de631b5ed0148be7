//! Traits describing provider capabilities and shared helper types.

use std::fmt;

use async_trait::async_trait;

use crate::model::{Menu, ProviderInfo};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to provider sources.
pub enum PortError {
    /// The raw source could not be read.
    #[error("Fetch error for {source_id}: {message}")]
    Fetch {
        /// Path or URL that failed.
        source_id: String,
        /// Underlying failure.
        message: String,
    },
    /// The raw source was read but is not a valid document.
    #[error("Decode error for {source_id}: {message}")]
    Decode {
        /// Path or URL of the malformed document.
        source_id: String,
        /// Underlying parser failure.
        message: String,
    },
    /// No provider is registered for the requested selector.
    #[error("Unsupported location: {0}")]
    UnsupportedLocation(String),
    /// Internal orchestration error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortError {
    /// Build a [`PortError::Fetch`] for the given source.
    pub fn fetch(source_id: &str, err: impl fmt::Display) -> Self {
        Self::Fetch {
            source_id: source_id.to_owned(),
            message: err.to_string(),
        }
    }

    /// Build a [`PortError::Decode`] for the given source.
    pub fn decode(source_id: &str, err: impl fmt::Display) -> Self {
        Self::Decode {
            source_id: source_id.to_owned(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
/// Retrieves raw source documents by path or URL.
pub trait SourceFetcher: Send + Sync {
    /// Read the complete document behind `source`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Fetch`] when the source is unavailable.
    async fn get(&self, source: &str) -> Result<Vec<u8>, PortError>;
}

#[async_trait]
/// Trait for provider-specific menu and location backends.
pub trait MenuProvider: Send + Sync {
    /// Load the configured location's store information.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the location document cannot be fetched or decoded.
    async fn provider_info(&self) -> Result<ProviderInfo, PortError>;

    /// Load the full menu with the configured location's store information attached.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when either the menu or the location document
    /// cannot be fetched or decoded.
    async fn full_menu(&self) -> Result<Menu, PortError>;
}
