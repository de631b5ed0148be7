//! Registry for all provider plugins.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{ProviderId, ProviderMeta};
use crate::ports::{MenuProvider, PortError};

/// A provider adapter together with its dispatch metadata.
pub struct ProviderPlugin {
    /// Static metadata describing the provider.
    pub meta: ProviderMeta,
    /// Implementation for loading store information and menus.
    pub provider: Arc<dyn MenuProvider>,
}

/// Registry that resolves plugins by location selector.
pub struct ProviderRegistry {
    plugins: HashMap<ProviderId, ProviderPlugin>,
}

impl ProviderRegistry {
    /// Build a registry from the provided plugin list.
    #[must_use]
    pub fn new(plugins: Vec<ProviderPlugin>) -> Self {
        let plugins_map = plugins
            .into_iter()
            .map(|plugin| (plugin.meta.id.clone(), plugin))
            .collect();
        Self {
            plugins: plugins_map,
        }
    }

    /// Return metadata for all registered providers, ordered by selector.
    #[must_use]
    pub fn providers(&self) -> Vec<ProviderMeta> {
        let mut metas: Vec<ProviderMeta> = self
            .plugins
            .values()
            .map(|plugin| plugin.meta.clone())
            .collect();
        metas.sort_by(|left, right| left.id.0.cmp(&right.id.0));
        metas
    }

    /// Look up the plugin registered for a selector.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::UnsupportedLocation`] when no plugin is registered.
    pub fn plugin(&self, id: &ProviderId) -> Result<&ProviderPlugin, PortError> {
        self.plugins
            .get(id)
            .ok_or_else(|| PortError::UnsupportedLocation(id.0.clone()))
    }
}
