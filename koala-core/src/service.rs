//! High-level service facade combining all providers.

use std::sync::Arc;

use crate::model::{Menu, ProviderId, ProviderInfo, ProviderMeta};
use crate::plugin::ProviderRegistry;
use crate::ports::PortError;

/// Public entry point for loading store information and menus.
pub struct MenuService {
    registry: Arc<ProviderRegistry>,
}

impl MenuService {
    /// Create a new service bound to the provided registry.
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// List all registered providers.
    #[must_use]
    pub fn providers(&self) -> Vec<ProviderMeta> {
        self.registry.providers()
    }

    /// Resolve the provider registered for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::UnsupportedLocation`] if the selector is unknown.
    pub fn provider(&self, id: &ProviderId) -> Result<ProviderMeta, PortError> {
        self.registry.plugin(id).map(|plugin| plugin.meta.clone())
    }

    /// Load the store information for the provider behind `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the selector is unknown or the provider call fails.
    pub async fn provider_info(&self, id: &ProviderId) -> Result<ProviderInfo, PortError> {
        let plugin = self.registry.plugin(id)?;
        plugin.provider.provider_info().await
    }

    /// Load the full menu, with store information attached, for the provider behind `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the selector is unknown or either source fails.
    pub async fn full_menu(&self, id: &ProviderId) -> Result<Menu, PortError> {
        let plugin = self.registry.plugin(id)?;
        plugin.provider.full_menu().await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::plugin::ProviderPlugin;
    use crate::ports::MenuProvider;

    struct StaticProvider {
        meta: ProviderMeta,
    }

    #[async_trait]
    impl MenuProvider for StaticProvider {
        async fn provider_info(&self) -> Result<ProviderInfo, PortError> {
            Ok(ProviderInfo {
                id: self.meta.id.0.clone(),
                name: self.meta.name.clone(),
                ..ProviderInfo::default()
            })
        }

        async fn full_menu(&self) -> Result<Menu, PortError> {
            Ok(Menu {
                provider_info: Some(self.provider_info().await?),
                menu_items: Vec::new(),
            })
        }
    }

    fn plugin(id: &str, name: &str) -> ProviderPlugin {
        let meta = ProviderMeta {
            id: ProviderId(id.to_owned()),
            name: name.to_owned(),
        };
        ProviderPlugin {
            meta: meta.clone(),
            provider: Arc::new(StaticProvider { meta }),
        }
    }

    fn service() -> MenuService {
        let registry = ProviderRegistry::new(vec![plugin("2", "eatery"), plugin("1", "grill")]);
        MenuService::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn dispatches_by_selector() {
        let svc = service();

        let grill = svc
            .provider_info(&ProviderId("1".to_owned()))
            .await
            .expect("grill info");
        let eatery = svc
            .full_menu(&ProviderId("2".to_owned()))
            .await
            .expect("eatery menu");

        assert_eq!(grill.name, "grill");
        assert_eq!(eatery.provider_info.map(|info| info.name).as_deref(), Some("eatery"));
    }

    #[tokio::test]
    async fn unknown_selector_is_rejected() {
        let err = service()
            .full_menu(&ProviderId("3".to_owned()))
            .await
            .expect_err("no provider for 3");

        assert!(
            matches!(err, PortError::UnsupportedLocation(ref id) if id == "3"),
            "got {err:?}"
        );
    }

    #[test]
    fn providers_are_listed_by_selector() {
        let ids: Vec<String> = service()
            .providers()
            .into_iter()
            .map(|meta| meta.id.0)
            .collect();

        assert_eq!(ids, vec!["1", "2"]);
    }
}
