//! Provider implementation for the JSON eatery catalog and location API.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use koala_core::{
    aggregate::join_menu_with_info,
    model::{
        Category, Menu, MenuItem, Modifier, ModifierOption, ProviderHour, ProviderId,
        ProviderInfo, ProviderMeta, Providers,
    },
    plugin::ProviderPlugin,
    ports::{MenuProvider, PortError, SourceFetcher},
};

const DEFAULT_LOCATION_ID: &str = "2";
const DEFAULT_MENU_SOURCE: &str = "./goldenfiles/json-eatery-menu.json";
const DEFAULT_LOCATION_SOURCE: &str = "./goldenfiles/json-eatery-location.json";

/// Where the eatery's documents live and which location to serve.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EateryConfig {
    /// Identifier of the location to select from the location list.
    pub location_id: String,
    /// Path or URL of the catalog document.
    pub menu_source: String,
    /// Path or URL of the location list document.
    pub location_source: String,
}

impl Default for EateryConfig {
    fn default() -> Self {
        Self {
            location_id: DEFAULT_LOCATION_ID.to_owned(),
            menu_source: DEFAULT_MENU_SOURCE.to_owned(),
            location_source: DEFAULT_LOCATION_SOURCE.to_owned(),
        }
    }
}

/// Response from the locations endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationsResponse {
    #[serde(deserialize_with = "null_as_default")]
    locations: Vec<LocationEntry>,
}

/// Single store from the locations endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationEntry {
    #[serde(deserialize_with = "null_as_default")]
    id: String,
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    address: LocationAddress,
    #[serde(deserialize_with = "null_as_default")]
    capabilities: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    phone_number: String,
    #[serde(deserialize_with = "null_as_default")]
    business_hours: BusinessHours,
    #[serde(deserialize_with = "null_as_default")]
    coordinates: Coordinates,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationAddress {
    #[serde(deserialize_with = "null_as_default")]
    address_line_1: String,
    #[serde(deserialize_with = "null_as_default")]
    locality: String,
    #[serde(deserialize_with = "null_as_default")]
    postal_code: String,
    #[serde(deserialize_with = "null_as_default")]
    country: String,
    #[serde(deserialize_with = "null_as_default")]
    administrative_district_level_1: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BusinessHours {
    #[serde(deserialize_with = "null_as_default")]
    periods: Vec<Period>,
}

/// Opening period; times are already `HH:MM:SS`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Period {
    #[serde(deserialize_with = "null_as_default")]
    day_of_week: String,
    #[serde(deserialize_with = "null_as_default")]
    start_local_time: String,
    #[serde(deserialize_with = "null_as_default")]
    end_local_time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Coordinates {
    #[serde(deserialize_with = "null_as_default")]
    latitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    longitude: f64,
}

/// Response from the catalog endpoint: a flat list of typed records.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogResponse {
    #[serde(deserialize_with = "null_as_default")]
    objects: Vec<CatalogObject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogObject {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    kind: String, // "ITEM", "CATEGORY", "MODIFIER_LIST", ...
    #[serde(deserialize_with = "null_as_default")]
    id: String,
    #[serde(deserialize_with = "null_as_default")]
    is_deleted: bool,
    #[serde(deserialize_with = "null_as_default")]
    category_data: CategoryData,
    #[serde(deserialize_with = "null_as_default")]
    modifier_list_data: ModifierListData,
    #[serde(deserialize_with = "null_as_default")]
    item_data: ItemData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryData {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModifierListData {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    modifiers: Vec<CatalogModifier>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogModifier {
    #[serde(deserialize_with = "null_as_default")]
    modifier_data: ModifierData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModifierData {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    price_money: Money,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Money {
    #[serde(deserialize_with = "null_as_default")]
    amount: f64,
    // currency is always the store currency, no need to model it
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemData {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    description: String,
    #[serde(deserialize_with = "null_as_default")]
    category_id: String,
    #[serde(deserialize_with = "null_as_default")]
    modifier_list_info: Vec<ModifierListInfo>,
    // variations carry per-size pricing which the canonical model does not expose
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModifierListInfo {
    #[serde(deserialize_with = "null_as_default")]
    modifier_list_id: String,
}

// A JSON `null` reads as the field's zero value, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Menu and location backend for the JSON eatery.
pub struct EateryProvider {
    fetcher: Arc<dyn SourceFetcher>,
    config: EateryConfig,
}

impl EateryProvider {
    /// Create a provider reading its documents through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn SourceFetcher>, config: EateryConfig) -> Self {
        Self { fetcher, config }
    }
}

#[async_trait]
impl MenuProvider for EateryProvider {
    async fn provider_info(&self) -> Result<ProviderInfo, PortError> {
        load_provider_info(
            self.fetcher.as_ref(),
            &self.config.location_source,
            &self.config.location_id,
        )
        .await
    }

    async fn full_menu(&self) -> Result<Menu, PortError> {
        let menu_fetcher = Arc::clone(&self.fetcher);
        let menu_source = self.config.menu_source.clone();
        let menu = async move { load_menu(menu_fetcher.as_ref(), &menu_source).await };

        let info_fetcher = Arc::clone(&self.fetcher);
        let location_source = self.config.location_source.clone();
        let location_id = self.config.location_id.clone();
        let info = async move {
            load_provider_info(info_fetcher.as_ref(), &location_source, &location_id).await
        };

        join_menu_with_info(menu, info).await
    }
}

/// Build the plugin bundle for the eatery provider.
#[must_use]
pub fn plugin(fetcher: Arc<dyn SourceFetcher>, config: EateryConfig) -> ProviderPlugin {
    ProviderPlugin {
        meta: provider_meta(),
        provider: Arc::new(EateryProvider::new(fetcher, config)),
    }
}

fn provider_meta() -> ProviderMeta {
    ProviderMeta {
        id: ProviderId::from(Providers::Eatery),
        name: String::from("eatery"),
    }
}

async fn load_provider_info(
    fetcher: &dyn SourceFetcher,
    source: &str,
    location_id: &str,
) -> Result<ProviderInfo, PortError> {
    let raw = fetcher.get(source).await?;
    let response: LocationsResponse =
        serde_json::from_slice(&raw).map_err(|err| PortError::decode(source, err))?;

    Ok(build_provider_info(response, location_id))
}

async fn load_menu(fetcher: &dyn SourceFetcher, source: &str) -> Result<Menu, PortError> {
    let raw = fetcher.get(source).await?;
    let response: CatalogResponse =
        serde_json::from_slice(&raw).map_err(|err| PortError::decode(source, err))?;

    Ok(build_menu(response))
}

/// Pick the configured location and normalize it into [`ProviderInfo`].
///
/// An unmatched id yields an empty [`ProviderInfo`].
fn build_provider_info(response: LocationsResponse, location_id: &str) -> ProviderInfo {
    let Some(location) = response
        .locations
        .into_iter()
        .find(|candidate| candidate.id == location_id)
    else {
        warn!(location_id, "eatery location list has no matching entry");
        return ProviderInfo::default();
    };

    let mut info = ProviderInfo {
        id: location.id,
        name: location.name,
        street_address: location.address.address_line_1,
        city: location.address.locality,
        state: location.address.administrative_district_level_1,
        country: location.address.country,
        zip: location.address.postal_code,
        telephone: location.phone_number,
        longitude: location.coordinates.longitude,
        latitude: location.coordinates.latitude,
        store_hours: location
            .business_hours
            .periods
            .into_iter()
            .map(|period| ProviderHour {
                kind: String::new(),
                day_of_week: period.day_of_week,
                opens: period.start_local_time,
                closes: period.end_local_time,
            })
            .collect(),
        payment_methods: Vec::new(),
    };

    // "credit_card" -> "credit card", matching the grill's wording
    for capability in location.capabilities {
        info.add_payment_method(capability.replace('_', " "));
    }

    info
}

/// Assemble the catalog into a [`Menu`].
///
/// Categories and modifier lists are indexed first, so items resolve their
/// references regardless of where those records appear in the document.
fn build_menu(response: CatalogResponse) -> Menu {
    let mut categories = HashMap::new();
    let mut modifiers = HashMap::new();

    for object in &response.objects {
        match object.kind.as_str() {
            "CATEGORY" => {
                categories.insert(object.id.as_str(), build_category(object));
            }
            "MODIFIER_LIST" => {
                modifiers.insert(object.id.as_str(), build_modifier(object));
            }
            _ => {}
        }
    }

    let menu_items: Vec<MenuItem> = response
        .objects
        .iter()
        .filter(|object| object.kind == "ITEM" && !object.id.is_empty())
        .map(|object| build_item(object, &categories, &modifiers))
        .collect();

    debug!(
        items = menu_items.len(),
        categories = categories.len(),
        modifier_lists = modifiers.len(),
        "assembled eatery menu"
    );

    Menu {
        provider_info: None,
        menu_items,
    }
}

fn build_category(object: &CatalogObject) -> Category {
    Category {
        id: object.id.clone(),
        name: object.category_data.name.clone(),
        disabled: object.is_deleted,
    }
}

fn build_modifier(object: &CatalogObject) -> Modifier {
    Modifier {
        id: object.id.clone(),
        name: object.modifier_list_data.name.clone(),
        disabled: object.is_deleted,
        cost: 0.0,
        options: object
            .modifier_list_data
            .modifiers
            .iter()
            .map(|modifier| ModifierOption {
                name: modifier.modifier_data.name.clone(),
                cost: modifier.modifier_data.price_money.amount,
            })
            .collect(),
    }
}

fn build_item(
    object: &CatalogObject,
    categories: &HashMap<&str, Category>,
    modifiers: &HashMap<&str, Modifier>,
) -> MenuItem {
    let data = &object.item_data;

    // Only the last referenced list is kept
    let modifier_list_id = data
        .modifier_list_info
        .last()
        .map(|info| info.modifier_list_id.clone())
        .unwrap_or_default();

    MenuItem {
        id: object.id.clone(),
        name: data.name.clone(),
        description: data.description.clone(),
        disabled: object.is_deleted,
        category_id: data.category_id.clone(),
        category: categories.get(data.category_id.as_str()).cloned(),
        modifiers: modifiers
            .get(modifier_list_id.as_str())
            .cloned()
            .into_iter()
            .collect(),
        modifier_list_id,
    }
}
