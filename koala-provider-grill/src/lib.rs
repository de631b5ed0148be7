//! Provider implementation for the XML grill, whose single document carries
//! both the store's location attributes and its nested menu.

use std::sync::Arc;

use async_trait::async_trait;
use quick_xml::de;
use serde::Deserialize;
use serde::de::DeserializeOwned;
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

const DEFAULT_LOCATION_ID: &str = "1";
const DEFAULT_SOURCE: &str = "./goldenfiles/xml-grill-data.xml";

/// Where the grill's document lives and which location to serve.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GrillConfig {
    /// Identifier the document's location must carry.
    pub location_id: String,
    /// Path or URL of the document read for the menu.
    pub menu_source: String,
    /// Path or URL of the document read for the location.
    pub location_source: String,
}

impl Default for GrillConfig {
    fn default() -> Self {
        Self {
            location_id: DEFAULT_LOCATION_ID.to_owned(),
            menu_source: DEFAULT_SOURCE.to_owned(),
            location_source: DEFAULT_SOURCE.to_owned(),
        }
    }
}

/// Root element attributes plus billing and opening hours.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationDocument {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@streetaddress")]
    street_address: String,
    #[serde(rename = "@city")]
    city: String,
    #[serde(rename = "@state")]
    state: String,
    #[serde(rename = "@country")]
    country: String,
    #[serde(rename = "@zip")]
    zip: String,
    #[serde(rename = "@telephone")]
    telephone: String,
    #[serde(rename = "@longitude")]
    longitude: f64,
    #[serde(rename = "@latitude")]
    latitude: f64,
    #[serde(rename = "billingdetails")]
    billing_details: BillingDetails,
    hours: Hours,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BillingDetails {
    #[serde(rename = "billingmethods")]
    billing_methods: BillingMethods,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BillingMethods {
    #[serde(rename = "billingmethod")]
    methods: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Hours {
    period: Vec<Period>,
}

/// `<period type=".." day="MONDAY" from="09:00" to="17:00"/>`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Period {
    #[serde(rename = "@type")]
    kind: String,
    #[serde(rename = "@day")]
    day: String,
    #[serde(rename = "@from")]
    from: String,
    #[serde(rename = "@to")]
    to: String,
}

/// The same root element, read for its `<menu>` children.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MenuDocument {
    menu: Vec<MenuSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MenuSection {
    categories: Categories,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Categories {
    category: Vec<CategoryElement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryElement {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name")]
    name: String,
    products: Products,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Products {
    product: Vec<Product>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Product {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@description")]
    description: String,
    modifiers: OptionGroups,
}

/// `<modifiers><optiongroup>..</optiongroup></modifiers>`, used both for a
/// product's modifiers and for a modifier's own choices.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OptionGroups {
    #[serde(rename = "optiongroup")]
    groups: Vec<OptionGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OptionGroup {
    options: OptionList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OptionList {
    option: Vec<OptionElement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OptionElement {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@cost")]
    cost: f64,
    modifiers: OptionGroups,
}

/// Menu and location backend for the XML grill.
pub struct GrillProvider {
    fetcher: Arc<dyn SourceFetcher>,
    config: GrillConfig,
}

impl GrillProvider {
    /// Create a provider reading its document through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn SourceFetcher>, config: GrillConfig) -> Self {
        Self { fetcher, config }
    }
}

#[async_trait]
impl MenuProvider for GrillProvider {
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

/// Build the plugin bundle for the grill provider.
#[must_use]
pub fn plugin(fetcher: Arc<dyn SourceFetcher>, config: GrillConfig) -> ProviderPlugin {
    ProviderPlugin {
        meta: provider_meta(),
        provider: Arc::new(GrillProvider::new(fetcher, config)),
    }
}

fn provider_meta() -> ProviderMeta {
    ProviderMeta {
        id: ProviderId::from(Providers::Grill),
        name: String::from("grill"),
    }
}

async fn load_provider_info(
    fetcher: &dyn SourceFetcher,
    source: &str,
    location_id: &str,
) -> Result<ProviderInfo, PortError> {
    let document = fetch_xml::<LocationDocument>(fetcher, source).await?;
    Ok(build_provider_info(document, location_id))
}

async fn load_menu(fetcher: &dyn SourceFetcher, source: &str) -> Result<Menu, PortError> {
    let document = fetch_xml::<MenuDocument>(fetcher, source).await?;
    Ok(build_menu(document))
}

// Small helper to fetch and decode an XML document.
async fn fetch_xml<T: DeserializeOwned>(
    fetcher: &dyn SourceFetcher,
    source: &str,
) -> Result<T, PortError> {
    let raw = fetcher.get(source).await?;
    let text = String::from_utf8(raw).map_err(|err| PortError::decode(source, err))?;
    de::from_str(&text).map_err(|err| PortError::decode(source, err))
}

/// Normalize the root location into [`ProviderInfo`] when it carries `location_id`.
fn build_provider_info(document: LocationDocument, location_id: &str) -> ProviderInfo {
    if document.id != location_id {
        warn!(
            location_id,
            found = %document.id,
            "grill document describes a different location"
        );
        return ProviderInfo::default();
    }

    let mut info = ProviderInfo {
        id: document.id,
        name: document.name,
        street_address: document.street_address,
        city: document.city.to_uppercase(),
        state: document.state,
        country: document.country,
        zip: document.zip,
        telephone: document.telephone,
        longitude: document.longitude,
        latitude: document.latitude,
        store_hours: document.hours.period.into_iter().map(normalize_hour).collect(),
        payment_methods: Vec::new(),
    };

    for method in document.billing_details.billing_methods.methods {
        info.add_payment_method(method);
    }

    info
}

/// `MONDAY 09:00-17:00` becomes `MON 09:00:00-17:00:00`.
fn normalize_hour(period: Period) -> ProviderHour {
    ProviderHour {
        kind: period.kind,
        day_of_week: period.day.to_uppercase().chars().take(3).collect(),
        opens: format!("{}:00", period.from),
        closes: format!("{}:00", period.to),
    }
}

/// One item per product, each owning its category and only its own modifiers.
fn build_menu(document: MenuDocument) -> Menu {
    let mut menu_items = Vec::new();

    for section in document.menu {
        for category in section.categories.category {
            let owner = Category {
                id: category.id,
                name: category.name,
                disabled: false,
            };

            for product in category.products.product {
                menu_items.push(MenuItem {
                    id: product.id,
                    name: product.name,
                    description: product.description,
                    disabled: false,
                    category_id: owner.id.clone(),
                    category: Some(owner.clone()),
                    modifier_list_id: String::new(),
                    modifiers: build_modifiers(product.modifiers),
                });
            }
        }
    }

    debug!(items = menu_items.len(), "assembled grill menu");

    Menu {
        provider_info: None,
        menu_items,
    }
}

fn build_modifiers(groups: OptionGroups) -> Vec<Modifier> {
    groups
        .groups
        .into_iter()
        .flat_map(|group| group.options.option)
        .map(|option| Modifier {
            id: option.id,
            name: option.name,
            disabled: false,
            cost: option.cost,
            options: option
                .modifiers
                .groups
                .into_iter()
                .flat_map(|choices| choices.options.option)
                .map(|choice| ModifierOption {
                    name: choice.name,
                    cost: choice.cost,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<location id="1" name="Grill B" streetaddress="5 Elm St" city="Shelbyville" state="IL"
          country="US" zip="62565" telephone="+1 217-555-0199" longitude="-88.79" latitude="39.41">
  <billingdetails>
    <billingmethods>
      <billingmethod>credit card</billingmethod>
      <billingmethod>cash</billingmethod>
    </billingmethods>
  </billingdetails>
  <hours>
    <period type="regular" day="MONDAY" from="09:00" to="17:00"/>
    <period type="regular" day="friday" from="11:30" to="23:00"/>
  </hours>
  <menu>
    <categories>
      <category id="10" name="Burgers">
        <products>
          <product id="100" name="Classic" description="Quarter pound">
            <modifiers>
              <optiongroup description="Add-ons">
                <options>
                  <option id="M1" name="Cheese" cost="0.5">
                    <modifiers>
                      <optiongroup id="G1">
                        <options>
                          <option name="Cheddar" cost="0.5"/>
                          <option name="Swiss" cost="0.75"/>
                        </options>
                      </optiongroup>
                    </modifiers>
                  </option>
                </options>
              </optiongroup>
            </modifiers>
          </product>
          <product id="101" name="Veggie" description="Black bean"/>
        </products>
      </category>
      <category id="20" name="Sides">
        <products>
          <product id="200" name="Onion Rings">
            <modifiers>
              <optiongroup description="Sauces">
                <options>
                  <option id="M2" name="Dip" cost="0.25"/>
                </options>
              </optiongroup>
            </modifiers>
          </product>
        </products>
      </category>
    </categories>
  </menu>
</location>
"#;

    struct StaticFetcher {
        documents: HashMap<String, String>,
    }

    #[async_trait]
    impl SourceFetcher for StaticFetcher {
        async fn get(&self, source: &str) -> Result<Vec<u8>, PortError> {
            self.documents
                .get(source)
                .map(|doc| doc.as_bytes().to_vec())
                .ok_or_else(|| PortError::fetch(source, "no such document"))
        }
    }

    fn provider(documents: &[(&str, &str)]) -> GrillProvider {
        let fetcher = StaticFetcher {
            documents: documents
                .iter()
                .map(|(source, doc)| ((*source).to_owned(), (*doc).to_owned()))
                .collect(),
        };
        let config = GrillConfig {
            location_id: "1".to_owned(),
            menu_source: "menu.xml".to_owned(),
            location_source: "location.xml".to_owned(),
        };
        GrillProvider::new(Arc::new(fetcher), config)
    }

    fn location() -> LocationDocument {
        de::from_str(DOCUMENT).expect("location fixture")
    }

    fn menu_document() -> MenuDocument {
        de::from_str(DOCUMENT).expect("menu fixture")
    }

    #[test]
    fn normalizes_location_attributes() {
        let info = build_provider_info(location(), "1");

        assert_eq!(info.id, "1");
        assert_eq!(info.name, "Grill B");
        assert_eq!(info.street_address, "5 Elm St");
        assert_eq!(info.city, "SHELBYVILLE");
        assert_eq!(info.zip, "62565");
        assert_eq!(info.payment_methods, vec!["credit card", "cash"]);
        assert!((info.latitude - 39.41).abs() < f64::EPSILON, "latitude");
    }

    #[test]
    fn hours_are_normalized() {
        let info = build_provider_info(location(), "1");

        assert_eq!(
            info.store_hours.first(),
            Some(&ProviderHour {
                kind: "regular".to_owned(),
                day_of_week: "MON".to_owned(),
                opens: "09:00:00".to_owned(),
                closes: "17:00:00".to_owned(),
            })
        );
        for hour in &info.store_hours {
            assert!(hour.opens.ends_with(":00"), "opens {}", hour.opens);
            assert!(hour.closes.ends_with(":00"), "closes {}", hour.closes);
            assert_eq!(hour.day_of_week.len(), 3, "day {}", hour.day_of_week);
            assert!(
                hour.day_of_week.chars().all(|ch| ch.is_ascii_uppercase()),
                "day {}",
                hour.day_of_week
            );
        }
    }

    #[test]
    fn other_location_yields_empty_info() {
        let info = build_provider_info(location(), "7");

        assert_eq!(info, ProviderInfo::default());
    }

    #[test]
    fn builds_one_item_per_product_with_its_category() {
        let menu = build_menu(menu_document());
        let summary: Vec<(&str, &str)> = menu
            .menu_items
            .iter()
            .map(|item| {
                (
                    item.name.as_str(),
                    item.category.as_ref().map_or("", |cat| cat.name.as_str()),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Classic", "Burgers"),
                ("Veggie", "Burgers"),
                ("Onion Rings", "Sides")
            ]
        );
    }

    #[test]
    fn modifiers_do_not_leak_between_items() {
        let menu = build_menu(menu_document());
        let modifier_ids: Vec<Vec<&str>> = menu
            .menu_items
            .iter()
            .map(|item| item.modifiers.iter().map(|modifier| modifier.id.as_str()).collect())
            .collect();

        assert_eq!(modifier_ids, vec![vec!["M1"], vec![], vec!["M2"]]);
    }

    #[test]
    fn modifier_choices_become_options() {
        let menu = build_menu(menu_document());
        let cheese = menu
            .menu_items
            .first()
            .and_then(|item| item.modifiers.first())
            .expect("cheese modifier");

        assert_eq!(cheese.name, "Cheese");
        assert!((cheese.cost - 0.5).abs() < f64::EPSILON, "cost {}", cheese.cost);
        let names: Vec<&str> = cheese
            .options
            .iter()
            .map(|option| option.name.as_str())
            .collect();
        assert_eq!(names, vec!["Cheddar", "Swiss"]);
    }

    #[tokio::test]
    async fn full_menu_joins_both_reads() {
        let grill = provider(&[("menu.xml", DOCUMENT), ("location.xml", DOCUMENT)]);

        let menu = grill.full_menu().await.expect("full menu");

        assert_eq!(menu.menu_items.len(), 3);
        assert_eq!(
            menu.provider_info.as_ref().map(|info| info.city.as_str()),
            Some("SHELBYVILLE")
        );
    }

    #[tokio::test]
    async fn full_menu_is_repeatable() {
        let grill = provider(&[("menu.xml", DOCUMENT), ("location.xml", DOCUMENT)]);

        let first = grill.full_menu().await.expect("first call");
        let second = grill.full_menu().await.expect("second call");

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_menu_aborts_full_menu() {
        let grill = provider(&[("location.xml", DOCUMENT)]);

        let err = grill.full_menu().await.expect_err("menu is missing");

        assert!(matches!(err, PortError::Fetch { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn malformed_document_is_a_decode_error() {
        let grill = provider(&[("location.xml", "<location id=\"1\"><hours>")]);

        let err = grill.provider_info().await.expect_err("document is truncated");

        assert!(matches!(err, PortError::Decode { .. }), "got {err:?}");
    }
}
