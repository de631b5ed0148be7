//! Canonical data structures for menus, menu items, and provider locations.
//!
//! Every provider adapter normalizes into these types. Fields holding their
//! natural "absent" value (empty string, zero, `false`, empty sequence) are
//! left out of the serialized form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Built-in providers supported by the aggregator.
pub enum Providers {
    /// XML grill source.
    Grill,
    /// JSON eatery source.
    Eatery,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Opaque location selector used by the transport to pick a provider.
pub struct ProviderId(pub String);

impl fmt::Display for Providers {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selector = match self {
            Providers::Grill => "1",
            Providers::Eatery => "2",
        };
        write!(formatter, "{selector}")
    }
}

impl From<Providers> for ProviderId {
    fn from(provider: Providers) -> Self {
        ProviderId(provider.to_string())
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a provider and its human-friendly name.
pub struct ProviderMeta {
    /// Unique selector.
    pub id: ProviderId,
    /// Short display name, e.g. "grill".
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// A full menu for one location.
pub struct Menu {
    /// Location the menu belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_info: Option<ProviderInfo>,
    /// Items in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub menu_items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// A single aggregated menu item.
pub struct MenuItem {
    /// Source identifier.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Free-text description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Whether the item is deleted or hidden upstream.
    #[serde(skip_serializing_if = "is_false")]
    pub disabled: bool,
    /// Identifier of the owning category.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category_id: String,
    /// Resolved owning category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Modifier list reference used while assembling; never serialized.
    #[serde(skip)]
    pub modifier_list_id: String,
    /// Modifiers that apply to this item.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Menu category.
pub struct Category {
    /// Source identifier.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Whether the category is disabled upstream.
    #[serde(skip_serializing_if = "is_false")]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// A group of purchasable add-ons attached to one or more items.
pub struct Modifier {
    /// Source identifier.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Whether the modifier is disabled upstream.
    #[serde(skip_serializing_if = "is_false")]
    pub disabled: bool,
    /// Base cost of the modifier itself.
    #[serde(skip_serializing_if = "is_zero")]
    pub cost: f64,
    /// Selectable options in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ModifierOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// One selectable option of a [`Modifier`].
pub struct ModifierOption {
    /// Display name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Surcharge for picking this option.
    #[serde(skip_serializing_if = "is_zero")]
    pub cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Store information for one physical location.
pub struct ProviderInfo {
    /// Location identifier as used by the source.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Location name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Street and house number.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub street_address: String,
    /// City name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub city: String,
    /// State or administrative district.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    /// Country code or name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    /// Postal code.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub zip: String,
    /// Contact phone number.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub telephone: String,
    /// Longitude in decimal degrees.
    #[serde(skip_serializing_if = "is_zero")]
    pub longitude: f64,
    /// Latitude in decimal degrees.
    #[serde(skip_serializing_if = "is_zero")]
    pub latitude: f64,
    /// Opening periods in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub store_hours: Vec<ProviderHour>,
    /// Accepted payment methods, without duplicates.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub payment_methods: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Opening period for a single weekday.
pub struct ProviderHour {
    /// Period type as reported by the source; empty for the JSON eatery.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Three-letter uppercase weekday, e.g. `MON`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub day_of_week: String,
    /// Opening time as `HH:MM:SS`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub opens: String,
    /// Closing time as `HH:MM:SS`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub closes: String,
}

impl ProviderInfo {
    /// Append a payment method unless an equal entry is already present.
    pub fn add_payment_method(&mut self, method: String) {
        if !self.payment_methods.contains(&method) {
            self.payment_methods.push(method);
        }
    }
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skip_serializing_if arguments by reference"
)]
fn is_false(value: &bool) -> bool {
    !*value
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde passes skip_serializing_if arguments by reference"
)]
fn is_zero(value: &f64) -> bool {
    *value == 0.0
}
