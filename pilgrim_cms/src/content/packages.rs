use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use pilgrim_common::PackageKind;

use super::lenient;

/// The three package lists, keyed like [`PackageKind::as_label`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageLists {
    #[serde(deserialize_with = "lenient::vec")]
    pub hajj: Vec<LegacyPackage>,
    #[serde(deserialize_with = "lenient::vec")]
    pub umrah: Vec<LegacyPackage>,
    #[serde(deserialize_with = "lenient::vec")]
    pub exclusive: Vec<ExclusivePackage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Hajj or Umrah package in the original flat layout. `name` is the
/// effective key within its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyPackage {
    pub name: String,
    pub price: String,
    pub duration: String,
    pub date: String,
    pub makkah_hotel: String,
    pub madinah_hotel: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub flights: Vec<String>,
    #[serde(deserialize_with = "lenient::vec")]
    pub features: Vec<String>,
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LegacyPackage {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            duration: String::new(),
            date: String::new(),
            makkah_hotel: String::new(),
            madinah_hotel: String::new(),
            flights: Vec::new(),
            features: Vec::new(),
            enabled: true,
            extra: Map::new(),
        }
    }
}

/// Premium package. `title` is the effective key; `category` says whether it
/// is a Hajj or an Umrah offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExclusivePackage {
    pub title: String,
    pub category: String,
    pub price: String,
    pub dates: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub hotels: Vec<String>,
    #[serde(deserialize_with = "lenient::vec")]
    pub flights: Vec<String>,
    #[serde(deserialize_with = "lenient::vec")]
    pub inclusions: Vec<String>,
    pub badge: String,
    pub image: String,
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ExclusivePackage {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: String::new(),
            price: String::new(),
            dates: String::new(),
            hotels: Vec::new(),
            flights: Vec::new(),
            inclusions: Vec::new(),
            badge: String::new(),
            image: String::new(),
            enabled: true,
            extra: Map::new(),
        }
    }
}

impl ExclusivePackage {
    /// Hajj or Umrah, from the free-form `category` field.
    pub fn pilgrimage(&self) -> Option<PackageKind> {
        PackageKind::from_label(&self.category).filter(|kind| *kind != PackageKind::Exclusive)
    }
}
