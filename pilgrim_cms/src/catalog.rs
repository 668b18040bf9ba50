//! Filtering and sorting over the in-memory package lists.

use std::cmp::Ordering;

use pilgrim_common::PackageKind;
use serde::{Deserialize, Serialize};

use crate::content::{ExclusivePackage, LegacyPackage, PackageLists};

/// One package from any of the three lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageRef<'a> {
    Legacy(PackageKind, &'a LegacyPackage),
    Exclusive(&'a ExclusivePackage),
}

impl<'a> PackageRef<'a> {
    /// The list the package lives in.
    pub fn list(&self) -> PackageKind {
        match self {
            PackageRef::Legacy(kind, _) => *kind,
            PackageRef::Exclusive(_) => PackageKind::Exclusive,
        }
    }

    /// Hajj or Umrah. Exclusive packages say so in `category`.
    pub fn pilgrimage(&self) -> Option<PackageKind> {
        match self {
            PackageRef::Legacy(kind, _) => Some(*kind),
            PackageRef::Exclusive(pkg) => pkg.pilgrimage(),
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            PackageRef::Legacy(_, pkg) => &pkg.name,
            PackageRef::Exclusive(pkg) => &pkg.title,
        }
    }

    pub fn price(&self) -> &'a str {
        match self {
            PackageRef::Legacy(_, pkg) => &pkg.price,
            PackageRef::Exclusive(pkg) => &pkg.price,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            PackageRef::Legacy(_, pkg) => pkg.enabled,
            PackageRef::Exclusive(pkg) => pkg.enabled,
        }
    }

    pub fn price_value(&self) -> Option<u64> {
        price_value(self.price())
    }

    fn matches_text(&self, needle: &str) -> bool {
        let hit = |text: &str| text.to_lowercase().contains(needle);
        match self {
            PackageRef::Legacy(_, pkg) => {
                hit(&pkg.name)
                    || hit(&pkg.makkah_hotel)
                    || hit(&pkg.madinah_hotel)
                    || pkg.features.iter().any(|f| hit(f))
            }
            PackageRef::Exclusive(pkg) => {
                hit(&pkg.title)
                    || hit(&pkg.badge)
                    || pkg.hotels.iter().any(|h| hit(h))
                    || pkg.inclusions.iter().any(|i| hit(i))
            }
        }
    }
}

/// Whole-unit value of a display price: `"$8,950"` is 8950. Cents are
/// ignored. `None` when the string has no digits before a decimal point.
pub fn price_value(price: &str) -> Option<u64> {
    let whole = price.split('.').next().unwrap_or(price);
    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageSort {
    #[default]
    Document,
    PriceAsc,
    PriceDesc,
    Name,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageQuery {
    /// Restrict to one list.
    pub list: Option<PackageKind>,
    /// Restrict to Hajj or Umrah across all lists.
    pub pilgrimage: Option<PackageKind>,
    pub include_disabled: bool,
    /// Case-insensitive match on names, hotels, features and inclusions.
    pub search: Option<String>,
    /// Packages without a parsable price are excluded when set.
    pub max_price: Option<u64>,
    pub sort: PackageSort,
}

impl PackageQuery {
    pub fn list(kind: PackageKind) -> Self {
        Self {
            list: Some(kind),
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort: PackageSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn run<'a>(&self, packages: &'a PackageLists) -> Vec<PackageRef<'a>> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut hits: Vec<PackageRef<'a>> = all_packages(packages)
            .filter(|pkg| self.list.is_none_or(|kind| pkg.list() == kind))
            .filter(|pkg| {
                self.pilgrimage
                    .is_none_or(|kind| pkg.pilgrimage() == Some(kind))
            })
            .filter(|pkg| self.include_disabled || pkg.enabled())
            .filter(|pkg| needle.as_deref().is_none_or(|n| pkg.matches_text(n)))
            .filter(|pkg| {
                self.max_price
                    .is_none_or(|max| pkg.price_value().is_some_and(|p| p <= max))
            })
            .collect();

        match self.sort {
            PackageSort::Document => {}
            PackageSort::PriceAsc => hits.sort_by(|a, b| by_price(a, b, false)),
            PackageSort::PriceDesc => hits.sort_by(|a, b| by_price(a, b, true)),
            PackageSort::Name => hits.sort_by_cached_key(|pkg| pkg.name().to_lowercase()),
        }
        hits
    }
}

/// Every package in document order: hajj, umrah, exclusive.
pub fn all_packages(packages: &PackageLists) -> impl Iterator<Item = PackageRef<'_>> {
    let hajj = packages
        .hajj
        .iter()
        .map(|pkg| PackageRef::Legacy(PackageKind::Hajj, pkg));
    let umrah = packages
        .umrah
        .iter()
        .map(|pkg| PackageRef::Legacy(PackageKind::Umrah, pkg));
    let exclusive = packages.exclusive.iter().map(PackageRef::Exclusive);
    hajj.chain(umrah).chain(exclusive)
}

/// Unpriced packages go last in either direction.
fn by_price(a: &PackageRef<'_>, b: &PackageRef<'_>, descending: bool) -> Ordering {
    match (a.price_value(), b.price_value()) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
