//! The Content Document: the single nested record describing all editable
//! site content, expressed as a statically typed schema.
//!
//! Every key a page reads exists in the Default Content Table
//! ([`default_document`]). Sections are strict; collection elements decode
//! leniently so one malformed entry cannot take the whole document down.

mod custom_page;
mod defaults;
pub(crate) mod lenient;
mod nav;
mod packages;
mod sections;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use custom_page::{ContentBlock, CustomPage, Seo, normalize_fragment};
pub use defaults::{default_document, default_value};
pub use nav::NavLink;
pub use packages::{ExclusivePackage, LegacyPackage, PackageLists};
pub use sections::{
    AboutPage, AirTicketingPage, BlogPage, BlogPost, ChecklistItem, ChecklistPage, ContactPage,
    CountdownConfig, Features, Footer, GalleryImage, GalleryPage, Header, Hero, Highlight,
    Highlights, HomePage, MapConfig, MapStop, NewsletterConfig, Pages, PackagesPage, SiteInfo,
    SocialLinks, Testimonial, Testimonials, ThemeConfig, VisaCountry, VisaPage,
};

/// Dotted paths of the optional feature blocks. A stored document may clear
/// these with `null`; the section backfill rule restores them.
pub const OPTIONAL_SECTIONS: [&str; 3] = [
    "features.newsletter",
    "features.interactiveMap",
    "features.promoCountdown",
];

/// Root of the site content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub site: SiteInfo,
    pub theme: ThemeConfig,
    pub header: Header,
    pub footer: Footer,
    pub pages: Pages,
    pub packages: PackageLists,
    #[serde(deserialize_with = "lenient::vec")]
    pub custom_pages: Vec<CustomPage>,
    pub features: Features,
    /// Top-level keys the schema does not know about. Kept so an admin's
    /// additions survive a round trip through the store.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Look up a custom page by hash fragment (`#id` or `id`).
    pub fn custom_page(&self, id: &str) -> Option<&CustomPage> {
        let wanted = normalize_fragment(id);
        self.custom_pages.iter().find(|page| page.key() == wanted)
    }

    /// Custom page that is present and enabled.
    pub fn enabled_custom_page(&self, id: &str) -> Option<&CustomPage> {
        self.custom_page(id).filter(|page| page.enabled)
    }

    /// Top-level navigation entry by label.
    pub fn nav_link(&self, label: &str) -> Option<&NavLink> {
        self.header.nav_links.iter().find(|link| link.label == label)
    }

    /// Serialize into the untyped tree stored remotely.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
