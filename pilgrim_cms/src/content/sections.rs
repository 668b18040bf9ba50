//! Fixed sections of the Content Document.
//!
//! Section structs are strict: after reconciliation every key is present, so a
//! missing one is a schema bug worth failing on. Element structs (list items)
//! default missing fields. Every struct keeps keys it does not know in a
//! flattened `extra` map, so admin additions reach the store unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;
use super::nav::NavLink;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub name: String,
    pub tagline: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Site-wide colours as configured by the admin. A visitor's own
/// [`pilgrim_common::ThemePreference`] is layered on top client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub primary_color: String,
    pub accent_color: String,
    pub font_family: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub logo_text: String,
    pub cta_label: String,
    pub cta_href: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub nav_links: Vec<NavLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    pub about: String,
    pub copyright: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub quick_links: Vec<NavLink>,
    pub social: SocialLinks,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    pub facebook: String,
    pub instagram: String,
    pub youtube: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Built-in pages. Unknown page sections an admin adds are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pages {
    pub home: HomePage,
    pub packages: PackagesPage,
    pub visa: VisaPage,
    pub air_ticketing: AirTicketingPage,
    pub about: AboutPage,
    pub contact: ContactPage,
    pub blog: BlogPage,
    pub gallery: GalleryPage,
    pub checklist: ChecklistPage,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub hero: Hero,
    pub highlights: Highlights,
    pub testimonials: Testimonials,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    pub cta_label: String,
    pub cta_href: String,
    pub background_image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub title: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub items: Vec<Highlight>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Highlight {
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonials {
    pub title: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub items: Vec<Testimonial>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Testimonial {
    pub name: String,
    pub location: String,
    pub quote: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagesPage {
    pub title: String,
    pub intro: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaPage {
    pub title: String,
    pub intro: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub countries: Vec<VisaCountry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisaCountry {
    pub name: String,
    pub processing_time: String,
    pub fee: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirTicketingPage {
    pub title: String,
    pub intro: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub airlines: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutPage {
    pub title: String,
    pub story: String,
    pub mission: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPage {
    pub title: String,
    pub intro: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub form_subjects: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPage {
    pub title: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub posts: Vec<BlogPost>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlogPage {
    pub fn post(&self, id: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|post| post.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub date: String,
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPage {
    pub title: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub images: Vec<GalleryImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryImage {
    pub src: String,
    pub caption: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistPage {
    pub title: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub items: Vec<ChecklistItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Optional feature blocks. These are the only mappings a remote document may
/// clear with `null`; the section backfill rule puts them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newsletter: Option<NewsletterConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive_map: Option<MapConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_countdown: Option<CountdownConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsletterConfig {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    pub button_label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    pub enabled: bool,
    pub title: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub stops: Vec<MapStop>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapStop {
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountdownConfig {
    pub enabled: bool,
    pub title: String,
    pub target_date: String,
    pub cta_label: String,
    pub cta_href: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
