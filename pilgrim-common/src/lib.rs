//! Shared types for the pilgrim-cms crates.
//!
//! These are the client-owned value types (theme preference) and the package
//! kind labels used by both the content model and the catalog helpers.

mod package;
mod theme;

pub use package::PackageKind;
pub use theme::{ThemeMode, ThemePreference, is_hex_color};
