//! User theme preference.
//!
//! Owned entirely by the visitor's device: created with defaults on first
//! load, persisted locally, never synced to the content store.

use serde::{Deserialize, Serialize};

/// Light or dark rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Returns the lowercase label stored on disk.
    pub fn as_label(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// `{ mode, primaryColor }` as persisted in local storage.
///
/// An empty `primary_color` means "use the site's configured colour".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemePreference {
    pub mode: ThemeMode,
    pub primary_color: String,
}

impl ThemePreference {
    /// The colour to render with: the user's override, or `site_default`.
    pub fn effective_primary<'a>(&'a self, site_default: &'a str) -> &'a str {
        if self.primary_color.is_empty() {
            site_default
        } else {
            &self.primary_color
        }
    }

    /// Empty or a `#rgb` / `#rrggbb` hex colour.
    pub fn is_valid(&self) -> bool {
        self.primary_color.is_empty() || is_hex_color(&self.primary_color)
    }
}

/// `#rgb` or `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preference_is_light_with_site_colour() {
        let pref = ThemePreference::default();
        assert_eq!(pref.mode, ThemeMode::Light);
        assert_eq!(pref.effective_primary("#0f766e"), "#0f766e");
    }

    #[test]
    fn override_colour_wins() {
        let pref = ThemePreference {
            mode: ThemeMode::Dark,
            primary_color: "#123456".into(),
        };
        assert_eq!(pref.effective_primary("#0f766e"), "#123456");
    }

    #[test]
    fn hex_validation() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#0F766E"));
        assert!(!is_hex_color("0f766e"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#ggg"));
        assert!(
            ThemePreference {
                mode: ThemeMode::Light,
                primary_color: String::new()
            }
            .is_valid()
        );
    }

    #[test]
    fn mode_toggles() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().as_label(), "light");
    }

    #[test]
    fn preference_uses_camel_case_keys() {
        let json = r##"{"mode":"dark","primaryColor":"#abc"}"##;
        let pref: ThemePreference = serde_json::from_str(json).unwrap();
        assert_eq!(pref.mode, ThemeMode::Dark);
        assert_eq!(pref.primary_color, "#abc");

        let partial: ThemePreference = serde_json::from_str(r#"{"mode":"dark"}"#).unwrap();
        assert!(partial.primary_color.is_empty());
    }
}
