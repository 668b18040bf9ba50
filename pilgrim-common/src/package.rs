//! Package list kinds.

use serde::{Deserialize, Serialize};

/// Which package list a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// Legacy Hajj packages
    Hajj,
    /// Legacy Umrah packages
    Umrah,
    /// Exclusive (premium) packages, Hajj or Umrah
    Exclusive,
}

impl PackageKind {
    pub const ALL: [PackageKind; 3] = [PackageKind::Hajj, PackageKind::Umrah, PackageKind::Exclusive];

    /// Lowercase label, also the key under `packages` in the content document.
    pub fn as_label(&self) -> &'static str {
        match self {
            PackageKind::Hajj => "hajj",
            PackageKind::Umrah => "umrah",
            PackageKind::Exclusive => "exclusive",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            PackageKind::Hajj => "Hajj Packages",
            PackageKind::Umrah => "Umrah Packages",
            PackageKind::Exclusive => "Exclusive Packages",
        }
    }

    /// Inverse of [`PackageKind::as_label`], case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_label().eq_ignore_ascii_case(label.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for kind in PackageKind::ALL {
            assert_eq!(PackageKind::from_label(kind.as_label()), Some(kind));
        }
        assert_eq!(PackageKind::from_label(" UMRAH "), Some(PackageKind::Umrah));
        assert_eq!(PackageKind::from_label("visa"), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(PackageKind::Hajj.display_name(), "Hajj Packages");
        assert_eq!(PackageKind::Exclusive.display_name(), "Exclusive Packages");
    }
}
