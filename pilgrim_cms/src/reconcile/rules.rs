//! The ordered patch-rule table.
//!
//! Each rule is a named `Document -> Document` function that is idempotent on
//! its own; the table is applied as a left fold. Order matters only in that
//! later rules may assume earlier ones ran.

use crate::content::Document;

use super::custom_pages::repair_custom_pages;
use super::navigation::repair_navigation;
use super::sections::backfill_sections;

/// One named repair step applied after the generic merge.
#[derive(Debug, Clone, Copy)]
pub struct PatchRule {
    pub name: &'static str,
    /// What the rule expects of its input.
    pub precondition: &'static str,
    pub apply: fn(Document) -> Document,
}

/// Applied in this order by [`apply_rules`].
pub const PATCH_RULES: &[PatchRule] = &[
    PatchRule {
        name: "navigation-repair",
        precondition: "header.navLinks decoded; entries may be stale, missing or out of order",
        apply: repair_navigation,
    },
    PatchRule {
        name: "section-backfill",
        precondition: "features present; optional blocks may be null",
        apply: backfill_sections,
    },
    PatchRule {
        name: "custom-page-repair",
        precondition: "customPages decoded; may be empty, duplicated or hold retired ids",
        apply: repair_custom_pages,
    },
];

/// Run every rule over `document`.
pub fn apply_rules(document: Document) -> Document {
    PATCH_RULES
        .iter()
        .fold(document, |document, rule| (rule.apply)(document))
}

/// Like [`apply_rules`], also naming the rules that changed something.
pub(crate) fn apply_rules_traced(document: Document) -> (Document, Vec<&'static str>) {
    let mut applied = Vec::new();
    let document = PATCH_RULES.iter().fold(document, |document, rule| {
        let before = document.clone();
        let after = (rule.apply)(document);
        if after != before {
            applied.push(rule.name);
        }
        after
    });
    (document, applied)
}
