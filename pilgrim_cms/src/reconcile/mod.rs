//! The Reconciler: turn whatever the store holds into a schema-complete
//! document without losing admin edits.
//!
//! `reconcile` is pure. Persisting the defaults when the store was empty is
//! the caller's job; [`Reconciled::persist_defaults`] tells it to.

mod custom_pages;
mod navigation;
mod rules;
mod sections;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::content::{Document, OPTIONAL_SECTIONS, default_document};
use crate::error::CmsResult;
use crate::merge::merge_typed;

pub use custom_pages::{BLOCK_BACKFILL_IDS, RETIRED_PAGE_IDS, repair_custom_pages};
pub use navigation::{
    CANONICAL_ORDER, DROPDOWN_PARENTS, RETIRED_HREFS, RETIRED_LABELS, repair_navigation,
};
pub use rules::{PATCH_RULES, PatchRule, apply_rules};
pub use sections::backfill_sections;

/// Output of [`reconcile`].
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub document: Document,
    /// The store held nothing; the caller should write the defaults back.
    pub persist_defaults: bool,
    pub report: ReconcileReport,
}

/// What reconciliation had to repair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Stored fields discarded because they did not fit the schema.
    pub rejected: Vec<String>,
    /// Patch rules that changed the merged document, in application order.
    pub rules_applied: Vec<&'static str>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.rules_applied.is_empty()
    }
}

/// Merge `remote` into the Default Content Table and run the patch rules.
///
/// `None` means the store has never been initialized: the defaults come back
/// verbatim with `persist_defaults` set.
pub fn reconcile(remote: Option<&Value>) -> CmsResult<Reconciled> {
    let defaults = default_document();
    let Some(remote) = remote else {
        debug!("store holds no content; using the default table");
        return Ok(Reconciled {
            document: defaults.clone(),
            persist_defaults: true,
            report: ReconcileReport::default(),
        });
    };

    let merged = merge_typed(defaults, remote, &OPTIONAL_SECTIONS)?;
    if !merged.rejected.is_empty() {
        warn!(
            count = merged.rejected.len(),
            paths = ?merged.rejected,
            "stored content fields did not fit the schema; defaults kept"
        );
    }

    let (document, rules_applied) = rules::apply_rules_traced(merged.value);
    if !rules_applied.is_empty() {
        debug!(rules = ?rules_applied, "patch rules repaired stored content");
    }

    Ok(Reconciled {
        document,
        persist_defaults: false,
        report: ReconcileReport {
            rejected: merged.rejected,
            rules_applied,
        },
    })
}
