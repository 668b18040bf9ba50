//! Missing-section backfill.

use crate::content::{Document, default_document};

/// Clone the default subtree into any optional feature block that is absent.
///
/// Idempotent: a present block is never touched.
pub fn backfill_sections(mut document: Document) -> Document {
    let defaults = &default_document().features;
    let features = &mut document.features;

    if features.newsletter.is_none() {
        features.newsletter = defaults.newsletter.clone();
    }
    if features.interactive_map.is_none() {
        features.interactive_map = defaults.interactive_map.clone();
    }
    if features.promo_countdown.is_none() {
        features.promo_countdown = defaults.promo_countdown.clone();
    }

    document
}
