//! Custom-page set repair.

use std::collections::HashSet;

use crate::content::{Document, default_document};

/// Pages removed from the site for good, whatever the store says.
pub const RETIRED_PAGE_IDS: [&str; 3] = ["ramadan-2023", "hajj-2023-early-bird", "covid-travel-rules"];

/// Pages whose block list is refilled from the defaults when stored empty.
pub const BLOCK_BACKFILL_IDS: [&str; 2] = ["hajj-guide", "umrah-guide"];

/// Drop retired ids, keep the first page per id, add any default page that is
/// missing, and refill empty block lists for [`BLOCK_BACKFILL_IDS`].
///
/// Idempotent: afterwards ids are unique, every default id is present, no
/// retired id remains and the backfill pages have blocks.
pub fn repair_custom_pages(mut document: Document) -> Document {
    let defaults = &default_document().custom_pages;
    let pages = &mut document.custom_pages;

    pages.retain(|page| !RETIRED_PAGE_IDS.contains(&page.key()));

    let mut seen = HashSet::new();
    pages.retain(|page| seen.insert(page.key().to_string()));

    for default in defaults {
        if !pages.iter().any(|page| page.key() == default.key()) {
            pages.push(default.clone());
        }
    }

    for page in pages.iter_mut() {
        if !page.content_blocks.is_empty() || !BLOCK_BACKFILL_IDS.contains(&page.key()) {
            continue;
        }
        if let Some(default) = defaults.iter().find(|default| default.key() == page.key()) {
            page.content_blocks = default.content_blocks.clone();
        }
    }

    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CustomPage;

    fn page(id: &str) -> CustomPage {
        CustomPage {
            id: id.into(),
            title: format!("Page {id}"),
            enabled: true,
            content_blocks: Vec::new(),
            seo: Default::default(),
            extra: Default::default(),
        }
    }

    fn with_pages(pages: Vec<CustomPage>) -> Document {
        let mut doc = default_document().clone();
        doc.custom_pages = pages;
        doc
    }

    fn ids(doc: &Document) -> Vec<&str> {
        doc.custom_pages.iter().map(|page| page.key()).collect()
    }

    #[test]
    fn empty_list_gets_every_default_page() {
        let doc = repair_custom_pages(with_pages(Vec::new()));
        assert_eq!(doc.custom_pages, default_document().custom_pages);
    }

    #[test]
    fn admin_pages_are_kept_and_defaults_appended() {
        let doc = repair_custom_pages(with_pages(vec![page("zamzam-facts")]));
        assert_eq!(
            ids(&doc),
            vec!["zamzam-facts", "hajj-guide", "umrah-guide", "visa-requirements"]
        );
        assert!(doc.custom_pages[0].content_blocks.is_empty());
    }

    #[test]
    fn duplicates_collapse_to_the_first() {
        let mut first = page("hajj-guide");
        first.title = "Edited guide".into();
        let doc = repair_custom_pages(with_pages(vec![first, page("#hajj-guide")]));
        let guides: Vec<_> = doc
            .custom_pages
            .iter()
            .filter(|page| page.key() == "hajj-guide")
            .collect();
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].title, "Edited guide");
    }

    #[test]
    fn empty_guide_blocks_are_refilled_but_other_pages_are_not() {
        let doc = repair_custom_pages(with_pages(vec![page("umrah-guide"), page("visa-requirements")]));
        let defaults = default_document();
        assert_eq!(
            doc.custom_page("umrah-guide").unwrap().content_blocks,
            defaults.custom_page("umrah-guide").unwrap().content_blocks
        );
        assert!(doc.custom_page("visa-requirements").unwrap().content_blocks.is_empty());
        assert_eq!(doc.custom_page("umrah-guide").unwrap().title, "Page umrah-guide");
    }

    #[test]
    fn retired_ids_are_removed() {
        let doc = repair_custom_pages(with_pages(vec![page("ramadan-2023"), page("#covid-travel-rules")]));
        assert!(doc.custom_page("ramadan-2023").is_none());
        assert!(doc.custom_page("covid-travel-rules").is_none());
    }

    #[test]
    fn second_pass_changes_nothing() {
        let once = repair_custom_pages(with_pages(vec![
            page("hajj-guide"),
            page("zamzam-facts"),
            page("zamzam-facts"),
        ]));
        assert_eq!(repair_custom_pages(once.clone()), once);
    }
}
