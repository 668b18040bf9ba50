//! Navigation repair.
//!
//! Stored navigation predates the dropdown menus: entries point at pages that
//! no longer exist, parents carry their old flat labels, and new children are
//! missing. This rule brings any stored header back to the current shape.

use crate::content::{Document, NavLink, default_document};

/// Display order of the top-level navigation. Labels not listed sort last.
pub const CANONICAL_ORDER: [&str; 8] = [
    "Home", "Hajj", "Umrah", "Services", "Gallery", "Blog", "About", "Contact",
];

/// Entries with these labels are removed wherever they appear.
pub const RETIRED_LABELS: [&str; 3] = ["Hotels", "Ziyarat Tours", "Special Offers"];

/// Entries pointing here are removed wherever they appear.
pub const RETIRED_HREFS: [&str; 4] = ["#hotels", "#ziyarat", "#offers", "#ramadan-offer"];

/// Dropdown parents the header must carry, with the labels they used to have.
pub const DROPDOWN_PARENTS: [(&str, &[&str]); 3] = [
    ("Hajj", &["Hajj Packages"]),
    ("Umrah", &["Umrah Packages"]),
    ("Services", &["Our Services"]),
];

/// Drop retired entries, restore the dropdown parents and their children, and
/// sort into [`CANONICAL_ORDER`].
///
/// Idempotent: the output has no retired or legacy-labelled entries, every
/// parent holds its default children, and the order is already canonical.
pub fn repair_navigation(mut document: Document) -> Document {
    let defaults = &default_document().header.nav_links;
    let links = &mut document.header.nav_links;

    drop_retired(links);
    for (label, legacy) in DROPDOWN_PARENTS {
        if let Some(template) = defaults.iter().find(|link| link.label == label) {
            ensure_parent(links, template, legacy);
        }
    }
    sort_canonical(links);

    document
}

fn is_retired(link: &NavLink) -> bool {
    RETIRED_LABELS.contains(&link.label.as_str()) || RETIRED_HREFS.contains(&link.href.as_str())
}

fn drop_retired(links: &mut Vec<NavLink>) {
    links.retain(|link| !is_retired(link));
    for link in links.iter_mut() {
        if let Some(subs) = link.sub_links.as_mut() {
            subs.retain(|sub| !is_retired(sub));
        }
    }
}

fn ensure_parent(links: &mut Vec<NavLink>, template: &NavLink, legacy: &[&str]) {
    let is_legacy = |link: &NavLink| legacy.contains(&link.label.as_str());

    // Relabel one stale entry if the parent is missing; any other stale
    // entries duplicate it and go.
    if !links.iter().any(|link| link.label == template.label)
        && let Some(stale) = links.iter_mut().find(|link| is_legacy(&**link))
    {
        stale.label = template.label.clone();
    }
    links.retain(|link| !is_legacy(link));

    let index = match links.iter().position(|link| link.label == template.label) {
        Some(index) => index,
        None => {
            links.push(template.clone());
            links.len() - 1
        }
    };

    let expected = template.sub_links.as_deref().unwrap_or_default();
    let parent = &mut links[index];
    match parent.sub_links.as_mut() {
        Some(subs) if !subs.is_empty() => {
            for child in expected {
                if !subs.iter().any(|sub| sub.href == child.href) {
                    subs.push(child.clone());
                }
            }
        }
        _ => parent.sub_links = Some(expected.to_vec()),
    }
}

fn canonical_rank(label: &str) -> usize {
    CANONICAL_ORDER
        .iter()
        .position(|canonical| *canonical == label)
        .unwrap_or(CANONICAL_ORDER.len())
}

fn sort_canonical(links: &mut [NavLink]) {
    // sort_by_key is stable, so unknown labels keep their relative order.
    links.sort_by_key(|link| canonical_rank(&link.label));
}
