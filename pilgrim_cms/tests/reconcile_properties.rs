//! Reconciliation scenarios and properties over a set of stored documents.

use pilgrim_cms::content::OPTIONAL_SECTIONS;
use pilgrim_cms::reconcile::{CANONICAL_ORDER, RETIRED_PAGE_IDS, apply_rules};
use pilgrim_cms::{Document, default_document, default_value, reconcile};
use serde_json::{Value, json};

fn reconciled(remote: &Value) -> Document {
    reconcile(Some(remote)).expect("reconcile").document
}

/// Stored documents of the kinds seen in the field: empty, partial, stale,
/// duplicated, mistyped.
fn samples() -> Vec<Value> {
    let mut reversed_nav = default_value()["header"]["navLinks"].clone();
    if let Some(links) = reversed_nav.as_array_mut() {
        links.reverse();
    }

    vec![
        json!({}),
        json!({"pages": {"home": {"hero": {"title": "Custom Title"}}}}),
        json!({
            "header": {"navLinks": [
                {"label": "Home", "href": "#home", "enabled": true},
                {"label": "Hajj Packages", "href": "#hajj-packages"},
                {"label": "Contact", "href": "#contact", "enabled": true},
                {"label": "Hotels", "href": "#hotels", "enabled": true}
            ]}
        }),
        json!({"customPages": []}),
        json!({
            "site": {"name": 1999, "tagline": "Serving pilgrims since 1999"},
            "header": {"navLinks": reversed_nav},
            "features": {"newsletter": null, "promoCountdown": {"enabled": false}},
            "customPages": [
                {"id": "#zamzam-facts", "title": "Zamzam", "contentBlocks": []},
                {"id": "ramadan-2023", "title": "Old offer"},
                {"id": "hajj-guide", "title": "Admin guide", "contentBlocks": []},
                {"id": "zamzam-facts", "title": "Duplicate"}
            ],
            "pages": {"faq": {"title": "FAQ"}},
            "analytics": {"tag": "G-123"}
        }),
    ]
}

fn object_pointers(value: &Value, prefix: &str, out: &mut Vec<String>) {
    if let Value::Object(entries) = value {
        for (key, child) in entries {
            let pointer = format!("{prefix}/{key}");
            object_pointers(child, &pointer, out);
            out.push(pointer);
        }
    }
}

mod scenarios {
    use super::*;

    #[test]
    fn empty_store_yields_the_default_table() {
        let result = reconcile(None).unwrap();
        assert!(result.persist_defaults);
        assert_eq!(&result.document, default_document());
        assert!(result.report.is_clean());
    }

    #[test]
    fn partial_hero_keeps_other_defaults() {
        let doc = reconciled(&json!({"pages": {"home": {"hero": {"title": "Custom Title"}}}}));
        let hero = &doc.pages.home.hero;
        let default_hero = &default_document().pages.home.hero;
        assert_eq!(hero.title, "Custom Title");
        assert_eq!(hero.subtitle, default_hero.subtitle);
        assert_eq!(hero.cta_label, default_hero.cta_label);
        assert_eq!(hero.cta_href, default_hero.cta_href);
        assert_eq!(hero.background_image, default_hero.background_image);
    }

    #[test]
    fn stale_hajj_entry_becomes_dropdown_parent() {
        let doc = reconciled(&json!({
            "header": {"navLinks": [
                {"label": "Hajj Packages", "href": "#hajj-packages"}
            ]}
        }));
        let hajj = doc.nav_link("Hajj").expect("relabelled parent");
        let subs = hajj.sub_links.as_ref().expect("sub links filled");
        assert!(subs.iter().any(|sub| sub.href == "#exclusive-hajj"));
        assert!(doc.nav_link("Hajj Packages").is_none());
    }

    #[test]
    fn empty_custom_pages_get_every_default_with_blocks() {
        let result = reconcile(Some(&json!({"customPages": []}))).unwrap();
        assert_eq!(result.document.custom_pages, default_document().custom_pages);
        assert!(
            result
                .document
                .custom_pages
                .iter()
                .all(|page| !page.content_blocks.is_empty())
        );
        assert_eq!(result.report.rules_applied, vec!["custom-page-repair"]);
    }
}

mod properties {
    use super::*;

    #[test]
    fn patch_rules_are_idempotent_on_reconciled_output() {
        for remote in samples() {
            let doc = reconciled(&remote);
            assert_eq!(apply_rules(doc.clone()), doc, "remote: {remote}");
        }
    }

    #[test]
    fn every_default_key_is_defined() {
        let mut pointers = Vec::new();
        object_pointers(default_value(), "", &mut pointers);
        assert!(pointers.len() > 50);

        for remote in samples() {
            let value = reconciled(&remote).to_value().unwrap();
            for pointer in &pointers {
                let found = value.pointer(pointer);
                assert!(
                    found.is_some_and(|v| !v.is_null()),
                    "{pointer} missing after reconciling {remote}"
                );
            }
        }
    }

    #[test]
    fn optional_sections_cleared_remotely_come_back() {
        let remote = json!({"features": {
            "newsletter": null, "interactiveMap": null, "promoCountdown": null
        }});
        let value = reconciled(&remote).to_value().unwrap();
        for path in OPTIONAL_SECTIONS {
            let pointer = format!("/{}", path.replace('.', "/"));
            assert!(value.pointer(&pointer).is_some_and(Value::is_object), "{path}");
        }
    }

    #[test]
    fn remote_scalars_win_outside_patch_rules() {
        let remote = json!({
            "site": {"name": "Al-Noor Travels Ltd", "phone": "+44 20 7946 0000"},
            "theme": {"primaryColor": "#123456"},
            "footer": {"social": {"youtube": "https://youtube.com/@alnoor"}},
            "pages": {"home": {"hero": {"subtitle": "Booking now for 2027"}}},
            "features": {"promoCountdown": {"enabled": true}}
        });
        let value = reconciled(&remote).to_value().unwrap();

        let mut pointers = Vec::new();
        object_pointers(&remote, "", &mut pointers);
        for pointer in pointers {
            let stored = remote.pointer(&pointer).unwrap();
            if stored.is_object() {
                continue;
            }
            assert_eq!(value.pointer(&pointer), Some(stored), "{pointer}");
        }
    }

    #[test]
    fn mistyped_fields_keep_defaults_and_are_reported() {
        let result = reconcile(Some(&json!({"site": {"name": 1999}}))).unwrap();
        assert_eq!(result.document.site.name, default_document().site.name);
        assert_eq!(result.report.rejected, vec!["site.name"]);
    }

    #[test]
    fn navigation_follows_canonical_order() {
        for remote in samples() {
            let doc = reconciled(&remote);
            let ranked: Vec<usize> = doc
                .header
                .nav_links
                .iter()
                .filter_map(|link| CANONICAL_ORDER.iter().position(|l| *l == link.label))
                .collect();
            assert!(ranked.windows(2).all(|w| w[0] < w[1]), "remote: {remote}");
        }
    }

    #[test]
    fn custom_pages_are_a_union_without_duplicates() {
        for remote in samples() {
            let doc = reconciled(&remote);
            let ids: Vec<&str> = doc.custom_pages.iter().map(|page| page.key()).collect();

            let mut unique = ids.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), ids.len(), "duplicates in {ids:?}");

            for default in &default_document().custom_pages {
                assert!(ids.contains(&default.key()));
            }
            for retired in RETIRED_PAGE_IDS {
                assert!(!ids.contains(&retired));
            }
            if let Some(stored) = remote["customPages"].as_array() {
                for page in stored {
                    let id = page["id"].as_str().unwrap().trim_start_matches('#');
                    if !RETIRED_PAGE_IDS.contains(&id) {
                        assert!(ids.contains(&id), "{id} dropped");
                    }
                }
            }
        }
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let remote = samples().pop().unwrap();
        let value = reconciled(&remote).to_value().unwrap();
        assert_eq!(value["analytics"], json!({"tag": "G-123"}));
        assert_eq!(value["pages"]["faq"], json!({"title": "FAQ"}));
        // the first stored copy wins, keeping the admin's title
        let zamzam = value["customPages"]
            .as_array()
            .unwrap()
            .iter()
            .find(|page| page["id"] == "#zamzam-facts")
            .unwrap();
        assert_eq!(zamzam["title"], "Zamzam");
    }

    #[test]
    fn unknown_nested_and_element_keys_survive() {
        let remote = json!({
            "pages": {"home": {"hero": {"title": "T", "badge": "New 2027"}}},
            "packages": {"hajj": [
                {"name": "Economy Hajj", "price": "$1", "hotelRating": 5}
            ]},
            "header": {"navLinks": [
                {"label": "Home", "href": "#home", "icon": "house"}
            ]}
        });
        let doc = reconciled(&remote);
        assert_eq!(doc.pages.home.hero.title, "T");
        assert_eq!(doc.pages.home.hero.extra["badge"], "New 2027");
        assert_eq!(doc.packages.hajj.len(), 1);
        assert_eq!(doc.packages.hajj[0].extra["hotelRating"], 5);
        assert_eq!(doc.nav_link("Home").unwrap().extra["icon"], "house");

        let value = doc.to_value().unwrap();
        assert_eq!(value["pages"]["home"]["hero"]["badge"], "New 2027");
        assert_eq!(value["packages"]["hajj"][0]["hotelRating"], 5);
        assert_eq!(reconciled(&value), doc);
    }
}
