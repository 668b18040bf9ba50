//! End-to-end tests for the pilgrim-cms binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn pilgrim_cms() -> Command {
    cargo_bin_cmd!("pilgrim-cms")
}

/// Command with a throwaway file store and preference directory.
fn with_store(dir: &TempDir) -> Command {
    let mut cmd = pilgrim_cms();
    cmd.arg("--store-root")
        .arg(dir.path().join("store"))
        .arg("--prefs-dir")
        .arg(dir.path().join("prefs"))
        .arg("--log-level")
        .arg("warn");
    cmd
}

fn stored_document(dir: &TempDir) -> Value {
    let path = dir.path().join("store").join("site").join("content.json");
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
}

// ============================================
// Basics
// ============================================

mod cli_basics {
    use super::*;

    #[test]
    fn shows_help() {
        pilgrim_cms()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("reconcile"))
            .stdout(predicate::str::contains("mutate"))
            .stdout(predicate::str::contains("route"));
    }

    #[test]
    fn shows_version() {
        pilgrim_cms()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn prints_defaults() {
        let output = pilgrim_cms().arg("defaults").output().unwrap();
        assert!(output.status.success());
        let value: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(&value, pilgrim_cms::default_value());
    }

    #[test]
    fn rejects_bad_log_level() {
        pilgrim_cms()
            .args(["--log-level", "loud", "defaults"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid log level"));
    }
}

// ============================================
// Reconcile
// ============================================

mod reconcile_cmd {
    use super::*;

    #[test]
    fn without_input_reports_persist_defaults() {
        pilgrim_cms()
            .arg("reconcile")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"persistDefaults\": true"));
    }

    #[test]
    fn stale_navigation_is_repaired() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("stored.json");
        write_json(
            &input,
            &json!({"header": {"navLinks": [{"label": "Hajj Packages", "href": "#hajj-packages"}]}}),
        );

        pilgrim_cms()
            .arg("reconcile")
            .arg("--input")
            .arg(&input)
            .arg("--report-only")
            .assert()
            .success()
            .stdout(predicate::str::contains("navigation-repair"));
    }

    #[test]
    fn invalid_input_fails() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("stored.json");
        fs::write(&input, "{ nope").unwrap();

        pilgrim_cms()
            .arg("reconcile")
            .arg("--input")
            .arg(&input)
            .assert()
            .failure()
            .stderr(predicate::str::contains("not valid JSON"));
    }
}

// ============================================
// Store commands
// ============================================

mod store_cmds {
    use super::*;

    #[test]
    fn load_initializes_an_empty_store() {
        let dir = TempDir::new().unwrap();
        with_store(&dir)
            .arg("load")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"origin\": \"initialized\""))
            .stdout(predicate::str::contains("\"writesCompleted\": 1"));

        assert_eq!(&stored_document(&dir), pilgrim_cms::default_value());
    }

    #[test]
    fn load_writes_status_file() {
        let dir = TempDir::new().unwrap();
        let status = dir.path().join("status").join("cms.json");
        with_store(&dir)
            .arg("--status-file")
            .arg(&status)
            .arg("load")
            .assert()
            .success();

        let snapshot: Value = serde_json::from_str(&fs::read_to_string(status).unwrap()).unwrap();
        assert_eq!(snapshot["phase"], "ready");
    }

    #[test]
    fn mutate_persists_the_full_document() {
        let dir = TempDir::new().unwrap();
        let patch = dir.path().join("patch.json");
        write_json(&patch, &json!({"pages": {"home": {"hero": {"title": "Labbaik"}}}}));

        with_store(&dir)
            .arg("mutate")
            .arg("--patch")
            .arg(&patch)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"writesFailed\": 0"));

        let stored = stored_document(&dir);
        assert_eq!(stored["pages"]["home"]["hero"]["title"], "Labbaik");
        assert_eq!(
            stored["site"]["name"],
            pilgrim_cms::default_value()["site"]["name"]
        );
    }

    #[test]
    fn mutate_is_refused_when_the_store_is_unreadable() {
        let dir = TempDir::new().unwrap();
        // a directory where the document should be cannot be read as one
        let target = dir.path().join("store").join("site").join("content.json");
        fs::create_dir_all(&target).unwrap();
        let patch = dir.path().join("patch.json");
        write_json(&patch, &json!({"site": {"tagline": "Lost"}}));

        with_store(&dir)
            .arg("mutate")
            .arg("--patch")
            .arg(&patch)
            .assert()
            .failure()
            .stderr(predicate::str::contains("unreadable"));
        assert!(target.is_dir());
    }

    #[test]
    fn failed_mutate_write_exits_nonzero() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("store").join("site");
        fs::create_dir_all(&site).unwrap();
        write_json(&site.join("content.json"), &json!({"site": {"tagline": "Kept"}}));
        // occupy the temp file the first write goes through
        fs::create_dir_all(site.join("content.json.0.tmp")).unwrap();
        let status = dir.path().join("cms-status.json");
        let patch = dir.path().join("patch.json");
        write_json(&patch, &json!({"site": {"tagline": "Never stored"}}));

        with_store(&dir)
            .arg("--status-file")
            .arg(&status)
            .arg("mutate")
            .arg("--patch")
            .arg(&patch)
            .assert()
            .failure()
            .stdout(predicate::str::contains("\"writesFailed\": 1"))
            .stderr(predicate::str::contains("content write 1 failed"));

        assert_eq!(stored_document(&dir)["site"]["tagline"], "Kept");
        let snapshot: Value = serde_json::from_str(&fs::read_to_string(status).unwrap()).unwrap();
        assert_eq!(snapshot["writesFailed"], 1);
    }

    #[test]
    fn reset_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        with_store(&dir)
            .arg("reset")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--yes"));
    }

    #[test]
    fn reset_restores_defaults() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("store").join("site");
        fs::create_dir_all(&root).unwrap();
        write_json(
            &root.join("content.json"),
            &json!({"site": {"tagline": "Edited by admin"}}),
        );

        with_store(&dir)
            .args(["reset", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"origin\": \"reset\""));

        assert_eq!(&stored_document(&dir), pilgrim_cms::default_value());
    }
}

// ============================================
// Routing, packages, preferences
// ============================================

mod read_cmds {
    use super::*;

    #[test]
    fn book_now_routes_to_contact() {
        let dir = TempDir::new().unwrap();
        with_store(&dir)
            .args(["route", "#book-now?subject=Umrah%20Retreat"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"id\": \"contact\""))
            .stdout(predicate::str::contains("\"subject\": \"Umrah Retreat\""));
    }

    #[test]
    fn admin_needs_authentication() {
        let dir = TempDir::new().unwrap();
        with_store(&dir)
            .args(["route", "#admin"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"id\": \"login\""))
            .stdout(predicate::str::contains("\"redirect\": \"#admin\""));

        with_store(&dir)
            .args(["route", "#admin", "--authenticated"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"id\": \"admin\""));
    }

    #[test]
    fn route_does_not_write_to_the_store() {
        let dir = TempDir::new().unwrap();
        with_store(&dir).args(["route", "#hajj-guide"]).assert().success();
        assert!(!dir.path().join("store").exists());
    }

    #[test]
    fn packages_sorted_by_price() {
        let dir = TempDir::new().unwrap();
        let output = with_store(&dir)
            .args(["packages", "--list", "hajj", "--sort", "price-desc"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(rows[0]["name"], "Premium Hajj");
        assert_eq!(rows[1]["name"], "Economy Hajj");
    }

    #[test]
    fn packages_reject_unknown_list() {
        let dir = TempDir::new().unwrap();
        with_store(&dir)
            .args(["packages", "--list", "cruise"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown package kind"));
    }

    #[test]
    fn prefs_toggle_and_theme() {
        let dir = TempDir::new().unwrap();
        with_store(&dir)
            .args(["prefs", "toggle", "passport"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"completed\": 1"));

        with_store(&dir)
            .args(["prefs", "theme", "--dark", "--primary-color", "#0f766e"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"mode\": \"dark\""));

        with_store(&dir)
            .args(["prefs", "theme", "--primary-color", "teal"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not a #rgb or #rrggbb"));
    }

    #[test]
    fn prefs_completion_counts_the_stored_checklist() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("store").join("site");
        fs::create_dir_all(&site).unwrap();
        write_json(
            &site.join("content.json"),
            &json!({"pages": {"checklist": {"items": [
                {"id": "passport", "label": "Passport"},
                {"id": "zamzam-bottle", "label": "Zamzam bottle"}
            ]}}}),
        );

        with_store(&dir)
            .args(["prefs", "toggle", "passport"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"completed\": 1"))
            .stdout(predicate::str::contains("\"total\": 2"));
    }
}
