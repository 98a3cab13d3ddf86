mod common;
use common::TestEnv;
use predicates::prelude::*;

#[test]
fn set_persists_across_invocations() {
    let t = TestEnv::new();
    t.bin()
        .args(["settings", "set", "theme", "light"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set theme"));
    t.bin()
        .args(["settings", "set", "clockFormat", "12"])
        .assert()
        .success();

    let v: serde_json::Value =
        serde_json::from_str(&t.stdout(&["settings", "show", "--json"])).unwrap();
    assert_eq!(v["theme"], "light");
    assert_eq!(v["clockFormat"], "12");
    assert_eq!(v["searchEngine"], "google");

    let raw = std::fs::read_to_string(t.data.join("aura-settings.json")).unwrap();
    assert!(raw.contains("\"theme\":\"light\""));
}

#[test]
fn invalid_key_or_value_fails() {
    let t = TestEnv::new();
    t.bin()
        .args(["settings", "set", "wallpaper", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown setting"));
    t.bin()
        .args(["settings", "set", "fontFamily", "comic"])
        .assert()
        .failure();
}

#[test]
fn malformed_record_falls_back_to_defaults() {
    let t = TestEnv::new();
    std::fs::create_dir_all(&t.data).unwrap();
    std::fs::write(t.data.join("aura-settings.json"), "{oops").unwrap();
    let v: serde_json::Value =
        serde_json::from_str(&t.stdout(&["settings", "show", "--json"])).unwrap();
    assert_eq!(v["theme"], "dark");
    assert_eq!(v["quickLinks"].as_array().unwrap().len(), 3);
}

#[test]
fn search_uses_configured_engine() {
    let t = TestEnv::new();
    t.bin()
        .args(["settings", "set", "searchEngine", "duckduckgo"])
        .assert()
        .success();
    let out = t.stdout(&["search", "cats"]);
    assert_eq!(out.trim(), "https://duckduckgo.com/?q=cats");
    let out = t.stdout(&["search", "--engine", "bing", "rust", "lang"]);
    assert_eq!(out.trim(), "https://www.bing.com/search?q=rust%20lang");
}
