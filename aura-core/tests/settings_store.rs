use aura_core::{
    BackgroundKind, BackgroundSettings, ClockFormat, Error, FontFamily, JsonFileBackend,
    MemoryBackend, QuickLink, Result, Setting, Settings, SettingsBackend, SettingsStore, Theme,
    SETTINGS_KEY,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn missing_record_loads_defaults() {
    let store = SettingsStore::load(MemoryBackend::new());
    assert_eq!(store.get(), Settings::default());
}

#[test]
fn malformed_record_loads_defaults() {
    let store = SettingsStore::load(MemoryBackend::with_entry(SETTINGS_KEY, "{not json"));
    assert_eq!(store.get(), Settings::default());
    // wrong type for a known field is treated the same as garbage
    let store = SettingsStore::load(MemoryBackend::with_entry(SETTINGS_KEY, r#"{"theme":42}"#));
    assert_eq!(store.get(), Settings::default());
}

#[test]
fn partial_record_merges_defaults_per_field() {
    let raw = r#"{"theme":"light","searchEngine":"bing","background":{"blur":12}}"#;
    let s = SettingsStore::load(MemoryBackend::with_entry(SETTINGS_KEY, raw)).get();
    let d = Settings::default();
    assert_eq!(s.theme, Theme::Light);
    assert_eq!(s.search_engine, "bing");
    assert_eq!(s.background.blur, 12);
    assert_eq!(s.background.brightness, d.background.brightness);
    assert_eq!(s.background.custom_url, d.background.custom_url);
    assert_eq!(s.clock_format, d.clock_format);
    assert_eq!(s.quick_links, d.quick_links);
}

#[test]
fn update_changes_only_the_named_field() {
    let store = SettingsStore::load(MemoryBackend::new());
    let updates = vec![
        Setting::Theme(Theme::Light),
        Setting::ClockFormat(ClockFormat::H12),
        Setting::FontFamily(FontFamily::Mono),
        Setting::SearchEngine("duckduckgo".into()),
        Setting::QuickLinks(vec![QuickLink::new("x", "X", "https://x.org")]),
        Setting::WeatherApiKey("k".into()),
        Setting::WeatherApiHost("api.example".into()),
        Setting::Background(BackgroundSettings {
            kind: BackgroundKind::Custom,
            blur: 8,
            ..BackgroundSettings::default()
        }),
    ];
    for setting in updates {
        let before = serde_json::to_value(store.get()).unwrap();
        let key = setting.key();
        store.update(setting).unwrap();
        let after = serde_json::to_value(store.get()).unwrap();
        let (before, after) = (before.as_object().unwrap(), after.as_object().unwrap());
        for (field, value) in before {
            if field == key.as_str() {
                assert_ne!(after[field], *value, "{key} did not change");
            } else {
                assert_eq!(after[field], *value, "{field} changed while updating {key}");
            }
        }
    }
}

#[test]
fn update_persists_and_survives_restart() {
    let dir = tempdir().unwrap();
    {
        let store = SettingsStore::load(JsonFileBackend::new(dir.path()));
        store.update(Setting::Theme(Theme::Light)).unwrap();
        let mut bg = store.get().background;
        bg.kind = BackgroundKind::Custom;
        bg.custom_url = "https://img.example/a.jpg".into();
        store.update(Setting::Background(bg)).unwrap();
    }
    let reloaded = SettingsStore::load(JsonFileBackend::new(dir.path())).get();
    assert_eq!(reloaded.theme, Theme::Light);
    assert_eq!(reloaded.background.kind, BackgroundKind::Custom);
    assert_eq!(reloaded.background.custom_url, "https://img.example/a.jpg");
    assert_eq!(reloaded.quick_links, Settings::default().quick_links);
    assert!(dir.path().join("aura-settings.json").exists());
}

#[test]
fn subscribers_see_updates_synchronously() {
    let store = SettingsStore::load(MemoryBackend::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = store.subscribe(move |s| sink.lock().unwrap().push(s.theme));

    store.update(Setting::Theme(Theme::Light)).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![Theme::Light]);

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.update(Setting::Theme(Theme::Dark)).unwrap();
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn listener_may_update_the_store() {
    let store = Arc::new(SettingsStore::load(MemoryBackend::new()));
    let weak = Arc::downgrade(&store);
    store.subscribe(move |s| {
        if s.theme == Theme::Light && s.search_engine != "bing" {
            if let Some(store) = weak.upgrade() {
                store.update(Setting::SearchEngine("bing".into())).unwrap();
            }
        }
    });

    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(&store);
    std::thread::spawn(move || {
        let res = worker.update(Setting::Theme(Theme::Light));
        let _ = tx.send(res.is_ok());
    });
    assert_eq!(rx.recv_timeout(Duration::from_secs(3)), Ok(true));
    let s = store.get();
    assert_eq!(s.theme, Theme::Light);
    assert_eq!(s.search_engine, "bing");
}

#[test]
fn reset_restores_defaults_and_notifies() {
    let store = SettingsStore::load(MemoryBackend::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    store.subscribe(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    store.update(Setting::SearchEngine("baidu".into())).unwrap();
    store.reset().unwrap();
    assert_eq!(store.get(), Settings::default());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

struct FailingBackend;

impl SettingsBackend for FailingBackend {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }
    fn save(&self, _key: &str, _value: &str) -> Result<()> {
        Err(std::io::Error::other("quota exceeded").into())
    }
}

#[test]
fn failed_write_still_updates_memory_and_reports_storage_error() {
    let store = SettingsStore::load(FailingBackend);
    let notified = Arc::new(AtomicUsize::new(0));
    let n = Arc::clone(&notified);
    store.subscribe(move |_| {
        n.fetch_add(1, Ordering::SeqCst);
    });
    let err = store.update(Setting::Theme(Theme::Light)).unwrap_err();
    assert!(err.is_storage());
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(store.get().theme, Theme::Light);
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[test]
fn shared_backend_sees_serialized_record() {
    let backend = Arc::new(MemoryBackend::new());
    let store = SettingsStore::load(Arc::clone(&backend));
    store.update(Setting::ClockFormat(ClockFormat::H12)).unwrap();
    let raw = backend.load(SETTINGS_KEY).unwrap().expect("persisted");
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["clockFormat"], "12");
    assert_eq!(v["background"]["type"], "builtin");
}
