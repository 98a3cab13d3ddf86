use super::{Setting, Settings, SettingsBackend, SETTINGS_KEY};
use crate::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&Settings) + Send + Sync>;

/// Single owner of the settings record. Every read and write goes through
/// here; each update is mirrored to the backend and pushed to subscribers.
pub struct SettingsStore {
    backend: Box<dyn SettingsBackend>,
    current: RwLock<Settings>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl SettingsStore {
    /// Read the persisted record. Absent, unreadable or malformed input
    /// yields the defaults; this never fails.
    pub fn load<B: SettingsBackend + 'static>(backend: B) -> Self {
        let settings = match backend.load(SETTINGS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Settings>(&raw) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(error = %e, "malformed settings record, using defaults");
                    Settings::default()
                }
            },
            Ok(None) => {
                tracing::debug!("no settings record, using defaults");
                Settings::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "settings record unreadable, using defaults");
                Settings::default()
            }
        };
        Self {
            backend: Box::new(backend),
            current: RwLock::new(settings),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn get(&self) -> Settings {
        self.current.read().unwrap().clone()
    }

    /// Replace one field, persist the whole record, notify subscribers.
    ///
    /// The in-memory record and subscribers see the change even when the
    /// durable write fails; that failure is returned to the caller.
    pub fn update(&self, setting: Setting) -> Result<()> {
        let key = setting.key();
        let snapshot = {
            let mut cur = self.current.write().unwrap();
            cur.apply(setting);
            cur.clone()
        };
        tracing::debug!(%key, "setting updated");
        let persisted = self.persist(&snapshot);
        self.notify(&snapshot);
        persisted
    }

    /// Restore the default record.
    pub fn reset(&self) -> Result<()> {
        let snapshot = Settings::default();
        *self.current.write().unwrap() = snapshot.clone();
        let persisted = self.persist(&snapshot);
        self.notify(&snapshot);
        persisted
    }

    /// Register a listener called with the new record after each change.
    /// Listeners may call back into the store.
    pub fn subscribe<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().unwrap().push((id, Arc::new(f)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.backend.save(SETTINGS_KEY, &raw).inspect_err(|e| {
            tracing::warn!(error = %e, "failed to persist settings");
        })
    }

    fn notify(&self, settings: &Settings) {
        // snapshot so callbacks run without the lock held
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .map(|(_, f)| Arc::clone(f))
            .collect();
        for f in listeners {
            f(settings);
        }
    }
}
