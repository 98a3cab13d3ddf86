//! aura-core: settings record, background image store, and the pure helpers
//! behind the Aura new-tab dashboard widgets.

pub mod background;
pub mod clock;
pub mod dashboard;
pub mod error;
pub mod links;
pub mod object_url;
pub mod search;
pub mod settings;
pub mod weather;

pub use background::{BackgroundRecord, BackgroundStore, Blob};
pub use dashboard::{BackgroundImage, BackgroundView, Dashboard};
pub use error::{Error, Result};
pub use object_url::{ObjectUrl, ObjectUrls};
pub use settings::{
    BackgroundKind, BackgroundSettings, ClockFormat, FontFamily, JsonFileBackend, MemoryBackend,
    QuickLink, Setting, SettingKey, Settings, SettingsBackend, SettingsStore, SubscriptionId,
    Theme, SETTINGS_KEY,
};
