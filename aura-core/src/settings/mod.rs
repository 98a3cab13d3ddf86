//! User preferences: the single settings record shared by every widget.
//!
//! The record is persisted as one JSON document under [`SETTINGS_KEY`].
//! Every struct carries `#[serde(default)]`, so a stored document missing
//! some fields (older schema) still loads, with only those fields falling
//! back to their defaults.

mod backend;
mod store;

pub use backend::{JsonFileBackend, MemoryBackend, SettingsBackend};
pub use store::{SettingsStore, SubscriptionId};

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage key of the persisted settings record.
pub const SETTINGS_KEY: &str = "aura-settings";

pub const BLUR_RANGE: (u32, u32) = (0, 20);
pub const BRIGHTNESS_RANGE: (u32, u32) = (10, 100);

const DEFAULT_CUSTOM_URL: &str = "https://images.unsplash.com/photo-1477346611705-65d1883cee1e?q=80&w=1920&auto=format&fit=crop";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ClockFormat {
    #[serde(rename = "12")]
    H12,
    #[default]
    #[serde(rename = "24")]
    H24,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickLink {
    pub id: String,
    pub title: String,
    pub url: String,
}

impl QuickLink {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Builtin,
    Custom,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundSettings {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub custom_url: String,
    /// Id of the selected record in the background store. Weak reference:
    /// only the delete path checks it.
    pub active_local_id: String,
    /// Blur radius in px, 0..=20.
    pub blur: u32,
    /// 10..=100; the mask covers `100 - brightness` percent.
    pub brightness: u32,
    pub mask_color: String,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Builtin,
            custom_url: DEFAULT_CUSTOM_URL.to_string(),
            active_local_id: String::new(),
            blur: 0,
            brightness: 60,
            mask_color: "#000000".to_string(),
        }
    }
}

pub fn clamp_blur(v: u32) -> u32 {
    v.clamp(BLUR_RANGE.0, BLUR_RANGE.1)
}

pub fn clamp_brightness(v: u32) -> u32 {
    v.clamp(BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub clock_format: ClockFormat,
    pub font_family: FontFamily,
    /// Key into the search engine registry; unknown keys fall back to google.
    pub search_engine: String,
    /// Display order matters; ids are unique within the list.
    pub quick_links: Vec<QuickLink>,
    pub background: BackgroundSettings,
    pub weather_api_key: String,
    pub weather_api_host: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            clock_format: ClockFormat::H24,
            font_family: FontFamily::Sans,
            search_engine: "google".to_string(),
            quick_links: vec![
                QuickLink::new("1", "GitHub", "https://github.com"),
                QuickLink::new("2", "YouTube", "https://youtube.com"),
                QuickLink::new("3", "Gmail", "https://mail.google.com"),
            ],
            background: BackgroundSettings::default(),
            weather_api_key: String::new(),
            weather_api_host: String::new(),
        }
    }
}

impl Settings {
    /// Replace the field named by `setting`, leaving every other field as is.
    pub fn apply(&mut self, setting: Setting) {
        match setting {
            Setting::Theme(v) => self.theme = v,
            Setting::ClockFormat(v) => self.clock_format = v,
            Setting::FontFamily(v) => self.font_family = v,
            Setting::SearchEngine(v) => self.search_engine = v,
            Setting::QuickLinks(v) => self.quick_links = v,
            Setting::Background(v) => self.background = v,
            Setting::WeatherApiKey(v) => self.weather_api_key = v,
            Setting::WeatherApiHost(v) => self.weather_api_host = v,
        }
    }

    /// Current value of one field, in its persisted JSON shape.
    pub fn field(&self, key: SettingKey) -> Result<serde_json::Value> {
        let v = match key {
            SettingKey::Theme => serde_json::to_value(self.theme)?,
            SettingKey::ClockFormat => serde_json::to_value(self.clock_format)?,
            SettingKey::FontFamily => serde_json::to_value(self.font_family)?,
            SettingKey::SearchEngine => serde_json::to_value(&self.search_engine)?,
            SettingKey::QuickLinks => serde_json::to_value(&self.quick_links)?,
            SettingKey::Background => serde_json::to_value(&self.background)?,
            SettingKey::WeatherApiKey => serde_json::to_value(&self.weather_api_key)?,
            SettingKey::WeatherApiHost => serde_json::to_value(&self.weather_api_host)?,
        };
        Ok(v)
    }
}

/// Names of the top-level settings fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Theme,
    ClockFormat,
    FontFamily,
    SearchEngine,
    QuickLinks,
    Background,
    WeatherApiKey,
    WeatherApiHost,
}

impl SettingKey {
    pub const ALL: [SettingKey; 8] = [
        SettingKey::Theme,
        SettingKey::ClockFormat,
        SettingKey::FontFamily,
        SettingKey::SearchEngine,
        SettingKey::QuickLinks,
        SettingKey::Background,
        SettingKey::WeatherApiKey,
        SettingKey::WeatherApiHost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Theme => "theme",
            SettingKey::ClockFormat => "clockFormat",
            SettingKey::FontFamily => "fontFamily",
            SettingKey::SearchEngine => "searchEngine",
            SettingKey::QuickLinks => "quickLinks",
            SettingKey::Background => "background",
            SettingKey::WeatherApiKey => "weatherApiKey",
            SettingKey::WeatherApiHost => "weatherApiHost",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SettingKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Validation(format!("unknown setting '{s}'")))
    }
}

/// A typed `(key, value)` update: one variant per settings field.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Theme(Theme),
    ClockFormat(ClockFormat),
    FontFamily(FontFamily),
    SearchEngine(String),
    QuickLinks(Vec<QuickLink>),
    Background(BackgroundSettings),
    WeatherApiKey(String),
    WeatherApiHost(String),
}

impl Setting {
    pub fn key(&self) -> SettingKey {
        match self {
            Setting::Theme(_) => SettingKey::Theme,
            Setting::ClockFormat(_) => SettingKey::ClockFormat,
            Setting::FontFamily(_) => SettingKey::FontFamily,
            Setting::SearchEngine(_) => SettingKey::SearchEngine,
            Setting::QuickLinks(_) => SettingKey::QuickLinks,
            Setting::Background(_) => SettingKey::Background,
            Setting::WeatherApiKey(_) => SettingKey::WeatherApiKey,
            Setting::WeatherApiHost(_) => SettingKey::WeatherApiHost,
        }
    }

    /// Build a typed update from a loosely typed JSON value.
    pub fn from_json(key: SettingKey, value: serde_json::Value) -> Result<Self> {
        fn parse<T: serde::de::DeserializeOwned>(
            key: SettingKey,
            value: serde_json::Value,
        ) -> Result<T> {
            serde_json::from_value(value)
                .map_err(|e| Error::Validation(format!("bad value for '{key}': {e}")))
        }
        let setting = match key {
            SettingKey::Theme => Setting::Theme(parse(key, value)?),
            SettingKey::ClockFormat => Setting::ClockFormat(parse(key, value)?),
            SettingKey::FontFamily => Setting::FontFamily(parse(key, value)?),
            SettingKey::SearchEngine => Setting::SearchEngine(parse(key, value)?),
            SettingKey::QuickLinks => Setting::QuickLinks(parse(key, value)?),
            SettingKey::Background => Setting::Background(parse(key, value)?),
            SettingKey::WeatherApiKey => Setting::WeatherApiKey(parse(key, value)?),
            SettingKey::WeatherApiHost => Setting::WeatherApiHost(parse(key, value)?),
        };
        Ok(setting)
    }
}
