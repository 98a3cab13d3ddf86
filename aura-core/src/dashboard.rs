//! Ties the settings record to the background store and keeps the two
//! consistent: the only link between them is `background.activeLocalId`.

use crate::background::{BackgroundRecord, BackgroundStore, Blob};
use crate::object_url::{ObjectUrl, ObjectUrls};
use crate::settings::{BackgroundKind, BackgroundSettings, Setting, SettingsStore};
use crate::{links, search, Result};
use serde::Serialize;
use std::sync::Mutex;

pub const BUILTIN_BACKGROUND_URL: &str =
    "https://bing.biturl.top/?resolution=1920&format=image&index=0&mkt=zh-CN";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "url", rename_all = "lowercase")]
pub enum BackgroundImage {
    None,
    Builtin(String),
    Custom(String),
    /// A live object URL held by the dashboard until superseded.
    Local(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundView {
    pub image: BackgroundImage,
    pub blur_px: u32,
    pub mask_color: String,
    /// 0.0 (no dimming) to 0.9.
    pub mask_opacity: f64,
}

/// Rendered local background: the record id and the URI that displays it.
struct ActiveLocal {
    id: String,
    url: ObjectUrl,
}

pub struct Dashboard {
    settings: SettingsStore,
    backgrounds: BackgroundStore,
    urls: ObjectUrls,
    active: Mutex<Option<ActiveLocal>>,
}

impl Dashboard {
    pub fn new(settings: SettingsStore, backgrounds: BackgroundStore) -> Self {
        Self {
            settings,
            backgrounds,
            urls: ObjectUrls::new(),
            active: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn backgrounds(&self) -> &BackgroundStore {
        &self.backgrounds
    }

    pub fn object_urls(&self) -> &ObjectUrls {
        &self.urls
    }

    /// Apply `patch` to the background group as one settings update.
    pub fn update_background(&self, patch: impl FnOnce(&mut BackgroundSettings)) -> Result<()> {
        let mut bg = self.settings.get().background;
        patch(&mut bg);
        self.settings.update(Setting::Background(bg))
    }

    /// Store an upload and make it the active background.
    pub fn upload_background(&self, file: Blob) -> Result<BackgroundRecord> {
        let record = self.backgrounds.add(file)?;
        let id = record.id.clone();
        self.update_background(|bg| {
            bg.kind = BackgroundKind::Local;
            bg.active_local_id = id;
        })?;
        tracing::info!(id = %record.id, "background uploaded");
        Ok(record)
    }

    /// Activate a stored record. `false` when the id is unknown.
    pub fn select_background(&self, id: &str) -> Result<bool> {
        if self.backgrounds.get_by_id(id)?.is_none() {
            return Ok(false);
        }
        self.update_background(|bg| {
            bg.kind = BackgroundKind::Local;
            bg.active_local_id = id.to_string();
        })?;
        Ok(true)
    }

    /// Delete a record; if it was the active background, fall back to builtin.
    pub fn delete_background(&self, id: &str) -> Result<()> {
        // "" is the unselected sentinel, never a record id
        if id.is_empty() {
            return Ok(());
        }
        self.backgrounds.delete(id)?;
        {
            let mut active = self.active.lock().unwrap();
            if active.as_ref().is_some_and(|a| a.id == id) {
                *active = None;
            }
        }
        if self.settings.get().background.active_local_id == id {
            self.update_background(|bg| {
                bg.kind = BackgroundKind::Builtin;
                bg.active_local_id.clear();
            })?;
            tracing::info!(%id, "active background deleted, reverted to builtin");
        }
        Ok(())
    }

    /// Resolve what the background layer should show. A local source is
    /// materialized into an object URL kept alive here; the previous one is
    /// released when replaced.
    pub fn render_background(&self) -> Result<BackgroundView> {
        let bg = self.settings.get().background;
        let image = match bg.kind {
            BackgroundKind::Builtin => {
                self.release_background();
                BackgroundImage::Builtin(BUILTIN_BACKGROUND_URL.to_string())
            }
            BackgroundKind::Custom => {
                self.release_background();
                BackgroundImage::Custom(bg.custom_url.clone())
            }
            BackgroundKind::Local => self.render_local(&bg.active_local_id)?,
        };
        Ok(BackgroundView {
            image,
            blur_px: bg.blur,
            mask_color: if bg.mask_color.is_empty() {
                "#000000".to_string()
            } else {
                bg.mask_color.clone()
            },
            mask_opacity: f64::from(100u32.saturating_sub(bg.brightness)) / 100.0,
        })
    }

    fn render_local(&self, id: &str) -> Result<BackgroundImage> {
        let mut active = self.active.lock().unwrap();
        if let Some(a) = active.as_ref() {
            if a.id == id && !id.is_empty() {
                return Ok(BackgroundImage::Local(a.url.to_string()));
            }
        }
        // dropping the old guard revokes its URI
        *active = None;
        if id.is_empty() {
            return Ok(BackgroundImage::None);
        }
        match self.backgrounds.get_by_id(id)? {
            Some(record) => {
                let url = self.urls.create(record.file);
                let shown = url.to_string();
                *active = Some(ActiveLocal {
                    id: record.id,
                    url,
                });
                Ok(BackgroundImage::Local(shown))
            }
            None => {
                tracing::debug!(%id, "active background record missing");
                Ok(BackgroundImage::None)
            }
        }
    }

    /// Unmount the background layer, revoking any held object URL.
    pub fn release_background(&self) {
        self.active.lock().unwrap().take();
    }

    /// Gallery thumbnail for one record; the caller releases the guard once
    /// the image has loaded.
    pub fn preview(&self, id: &str) -> Result<Option<ObjectUrl>> {
        Ok(self
            .backgrounds
            .get_by_id(id)?
            .map(|r| self.urls.create(r.file)))
    }

    pub fn add_quick_link(&self, title: &str, url: &str) -> Result<crate::QuickLink> {
        let link = links::new_link(title, url)?;
        let mut list = self.settings.get().quick_links;
        list.push(link.clone());
        self.settings.update(Setting::QuickLinks(list))?;
        Ok(link)
    }

    /// Returns whether a link was removed.
    pub fn remove_quick_link(&self, id: &str) -> Result<bool> {
        let list = self.settings.get().quick_links;
        let kept = links::remove_link(&list, id);
        if kept.len() == list.len() {
            return Ok(false);
        }
        self.settings.update(Setting::QuickLinks(kept))?;
        Ok(true)
    }

    pub fn move_quick_link(&self, from: usize, to: usize) -> Result<()> {
        let list = self.settings.get().quick_links;
        let moved = links::move_item(&list, from, to)?;
        self.settings.update(Setting::QuickLinks(moved))
    }

    /// Drag-end handler: drop `active_id` onto `over_id`.
    pub fn reorder_quick_links(&self, active_id: &str, over_id: &str) -> Result<()> {
        let list = self.settings.get().quick_links;
        let moved = links::reorder_by_id(&list, active_id, over_id);
        if moved == list {
            return Ok(());
        }
        self.settings.update(Setting::QuickLinks(moved))
    }

    /// Navigation target for `query` using the selected engine.
    pub fn search_target(&self, query: &str) -> Option<String> {
        search::search_url(&self.settings.get().search_engine, query)
    }
}
