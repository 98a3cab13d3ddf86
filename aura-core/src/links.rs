//! Quick-link list operations. All pure: each returns a new list.

use crate::settings::QuickLink;
use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static HAS_HTTP_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("static regex"));

/// Move the element at `from` to `to`, shifting the rest.
///
/// `[A, B, C, D]` with `from = 0, to = 2` gives `[B, C, A, D]`.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>> {
    let len = items.len();
    if from >= len || to >= len {
        return Err(Error::Validation(format!(
            "move {from} -> {to} out of range for {len} items"
        )));
    }
    let mut out = items.to_vec();
    let item = out.remove(from);
    out.insert(to, item);
    Ok(out)
}

/// Drag-end reorder: move the dragged link onto the position of the link
/// it was dropped over. Equal or unknown ids leave the list unchanged.
pub fn reorder_by_id(links: &[QuickLink], active_id: &str, over_id: &str) -> Vec<QuickLink> {
    if active_id == over_id {
        return links.to_vec();
    }
    let from = links.iter().position(|l| l.id == active_id);
    let to = links.iter().position(|l| l.id == over_id);
    match (from, to) {
        (Some(from), Some(to)) => move_item(links, from, to).unwrap_or_else(|_| links.to_vec()),
        _ => links.to_vec(),
    }
}

/// Prefix `https://` unless the input already names an http(s) scheme.
pub fn normalize_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::Validation("url is empty".into()));
    }
    if HAS_HTTP_SCHEME.is_match(raw) {
        Ok(raw.to_string())
    } else {
        Ok(format!("https://{raw}"))
    }
}

pub fn new_link(title: &str, url: &str) -> Result<QuickLink> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::Validation("title is empty".into()));
    }
    let url = normalize_url(url)?;
    Ok(QuickLink::new(
        uuid::Uuid::new_v4().simple().to_string(),
        title,
        url,
    ))
}

pub fn remove_link(links: &[QuickLink], id: &str) -> Vec<QuickLink> {
    links.iter().filter(|l| l.id != id).cloned().collect()
}

/// Icon service address for the link's host; `None` when the URL has no host.
pub fn favicon_url(link_url: &str) -> Option<String> {
    let parsed = url::Url::parse(link_url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("https://icons.duckduckgo.com/ip3/{host}.ico"))
}
