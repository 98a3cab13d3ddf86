//! Search engine registry and navigation targets.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchEngine {
    pub key: &'static str,
    pub name: &'static str,
    /// Query is appended, percent-encoded.
    pub url: &'static str,
    pub icon: &'static str,
}

pub const DEFAULT_ENGINE: &str = "google";

pub const ENGINES: &[SearchEngine] = &[
    SearchEngine {
        key: "google",
        name: "Google",
        url: "https://www.google.com/search?q=",
        icon: "G",
    },
    SearchEngine {
        key: "bing",
        name: "Bing",
        url: "https://www.bing.com/search?q=",
        icon: "b",
    },
    SearchEngine {
        key: "baidu",
        name: "Baidu",
        url: "https://www.baidu.com/s?wd=",
        icon: "度",
    },
    SearchEngine {
        key: "duckduckgo",
        name: "DuckDuckGo",
        url: "https://duckduckgo.com/?q=",
        icon: "🦆",
    },
];

pub fn find(key: &str) -> Option<&'static SearchEngine> {
    ENGINES.iter().find(|e| e.key == key)
}

/// Registry lookup; unknown keys resolve to the default engine.
pub fn engine(key: &str) -> &'static SearchEngine {
    find(key)
        .or_else(|| find(DEFAULT_ENGINE))
        .unwrap_or(&ENGINES[0])
}

/// Where to navigate for `query`; `None` for a blank query.
///
/// Everything outside `A-Z a-z 0-9 - _ . ~` is percent-encoded, including
/// `!'()*`.
pub fn search_url(key: &str, query: &str) -> Option<String> {
    if query.trim().is_empty() {
        return None;
    }
    let engine = engine(key);
    Some(format!("{}{}", engine.url, urlencoding::encode(query)))
}
