//! Stateless request classification.
//!
//! Every intercepted request falls into exactly one class, which selects
//! the cache strategy applied to it. Classification looks only at the
//! request itself (mode header, accept header, URL suffix) and is never
//! persisted.

use std::sync::LazyLock;

use regex::Regex;

/// Media URL suffixes: video and image formats, optionally followed by a
/// query string. Case-insensitive.
static MEDIA_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\.webm|\.mp4|\.mov|\.gif|\.png|\.jpe?g|\.webp)(\?|$)").unwrap());

/// Request class, deciding which cache strategy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Navigational HTML: served network-first with an offline fallback.
    Navigation,
    /// Video/image payloads: served stale-while-revalidate.
    Media,
    /// Everything else: served cache-first with background refresh.
    Asset,
}

impl RequestClass {
    /// Classify a request from its URL and headers.
    ///
    /// A request is navigational when its `Sec-Fetch-Mode` is `navigate`
    /// or its `Accept` header names `text/html`; otherwise media when the
    /// URL path carries a media suffix; otherwise a generic asset.
    pub fn of(path_and_query: &str, fetch_mode: Option<&str>, accept: Option<&str>) -> Self {
        if fetch_mode == Some("navigate") || accept.unwrap_or("").contains("text/html") {
            return Self::Navigation;
        }
        if MEDIA_SUFFIX.is_match(path_and_query) {
            return Self::Media;
        }
        Self::Asset
    }
}

impl std::fmt::Display for RequestClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Navigation => write!(f, "navigation"),
            Self::Media => write!(f, "media"),
            Self::Asset => write!(f, "asset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_mode() {
        let class = RequestClass::of("/", Some("navigate"), None);
        assert_eq!(class, RequestClass::Navigation);
    }

    #[test]
    fn test_accept_html() {
        let accept = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
        let class = RequestClass::of("/page", None, Some(accept));
        assert_eq!(class, RequestClass::Navigation);
    }

    #[test]
    fn test_navigation_wins_over_media_suffix() {
        // A navigation to a media-looking URL is still network-first.
        let class = RequestClass::of("/gallery.png", Some("navigate"), None);
        assert_eq!(class, RequestClass::Navigation);
    }

    #[test]
    fn test_media_extensions() {
        for path in ["/a.webm", "/b.mp4", "/c.mov", "/d.gif", "/e.png", "/f.jpg", "/g.jpeg", "/h.webp"] {
            assert_eq!(RequestClass::of(path, None, None), RequestClass::Media, "{path}");
        }
    }

    #[test]
    fn test_media_case_insensitive() {
        let class = RequestClass::of("/assets/SPLASH.PNG", None, None);
        assert_eq!(class, RequestClass::Media);
    }

    #[test]
    fn test_media_with_query() {
        let class = RequestClass::of("/hub_splash.mp4?v=3", None, None);
        assert_eq!(class, RequestClass::Media);
    }

    #[test]
    fn test_media_suffix_must_end_segment() {
        // ".mp4" in the middle of a path component is not a media URL.
        let class = RequestClass::of("/docs/video.mp4.html", None, None);
        assert_eq!(class, RequestClass::Asset);
    }

    #[test]
    fn test_asset_default() {
        let class = RequestClass::of("/api/data.json", None, Some("application/json"));
        assert_eq!(class, RequestClass::Asset);
    }
}
