//! Request routing policy.
//!
//! The three-way classification (HTML navigation / static asset / anything
//! else) is expressed as data: an ordered list of predicate→strategy pairs,
//! evaluated top to bottom. The table is independent of the event plumbing
//! so the policy can be tested on its own.

/// Path suffixes treated as static assets.
pub const STATIC_SUFFIXES: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "css", "js", "woff", "woff2",
];

/// How an intercepted GET request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Live response preferred; a 200 is copied into the dynamic bucket.
    /// Cache is the fallback when the network fails.
    NetworkFirst,
    /// Stored response preferred, network only on a miss (a fetched 200 is
    /// then stored).
    CacheFirst,
    /// Live response preferred, nothing stored; cache only softens a
    /// network failure.
    NetworkFallback,
}

/// A single routing rule predicate.
#[derive(Debug, Clone, Copy)]
pub enum RoutePredicate {
    /// The request's Accept header includes `text/html`.
    ///
    /// A request without an Accept header never matches; it falls through
    /// to the rules below instead of failing.
    AcceptsHtml,
    /// The URL path ends in one of these extensions.
    PathSuffix(&'static [&'static str]),
    /// Catch-all.
    Any,
}

/// The routing table, first match wins.
pub const ROUTES: &[(RoutePredicate, Strategy)] = &[
    (RoutePredicate::AcceptsHtml, Strategy::NetworkFirst),
    (RoutePredicate::PathSuffix(STATIC_SUFFIXES), Strategy::CacheFirst),
    (RoutePredicate::Any, Strategy::NetworkFallback),
];

impl RoutePredicate {
    fn matches(&self, path: &str, accept: Option<&str>) -> bool {
        match self {
            RoutePredicate::AcceptsHtml => accept.is_some_and(|a| a.contains("text/html")),
            RoutePredicate::PathSuffix(suffixes) => path
                .rsplit_once('.')
                .is_some_and(|(_, ext)| suffixes.iter().any(|s| ext.eq_ignore_ascii_case(s))),
            RoutePredicate::Any => true,
        }
    }
}

/// Classify a request by URL path and Accept header.
pub fn classify(path: &str, accept: Option<&str>) -> Strategy {
    for (predicate, strategy) in ROUTES {
        if predicate.matches(path, accept) {
            return *strategy;
        }
    }
    // ROUTES ends in Any
    Strategy::NetworkFallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_navigation_is_network_first() {
        let accept = Some("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8");
        assert_eq!(classify("/", accept), Strategy::NetworkFirst);
        assert_eq!(classify("/picadas.html", accept), Strategy::NetworkFirst);
    }

    #[test]
    fn test_accept_wins_over_suffix() {
        // The table is ordered: an HTML navigation to a .css path is still
        // network-first.
        assert_eq!(classify("/styles.css", Some("text/html")), Strategy::NetworkFirst);
    }

    #[test]
    fn test_static_assets_are_cache_first() {
        assert_eq!(classify("/image/logoFood.png", None), Strategy::CacheFirst);
        assert_eq!(classify("/styles.css", Some("text/css,*/*;q=0.1")), Strategy::CacheFirst);
        assert_eq!(classify("/script.js", Some("*/*")), Strategy::CacheFirst);
        assert_eq!(classify("/fonts/menu.woff2", None), Strategy::CacheFirst);
    }

    #[test]
    fn test_suffix_match_is_case_insensitive() {
        assert_eq!(classify("/image/LOGO.PNG", None), Strategy::CacheFirst);
    }

    #[test]
    fn test_everything_else_is_network_fallback() {
        assert_eq!(classify("/manifest.json", None), Strategy::NetworkFallback);
        assert_eq!(classify("/api/estado", Some("application/json")), Strategy::NetworkFallback);
        assert_eq!(classify("/no-extension", None), Strategy::NetworkFallback);
    }

    #[test]
    fn test_missing_accept_falls_through() {
        // No Accept header is not an error; the request simply never takes
        // the HTML route.
        assert_eq!(classify("/index.html", None), Strategy::NetworkFallback);
        assert_eq!(classify("/image/logo.webp", None), Strategy::CacheFirst);
    }

    #[test]
    fn test_dotted_directories_use_final_extension() {
        assert_eq!(classify("/v1.2/app.js", None), Strategy::CacheFirst);
        assert_eq!(classify("/v1.2/readme", None), Strategy::NetworkFallback);
    }
}
