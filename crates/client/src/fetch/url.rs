//! Resolution of intercepted request paths against the configured origin.

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty origin")]
    EmptyOrigin,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("origin has no host: {0}")]
    MissingHost(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Resolve a root-relative request path against the origin base URL.
///
/// Normalization steps:
/// 1. Trim whitespace from the origin
/// 2. Require http or https and a host
/// 3. Lowercase the host
/// 4. Remove any fragment
/// 5. Keep the path's query string intact
///
/// Absolute http(s) URLs are passed through the same normalization, so an
/// intercepted request that carries a full URL resolves consistently.
pub fn resolve(origin: &str, path: &str) -> Result<url::Url, UrlError> {
    let trimmed = origin.trim();

    if trimmed.is_empty() {
        return Err(UrlError::EmptyOrigin);
    }

    let base = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match base.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if base.host_str().is_none() {
        return Err(UrlError::MissingHost(trimmed.to_string()));
    }

    let mut resolved = if path.contains("://") {
        url::Url::parse(path).map_err(|e| UrlError::InvalidUrl(e.to_string()))?
    } else {
        base.join(path).map_err(|e| UrlError::InvalidUrl(e.to_string()))?
    };

    match resolved.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = resolved.host_str() {
        let lowered = host.to_lowercase();
        resolved
            .set_host(Some(&lowered))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    resolved.set_fragment(None);

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_basic() {
        let url = resolve("http://menu.local:8080", "/index.html").unwrap();
        assert_eq!(url.as_str(), "http://menu.local:8080/index.html");
    }

    #[test]
    fn test_resolve_root() {
        let url = resolve("http://menu.local", "/").unwrap();
        assert_eq!(url.as_str(), "http://menu.local/");
    }

    #[test]
    fn test_resolve_preserves_query() {
        let url = resolve("http://menu.local", "/picadas.html?mesa=4").unwrap();
        assert_eq!(url.path(), "/picadas.html");
        assert_eq!(url.query(), Some("mesa=4"));
    }

    #[test]
    fn test_resolve_strips_fragment() {
        let url = resolve("http://menu.local", "/bebidas.html#gaseosas").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path(), "/bebidas.html");
    }

    #[test]
    fn test_resolve_lowercases_host() {
        let url = resolve("http://MENU.LOCAL", "/").unwrap();
        assert_eq!(url.host_str(), Some("menu.local"));
    }

    #[test]
    fn test_resolve_absolute_url_passthrough() {
        let url = resolve("http://menu.local", "https://cdn.example.com/font.woff2").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/font.woff2");
    }

    #[test]
    fn test_resolve_trims_origin_whitespace() {
        let url = resolve("  http://menu.local  ", "/styles.css").unwrap();
        assert_eq!(url.as_str(), "http://menu.local/styles.css");
    }

    #[test]
    fn test_resolve_empty_origin() {
        let result = resolve("   ", "/");
        assert!(matches!(result, Err(UrlError::EmptyOrigin)));
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        let result = resolve("file:///var/www", "/index.html");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_resolve_origin_without_host() {
        let result = resolve("http://", "/");
        assert!(result.is_err());
    }
}
