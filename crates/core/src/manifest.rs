//! Precache manifest: the fixed list of paths installed into the static
//! bucket.
//!
//! The built-in default covers the menu site's pages and assets. A
//! deployment can override it with a JSON file (`{"paths": [...]}`) named
//! in configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Paths cached at install time, in order.
const DEFAULT_PATHS: &[&str] = &[
    "/",
    "/index.html",
    "/styles.css",
    "/script.js",
    "/manifest.json",
    "/image/logoFood.png",
    "/image/LogoHungerFood.png",
    "/adiciones.html",
    "/comidas-rapidas.html",
    "/entradas.html",
    "/picadas.html",
    "/asados.html",
    "/bebidas.html",
];

/// An ordered list of root-relative paths to precache.
///
/// Installation fetches every path and fails atomically if any of them
/// does; see the worker's install phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub paths: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self { paths: DEFAULT_PATHS.iter().map(|p| (*p).to_string()).collect() }
    }
}

impl Manifest {
    /// Load a manifest from a JSON file.
    ///
    /// Paths are normalized and validated; order is preserved, duplicates
    /// dropped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::InvalidManifest(format!("{}: {}", path.as_ref().display(), e)))?;
        let manifest: Self =
            serde_json::from_str(&contents).map_err(|e| Error::InvalidManifest(e.to_string()))?;
        manifest.normalized()
    }

    /// Normalize and validate the path list.
    ///
    /// `./x` becomes `/x`; everything must end up root-relative. An empty
    /// list is rejected since an empty static bucket would defeat the
    /// worker entirely.
    pub fn normalized(&self) -> Result<Self, Error> {
        if self.paths.is_empty() {
            return Err(Error::InvalidManifest("manifest has no paths".into()));
        }

        let mut paths = Vec::with_capacity(self.paths.len());
        for raw in &self.paths {
            let path = match raw.as_str() {
                "." | "./" => "/".to_string(),
                p if p.starts_with("./") => p.replacen('.', "", 1),
                p if p.starts_with('/') => p.to_string(),
                p => {
                    return Err(Error::InvalidManifest(format!("path is not root-relative: {p:?}")));
                }
            };
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        Ok(Self { paths })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_are_root_relative() {
        let manifest = Manifest::default();
        assert!(!manifest.paths.is_empty());
        assert!(manifest.paths.iter().all(|p| p.starts_with('/')));
        assert!(manifest.paths.contains(&"/index.html".to_string()));
    }

    #[test]
    fn test_normalize_dot_slash() {
        let manifest = Manifest {
            paths: vec!["./".into(), "./index.html".into(), "/styles.css".into()],
        };
        let normalized = manifest.normalized().unwrap();
        assert_eq!(normalized.paths, vec!["/", "/index.html", "/styles.css"]);
    }

    #[test]
    fn test_normalize_drops_duplicates_keeps_order() {
        let manifest = Manifest {
            paths: vec!["/a.html".into(), "/b.html".into(), "./a.html".into()],
        };
        let normalized = manifest.normalized().unwrap();
        assert_eq!(normalized.paths, vec!["/a.html", "/b.html"]);
    }

    #[test]
    fn test_rejects_relative_path() {
        let manifest = Manifest { paths: vec!["index.html".into()] };
        assert!(matches!(manifest.normalized(), Err(Error::InvalidManifest(_))));
    }

    #[test]
    fn test_rejects_empty() {
        let manifest = Manifest { paths: vec![] };
        assert!(matches!(manifest.normalized(), Err(Error::InvalidManifest(_))));
    }

    #[test]
    fn test_roundtrip_json() {
        let manifest = Manifest::default();
        let json = serde_json::to_string(&manifest).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.paths, manifest.paths);
    }
}
