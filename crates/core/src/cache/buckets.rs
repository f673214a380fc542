//! Bucket naming and the cache version tag.
//!
//! Bucket names double as the versioning key: the configured version tag is
//! embedded in both names, and every bucket carrying a different tag is
//! stale and swept at activation.

/// Prefix shared by every bucket this worker owns.
pub const BUCKET_PREFIX: &str = "carta";

/// The pair of bucket names for one cache version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketNames {
    /// Precache bucket, fully populated at install.
    pub static_bucket: String,
    /// Runtime bucket, populated lazily per successful fetch.
    pub dynamic_bucket: String,
}

impl BucketNames {
    /// Build the bucket names for a version tag.
    ///
    /// The tag is threaded in from configuration; nothing else in the
    /// codebase constructs bucket names.
    pub fn for_version(version: &str) -> Self {
        Self {
            static_bucket: format!("{BUCKET_PREFIX}-static-{version}"),
            dynamic_bucket: format!("{BUCKET_PREFIX}-dynamic-{version}"),
        }
    }

    /// Whether a bucket name belongs to the current version.
    ///
    /// Anything else is eligible for deletion during the activation sweep.
    pub fn is_current(&self, name: &str) -> bool {
        name == self.static_bucket || name == self.dynamic_bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_embed_version() {
        let names = BucketNames::for_version("v6");
        assert_eq!(names.static_bucket, "carta-static-v6");
        assert_eq!(names.dynamic_bucket, "carta-dynamic-v6");
    }

    #[test]
    fn test_is_current() {
        let names = BucketNames::for_version("v6");
        assert!(names.is_current("carta-static-v6"));
        assert!(names.is_current("carta-dynamic-v6"));
        assert!(!names.is_current("carta-static-v5"));
        assert!(!names.is_current("carta-dynamic-v5"));
        assert!(!names.is_current("somebody-else"));
    }
}
