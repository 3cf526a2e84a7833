//! Protocol limits for sitemap files
//!
//! The sitemaps.org protocol caps every physical sitemap file at 50,000 URL
//! entries and 52,428,800 bytes of uncompressed XML. Both bounds can be
//! lowered, e.g. to leave headroom for an upstream that rejects large bodies.

/// Maximum uncompressed size of a single sitemap file, in bytes
pub const MAX_FILE_SIZE: u64 = 52_428_800;

/// Maximum number of URL entries in a single sitemap file
pub const MAX_URLS_COUNT: usize = 50_000;

/// Per-file bounds applied when deciding whether an entry still fits
///
/// Checked at insertion time only: a sitemap never re-validates entries it
/// has already accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum serialized file size in bytes
    pub max_file_size: u64,
    /// Maximum number of URL entries per file
    pub max_urls_count: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            max_urls_count: MAX_URLS_COUNT,
        }
    }
}

impl Limits {
    /// Create limits with explicit bounds
    pub fn new(max_file_size: u64, max_urls_count: usize) -> Self {
        Self {
            max_file_size,
            max_urls_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_file_size, 52_428_800);
        assert_eq!(limits.max_urls_count, 50_000);
    }

    #[test]
    fn test_explicit_limits() {
        let limits = Limits::new(4096, 100);
        assert_eq!(limits.max_file_size, 4096);
        assert_eq!(limits.max_urls_count, 100);
    }
}
