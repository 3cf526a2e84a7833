//! URL entry types for sitemap and sitemap-index documents
//!
//! [`UrlEntry`] is one `<url>` record in a sitemap file; [`SitemapRecord`] is
//! one `<sitemap>` reference inside the index document.

use std::fmt;

use chrono::{DateTime, Utc};

/// Change frequency hint for a URL (`<changefreq>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    /// The page changes on every access
    Always,
    /// The page changes hourly
    Hourly,
    /// The page changes daily
    Daily,
    /// The page changes weekly
    Weekly,
    /// The page changes monthly
    Monthly,
    /// The page changes yearly
    Yearly,
    /// The page is archived and never changes
    Never,
}

impl ChangeFreq {
    /// Protocol string form of the frequency
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One URL entry in a sitemap (`<url>`)
///
/// The location is a path relative to the owning sitemap's hostname until the
/// entry is accepted by [`Sitemap::add`](crate::Sitemap::add), which rewrites
/// it to the absolute form exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    /// URL path; absolute once accepted by a sitemap
    pub location: String,
    /// Last modification time (`<lastmod>`)
    pub last_modified: Option<DateTime<Utc>>,
    /// Expected change frequency (`<changefreq>`)
    pub change_freq: Option<ChangeFreq>,
    /// Crawl priority in `[0.0, 1.0]` (`<priority>`); not validated
    pub priority: Option<f32>,
}

impl UrlEntry {
    /// Create an entry for a location with no optional metadata
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            last_modified: None,
            change_freq: None,
            priority: None,
        }
    }

    /// Set the last modification time
    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Set the expected change frequency
    pub fn with_change_freq(mut self, change_freq: ChangeFreq) -> Self {
        self.change_freq = Some(change_freq);
        self
    }

    /// Set the crawl priority
    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// One sitemap reference in a sitemap-index document (`<sitemap>`)
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapRecord {
    /// Absolute URL of the sitemap file
    pub location: String,
    /// Freshness stamp of the owning chain head (`<lastmod>`)
    pub last_modified: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_change_freq_strings() {
        assert_eq!(ChangeFreq::Always.as_str(), "always");
        assert_eq!(ChangeFreq::Hourly.as_str(), "hourly");
        assert_eq!(ChangeFreq::Daily.as_str(), "daily");
        assert_eq!(ChangeFreq::Weekly.as_str(), "weekly");
        assert_eq!(ChangeFreq::Monthly.as_str(), "monthly");
        assert_eq!(ChangeFreq::Yearly.as_str(), "yearly");
        assert_eq!(ChangeFreq::Never.as_str(), "never");
        assert_eq!(ChangeFreq::Daily.to_string(), "daily");
    }

    #[test]
    fn test_url_entry_builders() {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap();
        let entry = UrlEntry::new("/about")
            .with_last_modified(stamp)
            .with_change_freq(ChangeFreq::Monthly)
            .with_priority(0.8);

        assert_eq!(entry.location, "/about");
        assert_eq!(entry.last_modified, Some(stamp));
        assert_eq!(entry.change_freq, Some(ChangeFreq::Monthly));
        assert_eq!(entry.priority, Some(0.8));
    }

    #[test]
    fn test_url_entry_defaults() {
        let entry = UrlEntry::new("/");
        assert!(entry.last_modified.is_none());
        assert!(entry.change_freq.is_none());
        assert!(entry.priority.is_none());
    }
}
