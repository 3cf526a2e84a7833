//! Sitemap index assembly and persistence
//!
//! A [`SitemapIndex`] owns any number of sitemap chains and index-wide
//! defaults. Defaults are snapshot-copied into each chain at creation time;
//! the index setters additionally cascade to chains that already exist, so
//! flipping e.g. compression between two saves re-saves every file with the
//! new setting.

use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::limits::Limits;
use crate::locations::SitemapRecord;
use crate::ping::{self, SEARCH_ENGINE_PING_URLS};
use crate::sitemap::Sitemap;
use crate::writer;
use crate::{FILE_EXT, FILE_GZ_EXT};

/// Base filename used when the index has no explicit name
const DEFAULT_INDEX_NAME: &str = "sitemap_index";

/// An ordered collection of sitemap chains plus one index document
///
/// Saving writes every file of every chain and then the index document, whose
/// `<sitemap>` records point at each produced file. Duplicate sitemap names
/// silently overwrite one another on disk; keeping names unique is the
/// caller's responsibility.
#[derive(Debug)]
pub struct SitemapIndex {
    sitemaps: Vec<Sitemap>,
    name: String,
    hostname: String,
    output_path: PathBuf,
    server_uri: String,
    compress: bool,
    pretty_print: bool,
    limits: Limits,
    ping_endpoints: Vec<String>,
}

impl SitemapIndex {
    /// Create an empty index with compression enabled
    pub fn new(pretty_print: bool) -> Self {
        Self {
            sitemaps: Vec::new(),
            name: String::new(),
            hostname: String::new(),
            output_path: PathBuf::from("."),
            server_uri: String::new(),
            compress: true,
            pretty_print,
            limits: Limits::default(),
            ping_endpoints: SEARCH_ENGINE_PING_URLS
                .iter()
                .map(|endpoint| endpoint.to_string())
                .collect(),
        }
    }

    /// Create a new sitemap chain owned by this index
    ///
    /// The current index-wide defaults are copied into the new chain head;
    /// later changes to the index cascade explicitly through the setters
    /// rather than being shared by reference. Unnamed sitemaps fall back to
    /// `sitemap<n>` where `n` is their 1-based creation order within the
    /// index.
    pub fn new_sitemap(&mut self) -> &mut Sitemap {
        let mut sitemap = Sitemap::new();
        sitemap.set_hostname(self.hostname.as_str());
        sitemap.set_output_path(self.output_path.as_path());
        sitemap.set_compress(self.compress);
        sitemap.set_pretty_print(self.pretty_print);
        sitemap.set_max_file_size(self.limits.max_file_size);
        sitemap.set_max_urls_count(self.limits.max_urls_count);
        sitemap.set_fallback_name(format!("sitemap{}", self.sitemaps.len() + 1));

        self.sitemaps.push(sitemap);
        let created = self.sitemaps.len() - 1;
        tracing::debug!(position = created + 1, "sitemap registered in index");
        &mut self.sitemaps[created]
    }

    /// Save every sitemap chain, then the index document referencing them
    ///
    /// Chains are saved in registration order and their filenames flattened
    /// in chain order. Each produced file gets one `<sitemap>` record whose
    /// `loc` is hostname + server URI prefix + filename and whose `lastmod`
    /// is the owning chain head's stamp; continuations carry no independent
    /// freshness metadata. Returns the index document's filename.
    ///
    /// # Errors
    ///
    /// The first directory-creation, serialization, or I/O failure aborts the
    /// call; files written before the failure stay on disk.
    pub fn save(&self) -> Result<String> {
        fs::create_dir_all(&self.output_path)?;

        let mut records = Vec::new();
        for sitemap in &self.sitemaps {
            let filenames = sitemap.save()?;
            for filename in filenames {
                records.push(SitemapRecord {
                    location: self.public_url(&filename),
                    last_modified: sitemap.last_modified(),
                });
            }
        }

        let filename = self.index_file_name();
        writer::write_file(&self.output_path, &filename, self.compress, |sink| {
            writer::write_sitemap_index(sink, &records, self.pretty_print)
        })?;
        tracing::info!(index = %filename, files = records.len(), "sitemap index saved");
        Ok(filename)
    }

    /// Notify the configured search engines that the index has changed
    ///
    /// Issues one best-effort HTTP GET per endpoint with the index URL as a
    /// query parameter. Failures are advisory: they are collected into a
    /// single [`Error::Notification`](crate::Error::Notification), and the
    /// files already saved remain valid.
    pub fn ping_search_engines(&self) -> Result<()> {
        let index_url = self.public_url(&self.index_file_name());
        ping::ping_all(&self.ping_endpoints, &index_url)
    }

    /// Set the base name of the index document, without extension
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set the hostname prepended to sitemap URL entries and to index `loc`
    /// records; cascades to existing sitemaps
    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        self.hostname = hostname.into();
        for sitemap in &mut self.sitemaps {
            sitemap.set_hostname(self.hostname.as_str());
        }
    }

    /// Set the output directory; cascades to existing sitemaps
    pub fn set_output_path(&mut self, output_path: impl Into<PathBuf>) {
        self.output_path = output_path.into();
        for sitemap in &mut self.sitemaps {
            sitemap.set_output_path(self.output_path.as_path());
        }
    }

    /// Set the URI path inserted between hostname and filename in index
    /// `loc` records
    ///
    /// Normalized to carry leading and trailing slashes; an empty value
    /// means the files live directly under the hostname.
    pub fn set_server_uri(&mut self, server_uri: impl Into<String>) {
        let mut uri = server_uri.into();
        if !uri.is_empty() {
            if !uri.starts_with('/') {
                uri.insert(0, '/');
            }
            if !uri.ends_with('/') {
                uri.push('/');
            }
        }
        self.server_uri = uri;
    }

    /// Enable or disable gzip compression; cascades to existing sitemaps
    pub fn set_compress(&mut self, compress: bool) {
        self.compress = compress;
        for sitemap in &mut self.sitemaps {
            sitemap.set_compress(compress);
        }
    }

    /// Enable or disable indented output; cascades to existing sitemaps
    pub fn set_pretty_print(&mut self, pretty_print: bool) {
        self.pretty_print = pretty_print;
        for sitemap in &mut self.sitemaps {
            sitemap.set_pretty_print(pretty_print);
        }
    }

    /// Override the maximum file size; cascades to existing sitemaps
    pub fn set_max_file_size(&mut self, max_file_size: u64) {
        self.limits.max_file_size = max_file_size;
        for sitemap in &mut self.sitemaps {
            sitemap.set_max_file_size(max_file_size);
        }
    }

    /// Override the maximum URL count; cascades to existing sitemaps
    pub fn set_max_urls_count(&mut self, max_urls_count: usize) {
        self.limits.max_urls_count = max_urls_count;
        for sitemap in &mut self.sitemaps {
            sitemap.set_max_urls_count(max_urls_count);
        }
    }

    /// Replace the list of search-engine ping endpoints
    pub fn set_ping_endpoints(&mut self, endpoints: Vec<String>) {
        self.ping_endpoints = endpoints;
    }

    /// The sitemap chains registered so far, in creation order
    pub fn sitemaps(&self) -> &[Sitemap] {
        &self.sitemaps
    }

    /// Filename of the index document for the current name and compression
    pub fn index_file_name(&self) -> String {
        let base = if self.name.is_empty() {
            DEFAULT_INDEX_NAME
        } else {
            self.name.as_str()
        };
        let ext = if self.compress { FILE_GZ_EXT } else { FILE_EXT };
        format!("{base}{ext}")
    }

    /// Public URL of a produced file: hostname + server URI prefix + filename
    fn public_url(&self, filename: &str) -> String {
        let hostname = self.hostname.trim_end_matches('/');
        if self.server_uri.is_empty() {
            format!("{hostname}/{filename}")
        } else {
            format!("{hostname}{}{filename}", self.server_uri)
        }
    }
}
