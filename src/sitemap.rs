//! Sitemap chains with transparent overflow splitting
//!
//! A [`Sitemap`] accepts URL entries until either protocol limit would be
//! crossed; the triggering entry then moves to a freshly spawned continuation
//! and the chain grows by one physical file. Size accounting serializes the
//! document to a counting sink before every acceptance, because per-entry
//! encoded length varies with field optionality and indentation.

use std::fs;
use std::iter;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::UrlEntry;
use crate::writer::{self, ByteCounter};
use crate::{FILE_EXT, FILE_GZ_EXT};

/// Base filename used when neither a name nor a fallback name is set
const DEFAULT_BASE_NAME: &str = "sitemap";

/// One logical sitemap, potentially spanning a chain of physical files
///
/// Entries keep their insertion order. Overflowing entries are forwarded to a
/// continuation sitemap that copies this one's configuration; the chain is
/// owned by its head and saved as `name.xml`, `name1.xml`, `name2.xml`, ...
#[derive(Debug)]
pub struct Sitemap {
    entries: Vec<UrlEntry>,
    name: String,
    fallback_name: String,
    hostname: String,
    output_path: PathBuf,
    compress: bool,
    pretty_print: bool,
    last_modified: Option<DateTime<Utc>>,
    limits: Limits,
    sequence_number: u32,
    continuation: Option<Box<Sitemap>>,
}

impl Default for Sitemap {
    fn default() -> Self {
        Self::new()
    }
}

impl Sitemap {
    /// Create an empty sitemap with compression enabled and default limits
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            name: String::new(),
            fallback_name: String::new(),
            hostname: String::new(),
            output_path: PathBuf::from("."),
            compress: true,
            pretty_print: false,
            last_modified: None,
            limits: Limits::default(),
            sequence_number: 0,
            continuation: None,
        }
    }

    /// Add a URL entry to the chain
    ///
    /// The entry lands in the chain's current tail. If the tail is full
    /// (entry count) or the serialized file would reach the maximum size with
    /// this entry included, a continuation is spawned and the entry lands
    /// there instead; it is never duplicated or dropped. On acceptance the
    /// entry's location is rewritten to `hostname` + `/` + location, exactly
    /// once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if size measurement fails (the chain
    /// is left untouched) and [`Error::EntryTooLarge`] if the entry alone
    /// exceeds the maximum file size.
    pub fn add(&mut self, entry: UrlEntry) -> Result<()> {
        self.tail_mut().push_or_split(entry)
    }

    /// Serialized byte size of this physical file (header, entries, trailing
    /// newline), excluding continuations
    pub fn xml_size(&self) -> Result<u64> {
        let mut counter = ByteCounter::new();
        writer::write_urlset(&mut counter, &self.entries, self.pretty_print)?;
        Ok(counter.count())
    }

    /// Save every file of the chain into the output directory
    ///
    /// The output directory is created if absent. The base filename is
    /// resolved from the head at save time (set name, else fallback name,
    /// else `"sitemap"`), so renaming the head after a split renames the
    /// whole chain. Continuations append their 1-based sequence number to the
    /// base name. Returns the filenames in chain order, head first.
    ///
    /// # Errors
    ///
    /// Directory creation, serialization, and I/O errors abort the call
    /// immediately; files already written stay on disk.
    pub fn save(&self) -> Result<Vec<String>> {
        fs::create_dir_all(&self.output_path)?;

        let base = self.base_name().to_string();
        let mut filenames = Vec::new();
        let mut node = Some(self);
        while let Some(sitemap) = node {
            let filename = sitemap.chain_file_name(&base);
            writer::write_file(&self.output_path, &filename, sitemap.compress, |sink| {
                writer::write_urlset(sink, &sitemap.entries, sitemap.pretty_print)
            })?;
            tracing::debug!(
                file = %filename,
                urls = sitemap.entries.len(),
                "sitemap file saved"
            );
            filenames.push(filename);
            node = sitemap.continuation.as_deref();
        }
        Ok(filenames)
    }

    /// Set the base name of the output files, without extension
    ///
    /// Resolved at save time from the chain head; continuation files derive
    /// their names from it.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set the hostname prepended to the location of every subsequently
    /// added URL
    ///
    /// Cascades down the chain so forwarded entries are prefixed the same
    /// way. Entries accepted earlier keep the prefix they were given.
    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        let hostname = hostname.into();
        self.for_each_in_chain(|sitemap| sitemap.hostname = hostname.clone());
    }

    /// Set the directory the chain is saved into
    pub fn set_output_path(&mut self, output_path: impl Into<PathBuf>) {
        let output_path = output_path.into();
        self.for_each_in_chain(|sitemap| sitemap.output_path = output_path.clone());
    }

    /// Enable or disable gzip compression for every file of the chain
    ///
    /// Compression applies to the output stream only; the size limit is
    /// checked against uncompressed XML.
    pub fn set_compress(&mut self, compress: bool) {
        self.for_each_in_chain(|sitemap| sitemap.compress = compress);
    }

    /// Enable or disable indented output for every file of the chain
    ///
    /// Indentation changes the byte count, so this must not be toggled after
    /// entries have been size-checked against the other setting.
    pub fn set_pretty_print(&mut self, pretty_print: bool) {
        self.for_each_in_chain(|sitemap| sitemap.pretty_print = pretty_print);
    }

    /// Set the freshness stamp used for this chain in the sitemap index
    pub fn set_last_mod(&mut self, last_mod: DateTime<Utc>) {
        self.last_modified = Some(last_mod);
    }

    /// Override the maximum file size for every file of the chain
    pub fn set_max_file_size(&mut self, max_file_size: u64) {
        self.for_each_in_chain(|sitemap| sitemap.limits.max_file_size = max_file_size);
    }

    /// Override the maximum URL count for every file of the chain
    pub fn set_max_urls_count(&mut self, max_urls_count: usize) {
        self.for_each_in_chain(|sitemap| sitemap.limits.max_urls_count = max_urls_count);
    }

    /// Number of URL entries in this physical file, excluding continuations
    pub fn url_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of physical files in the chain
    pub fn file_count(&self) -> usize {
        let mut count = 0;
        let mut node = Some(self);
        while let Some(sitemap) = node {
            count += 1;
            node = sitemap.continuation.as_deref();
        }
        count
    }

    /// Entries of this physical file, in insertion order
    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }

    /// The next sitemap in the chain, if this one has overflowed
    pub fn continuation(&self) -> Option<&Sitemap> {
        self.continuation.as_deref()
    }

    /// The configured base name, which may be empty
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The freshness stamp used for this chain in the sitemap index
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    /// Set the name used when no explicit name is configured
    pub(crate) fn set_fallback_name(&mut self, fallback_name: String) {
        self.fallback_name = fallback_name;
    }

    fn tail_mut(&mut self) -> &mut Sitemap {
        let mut node = self;
        while node.continuation.is_some() {
            // just checked, cannot be None
            node = node.continuation.as_deref_mut().unwrap();
        }
        node
    }

    fn push_or_split(&mut self, entry: UrlEntry) -> Result<()> {
        if self.entries.len() >= self.limits.max_urls_count {
            return self.split_and_forward(entry);
        }

        let location = join_location(&self.hostname, &entry.location);
        let size = self.size_with_candidate(&entry, &location)?;
        if size >= self.limits.max_file_size {
            if self.entries.is_empty() {
                return Err(Error::EntryTooLarge {
                    size,
                    limit: self.limits.max_file_size,
                });
            }
            return self.split_and_forward(entry);
        }

        let mut entry = entry;
        entry.location = location;
        self.entries.push(entry);
        Ok(())
    }

    /// Spawn a continuation and retry the entry there, unwinding the spawn if
    /// the entry is rejected so a failed add leaves the chain unchanged
    fn split_and_forward(&mut self, entry: UrlEntry) -> Result<()> {
        let result = self.spawn_continuation().push_or_split(entry);
        if result.is_err() {
            if let Some(next) = self.continuation.as_deref() {
                if next.entries.is_empty() && next.continuation.is_none() {
                    self.continuation = None;
                }
            }
        }
        result
    }

    /// Measure the serialized size of this file with the candidate entry
    /// included, without mutating anything
    fn size_with_candidate(&self, entry: &UrlEntry, location: &str) -> Result<u64> {
        let mut candidate = entry.clone();
        candidate.location = location.to_string();

        let mut counter = ByteCounter::new();
        writer::write_urlset(
            &mut counter,
            self.entries.iter().chain(iter::once(&candidate)),
            self.pretty_print,
        )?;
        Ok(counter.count())
    }

    /// Spawn the continuation holding overflow from this file
    ///
    /// Copies the configuration but not the entries and not the chain link;
    /// the continuation starts empty with sequence number parent + 1.
    fn spawn_continuation(&mut self) -> &mut Sitemap {
        let next = Sitemap {
            entries: Vec::new(),
            name: self.name.clone(),
            fallback_name: self.fallback_name.clone(),
            hostname: self.hostname.clone(),
            output_path: self.output_path.clone(),
            compress: self.compress,
            pretty_print: self.pretty_print,
            last_modified: self.last_modified,
            limits: self.limits,
            sequence_number: self.sequence_number + 1,
            continuation: None,
        };
        tracing::debug!(
            sequence_number = next.sequence_number,
            "sitemap overflow, spawning continuation"
        );
        self.continuation.insert(Box::new(next))
    }

    fn base_name(&self) -> &str {
        if !self.name.is_empty() {
            self.name.as_str()
        } else if !self.fallback_name.is_empty() {
            self.fallback_name.as_str()
        } else {
            DEFAULT_BASE_NAME
        }
    }

    fn chain_file_name(&self, base: &str) -> String {
        let mut filename = if self.sequence_number > 0 {
            format!("{}{}", base, self.sequence_number)
        } else {
            base.to_string()
        };
        filename.push_str(if self.compress { FILE_GZ_EXT } else { FILE_EXT });
        filename
    }

    fn for_each_in_chain(&mut self, mut apply: impl FnMut(&mut Sitemap)) {
        let mut node = Some(self);
        while let Some(sitemap) = node {
            apply(&mut *sitemap);
            node = sitemap.continuation.as_deref_mut();
        }
    }
}

/// Join a hostname and a location path with exactly one `/` separator
///
/// An empty hostname leaves the location untouched.
fn join_location(hostname: &str, location: &str) -> String {
    if hostname.is_empty() {
        return location.to_string();
    }
    format!(
        "{}/{}",
        hostname.trim_end_matches('/'),
        location.trim_start_matches('/')
    )
}
