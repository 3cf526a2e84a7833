//! # sitemap-gen
//!
//! A sitemap generator implementing the [sitemaps.org](https://www.sitemaps.org/protocol.html)
//! protocol with transparent splitting across the protocol limits.
//!
//! A [`Sitemap`] holds an ordered collection of URL entries. The protocol caps
//! every physical sitemap file at 50,000 entries and 52,428,800 bytes of
//! uncompressed XML; when an entry would cross either bound, the sitemap
//! spawns a continuation file and forwards further writes to it, forming a
//! chain. A [`SitemapIndex`] owns any number of such chains and, on save,
//! writes every sitemap file plus one index document referencing them all.
//!
//! Size accounting is exact: before an entry is accepted, the document is
//! re-serialized to a byte-counting sink, so the decision to split is based on
//! the same bytes that would reach the disk.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sitemap_gen::{ChangeFreq, SitemapIndex, UrlEntry};
//!
//! # fn main() -> sitemap_gen::Result<()> {
//! let mut index = SitemapIndex::new(false);
//! index.set_hostname("https://www.example.com");
//! index.set_output_path("./public");
//! index.set_compress(false);
//!
//! let sitemap = index.new_sitemap();
//! sitemap.set_name("blog");
//! sitemap.add(UrlEntry::new("/posts/1").with_change_freq(ChangeFreq::Daily))?;
//!
//! let index_file = index.save()?;
//! println!("wrote {index_file}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;
pub mod limits;
pub mod locations;
mod ping;
pub mod sitemap;
mod writer;

pub use error::{Error, Result};
pub use index::SitemapIndex;
pub use limits::{Limits, MAX_FILE_SIZE, MAX_URLS_COUNT};
pub use locations::{ChangeFreq, SitemapRecord, UrlEntry};
pub use ping::SEARCH_ENGINE_PING_URLS;
pub use sitemap::Sitemap;

/// Version of the sitemap-gen library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XML namespace shared by sitemap and sitemap-index documents
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Extension of plain XML output files
pub const FILE_EXT: &str = ".xml";

/// Extension of gzip-compressed output files
pub const FILE_GZ_EXT: &str = ".xml.gz";
