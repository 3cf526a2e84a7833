//! XML serialization for sitemap documents
//!
//! One code path serializes a document for both size measurement and the
//! final write, so a measured byte count always equals the bytes that reach
//! the disk. Pretty printing changes the byte count, which is why it must not
//! be toggled between measuring and writing.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::locations::{SitemapRecord, UrlEntry};
use crate::SITEMAP_NAMESPACE;

/// XML declaration emitted at the top of every document
const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Indentation character and width used when pretty-printing
const INDENT_CHAR: u8 = b' ';
const INDENT_WIDTH: usize = 2;

/// An `io::Write` sink that discards bytes and counts them
///
/// Used to measure the exact serialized size of a document before deciding
/// whether an entry still fits into the current file.
#[derive(Debug, Default)]
pub(crate) struct ByteCounter {
    count: u64,
}

impl ByteCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far
    pub(crate) fn count(&self) -> u64 {
        self.count
    }
}

impl Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.count += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Write a complete `<urlset>` document to the sink
pub(crate) fn write_urlset<'a, W, I>(mut sink: W, entries: I, pretty_print: bool) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a UrlEntry>,
{
    sink.write_all(XML_DECLARATION.as_bytes())?;
    {
        let mut writer = xml_writer(&mut sink, pretty_print);
        writer.write_event(Event::Start(root_element("urlset")))?;

        for entry in entries {
            writer.write_event(Event::Start(BytesStart::new("url")))?;
            text_element(&mut writer, "loc", &entry.location)?;
            if let Some(last_modified) = entry.last_modified {
                text_element(&mut writer, "lastmod", &format_lastmod(last_modified))?;
            }
            if let Some(change_freq) = entry.change_freq {
                text_element(&mut writer, "changefreq", change_freq.as_str())?;
            }
            if let Some(priority) = entry.priority {
                text_element(&mut writer, "priority", &priority.to_string())?;
            }
            writer.write_event(Event::End(BytesEnd::new("url")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    }
    sink.write_all(b"\n")?;
    Ok(())
}

/// Write a complete `<sitemapindex>` document to the sink
pub(crate) fn write_sitemap_index<W: Write>(
    mut sink: W,
    records: &[SitemapRecord],
    pretty_print: bool,
) -> Result<()> {
    sink.write_all(XML_DECLARATION.as_bytes())?;
    {
        let mut writer = xml_writer(&mut sink, pretty_print);
        writer.write_event(Event::Start(root_element("sitemapindex")))?;

        for record in records {
            writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
            text_element(&mut writer, "loc", &record.location)?;
            if let Some(last_modified) = record.last_modified {
                text_element(&mut writer, "lastmod", &format_lastmod(last_modified))?;
            }
            writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;
    }
    sink.write_all(b"\n")?;
    Ok(())
}

/// Persist a document into `dir/filename`, optionally gzip-compressed
///
/// The document is written to a sibling temp file which is then renamed over
/// the final name, so a failed write never corrupts a previously saved file.
/// A crash between write and rename can leave a stray `.tmp` file behind;
/// that is a known limitation.
pub(crate) fn write_file<F>(dir: &Path, filename: &str, compress: bool, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let final_path = dir.join(filename);
    let tmp_path = dir.join(format!("{filename}.tmp"));

    let result = (|| -> Result<()> {
        let file = fs::File::create(&tmp_path)?;
        let mut sink = BufWriter::new(file);
        if compress {
            let mut encoder = GzEncoder::new(&mut sink, Compression::default());
            write(&mut encoder)?;
            encoder.finish()?;
        } else {
            write(&mut sink)?;
        }
        sink.flush()?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            fs::rename(&tmp_path, &final_path)?;
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&tmp_path);
            Err(err)
        }
    }
}

fn xml_writer<W: Write>(sink: W, pretty_print: bool) -> Writer<W> {
    if pretty_print {
        Writer::new_with_indent(sink, INDENT_CHAR, INDENT_WIDTH)
    } else {
        Writer::new(sink)
    }
}

fn root_element(name: &str) -> BytesStart<'_> {
    let mut root = BytesStart::new(name);
    root.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    root
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn format_lastmod(stamp: DateTime<Utc>) -> String {
    stamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::ChangeFreq;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample_entry() -> UrlEntry {
        UrlEntry::new("https://www.example.com/about")
            .with_last_modified(Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap())
            .with_change_freq(ChangeFreq::Monthly)
            .with_priority(0.8)
    }

    #[test]
    fn test_write_urlset_pretty() {
        let mut out = Vec::new();
        write_urlset(&mut out, [&sample_entry()], true).unwrap();

        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
  <url>\n\
    <loc>https://www.example.com/about</loc>\n\
    <lastmod>2024-01-15T08:30:00Z</lastmod>\n\
    <changefreq>monthly</changefreq>\n\
    <priority>0.8</priority>\n\
  </url>\n\
</urlset>\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_write_urlset_compact() {
        let entry = UrlEntry::new("https://www.example.com/about");
        let mut out = Vec::new();
        write_urlset(&mut out, [&entry], false).unwrap();

        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\
<url><loc>https://www.example.com/about</loc></url>\
</urlset>\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_write_urlset_escapes_text() {
        let entry = UrlEntry::new("https://www.example.com/search?q=a&b=<c>");
        let mut out = Vec::new();
        write_urlset(&mut out, [&entry], false).unwrap();

        let xml = String::from_utf8(out).unwrap();
        assert!(xml.contains("<loc>https://www.example.com/search?q=a&amp;b=&lt;c&gt;</loc>"));
    }

    #[test]
    fn test_write_sitemap_index() {
        let records = vec![
            SitemapRecord {
                location: "https://www.example.com/blog.xml".to_string(),
                last_modified: Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap()),
            },
            SitemapRecord {
                location: "https://www.example.com/blog1.xml".to_string(),
                last_modified: None,
            },
        ];
        let mut out = Vec::new();
        write_sitemap_index(&mut out, &records, true).unwrap();

        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
  <sitemap>\n\
    <loc>https://www.example.com/blog.xml</loc>\n\
    <lastmod>2024-01-15T08:30:00Z</lastmod>\n\
  </sitemap>\n\
  <sitemap>\n\
    <loc>https://www.example.com/blog1.xml</loc>\n\
  </sitemap>\n\
</sitemapindex>\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_byte_counter_matches_written_bytes() {
        let entries: Vec<UrlEntry> = (0..10)
            .map(|i| sample_entry().with_priority(i as f32 / 10.0))
            .collect();

        for pretty_print in [false, true] {
            let mut counter = ByteCounter::new();
            write_urlset(&mut counter, &entries, pretty_print).unwrap();

            let mut out = Vec::new();
            write_urlset(&mut out, &entries, pretty_print).unwrap();

            assert_eq!(counter.count(), out.len() as u64);
        }
    }

    #[test]
    fn test_empty_urlset() {
        let mut out = Vec::new();
        let entries: &[UrlEntry] = &[];
        write_urlset(&mut out, entries, false).unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.ends_with("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"></urlset>\n"));
    }

    #[test]
    fn test_write_file_atomic_keeps_previous_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "out.xml", false, |sink| {
            sink.write_all(b"first")?;
            Ok(())
        })
        .unwrap();

        let failed: Result<()> = write_file(dir.path(), "out.xml", false, |sink| {
            sink.write_all(b"partial")?;
            Err(crate::Error::Notification("boom".to_string()))
        });
        assert!(failed.is_err());

        let content = fs::read_to_string(dir.path().join("out.xml")).unwrap();
        assert_eq!(content, "first");
        assert!(!dir.path().join("out.xml.tmp").exists());
    }
}
