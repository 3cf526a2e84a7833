//! Shared helpers for the integration tests
#![allow(dead_code)]

use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader;
use sitemap_gen::MAX_FILE_SIZE;

pub const BASE_URL: &str = "https://www.example.com";

/// Assert a produced file exists, is non-empty, and respects the size limit
pub fn assert_output_file(dir: &Path, name: &str) {
    let meta = fs::metadata(dir.join(name))
        .unwrap_or_else(|err| panic!("missing output file {name}: {err}"));
    assert!(meta.is_file(), "{name} is not a file");
    assert!(meta.len() > 0, "{name} is empty");
    assert!(
        meta.len() <= MAX_FILE_SIZE,
        "{name} exceeds the protocol size limit: {} bytes",
        meta.len()
    );
}

/// Read a produced file back as XML text, transparently gunzipping `.gz`
pub fn read_output(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    if name.ends_with(".gz") {
        let file = fs::File::open(&path).unwrap();
        let mut decoder = GzDecoder::new(file);
        let mut xml = String::new();
        decoder.read_to_string(&mut xml).unwrap();
        xml
    } else {
        fs::read_to_string(&path).unwrap()
    }
}

/// Parse `<loc>` and optional `<lastmod>` out of every `record_tag` element
///
/// Works for both document kinds: pass `"url"` for sitemaps and `"sitemap"`
/// for index documents.
pub fn parse_records(xml: &str, record_tag: &str) -> Vec<(String, Option<String>)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut records = Vec::new();
    let mut loc: Option<String> = None;
    let mut lastmod: Option<String> = None;
    let mut field: Option<&'static str> = None;

    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(e) => {
                if e.name().as_ref() == record_tag.as_bytes() {
                    loc = None;
                    lastmod = None;
                } else if e.name().as_ref() == b"loc" {
                    field = Some("loc");
                } else if e.name().as_ref() == b"lastmod" {
                    field = Some("lastmod");
                }
            }
            Event::Text(t) => {
                let text = t.unescape().unwrap().to_string();
                match field {
                    Some("loc") => loc = Some(text),
                    Some("lastmod") => lastmod = Some(text),
                    _ => {}
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == record_tag.as_bytes() {
                    records.push((loc.take().expect("record without <loc>"), lastmod.take()));
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    records
}

/// Deterministic route paths for bulk tests
pub fn build_routes(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("/section/{i:05}/page")).collect()
}
