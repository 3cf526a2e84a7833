//! Command-line interface for sitemap-gen

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use sitemap_gen::{SitemapIndex, UrlEntry};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "sitemap-gen")]
#[command(author, version, about = "Generate sitemaps.org-compliant sitemap files", long_about = None)]
struct Cli {
    /// File containing one URL path per line
    #[arg(value_name = "URLS_FILE")]
    urls_file: PathBuf,

    /// Hostname prepended to every URL path
    #[arg(long, value_name = "URL")]
    hostname: String,

    /// Output directory for the generated files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Base name of the sitemap files
    #[arg(long, default_value = "sitemap")]
    name: String,

    /// Base name of the sitemap index file
    #[arg(long, default_value = "sitemap_index")]
    index_name: String,

    /// URI path inserted between hostname and filename in index locs
    #[arg(long, default_value = "")]
    server_uri: String,

    /// Gzip-compress the generated files
    #[arg(long)]
    compress: bool,

    /// Indent the generated XML
    #[arg(long)]
    pretty: bool,

    /// Notify search engines after a successful save
    #[arg(long)]
    ping: bool,
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> sitemap_gen::Result<()> {
    let urls = fs::read_to_string(&cli.urls_file)?;

    let mut index = SitemapIndex::new(cli.pretty);
    index.set_hostname(cli.hostname);
    index.set_output_path(cli.output);
    index.set_compress(cli.compress);
    index.set_name(cli.index_name);
    index.set_server_uri(cli.server_uri);

    let sitemap = index.new_sitemap();
    sitemap.set_name(cli.name);
    for line in urls.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        sitemap.add(UrlEntry::new(line))?;
    }
    let files = sitemap.file_count();

    let index_file = index.save()?;
    println!("wrote {files} sitemap file(s) and {index_file}");

    if cli.ping {
        index.ping_search_engines()?;
        println!("search engines notified");
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("sitemap-gen was built without the `cli` feature");
    eprintln!("rebuild with: cargo build --features cli");
    std::process::exit(1);
}
