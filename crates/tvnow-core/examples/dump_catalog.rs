//! Debug script to walk the live TV NOW catalog
//!
//! Usage: `cargo run --example dump_catalog -- [station] [seo-slug]`
//!
//! Without arguments the catalog tree is printed. With a station and slug
//! the program's seasons and episodes are printed instead.
//! Set `RUST_LOG=tvnow_core=debug` to see paging and parse diagnostics.

use tracing_subscriber::EnvFilter;
use tvnow_core::TvnowScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tvnow_core=info")),
        )
        .init();

    let scraper = TvnowScraper::new()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let [station, slug] = args.as_slice() {
        let seasons = scraper.expand_program(station, slug).await?;
        for season in &seasons {
            println!("{} ({} episodes)", season.label, season.videos.len());
            for video in &season.videos {
                println!(
                    "  {} [{}s, {}]\n    {}",
                    video.title, video.duration_secs, video.publish_time, video.stream_url
                );
            }
        }
        return Ok(());
    }

    let catalog = scraper.load_catalog().await?;
    println!("{} programs with free episodes\n", catalog.len());

    for station in catalog.stations() {
        println!("{}", station);
        for (letter, entries) in catalog.letters(station) {
            let mut titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
            titles.sort();
            println!("  {}: {}", letter, titles.join(", "));
        }
    }

    Ok(())
}
