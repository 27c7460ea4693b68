//! TV NOW Scraper Core Library
//!
//! Provides an async API for browsing the TV NOW program catalog and
//! extracting playable episodes from its JSON API.
//!
//! # Overview
//!
//! This crate provides:
//! - Rate-limited HTTP client with retries for transient failures
//! - Catalog loader that pages through the full listing and groups free
//!   programs by station and letter
//! - Program expander that flattens a program's season tabs into episodes
//!   with stream URL, thumbnail, duration and broadcast date
//! - A navigable page tree with stable identifiers for host applications
//!
//! # Example
//!
//! ```no_run
//! use tvnow_core::{TvnowScraper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = TvnowScraper::new()?;
//!
//!     // Load the catalog: station -> letter -> programs
//!     let catalog = scraper.load_catalog().await?;
//!
//!     if let Some(program) = catalog.iter().next() {
//!         // Expand one program into its seasons and episodes
//!         let seasons = scraper
//!             .expand_program(&program.station, &program.seo_slug)
//!             .await?;
//!         for season in &seasons {
//!             for video in &season.videos {
//!                 println!("{} / {}: {}", season.label, video.title, video.stream_url);
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Diagnostics
//!
//! Recoverable problems (an unparsable duration, a broken episode entry, a
//! season tab without headline) are reported through [`tracing`] and never
//! fail the call. Install a subscriber to see them.

mod client;
mod error;
pub mod page;
pub mod parser;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, RateLimiter, TvnowClient, browser_headers, catalog_headers};

// Re-export error types
pub use error::{ExtractionError, Result, TvnowError};

// Re-export page tree types
pub use page::{PageId, PageKind, PageNode};

// Re-export parser functions
pub use parser::{parse_catalog_page, parse_program};

// Re-export main scraper API
pub use scraper::TvnowScraper;

// Re-export data types
pub use types::{CatalogEntry, CatalogTree, SeasonGroup, VideoRecord};
