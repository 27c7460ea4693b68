//! Main scraper API for TV NOW
//!
//! Provides the high-level API combining HTTP client and parsers.

use reqwest::header::HeaderMap;
use tracing::{debug, info};

use crate::client::{ClientConfig, TvnowClient, catalog_headers};
use crate::error::{Result, TvnowError};
use crate::page::{PageId, PageKind, PageNode, catalog_root, season_pages};
use crate::parser::{Pagination, parse_catalog_page, parse_program};
use crate::types::{CatalogTree, SeasonGroup};
use crate::url::{build_catalog_url, build_program_url};

/// Main scraper API for TV NOW
///
/// Combines HTTP client with rate limiting and JSON parsers to load the
/// program catalog and expand single programs into their episodes.
/// Holds no state besides the client, so one instance can serve
/// independent requests.
pub struct TvnowScraper {
    client: TvnowClient,
    api_url: String,
    page_size: u32,
    catalog_headers: HeaderMap,
}

impl TvnowScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new scraper with custom client configuration
    ///
    /// # Errors
    /// - `InvalidConfig` if the page size is zero or the base URL is unusable
    /// - `HttpError` if HTTP client initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        if config.page_size == 0 {
            return Err(TvnowError::InvalidConfig(
                "page_size must be at least 1".to_string(),
            ));
        }

        let client = TvnowClient::with_config(&config)?;
        let catalog_headers = catalog_headers(&config.base_url)?;

        Ok(Self {
            client,
            api_url: config.api_url,
            page_size: config.page_size,
            catalog_headers,
        })
    }

    /// Load the full catalog of programs with free episodes
    ///
    /// Pages are fetched one after another until the server-reported total
    /// is reached. Any failing page aborts the whole load.
    ///
    /// # Returns
    /// Programs grouped by station and letter
    ///
    /// # Errors
    /// - `HttpError`, `NotFound`, `RateLimited` if a page cannot be fetched
    /// - `MalformedResponse` if a page cannot be parsed or pagination stalls
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> tvnow_core::Result<()> {
    /// use tvnow_core::TvnowScraper;
    /// let scraper = TvnowScraper::new()?;
    /// let catalog = scraper.load_catalog().await?;
    /// for station in catalog.stations() {
    ///     println!("{}", station);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load_catalog(&self) -> Result<CatalogTree> {
        let mut pagination = Pagination::new();
        let mut tree = CatalogTree::new();

        loop {
            let url = build_catalog_url(&self.api_url, pagination.page(), self.page_size);
            let body = self.client.fetch(&url, Some(&self.catalog_headers)).await?;
            let page = parse_catalog_page(&body)?;

            for entry in page.entries {
                tree.insert(entry);
            }

            if !pagination.record(page.item_count, page.total)? {
                break;
            }
        }

        info!(
            programs = tree.len(),
            items = pagination.loaded(),
            "catalog loaded"
        );
        Ok(tree)
    }

    /// Fetch a program's detail document and extract its episodes
    ///
    /// # Arguments
    /// * `station` - Station the program belongs to (e.g., "rtl")
    /// * `seo_slug` - Program slug (e.g., "alles-was-zaehlt")
    ///
    /// # Returns
    /// One group per season tab, in tab order. Malformed episodes are
    /// logged and left out.
    ///
    /// # Errors
    /// - `InvalidId` if station or slug is empty or whitespace only
    /// - `HttpError`, `NotFound`, `RateLimited` if the fetch fails
    /// - `MalformedResponse` if the document lacks `formatTabs.items`
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> tvnow_core::Result<()> {
    /// use tvnow_core::TvnowScraper;
    /// let scraper = TvnowScraper::new()?;
    /// let seasons = scraper.expand_program("rtl", "alles-was-zaehlt").await?;
    /// for season in &seasons {
    ///     println!("{}: {} episodes", season.label, season.videos.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn expand_program(&self, station: &str, seo_slug: &str) -> Result<Vec<SeasonGroup>> {
        let station = station.trim();
        if station.is_empty() {
            return Err(TvnowError::InvalidId(
                "Station cannot be empty".to_string(),
            ));
        }

        let seo_slug = seo_slug.trim();
        if seo_slug.is_empty() {
            return Err(TvnowError::InvalidId(
                "Program slug cannot be empty".to_string(),
            ));
        }

        let url = build_program_url(&self.api_url, station, seo_slug);
        let body = self.client.fetch(&url, None).await?;
        let seasons = parse_program(&body)?;

        debug!(
            station,
            program = seo_slug,
            seasons = seasons.len(),
            "program expanded"
        );
        Ok(seasons)
    }

    /// Load the catalog and build the root page of the page tree
    ///
    /// # Errors
    /// Same as [`TvnowScraper::load_catalog`]
    pub async fn root_page(&self) -> Result<PageNode> {
        let tree = self.load_catalog().await?;
        Ok(catalog_root(&tree))
    }

    /// Fill in the children of a page
    ///
    /// Program pages are expanded into season pages holding video leaves.
    /// All other pages are returned unchanged.
    ///
    /// # Errors
    /// Same as [`TvnowScraper::expand_program`] for program pages
    pub async fn parse_page(&self, mut page: PageNode) -> Result<PageNode> {
        let PageId::Program { station, seo_slug } = &page.id else {
            return Ok(page);
        };

        let seasons = self.expand_program(station, seo_slug).await?;
        page.kind = PageKind::Overview {
            pages: season_pages(station, seasons),
        };
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraper_creation() {
        let scraper = TvnowScraper::new();
        assert!(scraper.is_ok());
    }

    #[test]
    fn test_scraper_with_custom_config() {
        let config = ClientConfig {
            requests_per_second: 1.0,
            timeout_secs: 60,
            max_retries: 5,
            page_size: 100,
            ..ClientConfig::default()
        };
        let scraper = TvnowScraper::with_config(config);
        assert!(scraper.is_ok());
    }

    #[test]
    fn test_scraper_rejects_zero_page_size() {
        let config = ClientConfig {
            page_size: 0,
            ..ClientConfig::default()
        };
        match TvnowScraper::with_config(config) {
            Err(TvnowError::InvalidConfig(msg)) => assert!(msg.contains("page_size")),
            _ => panic!("Expected InvalidConfig error"),
        }
    }

    #[tokio::test]
    async fn test_expand_program_empty_station() {
        let scraper = TvnowScraper::new().unwrap();
        let result = scraper.expand_program("", "alles-was-zaehlt").await;
        match result {
            Err(TvnowError::InvalidId(msg)) => {
                assert!(msg.contains("empty"));
            }
            _ => panic!("Expected InvalidId error"),
        }
    }

    #[tokio::test]
    async fn test_expand_program_whitespace_slug() {
        let scraper = TvnowScraper::new().unwrap();
        let result = scraper.expand_program("rtl", "   ").await;
        match result {
            Err(TvnowError::InvalidId(_)) => {}
            _ => panic!("Expected InvalidId error"),
        }
    }

    #[tokio::test]
    async fn test_parse_page_leaves_other_pages_alone() {
        let scraper = TvnowScraper::new().unwrap();
        let page = PageNode::overview(
            PageId::Letter {
                station: "rtl".to_string(),
                letter: "A".to_string(),
            },
            "A",
            Vec::new(),
        );

        let parsed = scraper.parse_page(page.clone()).await.unwrap();
        assert_eq!(parsed, page);
    }
}
