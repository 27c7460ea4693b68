//! Catalog listing parser for the TV NOW API
//!
//! Decodes one page of the `/formats` listing, keeps the programs that have
//! free episodes, and tracks pagination progress across pages.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, TvnowError};
use crate::types::CatalogEntry;

/// One decoded page of the catalog listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    /// Programs with free episodes, in listing order
    pub entries: Vec<CatalogEntry>,
    /// Number of items the page carried, free or not
    pub item_count: usize,
    /// Total number of items the server reports for the whole listing
    pub total: u64,
}

/// Fields a free listing item must carry
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FreeItem {
    id: i64,
    title: String,
    station: String,
    title_group: String,
    seo_url: String,
    #[serde(default)]
    has_pay_episodes: Option<bool>,
}

/// Parses one catalog listing page
///
/// # Arguments
/// * `json` - Raw response body of a `/formats` request
///
/// # Returns
/// The page's free programs plus the counters needed for pagination
///
/// # Errors
/// Returns `MalformedResponse` if the body is not JSON, lacks `items` or
/// `total`, or a free item misses one of its required fields
pub fn parse_catalog_page(json: &str) -> Result<CatalogPage> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| TvnowError::MalformedResponse(format!("catalog page is not JSON: {}", e)))?;

    let items = document
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| TvnowError::MalformedResponse("catalog page has no items array".to_string()))?;

    let total = document
        .get("total")
        .and_then(Value::as_u64)
        .ok_or_else(|| TvnowError::MalformedResponse("catalog page has no total".to_string()))?;

    let mut entries = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if let Some(entry) = parse_catalog_item(index, item)? {
            entries.push(entry);
        }
    }

    Ok(CatalogPage {
        entries,
        item_count: items.len(),
        total,
    })
}

/// Turns a listing item into an entry, or `None` for pay-only programs
///
/// Free items with an empty station, letter or slug are dropped too; they
/// cannot be addressed in the page tree.
fn parse_catalog_item(index: usize, item: &Value) -> Result<Option<CatalogEntry>> {
    let has_free = item
        .get("hasFreeEpisodes")
        .and_then(Value::as_bool)
        .ok_or_else(|| {
            TvnowError::MalformedResponse(format!("catalog item {} has no hasFreeEpisodes flag", index))
        })?;

    if !has_free {
        return Ok(None);
    }

    let free = FreeItem::deserialize(item).map_err(|e| {
        TvnowError::MalformedResponse(format!("catalog item {} is incomplete: {}", index, e))
    })?;

    if free.station.is_empty() || free.title_group.is_empty() || free.seo_url.is_empty() {
        warn!(
            item = index,
            id = free.id,
            title = %free.title,
            "skipping catalog item with empty station, titleGroup or seoUrl"
        );
        return Ok(None);
    }

    Ok(Some(CatalogEntry {
        id: free.id,
        title: free.title,
        seo_slug: free.seo_url,
        station: free.station,
        letter: free.title_group,
        is_free: true,
        has_pay_episodes: free.has_pay_episodes.unwrap_or(false),
    }))
}

/// Progress through a paged listing
///
/// Pages are requested until the loaded item count reaches the total the
/// server reports. A page that cannot make progress aborts the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    loaded: u64,
    total: Option<u64>,
}

impl Pagination {
    pub fn new() -> Self {
        Self {
            page: 1,
            loaded: 0,
            total: None,
        }
    }

    /// 1-based number of the next page to request
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Items loaded so far
    pub fn loaded(&self) -> u64 {
        self.loaded
    }

    /// Records a fetched page and decides whether another one is needed
    ///
    /// # Arguments
    /// * `item_count` - Items the page carried
    /// * `total` - Total the page reported
    ///
    /// # Returns
    /// `true` if more items remain to be fetched
    ///
    /// # Errors
    /// Returns `MalformedResponse` if a page returns no items while items are
    /// still missing, or if a later page reports a total already covered by
    /// the items loaded before it, with or without items of its own
    pub fn record(&mut self, item_count: usize, total: u64) -> Result<bool> {
        let count = item_count as u64;

        if self.total.is_some() && total <= self.loaded {
            return Err(TvnowError::MalformedResponse(format!(
                "page {} reports total {} but {} items were already loaded",
                self.page, total, self.loaded
            )));
        }

        if count == 0 && self.loaded < total {
            return Err(TvnowError::MalformedResponse(format!(
                "page {} returned no items with {} of {} loaded",
                self.page, self.loaded, total
            )));
        }

        self.loaded += count;
        self.total = Some(total);
        debug!(
            page = self.page,
            loaded = self.loaded,
            total,
            "catalog page loaded"
        );
        self.page += 1;

        Ok(self.loaded < total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}
