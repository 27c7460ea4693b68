//! URL helper functions for the TV NOW API
//!
//! Provides functions for building catalog listing, program detail and
//! thumbnail URLs.

/// Fields requested for every catalog listing item
pub const CATALOG_FIELDS: &str = "id,title,station,titleGroup,seoUrl,icon,hasFreeEpisodes,\
hasPayEpisodes,categoryId,searchAliasName,genres";

/// Fields requested for a program detail document (tabs, pages, containers, movies)
pub const PROGRAM_FIELDS: &str = "*,.*,formatTabs.*,formatTabs.formatTabPages.*,\
formatTabs.formatTabPages.container.*,formatTabs.formatTabPages.container.movies.*";

const THUMBNAIL_BASE: &str = "https://aistvnow-a.akamaihd.net/tvnow/movie";

/// Builds the catalog listing URL for one page
///
/// # Arguments
/// * `api_url` - API root (e.g., "https://api.tvnow.de/v3")
/// * `page` - 1-based page number
/// * `page_size` - Items per page
///
/// # Example
/// ```
/// use tvnow_core::url::build_catalog_url;
/// let url = build_catalog_url("https://api.tvnow.de/v3", 2, 500);
/// assert!(url.starts_with("https://api.tvnow.de/v3/formats?fields=id,title,"));
/// assert!(url.ends_with("&maxPerPage=500&page=2"));
/// ```
pub fn build_catalog_url(api_url: &str, page: u32, page_size: u32) -> String {
    format!(
        "{}/formats?fields={}&maxPerPage={}&page={}",
        api_url.trim_end_matches('/'),
        CATALOG_FIELDS,
        page_size,
        page
    )
}

/// Builds the detail document URL for a program
///
/// The slug and station are percent-encoded; the API expects the slug
/// with a `.php` suffix.
///
/// # Example
/// ```
/// use tvnow_core::url::build_program_url;
/// let url = build_program_url("https://api.tvnow.de/v3", "rtl", "alles-was-zaehlt");
/// assert!(url.ends_with("&name=alles-was-zaehlt.php&station=rtl"));
/// ```
pub fn build_program_url(api_url: &str, station: &str, seo_slug: &str) -> String {
    format!(
        "{}/formats/seo?fields={}&name={}.php&station={}",
        api_url.trim_end_matches('/'),
        PROGRAM_FIELDS,
        urlencoding::encode(seo_slug),
        urlencoding::encode(station)
    )
}

/// Builds the thumbnail URL for a movie from its image id
///
/// # Example
/// ```
/// use tvnow_core::url::build_thumbnail_url;
/// assert_eq!(
///     build_thumbnail_url(12345),
///     "https://aistvnow-a.akamaihd.net/tvnow/movie/12345/"
/// );
/// ```
pub fn build_thumbnail_url(image_id: i64) -> String {
    format!("{}/{}/", THUMBNAIL_BASE, image_id)
}

/// Checks that a link is an absolute http(s) URL
pub(crate) fn is_absolute_url(link: &str) -> bool {
    ::url::Url::parse(link)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
