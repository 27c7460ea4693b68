//! Program detail parser for the TV NOW API
//!
//! Walks `formatTabs.items[].formatTabPages.items[].container.movies.items[]`
//! and flattens it into season groups. Every level below the tab list may be
//! absent or malformed; a broken movie item only costs that item.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{ExtractionError, Result, TvnowError};
use crate::parser::fields::{parse_duration, parse_publish_date};
use crate::types::{SeasonGroup, VideoRecord};
use crate::url::{build_thumbnail_url, is_absolute_url};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgramDocument {
    #[serde(default)]
    format_tabs: Option<FormatTabs>,
}

#[derive(Deserialize)]
struct FormatTabs {
    #[serde(default)]
    items: Option<Vec<Value>>,
}

// Below the tab list every child stays a raw `Value` and is decoded on its
// own, so a mistyped sub-document only costs that part of the tree.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormatTab {
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    format_tab_pages: Option<Value>,
}

#[derive(Deserialize)]
struct TabPages {
    #[serde(default)]
    items: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct TabPage {
    #[serde(default)]
    container: Option<Value>,
}

#[derive(Deserialize)]
struct Container {
    #[serde(default)]
    movies: Option<Value>,
}

/// Movie items stay untyped so each one can fail on its own
#[derive(Deserialize)]
struct Movies {
    #[serde(default)]
    items: Option<Vec<Value>>,
}

/// Fields every movie item must carry
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieItem {
    free: bool,
    title: String,
    deeplink_url: String,
    article_short: String,
    replace_movie_information: i64,
    manifest: Manifest,
    #[serde(default)]
    duration: Option<Value>,
    #[serde(default)]
    broadcast_start_date: Option<Value>,
}

#[derive(Deserialize)]
struct Manifest {
    hlsfairplay: String,
}

/// Parses a program detail document into season groups
///
/// # Arguments
/// * `json` - Raw response body of a `/formats/seo` request
///
/// # Returns
/// One group per tab with a headline, in tab order. Tabs without a
/// headline and movie items that cannot be extracted are skipped.
///
/// # Errors
/// Returns `MalformedResponse` if the body is not JSON or lacks
/// `formatTabs.items`
pub fn parse_program(json: &str) -> Result<Vec<SeasonGroup>> {
    let document: ProgramDocument = serde_json::from_str(json)
        .map_err(|e| TvnowError::MalformedResponse(format!("program document: {}", e)))?;

    let tabs = document
        .format_tabs
        .and_then(|tabs| tabs.items)
        .ok_or_else(|| {
            TvnowError::MalformedResponse("program document has no formatTabs.items".to_string())
        })?;

    let mut seasons = Vec::new();
    for (index, tab) in tabs.iter().enumerate() {
        let tab = match FormatTab::deserialize(tab) {
            Ok(tab) => tab,
            Err(e) => {
                warn!(tab = index, error = %e, "skipping malformed season tab");
                continue;
            }
        };

        let label = match tab.headline {
            Some(headline) if !headline.is_empty() => headline,
            _ => {
                info!(tab = index, "skipping season tab without headline");
                continue;
            }
        };

        let videos = parse_tab_pages(&label, tab.format_tab_pages.as_ref());
        seasons.push(SeasonGroup { label, videos });
    }

    Ok(seasons)
}

/// Decodes one sub-document; a mistyped one counts as absent
fn decode<T: DeserializeOwned>(value: &Value, season: &str, part: &'static str) -> Option<T> {
    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(season, part, error = %e, "skipping malformed sub-document");
            None
        }
    }
}

/// Collects the videos of all sections below one tab
fn parse_tab_pages(label: &str, pages: Option<&Value>) -> Vec<VideoRecord> {
    let Some(pages) = pages else {
        warn!(season = label, "season tab has no formatTabPages");
        return Vec::new();
    };
    let Some(pages) = decode::<TabPages>(pages, label, "formatTabPages") else {
        return Vec::new();
    };

    let mut videos = Vec::new();
    for (section, page) in pages.items.unwrap_or_default().iter().enumerate() {
        let Some(page) = decode::<TabPage>(page, label, "section") else {
            continue;
        };
        let Some(container) = page.container else {
            warn!(season = label, section, "section has no container");
            continue;
        };
        let Some(container) = decode::<Container>(&container, label, "container") else {
            continue;
        };
        let Some(movies) = container.movies else {
            continue;
        };
        let Some(movies) = decode::<Movies>(&movies, label, "movies") else {
            continue;
        };

        let items = movies.items.unwrap_or_default();
        let results = items.iter().map(extract_movie);
        for (position, result) in results.enumerate() {
            match result {
                Ok(video) => videos.push(video),
                Err(e) => {
                    error!(season = label, section, position, error = %e, "error while parsing movie");
                }
            }
        }
    }

    videos
}

/// Extracts a video record from one movie item
///
/// All required fields must be present; `duration` and
/// `broadcastStartDate` fall back to defaults instead.
///
/// # Errors
/// - `Shape` if a required field is missing or mistyped
/// - `InvalidUri` if the manifest or page link is not an absolute URL
pub fn extract_movie(item: &Value) -> std::result::Result<VideoRecord, ExtractionError> {
    let movie = MovieItem::deserialize(item)?;

    let stream_url = movie.manifest.hlsfairplay;
    if !is_absolute_url(&stream_url) {
        return Err(ExtractionError::InvalidUri {
            field: "manifest.hlsfairplay",
            value: stream_url,
        });
    }

    if !is_absolute_url(&movie.deeplink_url) {
        return Err(ExtractionError::InvalidUri {
            field: "deeplinkUrl",
            value: movie.deeplink_url,
        });
    }

    let suffix = if movie.free { " (frei)" } else { " (plus)" };

    Ok(VideoRecord {
        title: format!("{}{}", movie.title, suffix),
        is_free: movie.free,
        description: movie.article_short,
        thumbnail_url: build_thumbnail_url(movie.replace_movie_information),
        stream_url,
        page_url: movie.deeplink_url,
        duration_secs: parse_duration(movie.duration.as_ref()),
        publish_time: parse_publish_date(movie.broadcast_start_date.as_ref()),
    })
}
