//! Navigable page tree handed to the host application
//!
//! Every node carries a stable textual identifier that encodes what the node
//! is (station, letter, program, season or video) so a host can hand a node
//! back later and have it expanded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TvnowError;
use crate::types::{CatalogTree, SeasonGroup, VideoRecord};

/// Identifier of this scraper within the host
pub const PARSER_ID: &str = "tvnow";

/// Title of the root page
pub const ROOT_TITLE: &str = "TV NOW";

/// Identifier of a page in the tree
///
/// Renders as:
/// - root: `vchpage://localhost/tvnow`
/// - station: `tvnow://station/{station}`
/// - letter: `{station}://letter/{letter}`
/// - program: `{station}://program/{seo_slug}`
/// - season: `{station}://season/{label}`
/// - video: the episode's website URL
///
/// Letters, slugs and labels are percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageId {
    Root,
    Station(String),
    Letter { station: String, letter: String },
    Program { station: String, seo_slug: String },
    Season { station: String, label: String },
    Video(String),
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageId::Root => write!(f, "vchpage://localhost/{}", PARSER_ID),
            PageId::Station(station) => write!(f, "{}://station/{}", PARSER_ID, station),
            PageId::Letter { station, letter } => {
                write!(f, "{}://letter/{}", station, urlencoding::encode(letter))
            }
            PageId::Program { station, seo_slug } => {
                write!(f, "{}://program/{}", station, urlencoding::encode(seo_slug))
            }
            PageId::Season { station, label } => {
                write!(f, "{}://season/{}", station, urlencoding::encode(label))
            }
            PageId::Video(url) => f.write_str(url),
        }
    }
}

impl FromStr for PageId {
    type Err = TvnowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TvnowError::InvalidPageId(s.to_string());

        let (scheme, rest) = s.split_once("://").ok_or_else(invalid)?;
        if scheme.is_empty() {
            return Err(invalid());
        }

        match scheme {
            "vchpage" => {
                return match rest.strip_prefix("localhost/") {
                    Some(id) if id == PARSER_ID => Ok(PageId::Root),
                    _ => Err(invalid()),
                };
            }
            _ if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") => {
                return Ok(PageId::Video(s.to_string()));
            }
            _ => {}
        }

        let (kind, value) = rest.split_once('/').ok_or_else(invalid)?;
        if value.is_empty() {
            return Err(invalid());
        }

        if scheme == PARSER_ID && kind == "station" {
            return Ok(PageId::Station(value.to_string()));
        }

        let value = urlencoding::decode(value)
            .map_err(|_| invalid())?
            .into_owned();
        let station = scheme.to_string();

        match kind {
            "letter" => Ok(PageId::Letter {
                station,
                letter: value,
            }),
            "program" => Ok(PageId::Program {
                station,
                seo_slug: value,
            }),
            "season" => Ok(PageId::Season {
                station,
                label: value,
            }),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for PageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// What a page holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageKind {
    /// A listing of child pages
    Overview { pages: Vec<PageNode> },
    /// A playable episode
    Video { video: VideoRecord },
}

/// A node of the page tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNode {
    pub id: PageId,
    pub title: String,
    pub kind: PageKind,
}

impl PageNode {
    /// Create an overview page
    pub fn overview(id: PageId, title: impl Into<String>, pages: Vec<PageNode>) -> Self {
        Self {
            id,
            title: title.into(),
            kind: PageKind::Overview { pages },
        }
    }

    /// Create a video leaf, identified by the episode's website URL
    pub fn video(video: VideoRecord) -> Self {
        Self {
            id: PageId::Video(video.page_url.clone()),
            title: video.title.clone(),
            kind: PageKind::Video { video },
        }
    }

    /// Child pages; empty for video leaves
    pub fn pages(&self) -> &[PageNode] {
        match &self.kind {
            PageKind::Overview { pages } => pages,
            PageKind::Video { .. } => &[],
        }
    }
}

/// Builds the root page with station, letter and program pages below it
///
/// Pages on every level are sorted by title. Programs with equal titles
/// keep load order.
pub fn catalog_root(tree: &CatalogTree) -> PageNode {
    let stations = tree
        .stations()
        .map(|station| {
            let letters = tree
                .letters(station)
                .map(|(letter, entries)| {
                    let mut programs: Vec<PageNode> = entries
                        .iter()
                        .map(|entry| {
                            PageNode::overview(
                                PageId::Program {
                                    station: station.to_string(),
                                    seo_slug: entry.seo_slug.clone(),
                                },
                                entry.title.clone(),
                                Vec::new(),
                            )
                        })
                        .collect();
                    sort_by_title(&mut programs);

                    PageNode::overview(
                        PageId::Letter {
                            station: station.to_string(),
                            letter: letter.to_string(),
                        },
                        letter,
                        programs,
                    )
                })
                .collect();

            PageNode::overview(PageId::Station(station.to_string()), station, letters)
        })
        .collect();

    // BTreeMap order already equals title order for stations and letters
    PageNode::overview(PageId::Root, ROOT_TITLE, stations)
}

/// Turns a program's season groups into season pages holding video leaves
pub fn season_pages(station: &str, seasons: Vec<SeasonGroup>) -> Vec<PageNode> {
    seasons
        .into_iter()
        .map(|season| {
            let videos = season.videos.into_iter().map(PageNode::video).collect();
            PageNode::overview(
                PageId::Season {
                    station: station.to_string(),
                    label: season.label.clone(),
                },
                season.label,
                videos,
            )
        })
        .collect()
}

fn sort_by_title(pages: &mut [PageNode]) {
    pages.sort_by(|a, b| a.title.cmp(&b.title));
}
