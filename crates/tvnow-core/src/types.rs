//! Core data types for the TV NOW scraper
//!
//! Contains the catalog and episode structures produced by the parsers.
//! All types implement Serialize and Deserialize for Tauri compatibility.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A program listed in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Numeric format id
    pub id: i64,

    /// Display title (e.g., "Alles was zählt")
    pub title: String,

    /// URL-safe slug identifying the program within its station
    pub seo_slug: String,

    /// Station the program airs on (e.g., "rtl")
    pub station: String,

    /// Title group the API files the program under (e.g., "A")
    pub letter: String,

    /// Whether free episodes exist
    pub is_free: bool,

    /// Whether paid episodes exist
    pub has_pay_episodes: bool,
}

/// Catalog grouped by station, then letter
///
/// Stations and letters iterate in lexicographic order. Entries within a
/// letter keep load order; sorting them by title is left to presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTree {
    stations: BTreeMap<String, BTreeMap<String, Vec<CatalogEntry>>>,
}

impl CatalogTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// File an entry under its station and letter, creating buckets on first use
    pub(crate) fn insert(&mut self, entry: CatalogEntry) {
        self.stations
            .entry(entry.station.clone())
            .or_default()
            .entry(entry.letter.clone())
            .or_default()
            .push(entry);
    }

    /// Station names in lexicographic order
    pub fn stations(&self) -> impl Iterator<Item = &str> {
        self.stations.keys().map(String::as_str)
    }

    /// Letter buckets of a station, in lexicographic order
    pub fn letters<'a>(
        &'a self,
        station: &str,
    ) -> impl Iterator<Item = (&'a str, &'a [CatalogEntry])> + 'a {
        self.stations
            .get(station)
            .into_iter()
            .flat_map(|letters| letters.iter())
            .map(|(letter, entries)| (letter.as_str(), entries.as_slice()))
    }

    /// Entries filed under a station and letter
    pub fn entries(&self, station: &str, letter: &str) -> &[CatalogEntry] {
        self.stations
            .get(station)
            .and_then(|letters| letters.get(letter))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All entries, station by station and letter by letter
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.stations
            .values()
            .flat_map(|letters| letters.values())
            .flatten()
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl FromIterator<CatalogEntry> for CatalogTree {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut tree = CatalogTree::new();
        for entry in iter {
            tree.insert(entry);
        }
        tree
    }
}

/// A playable episode extracted from a program's detail document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Episode title with a " (frei)" or " (plus)" suffix
    pub title: String,

    /// Whether the episode is free to watch
    pub is_free: bool,

    /// Short teaser text
    pub description: String,

    /// Thumbnail image URL
    pub thumbnail_url: String,

    /// HLS manifest URL
    pub stream_url: String,

    /// Website page of the episode
    pub page_url: String,

    /// Running time in seconds, 0 if unknown
    pub duration_secs: u64,

    /// Broadcast start in the service's wall-clock time, Unix epoch if unknown
    pub publish_time: NaiveDateTime,
}

/// Episodes listed under one season tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonGroup {
    /// Tab headline (e.g., "Staffel 1")
    pub label: String,

    /// Episodes in document order
    pub videos: Vec<VideoRecord>,
}
