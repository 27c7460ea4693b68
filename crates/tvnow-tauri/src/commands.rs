//! Tauri commands for the TV NOW scraper
//!
//! This module contains all Tauri command implementations.

use tauri::State;
use tvnow_core::{PageNode, SeasonGroup};

use crate::ScraperState;

/// Load the catalog as a page tree
///
/// # Returns
/// Root page with station, letter and program pages below it
///
/// # Errors
/// Returns error message as String if any catalog page fails
#[tauri::command]
pub async fn get_catalog(state: State<'_, ScraperState>) -> Result<PageNode, String> {
    let scraper = state.scraper.lock().await;
    scraper.root_page().await.map_err(|e| e.to_string())
}

/// Expand a program into its seasons and episodes
///
/// # Arguments
/// * `state` - Managed ScraperState from Tauri
/// * `station` - Station the program belongs to
/// * `seo_slug` - Program slug
///
/// # Errors
/// Returns error message as String if the detail document cannot be loaded
#[tauri::command]
pub async fn expand_program(
    state: State<'_, ScraperState>,
    station: String,
    seo_slug: String,
) -> Result<Vec<SeasonGroup>, String> {
    let scraper = state.scraper.lock().await;
    scraper
        .expand_program(&station, &seo_slug)
        .await
        .map_err(|e| e.to_string())
}

/// Fill in the children of a page handed back by the frontend
///
/// Program pages gain their season pages; other pages come back unchanged.
#[tauri::command]
pub async fn parse_page(
    state: State<'_, ScraperState>,
    page: PageNode,
) -> Result<PageNode, String> {
    let scraper = state.scraper.lock().await;
    scraper.parse_page(page).await.map_err(|e| e.to_string())
}
