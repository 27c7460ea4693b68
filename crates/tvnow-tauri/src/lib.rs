//! TV NOW Tauri Integration
//!
//! Provides a Tauri plugin for frontend integration with the TV NOW scraper.
//!
//! # Usage
//!
//! Register the plugin in your Tauri application:
//!
//! ```ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(tvnow_tauri::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! Then invoke commands from the frontend:
//!
//! ```javascript
//! import { invoke } from '@tauri-apps/api/core';
//!
//! // Load the catalog tree
//! const root = await invoke('plugin:tvnow|get_catalog');
//!
//! // Expand a program page into seasons and episodes
//! const program = root.kind.pages[0].kind.pages[0].kind.pages[0];
//! const expanded = await invoke('plugin:tvnow|parse_page', { page: program });
//! ```

use std::sync::Arc;
use tokio::sync::Mutex;

use tauri::{
    Manager, Runtime,
    plugin::{Builder, TauriPlugin},
};
use tvnow_core::TvnowScraper;

mod commands;

/// Thread-safe wrapper for TvnowScraper
///
/// Uses Arc<Mutex<>> so commands share one client and with it one
/// rate limiter.
pub struct ScraperState {
    pub(crate) scraper: Arc<Mutex<TvnowScraper>>,
}

impl ScraperState {
    /// Create a new ScraperState with default configuration
    ///
    /// # Errors
    /// Returns error string if scraper initialization fails
    pub fn new() -> Result<Self, String> {
        let scraper = TvnowScraper::new().map_err(|e| e.to_string())?;
        Ok(Self {
            scraper: Arc::new(Mutex::new(scraper)),
        })
    }
}

/// Initialize the tvnow plugin
///
/// # Returns
/// A configured TauriPlugin ready to be registered with the Tauri application
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("tvnow")
        .invoke_handler(tauri::generate_handler![
            commands::get_catalog,
            commands::expand_program,
            commands::parse_page
        ])
        .setup(|app, _api| {
            let state = ScraperState::new().map_err(Box::<dyn std::error::Error>::from)?;
            app.manage(state);
            Ok(())
        })
        .build()
}

// Re-export types for convenience
pub use tvnow_core::{PageNode as Page, VideoRecord as Video};
