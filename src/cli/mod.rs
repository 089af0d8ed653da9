//! # CLI Module
//!
//! User-facing command implementations. Each command wires the management
//! layer (token, cache) and the Spotify client together, drives the
//! aggregation/fill core, and presents the outcome with the status macros
//! and tables the rest of the application uses.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth 2.0 PKCE flow
//! - [`list_playlists`] - table of the user's playlists with their
//!   auto-update status
//! - [`create`] - create a playlist and fill it, optionally embedding the
//!   auto-update marker
//! - [`fill`] - fill one playlist with random tracks from given artists
//! - [`update`] - refresh every playlist carrying an auto-update marker
//!   (the scheduled-job entry point)
//! - [`clear_cache`] - drop all cached API responses
//!
//! Commands that need the Web API load the persisted token first and exit
//! with a pointer to `spomixcli auth` when it is missing.

mod auth;
mod cache;
mod create;
mod fill;
mod playlists;
mod update;

pub use auth::auth;
pub use cache::clear_cache;
pub use create::create;
pub use fill::fill;
pub use playlists::list_playlists;
pub use update::update;

use std::sync::Arc;

use crate::{
    config, error,
    management::{FileCache, TokenManager},
    spotify::SpotifyCatalog,
};

/// Builds the catalog client every API-backed command shares: resolved
/// config, default cache location, persisted token.
pub(crate) async fn build_catalog() -> Arc<SpotifyCatalog> {
    let config = config::CatalogConfig::from_env();

    let tokens = match TokenManager::load(config.clone()).await {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "Failed to load token. Please run spomixcli auth\n Error: {}",
                e
            );
        }
    };

    Arc::new(SpotifyCatalog::new(
        config,
        FileCache::open_default(),
        tokens,
    ))
}
