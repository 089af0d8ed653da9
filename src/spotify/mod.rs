//! # Spotify Integration Module
//!
//! Interface to the Spotify Web API covering everything the playlist mixer
//! needs: OAuth 2.0 PKCE authentication, artist album listings, album track
//! listings, playlist reads, and playlist track mutations.
//!
//! The [`Catalog`] trait is the seam between the aggregation/fill core and
//! the network. The core only ever talks to `dyn Catalog`; the real
//! [`SpotifyCatalog`] implementation wires it to the Web API through the
//! disk cache, and tests substitute a recording mock.
//!
//! Playlist mutation has a fixed batch ceiling on the Spotify side: a single
//! request carries at most 100 track URIs. The chunking that respects the
//! ceiling lives here, in the trait's provided methods, so every
//! implementation gets it and the raw batch calls stay observable.

use async_trait::async_trait;

use crate::Res;
use crate::types::{AlbumPage, Playlist, TrackPage};

pub mod auth;
mod client;

pub use client::SpotifyCatalog;

/// Maximum number of track URIs the mutation endpoint accepts per request.
pub const TRACK_BATCH_LIMIT: usize = 100;

/// Remote catalog operations the aggregation and fill core depends on.
///
/// `append_batch` and `replace_batch` are the raw single-request mutations
/// and must be called with at most [`TRACK_BATCH_LIMIT`] URIs; callers go
/// through [`Catalog::add_tracks`] and [`Catalog::replace_tracks`], which
/// chunk arbitrarily long URI lists down to valid batches.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// One page of an artist's album listing.
    async fn artist_albums(&self, artist_id: &str, limit: u32, offset: u32) -> Res<AlbumPage>;

    /// One page of an album's track listing.
    async fn album_tracks(&self, album_id: &str, limit: u32, offset: u32) -> Res<TrackPage>;

    /// Playlist metadata, including description and current track total.
    async fn playlist(&self, playlist_id: &str) -> Res<Playlist>;

    /// Appends one batch of at most [`TRACK_BATCH_LIMIT`] URIs.
    async fn append_batch(&self, playlist_id: &str, uris: &[String]) -> Res<()>;

    /// Replaces the playlist contents with one batch of at most
    /// [`TRACK_BATCH_LIMIT`] URIs.
    async fn replace_batch(&self, playlist_id: &str, uris: &[String]) -> Res<()>;

    /// Appends `uris` to the playlist, chunked into batches the mutation
    /// endpoint accepts.
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        for chunk in uris.chunks(TRACK_BATCH_LIMIT) {
            self.append_batch(playlist_id, chunk).await?;
        }
        Ok(())
    }

    /// Replaces the playlist contents with `uris`: the first batch replaces,
    /// everything beyond the batch ceiling is appended afterwards.
    async fn replace_tracks(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let head = &uris[..uris.len().min(TRACK_BATCH_LIMIT)];
        self.replace_batch(playlist_id, head).await?;
        if uris.len() > TRACK_BATCH_LIMIT {
            self.add_tracks(playlist_id, &uris[TRACK_BATCH_LIMIT..])
                .await?;
        }
        Ok(())
    }
}
