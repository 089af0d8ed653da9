use std::{collections::HashSet, sync::Arc};

use crate::{Res, spotify::Catalog, types::Track};

/// Album listing page size. Only the first page is fetched; artists with
/// deeper catalogs contribute their first 20 albums.
pub const ALBUM_PAGE_LIMIT: u32 = 20;

/// Track listing page size per album, first page only.
pub const TRACK_PAGE_LIMIT: u32 = 30;

/// Collects an artist's track set from the catalog.
///
/// Fetches the artist's first album page, then every album's first track
/// page concurrently. The join waits for all fetches to settle; an album
/// whose fetch failed contributes zero tracks and is otherwise ignored.
/// Tracks are merged in album order and deduplicated by track id,
/// first-seen-wins, since the same track routinely appears on an album and
/// a compilation.
///
/// An artist with no albums, or whose every album fetch failed, yields an
/// empty list rather than an error. Only the album listing itself failing
/// is an error.
pub async fn get_all_artist_tracks(client: Arc<dyn Catalog>, artist_id: &str) -> Res<Vec<Track>> {
    let albums = client
        .artist_albums(artist_id, ALBUM_PAGE_LIMIT, 0)
        .await?;

    let mut handles = Vec::new();
    for album in albums.items {
        let client = Arc::clone(&client);
        let handle = tokio::spawn(async move {
            client.album_tracks(&album.id, TRACK_PAGE_LIMIT, 0).await
        });
        handles.push(handle);
    }

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut all_tracks: Vec<Track> = Vec::new();

    for handle in handles {
        match handle.await {
            Ok(Ok(page)) => {
                for track in page.items {
                    if seen_ids.insert(track.id.clone()) {
                        all_tracks.push(track);
                    }
                }
            }
            // failed album fetches shrink the result, nothing more
            Ok(Err(_)) | Err(_) => {}
        }
    }

    Ok(all_tracks)
}
