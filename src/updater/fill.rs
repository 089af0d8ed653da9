use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::{
    Res,
    spotify::Catalog,
    types::{FillOutcome, Track},
    updater::get_all_artist_tracks,
};

/// Samples `track_count` tracks uniformly, without replacement, from the
/// pooled per-artist track lists.
///
/// The pool is the plain concatenation of every artist's list: a track
/// owned by two of the queried artists (a collaboration) appears twice and
/// can be drawn twice. Deduplication happens within one artist's
/// aggregation only; the rare cross-artist duplicate is accepted.
pub fn select_random_tracks(
    artists_tracks: &[(String, Vec<Track>)],
    track_count: usize,
) -> Vec<Track> {
    let mut pool: Vec<Track> = artists_tracks
        .iter()
        .flat_map(|(_, tracks)| tracks.iter().cloned())
        .collect();

    pool.shuffle(&mut rand::rng());
    pool.truncate(track_count.min(pool.len()));
    pool
}

/// Fills a playlist with randomly sampled tracks from the given artists.
///
/// Aggregates every artist concurrently, waiting for all of them to settle;
/// artists whose aggregation failed simply contribute nothing to the pool.
/// The selection is written back in one go: with `replace_existing` the
/// playlist contents are replaced, otherwise the tracks are appended.
///
/// This is the boundary past which callers never see a raw error. Every
/// failure mode, including an empty pool, comes back as a structured
/// [`FillOutcome`].
pub async fn fill_playlist(
    client: Arc<dyn Catalog>,
    playlist_id: &str,
    artist_ids: &[String],
    track_count: usize,
    replace_existing: bool,
) -> FillOutcome {
    match try_fill(client, playlist_id, artist_ids, track_count, replace_existing).await {
        Ok(outcome) => outcome,
        Err(e) => FillOutcome::failed(e.to_string()),
    }
}

async fn try_fill(
    client: Arc<dyn Catalog>,
    playlist_id: &str,
    artist_ids: &[String],
    track_count: usize,
    replace_existing: bool,
) -> Res<FillOutcome> {
    let mut handles = Vec::new();
    for artist_id in artist_ids {
        let client = Arc::clone(&client);
        let artist_id = artist_id.clone();
        let handle = tokio::spawn(async move {
            let tracks = get_all_artist_tracks(client, &artist_id).await?;
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>((artist_id, tracks))
        });
        handles.push(handle);
    }

    // wait for every artist to settle; failed ones contribute no tracks
    let mut artists_tracks: Vec<(String, Vec<Track>)> = Vec::new();
    for handle in handles {
        if let Ok(Ok(entry)) = handle.await {
            artists_tracks.push(entry);
        }
    }

    let selected = select_random_tracks(&artists_tracks, track_count);

    if selected.is_empty() {
        return Ok(FillOutcome::failed("No tracks found for selected artists"));
    }

    let track_uris: Vec<String> = selected.iter().map(|t| t.uri.clone()).collect();

    if replace_existing {
        client.replace_tracks(playlist_id, &track_uris).await?;
    } else {
        client.add_tracks(playlist_id, &track_uris).await?;
    }

    Ok(FillOutcome::filled(selected.len()))
}
