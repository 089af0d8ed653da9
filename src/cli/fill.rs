use crate::{info, success, updater, warning};

pub async fn fill(playlist_id: String, artist_ids: Vec<String>, count: usize, replace: bool) {
    let catalog = super::build_catalog().await;

    info!(
        "Sampling {count} tracks from {artists} artist(s)...",
        count = count,
        artists = artist_ids.len()
    );

    let outcome =
        updater::fill_playlist(catalog, &playlist_id, &artist_ids, count, replace).await;

    if outcome.success {
        success!(
            "Playlist filled with {} tracks ({}).",
            outcome.track_count,
            if replace { "replaced" } else { "appended" }
        );
    } else {
        warning!(
            "Fill failed: {}",
            outcome.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }
}
