use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{error, info, spotify::Catalog, success, updater, warning};

/// Refreshes every playlist carrying an `[Auto-update: ...]` marker with a
/// fresh random sample, keeping each playlist at its current track total.
/// This is what the scheduled job runs. With `--playlist` only that one
/// playlist is fetched and refreshed.
pub async fn update(playlist_filter: Option<String>) {
    let catalog = super::build_catalog().await;

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching playlists...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let playlists = match &playlist_filter {
        Some(id) => match catalog.playlist(id).await {
            Ok(playlist) => vec![playlist],
            Err(e) => {
                pb.finish_and_clear();
                error!("Cannot fetch playlist {}. Err: {}", id, e);
            }
        },
        None => match catalog.user_playlists(50).await {
            Ok(playlists) => playlists,
            Err(e) => {
                pb.finish_and_clear();
                error!("Cannot fetch playlists. Err: {}", e);
            }
        },
    };
    pb.finish_and_clear();

    let mut updated = 0;
    let mut skipped = 0;

    for playlist in playlists {
        let artist_ids =
            updater::parse_artist_ids_from_description(playlist.description.as_deref());
        if artist_ids.is_empty() {
            skipped += 1;
            continue;
        }

        info!(
            "Updating {name} ({tracks} tracks) from {artists} artist(s)...",
            name = playlist.name,
            tracks = playlist.tracks.total,
            artists = artist_ids.len()
        );

        let client: Arc<dyn Catalog> = catalog.clone();
        let outcome = updater::fill_playlist(
            client,
            &playlist.id,
            &artist_ids,
            playlist.tracks.total,
            true,
        )
        .await;

        if outcome.success {
            success!(
                "Updated {name} with {count} tracks.",
                name = playlist.name,
                count = outcome.track_count
            );
            updated += 1;
        } else {
            warning!(
                "Failed to update {name}: {err}",
                name = playlist.name,
                err = outcome.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    success!(
        "Done. {updated} playlist(s) updated, {skipped} without auto-update marker.",
        updated = updated,
        skipped = skipped
    );
}
