use crate::{error, info, success, updater, warning};

/// Creates a new private playlist and fills it with a random sample from the
/// given artists. With `auto_update` the artist list is embedded in the
/// description as an `[Auto-update: ...]` marker, so the scheduled `update`
/// command keeps refreshing it.
pub async fn create(
    name: String,
    description: Option<String>,
    artist_ids: Vec<String>,
    count: usize,
    auto_update: bool,
) {
    let catalog = super::build_catalog().await;

    let mut description = description.unwrap_or_default();
    if auto_update {
        let marker = format!("[Auto-update: {}]", artist_ids.join(","));
        description = if description.is_empty() {
            marker
        } else {
            format!("{} {}", description, marker)
        };
    }

    info!("Creating playlist {}...", name);
    let playlist = match catalog.create_playlist(&name, &description).await {
        Ok(playlist) => playlist,
        Err(e) => {
            error!("Failed to create playlist: {}", e);
        }
    };

    let outcome = updater::fill_playlist(catalog, &playlist.id, &artist_ids, count, false).await;

    if outcome.success {
        success!(
            "Created {name} with {count} tracks.",
            name = playlist.name,
            count = outcome.track_count
        );
    } else {
        warning!(
            "Playlist created, but filling it failed: {}",
            outcome.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }
}
