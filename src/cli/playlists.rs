use tabled::Table;

use crate::{
    types::PlaylistTableRow, updater::parse_artist_ids_from_description, warning,
};

pub async fn list_playlists() {
    let catalog = super::build_catalog().await;

    match catalog.user_playlists(50).await {
        Ok(playlists) => {
            let table_rows: Vec<PlaylistTableRow> = playlists
                .into_iter()
                .map(|p| {
                    let artist_ids = parse_artist_ids_from_description(p.description.as_deref());
                    PlaylistTableRow {
                        name: p.name,
                        tracks: p.tracks.total,
                        auto_update: if artist_ids.is_empty() {
                            String::new()
                        } else {
                            format!("{} artists", artist_ids.len())
                        },
                    }
                })
                .collect();

            let table = Table::new(table_rows);
            println!("{}", table);
        }
        Err(e) => warning!("Failed to load playlists. Err: {}", e),
    }
}
