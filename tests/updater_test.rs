use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use spomixcli::Res;
use spomixcli::spotify::Catalog;
use spomixcli::types::{
    Album, AlbumPage, ArtistRef, Playlist, PlaylistTracksRef, Track, TrackPage,
};
use spomixcli::updater::{
    fill_playlist, get_all_artist_tracks, parse_artist_ids_from_description, select_random_tracks,
};

// Helper to create a test track
fn test_track(id: &str, name: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:track:{}", id),
        artists: vec![ArtistRef {
            id: "artist_id".to_string(),
            name: "Artist".to_string(),
        }],
    }
}

// Helper to create a test album
fn test_album(id: &str) -> Album {
    Album {
        id: id.to_string(),
        name: format!("Album {}", id),
        album_type: "album".to_string(),
        artists: vec![ArtistRef {
            id: "artist_id".to_string(),
            name: "Artist".to_string(),
        }],
    }
}

fn test_tracks(prefix: &str, count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| test_track(&format!("{}-{}", prefix, i), &format!("Track {}", i)))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
enum MutationCall {
    Replace { playlist_id: String, uris: Vec<String> },
    Append { playlist_id: String, uris: Vec<String> },
}

/// Catalog double: serves albums and tracks from maps, fails where told to,
/// and records every raw mutation batch it receives.
#[derive(Default)]
struct MockCatalog {
    albums: HashMap<String, Vec<Album>>,
    tracks: HashMap<String, Vec<Track>>,
    failing_artists: HashSet<String>,
    failing_albums: HashSet<String>,
    calls: Mutex<Vec<MutationCall>>,
}

impl MockCatalog {
    fn with_artist(mut self, artist_id: &str, albums: Vec<(Album, Vec<Track>)>) -> Self {
        let mut album_list = Vec::new();
        for (album, tracks) in albums {
            self.tracks.insert(album.id.clone(), tracks);
            album_list.push(album);
        }
        self.albums.insert(artist_id.to_string(), album_list);
        self
    }

    fn with_failing_artist(mut self, artist_id: &str) -> Self {
        self.failing_artists.insert(artist_id.to_string());
        self
    }

    fn with_failing_album(mut self, album_id: &str) -> Self {
        self.failing_albums.insert(album_id.to_string());
        self
    }

    fn recorded_calls(&self) -> Vec<MutationCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn artist_albums(&self, artist_id: &str, _limit: u32, _offset: u32) -> Res<AlbumPage> {
        if self.failing_artists.contains(artist_id) {
            return Err("album listing failed".into());
        }
        Ok(AlbumPage {
            items: self.albums.get(artist_id).cloned().unwrap_or_default(),
            total: None,
            next: None,
        })
    }

    async fn album_tracks(&self, album_id: &str, _limit: u32, _offset: u32) -> Res<TrackPage> {
        if self.failing_albums.contains(album_id) {
            return Err("track listing failed".into());
        }
        Ok(TrackPage {
            items: self.tracks.get(album_id).cloned().unwrap_or_default(),
            total: None,
            next: None,
        })
    }

    async fn playlist(&self, playlist_id: &str) -> Res<Playlist> {
        Ok(Playlist {
            id: playlist_id.to_string(),
            name: "mock".to_string(),
            description: None,
            tracks: PlaylistTracksRef { total: 0 },
        })
    }

    async fn append_batch(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.calls.lock().unwrap().push(MutationCall::Append {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        Ok(())
    }

    async fn replace_batch(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.calls.lock().unwrap().push(MutationCall::Replace {
            playlist_id: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        Ok(())
    }
}

// --- track aggregation ---

#[tokio::test]
async fn aggregation_dedups_by_id_keeping_first_seen() {
    let shared_first = test_track("shared", "From First Album");
    let shared_second = test_track("shared", "From Second Album");

    let catalog = Arc::new(MockCatalog::default().with_artist(
        "a1",
        vec![
            (test_album("al1"), vec![shared_first, test_track("t1", "One")]),
            (
                test_album("al2"),
                vec![shared_second, test_track("t2", "Two")],
            ),
        ],
    ));

    let tracks = get_all_artist_tracks(catalog, "a1").await.unwrap();

    let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["shared", "t1", "t2"]);

    // the retained copy is the one from the first album it was seen on
    let shared = tracks.iter().find(|t| t.id == "shared").unwrap();
    assert_eq!(shared.name, "From First Album");
}

#[tokio::test]
async fn failed_album_fetch_contributes_nothing() {
    let catalog = Arc::new(
        MockCatalog::default()
            .with_artist(
                "a1",
                vec![
                    (test_album("dead"), test_tracks("dead", 5)),
                    (test_album("ok"), test_tracks("ok", 3)),
                ],
            )
            .with_failing_album("dead"),
    );

    let tracks = get_all_artist_tracks(catalog, "a1").await.unwrap();

    assert_eq!(tracks.len(), 3);
    assert!(tracks.iter().all(|t| t.id.starts_with("ok")));
}

#[tokio::test]
async fn artist_without_albums_yields_empty_list() {
    let catalog = Arc::new(MockCatalog::default().with_artist("a1", vec![]));

    let tracks = get_all_artist_tracks(catalog, "a1").await.unwrap();
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn all_album_fetches_failing_yields_empty_list() {
    let catalog = Arc::new(
        MockCatalog::default()
            .with_artist(
                "a1",
                vec![
                    (test_album("al1"), test_tracks("x", 2)),
                    (test_album("al2"), test_tracks("y", 2)),
                ],
            )
            .with_failing_album("al1")
            .with_failing_album("al2"),
    );

    let tracks = get_all_artist_tracks(catalog, "a1").await.unwrap();
    assert!(tracks.is_empty());
}

#[tokio::test]
async fn failed_album_listing_is_an_error() {
    let catalog = Arc::new(MockCatalog::default().with_failing_artist("a1"));

    let result = get_all_artist_tracks(catalog, "a1").await;
    assert!(result.is_err());
}

// --- random selection ---

#[test]
fn selection_is_bounded_by_pool_size() {
    let pools = vec![("a1".to_string(), test_tracks("a", 5))];

    let selected = select_random_tracks(&pools, 10);
    assert_eq!(selected.len(), 5);
}

#[test]
fn selection_is_bounded_by_requested_count() {
    let pools = vec![
        ("a1".to_string(), test_tracks("a", 10)),
        ("a2".to_string(), test_tracks("b", 10)),
    ];

    let selected = select_random_tracks(&pools, 7);
    assert_eq!(selected.len(), 7);

    // every selected track comes from the pool, no duplicates drawn
    let pool_ids: HashSet<String> = pools
        .iter()
        .flat_map(|(_, tracks)| tracks.iter().map(|t| t.id.clone()))
        .collect();
    let mut seen = HashSet::new();
    for track in &selected {
        assert!(pool_ids.contains(&track.id));
        assert!(seen.insert(track.id.clone()));
    }
}

#[test]
fn selection_from_empty_pool_is_empty() {
    let selected = select_random_tracks(&[], 10);
    assert!(selected.is_empty());

    let pools = vec![("a1".to_string(), Vec::new())];
    assert!(select_random_tracks(&pools, 10).is_empty());
}

// --- playlist fill ---

#[tokio::test]
async fn fill_reports_empty_pool_without_mutating() {
    let catalog = Arc::new(
        MockCatalog::default()
            .with_artist("empty", vec![])
            .with_failing_artist("dead"),
    );

    let client: Arc<dyn Catalog> = catalog.clone();
    let outcome = fill_playlist(
        client,
        "playlist",
        &["empty".to_string(), "dead".to_string()],
        25,
        true,
    )
    .await;

    assert!(!outcome.success);
    assert_eq!(outcome.track_count, 0);
    assert_eq!(
        outcome.error.as_deref(),
        Some("No tracks found for selected artists")
    );
    assert!(catalog.recorded_calls().is_empty());
}

#[tokio::test]
async fn fill_tolerates_failed_artists_and_replaces_in_one_batch() {
    // three artists: 10 tracks, total failure, 15 tracks => pool of 25
    let catalog = Arc::new(
        MockCatalog::default()
            .with_artist("a1", vec![(test_album("al1"), test_tracks("a", 10))])
            .with_failing_artist("a2")
            .with_artist("a3", vec![(test_album("al3"), test_tracks("c", 15))]),
    );

    let artist_ids = vec!["a1".to_string(), "a2".to_string(), "a3".to_string()];
    let client: Arc<dyn Catalog> = catalog.clone();
    let outcome = fill_playlist(client, "playlist", &artist_ids, 50, true).await;

    assert!(outcome.success);
    assert_eq!(outcome.track_count, 25);

    let calls = catalog.recorded_calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        MutationCall::Replace { playlist_id, uris } => {
            assert_eq!(playlist_id, "playlist");
            assert_eq!(uris.len(), 25);
        }
        other => panic!("expected a replace call, got {:?}", other),
    }
}

#[tokio::test]
async fn fill_appends_when_not_replacing() {
    let catalog = Arc::new(
        MockCatalog::default()
            .with_artist("a1", vec![(test_album("al1"), test_tracks("a", 8))]),
    );

    let client: Arc<dyn Catalog> = catalog.clone();
    let outcome =
        fill_playlist(client, "playlist", &["a1".to_string()], 5, false).await;

    assert!(outcome.success);
    assert_eq!(outcome.track_count, 5);

    let calls = catalog.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], MutationCall::Append { uris, .. } if uris.len() == 5));
}

#[tokio::test]
async fn duplicate_artists_pool_their_tracks_twice() {
    // within-artist aggregation dedups; the merged pool intentionally does not
    let catalog = Arc::new(
        MockCatalog::default()
            .with_artist("a1", vec![(test_album("al1"), test_tracks("a", 3))]),
    );

    let artist_ids = vec!["a1".to_string(), "a1".to_string()];
    let client: Arc<dyn Catalog> = catalog.clone();
    let outcome = fill_playlist(client, "playlist", &artist_ids, 50, true).await;

    assert!(outcome.success);
    assert_eq!(outcome.track_count, 6);
}

// --- batch chunking ---

#[tokio::test]
async fn replace_chunks_into_one_replace_and_appends() {
    let catalog = MockCatalog::default();
    let uris: Vec<String> = (0..250).map(|i| format!("spotify:track:{}", i)).collect();

    catalog.replace_tracks("playlist", &uris).await.unwrap();

    let calls = catalog.recorded_calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(&calls[0], MutationCall::Replace { uris, .. } if uris.len() == 100));
    assert!(matches!(&calls[1], MutationCall::Append { uris, .. } if uris.len() == 100));
    assert!(matches!(&calls[2], MutationCall::Append { uris, .. } if uris.len() == 50));

    // order preserved across the chunk boundary
    if let MutationCall::Append { uris, .. } = &calls[2] {
        assert_eq!(uris[0], "spotify:track:200");
        assert_eq!(uris[49], "spotify:track:249");
    }
}

#[tokio::test]
async fn replace_with_at_most_one_batch_never_appends() {
    let catalog = MockCatalog::default();
    let uris: Vec<String> = (0..100).map(|i| format!("spotify:track:{}", i)).collect();

    catalog.replace_tracks("playlist", &uris).await.unwrap();

    let calls = catalog.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], MutationCall::Replace { uris, .. } if uris.len() == 100));
}

#[tokio::test]
async fn add_tracks_chunks_appends() {
    let catalog = MockCatalog::default();
    let uris: Vec<String> = (0..201).map(|i| format!("spotify:track:{}", i)).collect();

    catalog.add_tracks("playlist", &uris).await.unwrap();

    let calls = catalog.recorded_calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(&calls[0], MutationCall::Append { uris, .. } if uris.len() == 100));
    assert!(matches!(&calls[1], MutationCall::Append { uris, .. } if uris.len() == 100));
    assert!(matches!(&calls[2], MutationCall::Append { uris, .. } if uris.len() == 1));
}

#[tokio::test]
async fn add_tracks_with_no_uris_issues_no_calls() {
    let catalog = MockCatalog::default();

    catalog.add_tracks("playlist", &[]).await.unwrap();
    assert!(catalog.recorded_calls().is_empty());
}

// --- descriptor parsing ---

#[test]
fn descriptor_marker_is_parsed_and_trimmed() {
    let ids = parse_artist_ids_from_description(Some("Great mix [Auto-update: a1, a2 ,a3]"));
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
}

#[test]
fn descriptor_without_marker_yields_nothing() {
    assert!(parse_artist_ids_from_description(Some("no marker here")).is_empty());
}

#[test]
fn missing_description_yields_nothing() {
    assert!(parse_artist_ids_from_description(None).is_empty());
}

#[test]
fn empty_pieces_are_dropped() {
    let ids = parse_artist_ids_from_description(Some("[Auto-update: a1,, a2 ,]"));
    assert_eq!(ids, vec!["a1", "a2"]);
}

#[test]
fn marker_can_sit_anywhere_in_the_text() {
    let ids =
        parse_artist_ids_from_description(Some("Weekly rotation [Auto-update: x9] - enjoy!"));
    assert_eq!(ids, vec!["x9"]);
}
