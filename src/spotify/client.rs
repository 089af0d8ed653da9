use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    Res,
    config::CatalogConfig,
    management::{FileCache, TokenManager},
    spotify::Catalog,
    types::{
        AlbumPage, CreatePlaylistRequest, GetUserPlaylistsResponse, Playlist,
        PlaylistTracksRequest, PlaylistTracksResponse, TrackPage,
    },
    warning,
};

/// Album catalogs change rarely; their listing pages live this long.
const ALBUM_LIST_TTL: Duration = Duration::from_secs(60 * 24 * 60 * 60); // two months

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Spotify Web API implementation of [`Catalog`].
///
/// Holds everything it needs explicitly: resolved configuration, the disk
/// cache that fronts the listing endpoints, and the token manager for
/// bearer authentication. Album listings are cached for two months under
/// `artist-albums:<id>:<limit>:<offset>`; album track listings are cached
/// permanently under `album-tracks:<id>:<limit>:<offset>`, since the track
/// list of a released album never changes.
pub struct SpotifyCatalog {
    http: Client,
    config: CatalogConfig,
    cache: FileCache,
    tokens: Mutex<TokenManager>,
}

impl SpotifyCatalog {
    pub fn new(config: CatalogConfig, cache: FileCache, tokens: TokenManager) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warning!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            http,
            config,
            cache,
            tokens: Mutex::new(tokens),
        }
    }

    async fn bearer(&self) -> String {
        self.tokens.lock().await.get_valid_token().await
    }

    /// Authenticated GET returning deserialized JSON.
    ///
    /// Handles the API's transient failure modes the same way for every
    /// endpoint: 429 Too Many Requests is retried after the `retry-after`
    /// delay when that delay is sane (at most 120 seconds), 502 Bad Gateway
    /// is retried after 10 seconds, and every other non-success status is
    /// propagated to the caller.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Res<T> {
        loop {
            let token = self.bearer().await;
            let response = self.http.get(url).bearer_auth(token).send().await;

            let response = match response {
                Ok(resp) => {
                    if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(0);
                        if retry_after > 0 && retry_after <= 120 {
                            sleep(Duration::from_secs(retry_after)).await;
                            continue; // retry
                        }
                        warning!(
                            "Rate limited with a retry-after of {} seconds. Giving up on this request.",
                            retry_after
                        );
                    }

                    match resp.error_for_status() {
                        Ok(valid_response) => valid_response,
                        Err(err) => {
                            if let Some(status) = err.status() {
                                if status == StatusCode::BAD_GATEWAY {
                                    sleep(Duration::from_secs(10)).await;
                                    continue; // retry
                                }
                            }
                            return Err(err.into()); // propagate other errors
                        }
                    }
                }
                Err(err) => {
                    return Err(err.into());
                } // network or reqwest error
            };

            return Ok(response.json::<T>().await?);
        }
    }

    /// Single playlist mutation request; POST appends, PUT replaces.
    async fn send_uris(&self, method: Method, playlist_id: &str, uris: &[String]) -> Res<()> {
        let url = format!(
            "{uri}/playlists/{id}/tracks",
            uri = self.config.api_url,
            id = playlist_id
        );
        let body = PlaylistTracksRequest {
            uris: uris.to_vec(),
        };

        let token = self.bearer().await;
        let response = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        response.json::<PlaylistTracksResponse>().await?;
        Ok(())
    }

    /// Creates a private playlist for the configured user.
    pub async fn create_playlist(&self, name: &str, description: &str) -> Res<Playlist> {
        let url = format!(
            "{uri}/users/{user}/playlists",
            uri = self.config.api_url,
            user = self.config.user_id
        );
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
        };

        let token = self.bearer().await;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<Playlist>().await?)
    }

    /// First page of the authenticated user's playlists. Used by the CLI
    /// surfaces, not by the fill core.
    pub async fn user_playlists(&self, limit: u32) -> Res<Vec<Playlist>> {
        let url = format!(
            "{uri}/me/playlists?limit={limit}",
            uri = self.config.api_url,
            limit = limit
        );
        let res: GetUserPlaylistsResponse = self.get_json(&url).await?;
        Ok(res.items)
    }
}

#[async_trait]
impl Catalog for SpotifyCatalog {
    async fn artist_albums(&self, artist_id: &str, limit: u32, offset: u32) -> Res<AlbumPage> {
        let cache_key = format!("artist-albums:{}:{}:{}", artist_id, limit, offset);
        if let Some(page) = self
            .cache
            .get::<AlbumPage>(&cache_key, Some(ALBUM_LIST_TTL))
            .await
        {
            return Ok(page);
        }

        let url = format!(
            "{uri}/artists/{id}/albums?limit={limit}&offset={offset}",
            uri = self.config.api_url,
            id = artist_id,
            limit = limit,
            offset = offset
        );
        let page: AlbumPage = self.get_json(&url).await?;

        self.cache.set(&cache_key, &page, Some(ALBUM_LIST_TTL)).await;
        Ok(page)
    }

    async fn album_tracks(&self, album_id: &str, limit: u32, offset: u32) -> Res<TrackPage> {
        let cache_key = format!("album-tracks:{}:{}:{}", album_id, limit, offset);
        if let Some(page) = self.cache.get::<TrackPage>(&cache_key, None).await {
            return Ok(page);
        }

        let url = format!(
            "{uri}/albums/{id}/tracks?limit={limit}&offset={offset}",
            uri = self.config.api_url,
            id = album_id,
            limit = limit,
            offset = offset
        );
        let page: TrackPage = self.get_json(&url).await?;

        self.cache.set(&cache_key, &page, None).await;
        Ok(page)
    }

    async fn playlist(&self, playlist_id: &str) -> Res<Playlist> {
        let url = format!(
            "{uri}/playlists/{id}",
            uri = self.config.api_url,
            id = playlist_id
        );
        self.get_json(&url).await
    }

    async fn append_batch(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.send_uris(Method::POST, playlist_id, uris).await
    }

    async fn replace_batch(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.send_uris(Method::PUT, playlist_id, uris).await
    }
}
