//! Track aggregation and random playlist fill.
//!
//! This is the core of the application: given a set of artists, pull each
//! artist's tracks out of the catalog (albums first, then every album's
//! tracks concurrently), pool them, sample uniformly without replacement,
//! and write the selection back to a playlist. Playlists opt into scheduled
//! refills through an `[Auto-update: ...]` marker in their description.
//!
//! All functions here are pure over their inputs plus the catalog client;
//! no state survives between invocations. Partial failures shrink the
//! result instead of failing it: a dead album or artist contributes zero
//! tracks and no error.

mod descriptor;
mod fill;
mod tracks;

pub use descriptor::parse_artist_ids_from_description;
pub use fill::{fill_playlist, select_random_tracks};
pub use tracks::get_all_artist_tracks;
