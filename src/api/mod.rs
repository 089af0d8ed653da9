//! HTTP endpoints for the local callback server.
//!
//! Only two routes exist: the OAuth 2.0 PKCE [`callback`] that completes
//! the authorization-code exchange, and a [`health`] probe. The server runs
//! just long enough for the `auth` command to finish its flow.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
