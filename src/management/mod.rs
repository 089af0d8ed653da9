mod auth;
mod cache;

pub use auth::TokenManager;
pub use cache::FileCache;
