use crate::{management::FileCache, success};

pub async fn clear_cache() {
    FileCache::open_default().clear().await;
    success!("Cache cleared.");
}
