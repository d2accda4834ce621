use std::sync::OnceLock;

use crate::foundation::cache::AppendOnlyCache;

/// Answers whether an image reference resolves to a real asset.
pub trait ImageProbe {
    fn exists(&self, image: &str) -> bool;
}

impl<F> ImageProbe for F
where
    F: Fn(&str) -> bool,
{
    fn exists(&self, image: &str) -> bool {
        self(image)
    }
}

fn existence_cache() -> &'static AppendOnlyCache<String, bool> {
    static CACHE: OnceLock<AppendOnlyCache<String, bool>> = OnceLock::new();
    CACHE.get_or_init(AppendOnlyCache::default)
}

/// Probe once per reference for the life of the process.
pub fn image_exists(image: &str, probe: &dyn ImageProbe) -> bool {
    let key = image.to_string();
    *existence_cache().get_or_insert_with(key, || {
        let found = probe.exists(image);
        if !found {
            tracing::warn!(image, "poster image missing; dropping from pool");
        }
        found
    })
}

/// Keep only references that exist, preserving order.
pub fn filter_existing(pool: &[String], probe: &dyn ImageProbe) -> Vec<String> {
    pool.iter()
        .filter(|image| image_exists(image, probe))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/grid/existence.rs"]
mod tests;
