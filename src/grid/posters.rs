use std::sync::{Arc, OnceLock};

use crate::{
    foundation::cache::AppendOnlyCache,
    foundation::hash::StableHasher,
    grid::planner::{BreakpointClass, GridPlan, RowConfig},
    grid::selector::ImageSelector,
};

/// One tile of the poster wall.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PosterCell {
    pub id: String,
    pub image: String,
    pub row: usize,
    pub slot: usize,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PosterRow {
    pub config: RowConfig,
    pub cells: Vec<PosterCell>,
}

/// Identity of a cell, derived only from its grid coordinates and the pool size.
pub fn poster_id(row: usize, slot: usize, pool_len: usize) -> String {
    let mut h = StableHasher::new();
    h.write_usize(row);
    h.write_usize(slot);
    h.write_usize(pool_len);
    format!("poster-{row}-{slot}-{:016x}", h.finish())
}

/// Build every row of the wall for a plan. Pure.
pub fn build_rows(selector: &mut ImageSelector, pool_len: usize, plan: &GridPlan) -> Vec<PosterRow> {
    plan.rows
        .iter()
        .map(|config| PosterRow {
            config: *config,
            cells: (0..config.poster_count)
                .map(|slot| PosterCell {
                    id: poster_id(config.row, slot, pool_len),
                    image: selector.select(config.row, slot).to_string(),
                    row: config.row,
                    slot,
                })
                .collect(),
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct WallKey {
    pool: u64,
    class: BreakpointClass,
    row_count: usize,
    items_per_row: usize,
}

fn wall_cache() -> &'static AppendOnlyCache<WallKey, Vec<PosterRow>> {
    static CACHE: OnceLock<AppendOnlyCache<WallKey, Vec<PosterRow>>> = OnceLock::new();
    CACHE.get_or_init(AppendOnlyCache::default)
}

/// Poster wall bound to one image pool.
///
/// Rows are cached for the whole process, keyed by pool fingerprint and layout class, so a
/// remount or a resize inside the same class hands back the very same cells.
#[derive(Clone, Debug)]
pub struct PosterWall {
    pool_len: usize,
    fingerprint: u64,
    selector: ImageSelector,
}

impl PosterWall {
    pub fn new(pool: Vec<String>) -> Self {
        let pool_len = pool.len();
        let selector = ImageSelector::new(pool);
        Self {
            pool_len,
            fingerprint: selector.fingerprint(),
            selector,
        }
    }

    pub fn rows(&mut self, plan: &GridPlan) -> Arc<Vec<PosterRow>> {
        let key = WallKey {
            pool: self.fingerprint,
            class: plan.class,
            row_count: plan.row_count,
            items_per_row: plan.items_per_row,
        };
        let selector = &mut self.selector;
        let pool_len = self.pool_len;
        wall_cache().get_or_insert_with(key, || {
            tracing::debug!(class = ?plan.class, rows = plan.row_count, "building poster wall");
            build_rows(selector, pool_len, plan)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/posters.rs"]
mod tests;
