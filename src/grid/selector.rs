use std::collections::HashMap;

use crate::foundation::hash::pool_fingerprint;

/// Built-in posters used when the caller's pool is empty.
pub const PLACEHOLDER_POSTERS: [&str; 6] = [
    "placeholder/poster-01.jpg",
    "placeholder/poster-02.jpg",
    "placeholder/poster-03.jpg",
    "placeholder/poster-04.jpg",
    "placeholder/poster-05.jpg",
    "placeholder/poster-06.jpg",
];

/// Per-row phase shift so vertically adjacent rows do not line up the same posters.
pub const ROW_SHIFT: usize = 3;

/// Pool index for a grid slot, or `None` for an empty pool.
pub fn select_index(len: usize, row: usize, slot: usize) -> Option<usize> {
    (len > 0).then(|| wrap(len, row, slot))
}

fn wrap(len: usize, row: usize, slot: usize) -> usize {
    row.wrapping_mul(ROW_SHIFT).wrapping_add(slot) % len
}

/// Image for `(row, slot)`, wrapping by modulo; falls back to [`PLACEHOLDER_POSTERS`] when the
/// pool is empty, using the same rule.
pub fn select<S: AsRef<str>>(pool: &[S], row: usize, slot: usize) -> &str {
    match select_index(pool.len(), row, slot) {
        Some(idx) => pool[idx].as_ref(),
        None => PLACEHOLDER_POSTERS[wrap(PLACEHOLDER_POSTERS.len(), row, slot)],
    }
}

/// [`select`] bound to one pool, with memoized slot lookups.
#[derive(Clone, Debug)]
pub struct ImageSelector {
    pool: Vec<String>,
    fingerprint: u64,
    memo: HashMap<(usize, usize), usize>,
}

impl ImageSelector {
    pub fn new(pool: Vec<String>) -> Self {
        let fingerprint = pool_fingerprint(&pool);
        Self {
            pool,
            fingerprint,
            memo: HashMap::new(),
        }
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn uses_placeholders(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn select(&mut self, row: usize, slot: usize) -> &str {
        let len = if self.pool.is_empty() {
            PLACEHOLDER_POSTERS.len()
        } else {
            self.pool.len()
        };
        let idx = *self
            .memo
            .entry((row, slot))
            .or_insert_with(|| wrap(len, row, slot));
        if self.pool.is_empty() {
            PLACEHOLDER_POSTERS[idx]
        } else {
            &self.pool[idx]
        }
    }

    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/selector.rs"]
mod tests;
