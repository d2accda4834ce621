use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x6f1d_a0c3_52be_7e19;

/// Seeded xxh3 hasher whose output is stable across runs and platforms.
///
/// `std::hash::DefaultHasher` is randomly keyed per process, so anything that must reproduce
/// the same identity after a remount (poster ids, pool fingerprints) goes through this instead.
pub(crate) struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    pub(crate) fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_usize(&mut self, v: usize) {
        self.write_u64(v as u64);
    }

    /// Length-prefixed so that `["ab", "c"]` and `["a", "bc"]` hash differently.
    pub(crate) fn write_str(&mut self, s: &str) {
        self.write_usize(s.len());
        self.write_bytes(s.as_bytes());
    }

    pub(crate) fn finish(&self) -> u64 {
        self.inner.digest()
    }
}

/// Fingerprint of an ordered image pool. Equal pools always map to the same value.
pub(crate) fn pool_fingerprint<S: AsRef<str>>(pool: &[S]) -> u64 {
    let mut h = StableHasher::new();
    h.write_usize(pool.len());
    for item in pool {
        h.write_str(item.as_ref());
    }
    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/hash.rs"]
mod tests;
