//! Tabu memory of previously-visited labellings (spec §4.G "Edge
//! policies"), grounded on `r_tabu.h`'s `std::unordered_set<vector<uint8_t>>`
//! with a Boost-style hash combine. Rather than storing full label vectors,
//! only the combined hash is kept, trading a vanishingly small false-positive
//! collision risk for O(1) memory per visited labelling.

use ahash::AHashSet;

/// `seed = x[0]; seed ^= x[i] + 0x9e3779b9 + (seed << 6) + (seed >> 2)` for
/// `i` in `1..x.len()`, matching the combine used by Boost's
/// `hash_combine` and named directly in the source.
fn hash_combine(labels: &[u8]) -> u64 {
    let mut seed: u64 = labels.first().copied().unwrap_or(0) as u64;
    for &x in &labels[labels.len().min(1)..] {
        seed ^= (x as u64)
            .wrapping_add(0x9e37_79b9)
            .wrapping_add(seed << 6)
            .wrapping_add(seed >> 2);
    }
    seed
}

pub struct TabuSet {
    seen: AHashSet<u64>,
}

impl TabuSet {
    pub fn new() -> Self {
        Self { seen: AHashSet::new() }
    }

    pub fn contains(&self, labels: &[u8]) -> bool {
        self.seen.contains(&hash_combine(labels))
    }

    pub fn insert(&mut self, labels: &[u8]) {
        self.seen.insert(hash_combine(labels));
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Default for TabuSet {
    fn default() -> Self {
        Self::new()
    }
}
