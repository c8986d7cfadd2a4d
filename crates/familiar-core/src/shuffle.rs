use std::time::{SystemTime, UNIX_EPOCH};

/// In-place Fisher–Yates shuffle.
///
/// For `k` from `len - 1` down to 1, swaps `k` with a `j` drawn uniformly
/// from `[0, k]`. The same seed always yields the same permutation.
pub fn fisher_yates<T>(items: &mut [T], rng: &mut fastrand::Rng) {
    for k in (1..items.len()).rev() {
        let j = rng.usize(0..=k);
        items.swap(j, k);
    }
}

/// A fresh RNG seeded from the wall clock.
pub fn time_seeded_rng() -> fastrand::Rng {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    fastrand::Rng::with_seed(seed)
}
