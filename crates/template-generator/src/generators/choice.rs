//! Choice and sampling generators.

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

/// Pick one candidate uniformly. Returns `None` for an empty list.
pub fn generate_one_of<R: Rng>(rng: &mut R, values: &[Value]) -> Option<Value> {
    values.choose(rng).cloned()
}

/// Generate an array by sampling from a pool of values (with repeats).
pub fn generate_sample_array<R: Rng>(
    rng: &mut R,
    pool: &[Value],
    min_length: usize,
    max_length: usize,
) -> Value {
    if pool.is_empty() || max_length == 0 {
        return Value::Array(vec![]);
    }

    let length = rng.gen_range(min_length..=max_length);

    let items: Vec<Value> = (0..length)
        .filter_map(|_| pool.choose(rng).cloned())
        .collect();

    Value::Array(items)
}

/// Generate an array by sampling unique items from a pool.
pub fn generate_unique_sample_array<R: Rng>(
    rng: &mut R,
    pool: &[Value],
    min_length: usize,
    max_length: usize,
) -> Value {
    if pool.is_empty() || max_length == 0 {
        return Value::Array(vec![]);
    }

    // Clamp max_length to pool size for unique sampling
    let effective_max = max_length.min(pool.len());
    let effective_min = min_length.min(effective_max);

    let length = rng.gen_range(effective_min..=effective_max);

    // Shuffle and take first `length` items
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(length);

    Value::Array(shuffled)
}
