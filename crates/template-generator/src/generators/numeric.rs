//! Numeric and boolean value generators.

use rand::Rng;
use serde_json::{Number, Value};

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> Value {
    Value::from(rng.gen_range(min..=max))
}

/// Generate a random float in the given range (inclusive), optionally
/// rounded to `decimals` places.
pub fn generate_float_range<R: Rng>(
    rng: &mut R,
    min: f64,
    max: f64,
    decimals: Option<i32>,
) -> Value {
    let mut value = if (max - min).is_finite() {
        rng.gen_range(min..=max)
    } else {
        // Span overflows f64; sample on halved bounds instead
        let half = min / 2.0 + rng.gen::<f64>() * (max / 2.0 - min / 2.0);
        (half * 2.0).clamp(min, max)
    };
    if let Some(decimals) = decimals {
        let factor = 10f64.powi(decimals);
        value = ((value * factor).round() / factor).clamp(min, max);
    }
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// Generate a boolean that is `true` with probability `true_weight`.
pub fn generate_weighted_bool<R: Rng>(rng: &mut R, true_weight: f64) -> Value {
    Value::Bool(rng.gen_bool(true_weight))
}
