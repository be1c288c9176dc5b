//! Pattern-based string generator.
//!
//! Supports placeholders:
//! - `{index}` - index of the innermost repeated element
//! - `{uuid}` - random UUID
//! - `{rand:N}` - random N-digit number

use super::uuid::random_uuid_v4;
use rand::Rng;

/// Generate a string based on a pattern with placeholders.
pub fn generate_pattern<R: Rng>(pattern: &str, rng: &mut R, index: u64) -> String {
    let mut result = pattern.replace("{index}", &index.to_string());

    while result.contains("{uuid}") {
        result = result.replacen("{uuid}", &random_uuid_v4(rng).to_string(), 1);
    }

    // Replace {rand:N} patterns, left to right
    let mut search_from = 0;
    while let Some(offset) = result[search_from..].find("{rand:") {
        let start = search_from + offset;
        let Some(end) = result[start..].find('}').map(|end| start + end) else {
            break;
        };
        match result[start + 6..end].parse::<usize>() {
            Ok(digits) => {
                let random_num = generate_random_digits(rng, digits);
                result = format!("{}{}{}", &result[..start], random_num, &result[end + 1..]);
                search_from = start + random_num.len();
            }
            // Not a placeholder, keep the text
            Err(_) => search_from = end + 1,
        }
    }

    result
}

/// Generate a random number with exactly N digits.
fn generate_random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    const DIGITS: &[u8] = b"0123456789";

    (0..digits)
        .map(|i| {
            // First digit should be 1-9 to avoid leading zeros
            let low = usize::from(i == 0);
            char::from(DIGITS[rng.gen_range(low..10)])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_pattern_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_pattern("user_{index}@example.com", &mut rng, 123);

        assert_eq!(value, "user_123@example.com");
    }

    #[test]
    fn test_generate_pattern_uuid() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_pattern("id-{uuid}", &mut rng, 0);

        assert!(value.starts_with("id-"));
        assert_eq!(value.len(), 3 + 36); // "id-" + UUID
    }

    #[test]
    fn test_generate_pattern_random_digits() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_pattern("code-{rand:6}", &mut rng, 0);

        assert!(value.starts_with("code-"));
        assert_eq!(value.len(), 5 + 6); // "code-" + 6 digits
        let random_part = &value[5..];
        assert!(random_part.chars().all(|c| c.is_ascii_digit()));
        assert!(!random_part.starts_with('0'));
    }

    #[test]
    fn test_generate_pattern_multiple_placeholders() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_pattern("user_{index}_code_{rand:4}_{rand:2}", &mut rng, 42);

        assert!(value.starts_with("user_42_code_"));
        // "user_42_code_" (13) + 4 digits + "_" + 2 digits
        assert_eq!(value.len(), 13 + 4 + 1 + 2);
    }

    #[test]
    fn test_invalid_rand_placeholder_kept() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_pattern("{rand:x}-{rand:1}", &mut rng, 0);

        assert!(value.starts_with("{rand:x}-"));
        assert_eq!(value.len(), "{rand:x}-".len() + 1);
    }

    #[test]
    fn test_deterministic_with_uuid() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);

        assert_eq!(
            generate_pattern("{uuid}/{rand:8}", &mut rng1, 0),
            generate_pattern("{uuid}/{rand:8}", &mut rng2, 0)
        );
    }
}
