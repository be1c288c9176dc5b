//! Random string generator.

use super::ArgReader;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use rand::Rng;
use serde_json::Value;

const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const HEX: &str = "0123456789abcdef";

/// Default length bounds when none are given.
const DEFAULT_MIN_LENGTH: u64 = 8;
const DEFAULT_MAX_LENGTH: u64 = 16;

/// Character class a random string draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Charset {
    Alpha,
    Alphanumeric,
    Numeric,
    Hex,
    Lower,
    Upper,
    Custom(Vec<char>),
}

impl Charset {
    /// Parse a named character class.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "alpha" => Some(Charset::Alpha),
            "alphanumeric" => Some(Charset::Alphanumeric),
            "numeric" => Some(Charset::Numeric),
            "hex" => Some(Charset::Hex),
            "lower" => Some(Charset::Lower),
            "upper" => Some(Charset::Upper),
            _ => None,
        }
    }

    fn chars(&self) -> Vec<char> {
        match self {
            Charset::Alpha => LOWER.chars().chain(UPPER.chars()).collect(),
            Charset::Alphanumeric => LOWER
                .chars()
                .chain(UPPER.chars())
                .chain(DIGITS.chars())
                .collect(),
            Charset::Numeric => DIGITS.chars().collect(),
            Charset::Hex => HEX.chars().collect(),
            Charset::Lower => LOWER.chars().collect(),
            Charset::Upper => UPPER.chars().collect(),
            Charset::Custom(chars) => chars.clone(),
        }
    }
}

/// Generate a random string of exactly `length` characters.
pub fn generate_random_string<R: Rng>(rng: &mut R, length: usize, charset: &Charset) -> String {
    let chars = charset.chars();
    if chars.is_empty() {
        return String::new();
    }
    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

/// `string(length | min_length, max_length, charset)`.
pub(crate) fn generate(
    args: &ArgReader<'_>,
    ctx: &mut GenerationContext,
) -> Result<Value, GenerationError> {
    let (min, max) = match args.args().named_values().get("length") {
        Some(_) => {
            let length = args.u64_or("length", usize::MAX, DEFAULT_MIN_LENGTH)?;
            (length, length)
        }
        None => {
            // Inline: string(), string(n), string(min, max)
            let min = args.u64_or("min_length", 0, DEFAULT_MIN_LENGTH)?;
            let has_max = args.value("max_length", 1).is_some();
            let has_min = args.value("min_length", 0).is_some();
            let max = match (has_min, has_max) {
                (true, false) if args.args().named_values().is_empty() => min,
                (_, true) => args.u64_or("max_length", 1, DEFAULT_MAX_LENGTH)?,
                _ => DEFAULT_MAX_LENGTH.max(min),
            };
            (min, max)
        }
    };
    if min > max {
        return Err(args.error(format!(
            "min_length {min} is greater than max_length {max}"
        )));
    }

    let charset = match args.str("chars", usize::MAX)? {
        Some(chars) if chars.is_empty() => return Err(args.error("'chars' must not be empty")),
        Some(chars) => Charset::Custom(chars.chars().collect()),
        None => match args.str("charset", 2)? {
            None => Charset::Alphanumeric,
            Some(name) => Charset::from_name(name)
                .ok_or_else(|| args.error(format!("unknown charset '{name}'")))?,
        },
    };

    let length = ctx.rng().gen_range(min..=max) as usize;
    Ok(Value::String(generate_random_string(
        ctx.rng(),
        length,
        &charset,
    )))
}
