//! Individual value generators.
//!
//! This module provides the built-in generators, the [`ValueGenerator`]
//! extension point for user generators, and [`ArgReader`], the typed view
//! over a directive's arguments that every generator reads from.

pub mod choice;
pub mod numeric;
pub mod pattern;
pub mod reference;
pub mod string;
pub mod timestamp;
pub mod uuid;

use crate::context::GenerationContext;
use crate::error::GenerationError;
use serde_json::Value;
use template_core::Args;

/// Capability implemented by user-supplied generators.
pub trait ValueGenerator: Send + Sync {
    /// Produce one value from the arguments and the call's context.
    fn generate(
        &self,
        args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError>;
}

/// Typed access to a directive's arguments.
///
/// Every accessor takes the argument's name and its position in the inline
/// form, e.g. `int(min, max)` reads `("min", 0)` and `("max", 1)`.
pub struct ArgReader<'a> {
    generator: &'a str,
    args: &'a Args,
}

impl<'a> ArgReader<'a> {
    /// Wrap the arguments of a call to `generator`.
    pub fn new(generator: &'a str, args: &'a Args) -> Self {
        Self { generator, args }
    }

    /// Name the generator was invoked under.
    pub fn generator(&self) -> &str {
        self.generator
    }

    /// The raw arguments.
    pub fn args(&self) -> &Args {
        self.args
    }

    /// Raw argument value.
    pub fn value(&self, name: &str, position: usize) -> Option<&'a Value> {
        self.args.get(name, position)
    }

    /// Build an [`GenerationError::InvalidArgument`] for this generator.
    pub fn error(&self, message: impl Into<String>) -> GenerationError {
        GenerationError::invalid_argument(self.generator, message)
    }

    /// Optional integer argument.
    pub fn i64(&self, name: &str, position: usize) -> Result<Option<i64>, GenerationError> {
        match self.value(name, position) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => Ok(Some(i)),
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                        Ok(Some(f as i64))
                    }
                    _ => Err(self.error(format!("'{name}' must be an integer, got {n}"))),
                },
            },
            Some(other) => Err(self.error(format!("'{name}' must be an integer, got {other}"))),
        }
    }

    /// Integer argument with a default.
    pub fn i64_or(&self, name: &str, position: usize, default: i64) -> Result<i64, GenerationError> {
        Ok(self.i64(name, position)?.unwrap_or(default))
    }

    /// Non-negative integer argument with a default.
    pub fn u64_or(&self, name: &str, position: usize, default: u64) -> Result<u64, GenerationError> {
        match self.i64(name, position)? {
            None => Ok(default),
            Some(i) => u64::try_from(i)
                .map_err(|_| self.error(format!("'{name}' must not be negative, got {i}"))),
        }
    }

    /// Optional floating point argument.
    pub fn f64(&self, name: &str, position: usize) -> Result<Option<f64>, GenerationError> {
        match self.value(name, position) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.error(format!("'{name}' must be a number, got {n}"))),
            Some(other) => Err(self.error(format!("'{name}' must be a number, got {other}"))),
        }
    }

    /// Floating point argument with a default.
    pub fn f64_or(&self, name: &str, position: usize, default: f64) -> Result<f64, GenerationError> {
        Ok(self.f64(name, position)?.unwrap_or(default))
    }

    /// Optional string argument.
    pub fn str(&self, name: &str, position: usize) -> Result<Option<&'a str>, GenerationError> {
        match self.value(name, position) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.error(format!("'{name}' must be a string, got {other}"))),
        }
    }

    /// Required string argument.
    pub fn required_str(&self, name: &str, position: usize) -> Result<&'a str, GenerationError> {
        self.str(name, position)?
            .ok_or_else(|| self.error(format!("missing required argument '{name}'")))
    }

    /// List argument.
    ///
    /// Accepts a JSON array under `name` (or at `position`), or, in the inline
    /// form, every positional argument from `position` onwards.
    pub fn list(&self, name: &str, position: usize) -> Result<Vec<Value>, GenerationError> {
        match self.value(name, position) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(_) if self.args.named_values().contains_key(name) => {
                Err(self.error(format!("'{name}' must be a list")))
            }
            Some(_) => Ok(self
                .args
                .positional_values()
                .get(position..)
                .unwrap_or_default()
                .to_vec()),
        }
    }
}

/// The closed set of built-in generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Uuid,
    Int,
    Float,
    Bool,
    String,
    Pattern,
    Date,
    Now,
    OneOf,
    Sample,
    Sequence,
    Index,
    Reference,
    Null,
}

impl Builtin {
    /// Registered names, aliases included.
    pub const NAMES: &'static [(&'static str, Builtin)] = &[
        ("uuid", Builtin::Uuid),
        ("int", Builtin::Int),
        ("integer", Builtin::Int),
        ("float", Builtin::Float),
        ("bool", Builtin::Bool),
        ("boolean", Builtin::Bool),
        ("string", Builtin::String),
        ("pattern", Builtin::Pattern),
        ("date", Builtin::Date),
        ("timestamp", Builtin::Date),
        ("now", Builtin::Now),
        ("enum", Builtin::OneOf),
        ("one_of", Builtin::OneOf),
        ("sample", Builtin::Sample),
        ("sequence", Builtin::Sequence),
        ("index", Builtin::Index),
        ("ref", Builtin::Reference),
        ("null", Builtin::Null),
    ];

    /// Generate a value.
    pub fn generate(
        self,
        args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        match self {
            Builtin::Uuid => Ok(uuid::generate_uuid_v4(ctx.rng())),

            Builtin::Int => {
                let min = args.i64_or("min", 0, 0)?;
                let max = args.i64_or("max", 1, i64::from(i32::MAX))?;
                if min > max {
                    return Err(args.error(format!("min {min} is greater than max {max}")));
                }
                Ok(numeric::generate_int_range(ctx.rng(), min, max))
            }

            Builtin::Float => {
                let min = args.f64_or("min", 0, 0.0)?;
                let max = args.f64_or("max", 1, 1.0)?;
                if min > max {
                    return Err(args.error(format!("min {min} is greater than max {max}")));
                }
                let decimals = match args.i64("decimals", 2)? {
                    None => None,
                    Some(d @ 0..=15) => Some(d as i32),
                    Some(d) => return Err(args.error(format!("decimals must be 0..=15, got {d}"))),
                };
                Ok(numeric::generate_float_range(ctx.rng(), min, max, decimals))
            }

            Builtin::Bool => {
                let weight = args.f64_or("true_weight", 0, 0.5)?;
                if !(0.0..=1.0).contains(&weight) {
                    return Err(args.error(format!("true_weight must be in 0..=1, got {weight}")));
                }
                Ok(numeric::generate_weighted_bool(ctx.rng(), weight))
            }

            Builtin::String => string::generate(args, ctx),

            Builtin::Pattern => {
                let pattern = args.required_str("pattern", 0)?;
                let index = ctx.index();
                Ok(Value::String(pattern::generate_pattern(
                    pattern,
                    ctx.rng(),
                    index,
                )))
            }

            Builtin::Date => timestamp::generate(args, ctx),

            Builtin::Now => {
                let format = args.str("format", 0)?;
                timestamp::render(ctx.now(), ctx.time_zone(), format)
                    .map(Value::String)
                    .map_err(|msg| args.error(msg))
            }

            Builtin::OneOf => {
                let values = args.list("values", 0)?;
                choice::generate_one_of(ctx.rng(), &values)
                    .ok_or_else(|| args.error("needs at least one candidate value"))
            }

            Builtin::Sample => {
                let pool = args.list("pool", 0)?;
                let min_length = args.u64_or("min_length", 1, 1)? as usize;
                let max_length = args.u64_or("max_length", 2, min_length.max(3) as u64)? as usize;
                if min_length > max_length {
                    return Err(args.error(format!(
                        "min_length {min_length} is greater than max_length {max_length}"
                    )));
                }
                let unique = matches!(args.value("unique", 3), Some(Value::Bool(true)));
                Ok(if unique {
                    choice::generate_unique_sample_array(ctx.rng(), &pool, min_length, max_length)
                } else {
                    choice::generate_sample_array(ctx.rng(), &pool, min_length, max_length)
                })
            }

            Builtin::Sequence => {
                let start = args.i64_or("start", 0, 0)?;
                let step = args.i64_or("step", 1, 1)?;
                let index = ctx.index() as i64;
                Ok(Value::from(start.wrapping_add(index.wrapping_mul(step))))
            }

            Builtin::Index => Ok(Value::from(ctx.index())),

            Builtin::Reference => reference::generate_reference(args, ctx),

            Builtin::Null => Ok(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenerationOptions;
    use serde_json::{json, Map};

    fn named(pairs: Value) -> Args {
        match pairs {
            Value::Object(map) => Args::named(map),
            _ => Args::named(Map::new()),
        }
    }

    fn run(builtin: Builtin, args: &Args) -> Result<Value, GenerationError> {
        let mut ctx = GenerationContext::new(&GenerationOptions::default().with_seed(42));
        builtin.generate(&ArgReader::new("test", args), &mut ctx)
    }

    #[test]
    fn test_int_bounds() {
        let args = named(json!({"min": 3, "max": 3}));
        assert_eq!(run(Builtin::Int, &args).unwrap(), json!(3));

        let args = named(json!({"min": 5, "max": 1}));
        assert!(matches!(
            run(Builtin::Int, &args),
            Err(GenerationError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_int_rejects_strings() {
        let args = named(json!({"min": "one"}));
        assert!(matches!(
            run(Builtin::Int, &args),
            Err(GenerationError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_float_extreme_bounds() {
        let args = named(json!({"min": -1e308, "max": 1e308}));
        let value = run(Builtin::Float, &args).unwrap();
        assert!((-1e308..=1e308).contains(&value.as_f64().unwrap()));
    }

    #[test]
    fn test_bool_weight_range() {
        let always = named(json!({"true_weight": 1.0}));
        assert_eq!(run(Builtin::Bool, &always).unwrap(), json!(true));

        let invalid = named(json!({"true_weight": 2}));
        assert!(run(Builtin::Bool, &invalid).is_err());
    }

    #[test]
    fn test_one_of_positional_candidates() {
        let args = Args::positional(vec![json!("a"), json!("b")]);
        let value = run(Builtin::OneOf, &args).unwrap();
        assert!(value == json!("a") || value == json!("b"));

        let empty = named(json!({"values": []}));
        assert!(run(Builtin::OneOf, &empty).is_err());
    }

    #[test]
    fn test_sequence_and_index_outside_repeat() {
        let args = named(json!({"start": 100, "step": 5}));
        assert_eq!(run(Builtin::Sequence, &args).unwrap(), json!(100));
        assert_eq!(run(Builtin::Index, &Args::default()).unwrap(), json!(0));
    }

    #[test]
    fn test_null() {
        assert_eq!(run(Builtin::Null, &Args::default()).unwrap(), Value::Null);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = Builtin::NAMES.iter().map(|(name, _)| *name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
