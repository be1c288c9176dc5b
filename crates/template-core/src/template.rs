//! Parsed template tree.
//!
//! A template is ordinary JSON in which some nodes are generation
//! directives. Parsing classifies every node once so the walker never has to
//! re-inspect raw JSON:
//!
//! | JSON                                   | Node             |
//! |----------------------------------------|------------------|
//! | `{"$gen": "int", "min": 1}`            | `Directive`      |
//! | `{"$ref": "user.id"}`                  | `Directive(ref)` |
//! | `{"$repeat": 3, "of": {...}}`          | `ArrayRepeat`    |
//! | `["{{repeat(2, 5)}}", {...}]`          | `ArrayRepeat`    |
//! | `{"$literal": {...}}`                  | `Literal`        |
//! | `"{{uuid()}}"`                         | `Directive`      |
//! | `"id-{{int(1, 9)}}"`                   | `Interpolated`   |
//! | anything else                          | literal / container |

use crate::args::Args;
use crate::error::TemplateError;
use crate::inline::parse_inline;
use serde_json::{Map, Value};
use std::io::Read;
use std::str::FromStr;

/// Object key introducing a generator call.
pub const GEN_KEY: &str = "$gen";
/// Object key introducing a cross-field reference.
pub const REF_KEY: &str = "$ref";
/// Object key introducing a repeated array.
pub const REPEAT_KEY: &str = "$repeat";
/// Element template of a `$repeat` object.
pub const REPEAT_OF_KEY: &str = "of";
/// Object key wrapping a value that must be emitted verbatim.
pub const LITERAL_KEY: &str = "$literal";
/// Inline call name introducing a repeated array.
pub const REPEAT_CALL: &str = "repeat";
/// Generator name used for `$ref` shorthands.
pub const REF_GENERATOR: &str = "ref";

/// A generator invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Registered generator name
    pub name: String,
    /// Literal arguments
    pub args: Args,
}

impl Directive {
    /// Create a new directive.
    pub fn new(name: impl Into<String>, args: Args) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Part of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text copied as is
    Text(String),
    /// Call whose result is rendered into the string
    Call(Directive),
}

/// How many elements a repeated array has.
#[derive(Debug, Clone, PartialEq)]
pub enum CountExpr {
    /// Exactly N elements
    Fixed(u64),
    /// Uniformly chosen in `min..=max`
    Range { min: u64, max: u64 },
    /// Produced by a generator at run time
    Generated(Directive),
}

/// One node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Emitted unchanged
    Literal(Value),
    /// Replaced by a generated value
    Directive(Directive),
    /// String with embedded calls
    Interpolated(Vec<Segment>),
    /// Array of `count` independently generated elements
    ArrayRepeat {
        count: CountExpr,
        element: Box<TemplateNode>,
    },
    /// Fields in declaration order
    Object(Vec<(String, TemplateNode)>),
    /// Elements in declaration order
    Array(Vec<TemplateNode>),
}

impl TemplateNode {
    /// Classify a JSON value.
    pub fn from_value(value: Value) -> Result<Self, TemplateError> {
        match value {
            Value::String(s) => match parse_inline(&s)? {
                None => Ok(TemplateNode::Literal(Value::String(s))),
                Some(mut segments) => {
                    if segments.len() == 1 {
                        if let Some(Segment::Call(directive)) = segments.pop() {
                            if directive.name == REPEAT_CALL {
                                return Err(TemplateError::Malformed(
                                    "repeat() is only valid as the first element of an array"
                                        .to_string(),
                                ));
                            }
                            return Ok(TemplateNode::Directive(directive));
                        }
                    }
                    Ok(TemplateNode::Interpolated(segments))
                }
            },
            Value::Array(items) => parse_array(items),
            Value::Object(map) => parse_object(map),
            scalar => Ok(TemplateNode::Literal(scalar)),
        }
    }

    /// True for nodes that produce a single value in one step.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            TemplateNode::Literal(_) | TemplateNode::Directive(_) | TemplateNode::Interpolated(_)
        )
    }
}

fn parse_array(items: Vec<Value>) -> Result<TemplateNode, TemplateError> {
    if let Some(Value::String(first)) = items.first() {
        if let Some(count) = inline_repeat(first)? {
            if items.len() != 2 {
                return Err(TemplateError::Malformed(format!(
                    "repeat() array must contain exactly one element template, found {}",
                    items.len() - 1
                )));
            }
            let element = items.into_iter().nth(1).unwrap_or(Value::Null);
            return Ok(TemplateNode::ArrayRepeat {
                count,
                element: Box::new(TemplateNode::from_value(element)?),
            });
        }
    }

    items
        .into_iter()
        .map(TemplateNode::from_value)
        .collect::<Result<Vec<_>, _>>()
        .map(TemplateNode::Array)
}

/// Recognise `{{repeat(n)}}` / `{{repeat(min, max)}}`.
fn inline_repeat(s: &str) -> Result<Option<CountExpr>, TemplateError> {
    let Some(segments) = parse_inline(s)? else {
        return Ok(None);
    };
    match segments.as_slice() {
        [Segment::Call(directive)] if directive.name == REPEAT_CALL => {
            match directive.args.positional_values() {
                [count] => parse_count(count.clone()).map(Some),
                [min, max] => parse_count(Value::Array(vec![min.clone(), max.clone()])).map(Some),
                other => Err(TemplateError::InvalidCardinality(format!(
                    "repeat() takes one or two arguments, got {}",
                    other.len()
                ))),
            }
        }
        _ => Ok(None),
    }
}

fn parse_object(mut map: Map<String, Value>) -> Result<TemplateNode, TemplateError> {
    if map.contains_key(LITERAL_KEY) {
        if map.len() != 1 {
            return Err(TemplateError::Malformed(format!(
                "'{LITERAL_KEY}' cannot be combined with other keys"
            )));
        }
        let value = map.shift_remove(LITERAL_KEY).unwrap_or(Value::Null);
        return Ok(TemplateNode::Literal(value));
    }

    if let Some(name) = map.shift_remove(GEN_KEY) {
        let Value::String(name) = name else {
            return Err(TemplateError::Malformed(format!(
                "'{GEN_KEY}' must name a generator, got {name}"
            )));
        };
        return Ok(TemplateNode::Directive(Directive::new(name, Args::named(map))));
    }

    if let Some(path) = map.shift_remove(REF_KEY) {
        if !map.is_empty() {
            return Err(TemplateError::Malformed(format!(
                "'{REF_KEY}' cannot be combined with other keys"
            )));
        }
        let Value::String(path) = path else {
            return Err(TemplateError::Malformed(format!(
                "'{REF_KEY}' must be a path string, got {path}"
            )));
        };
        return Ok(TemplateNode::Directive(Directive::new(
            REF_GENERATOR,
            Args::positional(vec![Value::String(path)]),
        )));
    }

    if let Some(count) = map.shift_remove(REPEAT_KEY) {
        let element = map.shift_remove(REPEAT_OF_KEY).ok_or_else(|| {
            TemplateError::Malformed(format!("'{REPEAT_KEY}' requires an '{REPEAT_OF_KEY}' key"))
        })?;
        if let Some(extra) = map.keys().next() {
            return Err(TemplateError::Malformed(format!(
                "Unexpected key '{extra}' next to '{REPEAT_KEY}'"
            )));
        }
        return Ok(TemplateNode::ArrayRepeat {
            count: parse_count(count)?,
            element: Box::new(TemplateNode::from_value(element)?),
        });
    }

    map.into_iter()
        .map(|(key, value)| TemplateNode::from_value(value).map(|node| (key, node)))
        .collect::<Result<Vec<_>, _>>()
        .map(TemplateNode::Object)
}

fn parse_count(value: Value) -> Result<CountExpr, TemplateError> {
    match value {
        Value::Array(bounds) => match bounds.as_slice() {
            [min, max] => {
                let min = count_literal(min)?;
                let max = count_literal(max)?;
                if min > max {
                    return Err(TemplateError::InvalidCardinality(format!(
                        "Repeat range {min}..={max} is empty"
                    )));
                }
                Ok(CountExpr::Range { min, max })
            }
            _ => Err(TemplateError::InvalidCardinality(
                "Repeat range must be [min, max]".to_string(),
            )),
        },
        Value::Object(map) if map.contains_key(GEN_KEY) => match parse_object(map)? {
            TemplateNode::Directive(directive) => Ok(CountExpr::Generated(directive)),
            _ => Err(TemplateError::InvalidCardinality(
                "Repeat count must be a number or a generator".to_string(),
            )),
        },
        other => count_literal(&other).map(CountExpr::Fixed),
    }
}

/// Interpret a literal repeat count.
pub fn count_literal(value: &Value) -> Result<u64, TemplateError> {
    let invalid = || {
        TemplateError::InvalidCardinality(format!(
            "Repeat count {value} is not a non-negative integer"
        ))
    };
    match value {
        Value::Number(n) => {
            if let Some(count) = n.as_u64() {
                Ok(count)
            } else if let Some(f) = n.as_f64() {
                if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
                    Ok(f as u64)
                } else {
                    Err(invalid())
                }
            } else {
                Err(invalid())
            }
        }
        Value::String(s) => s.trim().parse::<u64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// A parsed template, ready to be walked.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    root: TemplateNode,
}

impl Template {
    /// Parse a template from JSON text.
    pub fn parse(s: &str) -> Result<Self, TemplateError> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_value(value)
    }

    /// Parse a template from a reader positioned at the start of the JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TemplateError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Classify an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, TemplateError> {
        Ok(Self {
            root: TemplateNode::from_value(value)?,
        })
    }

    /// The root node.
    pub fn root(&self) -> &TemplateNode {
        &self.root
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: Value) -> TemplateNode {
        TemplateNode::from_value(value).unwrap()
    }

    #[test]
    fn test_literal_document() {
        let template = Template::parse(r#"{"name": "literal-value", "n": 1, "ok": true}"#).unwrap();
        assert_eq!(
            template.root(),
            &TemplateNode::Object(vec![
                ("name".to_string(), TemplateNode::Literal(json!("literal-value"))),
                ("n".to_string(), TemplateNode::Literal(json!(1))),
                ("ok".to_string(), TemplateNode::Literal(json!(true))),
            ])
        );
    }

    #[test]
    fn test_field_order_preserved() {
        let template = Template::parse(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let TemplateNode::Object(fields) = template.root() else {
            panic!("Expected object");
        };
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_gen_directive_named_args() {
        let parsed = node(json!({"$gen": "int", "min": 1, "max": 5}));
        let TemplateNode::Directive(directive) = parsed else {
            panic!("Expected directive");
        };
        assert_eq!(directive.name, "int");
        assert_eq!(directive.args.get("min", 0), Some(&json!(1)));
        assert_eq!(directive.args.get("max", 1), Some(&json!(5)));
    }

    #[test]
    fn test_gen_must_be_string() {
        assert!(matches!(
            TemplateNode::from_value(json!({"$gen": 3})),
            Err(TemplateError::Malformed(_))
        ));
    }

    #[test]
    fn test_ref_shorthand() {
        let parsed = node(json!({"$ref": "user.id"}));
        assert_eq!(
            parsed,
            TemplateNode::Directive(Directive::new(
                REF_GENERATOR,
                Args::positional(vec![json!("user.id")])
            ))
        );
    }

    #[test]
    fn test_repeat_object() {
        let parsed = node(json!({"$repeat": 3, "of": {"$gen": "uuid"}}));
        let TemplateNode::ArrayRepeat { count, element } = parsed else {
            panic!("Expected repeat");
        };
        assert_eq!(count, CountExpr::Fixed(3));
        assert!(matches!(*element, TemplateNode::Directive(_)));
    }

    #[test]
    fn test_repeat_counts() {
        let count = |v: Value| match node(json!({"$repeat": v, "of": 1})) {
            TemplateNode::ArrayRepeat { count, .. } => count,
            other => panic!("Expected repeat, got {other:?}"),
        };
        assert_eq!(count(json!("4")), CountExpr::Fixed(4));
        assert_eq!(count(json!(2.0)), CountExpr::Fixed(2));
        assert_eq!(count(json!([1, 3])), CountExpr::Range { min: 1, max: 3 });
        assert!(matches!(
            count(json!({"$gen": "int", "min": 0, "max": 2})),
            CountExpr::Generated(_)
        ));
    }

    #[test]
    fn test_invalid_cardinality() {
        for bad in [json!(-1), json!(2.5), json!("many"), json!(null), json!([3, 1])] {
            let result = TemplateNode::from_value(json!({"$repeat": bad, "of": 1}));
            assert!(
                matches!(result, Err(TemplateError::InvalidCardinality(_))),
                "expected invalid cardinality for {bad}"
            );
        }
    }

    #[test]
    fn test_repeat_requires_of() {
        assert!(matches!(
            TemplateNode::from_value(json!({"$repeat": 2})),
            Err(TemplateError::Malformed(_))
        ));
        assert!(matches!(
            TemplateNode::from_value(json!({"$repeat": 2, "of": 1, "extra": 0})),
            Err(TemplateError::Malformed(_))
        ));
    }

    #[test]
    fn test_inline_repeat_array() {
        let parsed = node(json!(["{{repeat(2, 4)}}", {"id": "{{index()}}"}]));
        let TemplateNode::ArrayRepeat { count, element } = parsed else {
            panic!("Expected repeat");
        };
        assert_eq!(count, CountExpr::Range { min: 2, max: 4 });
        assert!(matches!(*element, TemplateNode::Object(_)));

        assert!(matches!(
            TemplateNode::from_value(json!(["{{repeat(2)}}", 1, 2])),
            Err(TemplateError::Malformed(_))
        ));
        assert!(matches!(
            TemplateNode::from_value(json!("{{repeat(2)}}")),
            Err(TemplateError::Malformed(_))
        ));
    }

    #[test]
    fn test_literal_escape() {
        let parsed = node(json!({"$literal": {"$gen": "not-a-call"}}));
        assert_eq!(parsed, TemplateNode::Literal(json!({"$gen": "not-a-call"})));
    }

    #[test]
    fn test_inline_and_interpolated_strings() {
        assert!(matches!(node(json!("{{uuid()}}")), TemplateNode::Directive(_)));
        assert!(matches!(
            node(json!("id-{{int(1, 9)}}")),
            TemplateNode::Interpolated(_)
        ));
        assert_eq!(node(json!("plain")), TemplateNode::Literal(json!("plain")));
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(node(json!({})), TemplateNode::Object(vec![]));
        assert_eq!(node(json!([])), TemplateNode::Array(vec![]));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Template::parse(r#"{"id": }"#),
            Err(TemplateError::Malformed(_))
        ));
        assert!(matches!(
            Template::from_reader("".as_bytes()),
            Err(TemplateError::Malformed(_))
        ));
    }
}
