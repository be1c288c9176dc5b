//! Directive resolution.
//!
//! The resolver turns leaf nodes into values and repeat counts into
//! cardinalities, dispatching directives through the [`Registry`]. It also
//! checks a template up front so that unknown generators and malformed
//! references fail before a single byte is written.

use crate::context::{GenerationContext, ReferenceKey, ReferenceTargets};
use crate::error::GenerationError;
use crate::generators::Builtin;
use crate::registry::{Generator, Registry};
use rand::Rng;
use serde_json::Value;
use template_core::template::count_literal;
use template_core::{CountExpr, Directive, Segment, Template, TemplateNode};
use tracing::trace;

/// Resolves directives against a registry.
pub struct DirectiveResolver<'r> {
    registry: &'r Registry,
}

impl<'r> DirectiveResolver<'r> {
    /// Create a resolver over `registry`.
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Invoke the generator a directive names.
    pub fn resolve(
        &self,
        directive: &Directive,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        let generator = self.registry.resolve(&directive.name)?;
        let value = generator.generate(&directive.name, &directive.args, ctx)?;
        trace!("Resolved '{}' to {}", directive.name, value);
        Ok(value)
    }

    /// Produce the value of a leaf node.
    pub fn resolve_leaf(
        &self,
        node: &TemplateNode,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        match node {
            TemplateNode::Literal(value) => Ok(value.clone()),
            TemplateNode::Directive(directive) => self.resolve(directive, ctx),
            TemplateNode::Interpolated(segments) => self.interpolate(segments, ctx),
            TemplateNode::ArrayRepeat { .. } | TemplateNode::Object(_) | TemplateNode::Array(_) => {
                Err(GenerationError::MalformedTemplate(
                    "container node resolved as a leaf".to_string(),
                ))
            }
        }
    }

    /// Render an interpolated string.
    pub fn interpolate(
        &self,
        segments: &[Segment],
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        let mut out = String::new();
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Call(directive) => match self.resolve(directive, ctx)? {
                    Value::String(s) => out.push_str(&s),
                    other => out.push_str(&other.to_string()),
                },
            }
        }
        Ok(Value::String(out))
    }

    /// Evaluate a repeat count.
    pub fn evaluate_count(
        &self,
        count: &CountExpr,
        ctx: &mut GenerationContext,
    ) -> Result<u64, GenerationError> {
        match count {
            CountExpr::Fixed(n) => Ok(*n),
            CountExpr::Range { min, max } => {
                if min > max {
                    return Err(GenerationError::InvalidCardinality(format!(
                        "Repeat range {min}..={max} is empty"
                    )));
                }
                Ok(ctx.rng().gen_range(*min..=*max))
            }
            CountExpr::Generated(directive) => {
                let value = self.resolve(directive, ctx)?;
                Ok(count_literal(&value)?)
            }
        }
    }

    /// Check every directive in `template` and collect reference targets.
    ///
    /// Fails with [`GenerationError::UnknownGenerator`] for unregistered
    /// names and [`GenerationError::MalformedTemplate`] for reference paths
    /// that cannot be parsed.
    pub fn prepare(&self, template: &Template) -> Result<ReferenceTargets, GenerationError> {
        let mut targets = ReferenceTargets::default();
        self.prepare_node(template.root(), 0, &mut targets)?;
        Ok(targets)
    }

    fn prepare_node(
        &self,
        node: &TemplateNode,
        repeat_depth: usize,
        targets: &mut ReferenceTargets,
    ) -> Result<(), GenerationError> {
        match node {
            TemplateNode::Literal(_) => Ok(()),
            TemplateNode::Directive(directive) => {
                self.prepare_directive(directive, repeat_depth, targets)
            }
            TemplateNode::Interpolated(segments) => {
                for segment in segments {
                    if let Segment::Call(directive) = segment {
                        self.prepare_directive(directive, repeat_depth, targets)?;
                    }
                }
                Ok(())
            }
            TemplateNode::ArrayRepeat { count, element } => {
                if let CountExpr::Generated(directive) = count {
                    self.prepare_directive(directive, repeat_depth, targets)?;
                }
                self.prepare_node(element, repeat_depth + 1, targets)
            }
            TemplateNode::Object(fields) => {
                for (_, child) in fields {
                    self.prepare_node(child, repeat_depth, targets)?;
                }
                Ok(())
            }
            TemplateNode::Array(items) => {
                for child in items {
                    self.prepare_node(child, repeat_depth, targets)?;
                }
                Ok(())
            }
        }
    }

    fn prepare_directive(
        &self,
        directive: &Directive,
        repeat_depth: usize,
        targets: &mut ReferenceTargets,
    ) -> Result<(), GenerationError> {
        let generator = self.registry.resolve(&directive.name)?;
        if !matches!(generator, Generator::Builtin(Builtin::Reference)) {
            return Ok(());
        }

        let Some(Value::String(path)) = directive.args.get("path", 0) else {
            return Err(GenerationError::invalid_argument(
                &directive.name,
                "missing required argument 'path'",
            ));
        };
        match ReferenceKey::parse(path)? {
            ReferenceKey::Absolute(key) => {
                targets.absolute.insert(key);
            }
            // Outside any repeat, `this.` is the document itself
            ReferenceKey::Relative(key) if repeat_depth == 0 => {
                targets.absolute.insert(key);
            }
            ReferenceKey::Relative(_) => targets.relative = true,
        }
        Ok(())
    }
}
