//! Depth-first template walker.
//!
//! ```text
//! Start ──► Parsing ──► Resolving ◄──► Emitting ──► Done
//!              │            │             │
//!              └────────────┴─────────────┴──────► Failed
//! ```
//!
//! The template is parsed and checked completely before anything is
//! written. After that each node is resolved and written before its next
//! sibling is looked at, so the output streams out while the walk proceeds.

use crate::context::{GenerationContext, GenerationOptions};
use crate::emitter::JsonEmitter;
use crate::error::GenerationError;
use crate::registry::Registry;
use crate::resolver::DirectiveResolver;
use crate::sink::DualSink;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use std::io::{ErrorKind, Read, Write};
use template_core::{Path, Template, TemplateNode};
use tracing::{debug, trace};

/// Phase of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Start,
    Parsing,
    Resolving,
    Emitting,
    Done,
    Failed,
}

impl WalkState {
    /// True once the walk can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(self, WalkState::Done | WalkState::Failed)
    }
}

/// Walks one template into one document.
pub struct TemplateWalker<'a> {
    resolver: DirectiveResolver<'a>,
    options: &'a GenerationOptions,
    state: WalkState,
}

impl<'a> TemplateWalker<'a> {
    /// Create a walker for a single call.
    pub fn new(registry: &'a Registry, options: &'a GenerationOptions) -> Self {
        Self {
            resolver: DirectiveResolver::new(registry),
            options,
            state: WalkState::Start,
        }
    }

    /// Current phase.
    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Read a template from `source`, stream the generated document to
    /// `sink` and return the same document as a string.
    pub fn run<R: Read, W: Write>(
        &mut self,
        source: R,
        sink: W,
    ) -> Result<String, GenerationError> {
        if self.state != WalkState::Start {
            return Err(GenerationError::Io(std::io::Error::new(
                ErrorKind::Other,
                "template walker has already run",
            )));
        }

        match self.walk_document(source, sink) {
            Ok(document) => {
                self.transition(WalkState::Done);
                Ok(document)
            }
            Err(err) => {
                self.transition(WalkState::Failed);
                debug!("Generation failed: {}", err);
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: WalkState) {
        if self.state != next {
            trace!("Walker {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn walk_document<R: Read, W: Write>(
        &mut self,
        mut source: R,
        sink: W,
    ) -> Result<String, GenerationError> {
        self.transition(WalkState::Parsing);
        let mut text = String::new();
        source.read_to_string(&mut text).map_err(|err| match err.kind() {
            ErrorKind::InvalidData => {
                GenerationError::MalformedTemplate("template is not valid UTF-8".to_string())
            }
            _ => GenerationError::Io(err),
        })?;
        let template = Template::parse(&text)?;
        let targets = self.resolver.prepare(&template)?;

        let mut ctx = GenerationContext::new(self.options).with_targets(targets);
        let mut sink = DualSink::new(sink);

        let result = if self.options.pretty {
            self.emit(&template, &mut ctx, &mut sink, PrettyFormatter::new())
        } else {
            self.emit(&template, &mut ctx, &mut sink, CompactFormatter)
        };

        match result {
            Ok(()) => {
                let document = sink.finish()?;
                debug!("Generated document of {} bytes", document.len());
                Ok(document)
            }
            Err(err) => {
                sink.abandon();
                Err(err)
            }
        }
    }

    fn emit<W: Write, F: Formatter>(
        &mut self,
        template: &Template,
        ctx: &mut GenerationContext,
        sink: &mut DualSink<W>,
        formatter: F,
    ) -> Result<(), GenerationError> {
        let mut emitter = JsonEmitter::new(sink, formatter);
        let mut path = Path::root();
        self.walk(template.root(), &mut path, ctx, &mut emitter)
    }

    fn walk<W: Write, F: Formatter>(
        &mut self,
        node: &TemplateNode,
        path: &mut Path,
        ctx: &mut GenerationContext,
        emitter: &mut JsonEmitter<W, F>,
    ) -> Result<(), GenerationError> {
        match node {
            TemplateNode::Object(fields) => {
                self.transition(WalkState::Emitting);
                emitter.begin_object()?;
                for (i, (key, child)) in fields.iter().enumerate() {
                    emitter.object_key(key, i == 0)?;
                    path.push_key(key.as_str());
                    self.walk(child, path, ctx, emitter)?;
                    path.pop();
                    emitter.end_object_value()?;
                }
                emitter.end_object()?;
            }

            TemplateNode::Array(items) => {
                self.transition(WalkState::Emitting);
                emitter.begin_array()?;
                for (i, child) in items.iter().enumerate() {
                    emitter.begin_array_value(i == 0)?;
                    path.push_index(i);
                    self.walk(child, path, ctx, emitter)?;
                    path.pop();
                    emitter.end_array_value()?;
                }
                emitter.end_array()?;
            }

            TemplateNode::ArrayRepeat { count, element } => {
                self.transition(WalkState::Resolving);
                let count = self.resolver.evaluate_count(count, ctx)?;
                trace!("Repeating '{}' {} times", path, count);

                self.transition(WalkState::Emitting);
                emitter.begin_array()?;
                for i in 0..count {
                    emitter.begin_array_value(i == 0)?;
                    path.push_index(i as usize);
                    ctx.enter_element(path.len(), i);
                    let walked = self.walk(element, path, ctx, emitter);
                    ctx.leave_element();
                    walked?;
                    path.pop();
                    emitter.end_array_value()?;
                }
                emitter.end_array()?;
            }

            leaf => {
                self.transition(WalkState::Resolving);
                let value = self.resolver.resolve_leaf(leaf, ctx)?;
                ctx.record(path, &value);

                self.transition(WalkState::Emitting);
                emitter.value(&value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn run(source: &str) -> (Result<String, GenerationError>, Vec<u8>, WalkState) {
        let registry = Registry::with_builtins();
        let options = GenerationOptions::default().with_seed(42);
        let mut walker = TemplateWalker::new(&registry, &options);
        assert_eq!(walker.state(), WalkState::Start);

        let mut out = Vec::new();
        let result = walker.run(source.as_bytes(), &mut out);
        (result, out, walker.state())
    }

    #[test]
    fn test_done_on_success() {
        let (result, out, state) = run(r#"{"a": [1, {"b": null}], "c": "d"}"#);
        let document = result.unwrap();
        assert_eq!(state, WalkState::Done);
        assert!(state.is_terminal());
        assert_eq!(document.as_bytes(), out.as_slice());
        assert_eq!(
            serde_json::from_str::<Value>(&document).unwrap(),
            json!({"a": [1, {"b": null}], "c": "d"})
        );
    }

    #[test]
    fn test_failed_on_malformed_input() {
        let (result, out, state) = run(r#"{"id": }"#);
        assert!(matches!(result, Err(GenerationError::MalformedTemplate(_))));
        assert_eq!(state, WalkState::Failed);
        assert!(out.is_empty());
    }

    #[test]
    fn test_failed_on_unknown_generator_writes_nothing() {
        let (result, out, state) = run(r#"{"a": 1, "b": {"$gen": "missing"}}"#);
        assert!(matches!(result, Err(GenerationError::UnknownGenerator(_))));
        assert_eq!(state, WalkState::Failed);
        assert!(out.is_empty());
    }

    #[test]
    fn test_walker_runs_once() {
        let registry = Registry::with_builtins();
        let options = GenerationOptions::default();
        let mut walker = TemplateWalker::new(&registry, &options);
        walker.run("1".as_bytes(), std::io::sink()).unwrap();
        assert!(walker.run("1".as_bytes(), std::io::sink()).is_err());
    }

    #[test]
    fn test_repeat_index_and_relative_reference() {
        let (result, _, _) = run(
            r#"{"items": {"$repeat": 3, "of": {"n": "{{index()}}", "label": "item-{{ref('this.n')}}"}}}"#,
        );
        let document: Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(
            document,
            json!({"items": [
                {"n": 0, "label": "item-0"},
                {"n": 1, "label": "item-1"},
                {"n": 2, "label": "item-2"},
            ]})
        );
    }

    #[test]
    fn test_reference_into_nested_repeat() {
        let (result, _, _) = run(
            r#"{"$repeat": 2, "of": {"inner": {"$repeat": 1, "of": {"x": "{{index()}}"}}, "y": {"$ref": "this.inner[0].x"}}}"#,
        );
        let document: Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(
            document,
            json!([
                {"inner": [{"x": 0}], "y": 0},
                {"inner": [{"x": 0}], "y": 0},
            ])
        );
    }

    #[test]
    fn test_reference_into_literal_object() {
        let (result, _, _) = run(r#"{"u": {"$literal": {"id": 5}}, "c": {"$ref": "u.id"}}"#);
        let document: Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(document, json!({"u": {"id": 5}, "c": 5}));
    }

    #[test]
    fn test_dotted_key_is_distinct_from_nested_path() {
        let (result, _, _) = run(
            r#"{"a.b": 1, "a": {"b": 2}, "nested": {"$ref": "a.b"}, "dotted": {"$ref": "a\\.b"}}"#,
        );
        let document: Value = serde_json::from_str(&result.unwrap()).unwrap();
        assert_eq!(document["nested"], json!(2));
        assert_eq!(document["dotted"], json!(1));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let registry = Registry::with_builtins();
        let options = GenerationOptions::default();
        let mut walker = TemplateWalker::new(&registry, &options);
        let bytes: &[u8] = &[b'"', 0xff, b'"'];
        assert!(matches!(
            walker.run(bytes, std::io::sink()),
            Err(GenerationError::MalformedTemplate(_))
        ));
    }
}
