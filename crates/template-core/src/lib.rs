//! Core types for the json-data-generator engine.
//!
//! This crate provides the parsed form of a JSON template and the small
//! vocabulary shared by everything that walks it:
//!
//! - [`Template`] / [`TemplateNode`] - The parsed template tree
//! - [`Directive`] / [`Args`] - A generator invocation and its arguments
//! - [`CountExpr`] - The cardinality of a repeated array
//! - [`Path`] - Location of a value inside the generated document
//! - [`TemplateError`] - Grammar and cardinality failures
//!
//! # Architecture
//!
//! ```text
//! template-core (this crate)
//!    │
//!    └─── template-generator  (registry, generators, walker, dual sink)
//!             │
//!             └─── json-data-generator (CLI)
//! ```
//!
//! # Example
//!
//! ```rust
//! use template_core::{Template, TemplateNode};
//!
//! let template = Template::parse(r#"{"id": {"$gen": "uuid"}, "name": "fixed"}"#).unwrap();
//! assert!(matches!(template.root(), TemplateNode::Object(fields) if fields.len() == 2));
//! ```

pub mod args;
pub mod error;
pub mod inline;
pub mod path;
pub mod template;

// Re-exports for convenience
pub use args::Args;
pub use error::TemplateError;
pub use path::{Path, PathSegment};
pub use template::{CountExpr, Directive, Segment, Template, TemplateNode};
