//! Template-to-document generation engine.
//!
//! This crate provides the [`JsonDataGenerator`], which expands a JSON
//! template into a document of synthetic values. Generation is seeded, so
//! the same template, seed and options always produce the same bytes.
//!
//! # Architecture
//!
//! ```text
//! template (JSON bytes)
//!        │
//!        ▼
//! ┌──────────────────┐     ┌───────────────────┐
//! │  TemplateWalker  │────►│ DirectiveResolver │──► Registry ──► generators
//! │  (depth-first)   │     └───────────────────┘
//! └────────┬─────────┘
//!          │ tokens
//!          ▼
//!     DualSink ──► caller's writer
//!          │
//!          └─────► returned String
//! ```
//!
//! # Example
//!
//! ```rust
//! use template_generator::{GenerationOptions, JsonDataGenerator, Registry};
//!
//! let registry = Registry::with_builtins();
//! let generator = JsonDataGenerator::new(&registry, GenerationOptions::default().with_seed(42));
//!
//! let mut out = Vec::new();
//! let document = generator
//!     .generate_test_data_json(
//!         r#"{"id": {"$gen": "uuid"}, "tags": {"$repeat": 3, "of": {"$gen": "enum", "values": ["a", "b"]}}}"#.as_bytes(),
//!         &mut out,
//!     )
//!     .unwrap();
//! assert_eq!(document.as_bytes(), out.as_slice());
//! ```
//!
//! # Generators
//!
//! The following generators are built in:
//!
//! - `uuid` - Random UUID v4
//! - `int` / `integer` - Random integer in `min..=max`
//! - `float` - Random float in `min..=max`, optionally rounded to `decimals`
//! - `bool` / `boolean` - Boolean with configurable `true_weight`
//! - `string` - Random string (`length` or `min_length`/`max_length`, `charset` or `chars`)
//! - `pattern` - Pattern strings with placeholders (`{index}`, `{uuid}`, `{rand:N}`)
//! - `date` / `timestamp` - Random instant in `start..=end`, rendered in the active time zone
//! - `now` - The call's clock reading
//! - `enum` / `one_of` - Random selection from `values`
//! - `sample` - Array of random samples from a `pool`
//! - `sequence` - `start + index * step`
//! - `index` - Index of the innermost repeated element
//! - `ref` - Value produced earlier in the document
//! - `null` - Null value
//!
//! Extension packs (`person`, `internet`, `lorem`) are loaded with
//! [`Registry::bootstrap`].

pub mod context;
mod emitter;
pub mod error;
pub mod extensions;
pub mod generator;
pub mod generators;
pub mod registry;
pub mod resolver;
pub mod sink;
pub mod walker;

// Re-exports for convenience
pub use context::{GenerationContext, GenerationOptions};
pub use error::{GenerationError, RegistryError};
pub use generator::JsonDataGenerator;
pub use generators::{ArgReader, ValueGenerator};
pub use registry::{Generator, RegistrationMode, Registry};
pub use sink::DualSink;
pub use walker::{TemplateWalker, WalkState};
