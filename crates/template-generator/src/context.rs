//! Per-call generation state.

use crate::error::GenerationError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use template_core::Path;

/// Prefix of a reference resolved against the innermost repeated element.
pub const RELATIVE_PREFIX: &str = "this.";

/// Options for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Seed for the random source; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Time zone used to render temporal values
    pub time_zone: Tz,
    /// Clock reading used by `now`; `None` reads the system clock once per call
    pub now: Option<DateTime<Utc>>,
    /// Indent the output
    pub pretty: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            seed: None,
            time_zone: Tz::UTC,
            now: None,
            pretty: false,
        }
    }
}

impl GenerationOptions {
    /// Use a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Render temporal values in the given time zone.
    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Pin the clock.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Toggle indented output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Canonical form of a reference argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceKey {
    /// Path from the document root
    Absolute(String),
    /// Path inside the innermost repeated element
    Relative(String),
}

impl ReferenceKey {
    /// Parse a reference such as `users[0].id` or `this.name`.
    pub fn parse(reference: &str) -> Result<Self, GenerationError> {
        match reference.strip_prefix(RELATIVE_PREFIX) {
            Some(rest) => Ok(ReferenceKey::Relative(Path::parse(rest)?.to_string())),
            None => Ok(ReferenceKey::Absolute(Path::parse(reference)?.to_string())),
        }
    }
}

/// Which leaf values must be kept for later references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTargets {
    /// Absolute paths some reference points at
    pub absolute: HashSet<String>,
    /// Whether any reference is relative to a repeated element
    pub relative: bool,
}

/// Scope of one repeated element.
#[derive(Debug)]
struct Frame {
    depth: usize,
    index: u64,
    values: HashMap<String, Value>,
}

/// State carried through one generation call.
///
/// Created at the start of a call and dropped at its end; never shared
/// between calls.
pub struct GenerationContext {
    rng: StdRng,
    time_zone: Tz,
    now: DateTime<Utc>,
    targets: ReferenceTargets,
    recorded: HashMap<String, Value>,
    frames: Vec<Frame>,
}

impl GenerationContext {
    /// Create a context for one call.
    pub fn new(options: &GenerationOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            time_zone: options.time_zone,
            now: options.now.unwrap_or_else(Utc::now),
            targets: ReferenceTargets::default(),
            recorded: HashMap::new(),
            frames: Vec::new(),
        }
    }

    /// Keep the values these references will ask for.
    pub fn with_targets(mut self, targets: ReferenceTargets) -> Self {
        self.targets = targets;
        self
    }

    /// The random source.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Time zone for rendering temporal values.
    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Clock reading for this call.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Index of the innermost repeated element, 0 outside any repeat.
    pub fn index(&self) -> u64 {
        self.frames.last().map_or(0, |frame| frame.index)
    }

    /// Enter element `index` of a repeated array located at `depth`.
    pub fn enter_element(&mut self, depth: usize, index: u64) {
        self.frames.push(Frame {
            depth,
            index,
            values: HashMap::new(),
        });
    }

    /// Leave the innermost repeated element, discarding its scope.
    pub fn leave_element(&mut self) {
        self.frames.pop();
    }

    /// Remember the leaves of `value` if some reference may ask for them.
    ///
    /// Containers (literal objects, sampled arrays) are recorded leaf by
    /// leaf. Every open repeat frame keeps its own relative copy, so an
    /// element can reach values produced inside its nested repeats.
    pub fn record(&mut self, path: &Path, value: &Value) {
        if !self.targets.relative && self.targets.absolute.is_empty() {
            return;
        }
        match value {
            Value::Object(map) => {
                let mut child = path.clone();
                for (key, item) in map {
                    child.push_key(key.as_str());
                    self.record(&child, item);
                    child.pop();
                }
            }
            Value::Array(items) => {
                let mut child = path.clone();
                for (i, item) in items.iter().enumerate() {
                    child.push_index(i);
                    self.record(&child, item);
                    child.pop();
                }
            }
            leaf => self.record_leaf(path, leaf),
        }
    }

    fn record_leaf(&mut self, path: &Path, value: &Value) {
        if self.targets.relative {
            for frame in &mut self.frames {
                frame
                    .values
                    .insert(path.relative_to(frame.depth), value.clone());
            }
        }
        if !self.targets.absolute.is_empty() {
            let key = path.to_string();
            if self.targets.absolute.contains(&key) {
                self.recorded.insert(key, value.clone());
            }
        }
    }

    /// Look up a value produced earlier in this document.
    pub fn lookup(&self, reference: &str) -> Result<Value, GenerationError> {
        let found = match ReferenceKey::parse(reference)? {
            ReferenceKey::Absolute(key) => self.recorded.get(&key),
            ReferenceKey::Relative(key) => match self.frames.last() {
                Some(frame) => frame.values.get(&key),
                None => self.recorded.get(&key),
            },
        };
        found
            .cloned()
            .ok_or_else(|| GenerationError::UnresolvedReference(reference.to_string()))
    }
}
