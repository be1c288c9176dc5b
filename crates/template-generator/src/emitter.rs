//! Token-level JSON writer used by the walker.
//!
//! Wraps a `serde_json` [`Formatter`] so that objects and arrays can be
//! opened, filled and closed one token at a time instead of serializing a
//! finished tree.

use serde_json::ser::Formatter;
use serde_json::Value;
use std::io::{self, Write};

pub(crate) struct JsonEmitter<W, F> {
    writer: W,
    formatter: F,
}

impl<W: Write, F: Formatter> JsonEmitter<W, F> {
    pub(crate) fn new(writer: W, formatter: F) -> Self {
        Self { writer, formatter }
    }

    pub(crate) fn begin_object(&mut self) -> io::Result<()> {
        self.formatter.begin_object(&mut self.writer)
    }

    /// Write `"key":` ahead of a field value.
    pub(crate) fn object_key(&mut self, key: &str, first: bool) -> io::Result<()> {
        self.formatter.begin_object_key(&mut self.writer, first)?;
        serde_json::to_writer(&mut self.writer, key)?;
        self.formatter.end_object_key(&mut self.writer)?;
        self.formatter.begin_object_value(&mut self.writer)
    }

    pub(crate) fn end_object_value(&mut self) -> io::Result<()> {
        self.formatter.end_object_value(&mut self.writer)
    }

    pub(crate) fn end_object(&mut self) -> io::Result<()> {
        self.formatter.end_object(&mut self.writer)
    }

    pub(crate) fn begin_array(&mut self) -> io::Result<()> {
        self.formatter.begin_array(&mut self.writer)
    }

    pub(crate) fn begin_array_value(&mut self, first: bool) -> io::Result<()> {
        self.formatter.begin_array_value(&mut self.writer, first)
    }

    pub(crate) fn end_array_value(&mut self) -> io::Result<()> {
        self.formatter.end_array_value(&mut self.writer)
    }

    pub(crate) fn end_array(&mut self) -> io::Result<()> {
        self.formatter.end_array(&mut self.writer)
    }

    /// Write a complete value, descending into containers token by token so
    /// indentation stays consistent with the surrounding document.
    pub(crate) fn value(&mut self, value: &Value) -> io::Result<()> {
        match value {
            Value::Object(map) => {
                self.begin_object()?;
                for (i, (key, item)) in map.iter().enumerate() {
                    self.object_key(key, i == 0)?;
                    self.value(item)?;
                    self.end_object_value()?;
                }
                self.end_object()
            }
            Value::Array(items) => {
                self.begin_array()?;
                for (i, item) in items.iter().enumerate() {
                    self.begin_array_value(i == 0)?;
                    self.value(item)?;
                    self.end_array_value()?;
                }
                self.end_array()
            }
            scalar => Ok(serde_json::to_writer(&mut self.writer, scalar)?),
        }
    }
}
