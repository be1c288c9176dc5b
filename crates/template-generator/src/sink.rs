//! Dual sink: streams output to a caller's writer while keeping a copy.

use std::io::{self, BufWriter, Write};

/// Default buffer size for the streaming side.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Writer that forwards every byte to an external sink and mirrors it into
/// an in-memory buffer.
///
/// The external sink is borrowed in spirit: it is flushed by [`finish`]
/// but never closed, so passing a locked standard output or `&mut File`
/// leaves its lifecycle with the caller.
///
/// [`finish`]: DualSink::finish
pub struct DualSink<W: Write> {
    sink: BufWriter<W>,
    mirror: Vec<u8>,
}

impl<W: Write> DualSink<W> {
    /// Wrap an external sink.
    pub fn new(sink: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, sink)
    }

    /// Wrap an external sink with a specific write buffer size.
    pub fn with_capacity(capacity: usize, sink: W) -> Self {
        Self {
            sink: BufWriter::with_capacity(capacity, sink),
            mirror: Vec::new(),
        }
    }

    /// Bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.mirror
    }

    /// Flush the external sink and return everything written as text.
    pub fn finish(mut self) -> io::Result<String> {
        self.sink.flush()?;
        String::from_utf8(self.mirror).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Drop the sink without pushing bytes still held in the write buffer.
    ///
    /// Used when generation fails, so as little of an incomplete document as
    /// possible reaches the external sink.
    pub fn abandon(self) {
        let (_sink, _unflushed) = self.sink.into_parts();
    }
}

impl<W: Write> Write for DualSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.sink.write(buf)?;
        self.mirror.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `limit` bytes per write call.
    struct Trickle {
        data: Vec<u8>,
        limit: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.limit);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_mirror_matches_sink() {
        let mut out = Vec::new();
        let mut sink = DualSink::new(&mut out);
        sink.write_all(b"{\"a\":").unwrap();
        sink.write_all(b"1}").unwrap();
        let text = sink.finish().unwrap();

        assert_eq!(text, "{\"a\":1}");
        assert_eq!(out, text.as_bytes());
    }

    #[test]
    fn test_partial_writes_stay_consistent() {
        let mut trickle = Trickle {
            data: Vec::new(),
            limit: 3,
        };
        let payload = "x".repeat(100);
        let mut sink = DualSink::with_capacity(0, &mut trickle);
        sink.write_all(payload.as_bytes()).unwrap();
        let text = sink.finish().unwrap();

        assert_eq!(text, payload);
        assert_eq!(trickle.data, payload.as_bytes());
    }

    #[test]
    fn test_abandon_discards_buffered_bytes() {
        let mut out = Vec::new();
        let mut sink = DualSink::new(&mut out);
        sink.write_all(b"[1,2,").unwrap();
        sink.abandon();

        assert!(out.is_empty());
    }

    #[test]
    fn test_sink_not_closed() {
        let mut out = Vec::new();
        {
            let sink = DualSink::new(&mut out);
            sink.finish().unwrap();
        }
        // Still usable by the caller afterwards
        out.extend_from_slice(b"more");
        assert_eq!(out, b"more");
    }
}
