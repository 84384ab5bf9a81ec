//! Incremental line splitting over a chunked byte stream.

use bytes::{Buf, BytesMut};

/// Splits a chunked byte stream into complete `\n`-terminated lines.
///
/// Bytes after the last newline stay buffered until the next chunk arrives,
/// so a line (or a multi-byte UTF-8 sequence inside it) may be split across
/// any number of chunks. `\n` never occurs inside a multi-byte UTF-8
/// sequence, so decoding only complete lines is equivalent to feeding a
/// streaming text decoder.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: BytesMut,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed, without the
    /// terminating `\n`. Invalid UTF-8 is replaced with U+FFFD.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        // Buffered bytes never contain `\n`; only the new chunk is searched.
        let mut from = self.buf.len();
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(rel) = self.buf[from..].iter().position(|b| *b == b'\n') {
            let line = self.buf.split_to(from + rel);
            self.buf.advance(1);
            lines.push(String::from_utf8_lossy(&line).into_owned());
            from = 0;
        }
        lines
    }

    /// Bytes received after the last complete line.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Drop the unterminated remainder, returning it decoded (lossy).
    pub fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let rest = self.buf.split();
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}
