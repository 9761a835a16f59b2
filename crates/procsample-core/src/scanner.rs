//! Line-at-a-time reading over a [`SourceHandle`] with a single reused buffer.

use std::io::BufRead;

use crate::source::SourceHandle;
use crate::Error;

/// Reads successive `\n`-terminated lines from a source, reusing one
/// allocation for the lifetime of the scanner.
///
/// The trailing newline is stripped; a final unterminated line (EOF without
/// `\n`) is still returned.
pub struct LineScanner {
    buf: Vec<u8>,
}

impl LineScanner {
    pub fn new() -> Self {
        Self { buf: Vec::with_capacity(256) }
    }

    /// Reads the next line into the internal buffer and returns it, or
    /// `None` at EOF.
    pub fn next_line<'a>(&'a mut self, source: &mut SourceHandle) -> Result<Option<&'a [u8]>, Error> {
        self.buf.clear();
        let n = source
            .reader_mut()
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| source.read_error(e))?;
        if n == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(&self.buf[..]))
    }
}

impl Default for LineScanner {
    fn default() -> Self {
        Self::new()
    }
}
