//! Owns an open descriptor on a counter file plus a reusable buffered reader.

use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::Error;

/// An open counter file, rewindable to its start for reuse across samples.
///
/// Not safe for concurrent sampling — callers (profilers) serialize access.
pub struct SourceHandle {
    path: PathBuf,
    reader: BufReader<File>,
}

impl SourceHandle {
    /// Opens `path`, failing with [`Error::Open`] if it cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| Error::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            reader: BufReader::new(file),
        })
    }

    /// Seeks back to offset 0 and discards any buffered bytes, readying the
    /// handle for another full pass.
    pub fn rewind(&mut self) -> Result<(), Error> {
        self.reader
            .seek(SeekFrom::Start(0))
            .map_err(|source| Error::Read {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn reader_mut(&mut self) -> &mut BufReader<File> {
        &mut self.reader
    }

    pub(crate) fn read_error(&self, source: std::io::Error) -> Error {
        Error::Read {
            path: self.path.clone(),
            source,
        }
    }
}
