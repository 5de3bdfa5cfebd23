//! Synchronous file-access collaborator.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Synchronous file access backing one open handle.
///
/// Implementations are not required to be internally synchronized; the
/// registry serializes access per handle.
pub trait FileProvider: Send {
    /// Total length of the file in bytes.
    fn len(&self) -> u64;

    /// Whether the file has zero length.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the read cursor to an absolute byte offset.
    ///
    /// Seeking past the end is not an error; the next read returns zero
    /// bytes and reports end-of-stream.
    fn seek(&mut self, offset: u64) -> io::Result<()>;

    /// Read up to `buf.len()` bytes at the current cursor, returning the
    /// count actually read. A short read means the end of the file was
    /// reached, not a failure.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Whether the cursor sits at or past the end of the file.
    fn at_end(&self) -> bool;
}

/// [`FileProvider`] over a regular file on disk.
pub struct StdFileProvider {
    file: File,
    len: u64,
    pos: u64,
}

impl StdFileProvider {
    /// Open a file for reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self { file, len, pos: 0 })
    }
}

impl FileProvider for StdFileProvider {
    fn len(&self) -> u64 {
        self.len
    }

    fn seek(&mut self, offset: u64) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut total = 0;
        while total < buf.len() {
            match self.file.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.pos += total as u64;
        Ok(total)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.len
    }
}
