use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use crate::core::Storage;

/// Byte sink returned by [`JailFS::write`](crate::JailFS::write).
///
/// When the underlying writer fails, the partially written file is removed before the error is
/// returned. The outcome of that removal is kept and can be inspected with [`cleanup`]; the
/// stream refuses further writes afterwards.
///
/// [`cleanup`]: WriteStream::cleanup
pub struct WriteStream<S: Storage> {
    inner: S::Writer,
    storage: Arc<S>,
    path: PathBuf, // host-related absolute path
    cleanup: Option<io::Result<()>>,
}

impl<S: Storage> WriteStream<S> {
    pub(crate) fn new(inner: S::Writer, storage: Arc<S>, path: PathBuf) -> Self {
        Self {
            inner,
            storage,
            path,
            cleanup: None,
        }
    }

    /// Host path of the file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Result of removing the partial file, or `None` while the stream is healthy.
    pub fn cleanup(&self) -> Option<&io::Result<()>> {
        self.cleanup.as_ref()
    }

    /// Consumes the stream and returns the underlying writer.
    pub fn into_inner(self) -> S::Writer {
        self.inner
    }

    fn discard(&mut self, err: io::Error) -> io::Error {
        if err.kind() == io::ErrorKind::Interrupted || self.cleanup.is_some() {
            return err;
        }
        debug!("write to {} failed ({}), removing partial file", self.path.display(), err);
        let outcome = self.storage.remove_file(&self.path);
        if let Err(e) = &outcome {
            warn!("unable to remove partial file {}: {}", self.path.display(), e);
        }
        self.cleanup = Some(outcome);
        err
    }

    fn ensure_usable(&self) -> io::Result<()> {
        match self.cleanup {
            Some(_) => Err(io::Error::other("stream was discarded after a write error")),
            None => Ok(()),
        }
    }
}

impl<S: Storage> Write for WriteStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.ensure_usable()?;
        self.inner.write(buf).map_err(|e| self.discard(e))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ensure_usable()?;
        self.inner.flush().map_err(|e| self.discard(e))
    }
}
