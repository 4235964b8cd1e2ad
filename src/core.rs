use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::Path;

mod error;
pub mod utils;

pub use error::{ErrorKind, JailError};

use crate::Metadata;

/// How a write stream treats an existing file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Create the file or cut it to zero length.
    #[default]
    Truncate,
    /// Create the file or keep its content and write at the end.
    Append,
}

/// Primitive storage calls a jail delegates to.
///
/// Every `path` handed to a backend is an absolute host path that has already been resolved
/// and confined to the jail root. Backends only perform the call; they never see virtual paths.
pub trait Storage {
    type Reader: Read;
    type Writer: Write;

    fn stat(&self, path: &Path) -> io::Result<Metadata>;
    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;
    fn exists(&self, path: &Path) -> io::Result<bool>;
    fn open_read(&self, path: &Path) -> io::Result<Self::Reader>;
    fn open_write(&self, path: &Path, mode: WriteMode) -> io::Result<Self::Writer>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
    fn create_dir(&self, path: &Path) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()>;
}

pub type Result<T> = std::result::Result<T, JailError>;
