//! A jailed virtual file system for Rust.
//! Exposes file and directory operations confined to a root directory, with a per-session
//! current working directory. Intended for servers that accept paths from untrusted clients
//! (FTP-like protocols, upload endpoints) and must never let them leave the jail.
//!
//! ### Overview
//!
//! A [`JailFS`] session turns a virtual path supplied by a client into an absolute host path
//! inside its root, then delegates the call to a [`Storage`] backend. [`HostStorage`] maps the
//! jail onto a real directory via `std::fs`.
//!
//! **Key ideas**:
//! - **Normalization**: backslashes, doubled separators, `.` and `..` are canonicalized before
//!   anything else happens.
//! - **Confinement**: paths are joined with the cwd and anchored at the root by construction,
//!   then checked to still lie under the root.
//! - **Sessions**: each session owns its cwd; `chdir` either succeeds or leaves it untouched.
//! - **Clear errors**: [`JailError`] tells not-found, not-a-directory and storage failures
//!   apart, and only ever mentions virtual paths.
//!
//! ### Example
//!
//! ```no_run
//! use jail_fs::{ErrorKind, JailFS};
//!
//! let mut fs = JailFS::new("/srv/ftp").unwrap();
//! fs.mkdir("/incoming").unwrap();
//! assert_eq!(fs.chdir("incoming").unwrap(), "/incoming");
//!
//! let err = fs.chdir("/missing").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidDirectory);
//! assert_eq!(fs.current_directory(), "/incoming");
//! ```

mod core;
mod vfs;

pub use self::core::{ErrorKind, JailError, Result, Storage, WriteMode, utils};
pub use vfs::{EntryType, FileEntry, HostStorage, JailFS, JailOptions, Metadata, WriteStream};
