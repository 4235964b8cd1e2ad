//! This module provides the jailed file system: a per-session view of a storage backend that is
//! confined to a root directory and tracks its own current working directory.
//!
//! ### Key Features:
//! - **Confinement by construction**: every virtual path is normalized, joined with the cwd and
//!   only then anchored at `root`, so `..` chains collapse before the host path is built.
//! - **Containment check**: the anchored host path must still start with `root`; anything else
//!   is rejected with `EscapesRoot`.
//! - **Hostile input tolerance**: backslashes and doubled separators are accepted and
//!   canonicalized rather than rejected.
//! - **Backend agnostic**: all I/O goes through the `Storage` trait.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, trace};

use crate::core::{JailError, Result, Storage, WriteMode, utils};
use crate::{FileEntry, HostStorage, JailOptions, WriteStream};

/// A jailed file system session.
///
/// `JailFS` resolves caller supplied (virtual) paths against its current working directory,
/// anchors them at the jail root and hands the resulting host paths to a [`Storage`] backend.
///
/// ### Internal state
///
/// * `root` - absolute, normalized host path of the jail. Fixed at construction.
/// * `cwd` - absolute, normalized virtual path (always starts with `/`). Changed only by a
///   successful [`chdir`](JailFS::chdir).
/// * `storage` - the backend, shared with the write streams this session hands out.
///
/// ### Path resolution
///
/// A virtual path is normalized (see [`utils::normalize`]), appended to `cwd` and normalized
/// again. A leading `/` does not reset the lookup to the jail root: `/docs` requested from
/// `/home` resolves to `/home/docs`. Since the joined path is absolute, `..` segments at its top
/// are discarded and can never climb above `root`.
///
/// ### Thread Safety
///
/// Operations that change the session take `&mut self`, so one session can't observe a `chdir`
/// half way through another call. To share a session between threads wrap it in a `Mutex`.
/// Separate sessions share nothing but the (stateless) backend.
///
/// ### Example
///
/// ```no_run
/// use std::io::{Read, Write};
/// use jail_fs::{JailFS, WriteMode};
///
/// let mut fs = JailFS::new("/srv/ftp").unwrap();
/// fs.mkdir("/docs").unwrap();
/// fs.chdir("docs").unwrap();
///
/// fs.write("note.txt", WriteMode::Truncate).unwrap().write_all(b"Hello").unwrap();
///
/// let mut content = String::new();
/// fs.read("note.txt").unwrap().read_to_string(&mut content).unwrap();
/// assert_eq!(content, "Hello");
///
/// // Never leaves /srv/ftp
/// assert!(fs.get("..\\..\\etc\\passwd").is_err());
/// ```
pub struct JailFS<S: Storage = HostStorage> {
    root: PathBuf, // host-related absolute normalized path
    cwd: String,   // inner absolute normalized path
    storage: Arc<S>,
}

impl JailFS<HostStorage> {
    /// Creates a session over the host filesystem, confined to `root`, with cwd `/`.
    /// * `root` must be absolute. It is normalized but not required to exist.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::with_options(HostStorage, JailOptions::default().with_root(root))
    }
}

impl<S: Storage> JailFS<S> {
    /// Creates a session over `storage` with the given options.
    /// Returns `InvalidRoot` if `options.root` is empty or relative.
    pub fn with_options(storage: S, options: JailOptions) -> Result<Self> {
        let root = options.root.as_path();
        if root.as_os_str().is_empty() || !root.has_root() {
            return Err(JailError::InvalidRoot(root.to_path_buf()));
        }

        let root = utils::normalize_host(root);
        let cwd = utils::join("/", &options.cwd);
        debug!("jail at {} (cwd {})", root.display(), cwd);

        Ok(Self {
            root,
            cwd,
            storage: Arc::new(storage),
        })
    }

    /// Returns root path related to the host file system.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Returns current working directory related to the jail root.
    pub fn current_directory(&self) -> &str {
        &self.cwd
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the host path `path` resolves to.
    /// * `path` is a virtual path, relative to the cwd whether or not it starts with `/`.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        self.resolve_inner(path).map(|(_, host)| host)
    }

    fn to_inner(&self, path: &str) -> String {
        utils::join(&self.cwd, &utils::normalize(path))
    }

    fn to_host(&self, inner: &str) -> PathBuf {
        let mut host = self.root.clone();
        for segment in inner.split('/').filter(|s| !s.is_empty()) {
            host.push(segment);
        }
        host
    }

    /// Returns both the inner absolute path and the host path of `path`.
    fn resolve_inner(&self, path: &str) -> Result<(String, PathBuf)> {
        let inner = self.to_inner(path);
        let host = self.to_host(&inner);
        // a segment that the host platform reads as a prefix (`C:` on Windows) replaces `root`
        if !host.starts_with(&self.root) {
            return Err(JailError::EscapesRoot(path.to_string()));
        }
        trace!("resolved {:?} -> {} ({})", path, inner, host.display());
        Ok((inner, host))
    }

    /// Checks if `path` exists in the jail.
    /// Paths that fail to resolve are reported as absent.
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path)
            .and_then(|host| {
                self.storage
                    .exists(&host)
                    .map_err(|e| JailError::from_io(path, e))
            })
            .unwrap_or(false)
    }

    /// Returns the metadata of `name`, labelled with `name` exactly as requested.
    ///
    /// # Errors
    /// * `NotFound` - nothing exists at `name`.
    /// * `Storage` - any other backend failure.
    pub fn get(&self, name: &str) -> Result<FileEntry> {
        let host = self.resolve(name)?;
        let metadata = self
            .storage
            .stat(&host)
            .map_err(|e| JailError::from_io(name, e))?;
        Ok(FileEntry::new(name, metadata))
    }

    /// Lists the immediate children of the directory `path` (`.` or `""` for the cwd).
    ///
    /// Each entry is probed and stat'ed separately; an entry that disappears between the
    /// directory read and its stat is left out instead of failing the whole listing.
    /// Entries are sorted by name.
    ///
    /// # Errors
    /// * `NotFound` - `path` does not exist.
    /// * `NotADirectory` - `path` is not a directory.
    /// * `Storage` - the directory could not be read.
    pub fn list(&self, path: &str) -> Result<Vec<FileEntry>> {
        let host = self.resolve(path)?;
        let metadata = self
            .storage
            .stat(&host)
            .map_err(|e| JailError::from_io(path, e))?;
        if !metadata.is_dir() {
            return Err(JailError::NotADirectory(path.to_string()));
        }

        let names = self
            .storage
            .read_dir(&host)
            .map_err(|e| JailError::from_io(path, e))?;

        let mut entries: Vec<FileEntry> = names
            .into_iter()
            .filter_map(|name| {
                let child = host.join(&name);
                let name = name.to_string_lossy().into_owned();
                match self.storage.exists(&child) {
                    Ok(true) => {}
                    _ => {
                        trace!("skipping vanished entry {}", child.display());
                        return None;
                    }
                }
                match self.storage.stat(&child) {
                    Ok(metadata) => Some(FileEntry::new(name, metadata)),
                    Err(e) => {
                        trace!("skipping {}: {}", child.display(), e);
                        None
                    }
                }
            })
            .collect();
        entries.sort_by(|a, b| a.name().cmp(b.name()));

        Ok(entries)
    }

    /// Changes the current working directory and returns the new one.
    ///
    /// Either the cwd moves to the directory `path` resolves to, or the call fails and the cwd
    /// is left untouched.
    ///
    /// # Errors
    /// * `InvalidDirectory` - `path` does not exist or is not a directory.
    /// * `Storage` - any other backend failure.
    pub fn chdir(&mut self, path: &str) -> Result<&str> {
        let (inner, host) = self.resolve_inner(path)?;
        match self.storage.stat(&host) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(JailError::InvalidDirectory(path.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(JailError::InvalidDirectory(path.to_string()));
            }
            Err(e) => return Err(JailError::from_io(path, e)),
        }

        debug!("cwd {} -> {}", self.cwd, inner);
        self.cwd = inner;
        Ok(self.current_directory())
    }

    /// Opens a byte sink at `name`, creating the file if needed.
    ///
    /// * `WriteMode::Truncate` - existing content is discarded.
    /// * `WriteMode::Append` - existing content is kept, bytes go to the end.
    ///
    /// If a write on the returned stream fails, the partially written file is removed; see
    /// [`WriteStream::cleanup`].
    pub fn write(&self, name: &str, mode: WriteMode) -> Result<WriteStream<S>> {
        let host = self.resolve(name)?;
        let writer = self
            .storage
            .open_write(&host, mode)
            .map_err(|e| JailError::from_io(name, e))?;
        debug!("writing {} ({:?})", host.display(), mode);
        Ok(WriteStream::new(writer, Arc::clone(&self.storage), host))
    }

    /// Opens a byte source at `name`.
    ///
    /// # Errors
    /// * `NotFound` - nothing exists at `name`.
    /// * `CannotReadDirectory` - `name` is a directory.
    pub fn read(&self, name: &str) -> Result<S::Reader> {
        let host = self.resolve(name)?;
        let metadata = self
            .storage
            .stat(&host)
            .map_err(|e| JailError::from_io(name, e))?;
        if metadata.is_dir() {
            return Err(JailError::CannotReadDirectory(name.to_string()));
        }
        self.storage
            .open_read(&host)
            .map_err(|e| JailError::from_io(name, e))
    }

    /// Removes a file or an empty directory.
    ///
    /// # Errors
    /// * `NotFound` - nothing exists at `path`.
    /// * `Storage` - e.g. the directory is not empty.
    pub fn delete(&self, path: &str) -> Result<()> {
        let host = self.resolve(path)?;
        let metadata = self
            .storage
            .stat(&host)
            .map_err(|e| JailError::from_io(path, e))?;
        let removed = if metadata.is_dir() {
            self.storage.remove_dir(&host)
        } else {
            self.storage.remove_file(&host)
        };
        removed.map_err(|e| JailError::from_io(path, e))?;
        debug!("deleted {}", host.display());
        Ok(())
    }

    /// Creates a single directory and returns its host path.
    /// The parent must exist and the entry must not.
    pub fn mkdir(&self, path: &str) -> Result<PathBuf> {
        let host = self.resolve(path)?;
        self.storage
            .create_dir(&host)
            .map_err(|e| JailError::from_io(path, e))?;
        debug!("created directory {}", host.display());
        Ok(host)
    }

    /// Renames `from` to `to`; both are resolved against the cwd.
    pub fn rename(&self, from: &str, to: &str) -> Result<()> {
        let from_host = self.resolve(from)?;
        let to_host = self.resolve(to)?;
        self.storage
            .rename(&from_host, &to_host)
            .map_err(|e| JailError::from_io(&format!("{from} -> {to}"), e))?;
        debug!("renamed {} -> {}", from_host.display(), to_host.display());
        Ok(())
    }

    /// Sets the permission bits of `path`.
    /// `mode` may hold the permission, setuid, setgid and sticky bits (`0o7777` at most).
    pub fn chmod(&self, path: &str, mode: u32) -> Result<()> {
        if mode > 0o7777 {
            return Err(JailError::InvalidMode(mode));
        }
        let host = self.resolve(path)?;
        self.storage
            .set_mode(&host, mode)
            .map_err(|e| JailError::from_io(path, e))
    }

    /// Returns an opaque, collision resistant alphanumeric token.
    pub fn unique_name(&self) -> String {
        utils::unique_name()
    }
}
