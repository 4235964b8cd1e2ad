//! `std::fs` backed storage: the jail maps onto a real directory of the host system.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use crate::core::{Storage, WriteMode};
use crate::{EntryType, Metadata};

/// Storage backend that performs every call on the host filesystem.
///
/// Symlinks are followed by `stat`; the jail does not detect links pointing outside its root.
#[derive(Debug, Default, Copy, Clone)]
pub struct HostStorage;

impl From<&fs::Metadata> for Metadata {
    fn from(meta: &fs::Metadata) -> Self {
        let entry_type = if meta.is_dir() {
            EntryType::Directory
        } else if meta.is_file() {
            EntryType::File
        } else {
            EntryType::Other
        };

        let mut result = Metadata::new(entry_type, meta.len()).with_mode(host_mode(meta));
        if let Ok(modified) = meta.modified() {
            result = result.with_modified(modified);
        }
        result
    }
}

#[cfg(unix)]
fn host_mode(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
fn host_mode(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() { 0o444 } else { 0o666 }
}

impl Storage for HostStorage {
    type Reader = File;
    type Writer = File;

    fn stat(&self, path: &Path) -> io::Result<Metadata> {
        fs::metadata(path).map(|meta| Metadata::from(&meta))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        fs::exists(path)
    }

    fn open_read(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }

    fn open_write(&self, path: &Path, mode: WriteMode) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Truncate => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
        };
        options.open(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    #[cfg(unix)]
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_readonly(mode & 0o222 == 0);
        fs::set_permissions(path, permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempdir::TempDir;

    fn setup_test_env() -> TempDir {
        TempDir::new("host_storage_test").unwrap()
    }

    #[test]
    fn test_stat_reports_type_and_size() {
        let temp_dir = setup_test_env();
        let file = temp_dir.path().join("data.bin");
        fs::write(&file, b"12345").unwrap();

        let meta = HostStorage.stat(&file).unwrap();
        assert!(meta.is_file());
        assert_eq!(meta.len(), 5);
        assert!(meta.modified().is_some());

        let meta = HostStorage.stat(temp_dir.path()).unwrap();
        assert!(meta.is_dir());
    }

    #[test]
    fn test_stat_missing_is_not_found() {
        let temp_dir = setup_test_env();
        let err = HostStorage.stat(&temp_dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_open_write_truncate_and_append() {
        let temp_dir = setup_test_env();
        let file = temp_dir.path().join("log.txt");

        HostStorage
            .open_write(&file, WriteMode::Truncate)
            .unwrap()
            .write_all(b"first")
            .unwrap();
        HostStorage
            .open_write(&file, WriteMode::Append)
            .unwrap()
            .write_all(b" second")
            .unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"first second");

        HostStorage
            .open_write(&file, WriteMode::Truncate)
            .unwrap()
            .write_all(b"third")
            .unwrap();
        let mut content = String::new();
        HostStorage
            .open_read(&file)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "third");
    }

    #[test]
    fn test_read_dir_returns_names() {
        let temp_dir = setup_test_env();
        fs::write(temp_dir.path().join("a.txt"), b"").unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let mut names = HostStorage.read_dir(temp_dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec![OsString::from("a.txt"), OsString::from("sub")]);
    }
}
