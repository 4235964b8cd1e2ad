use std::time::SystemTime;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
    /// Anything that is neither a regular file nor a directory (fifo, socket, device).
    Other,
}

/// Storage metadata of a single entry, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    entry_type: EntryType,
    len: u64,
    modified: Option<SystemTime>,
    mode: u32,
}

impl Metadata {
    pub fn new(entry_type: EntryType, len: u64) -> Metadata {
        Metadata {
            entry_type,
            len,
            modified: None,
            mode: 0,
        }
    }

    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Permission bits (and file type bits where the platform reports them).
    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}

/// Backend metadata paired with the name the caller asked for.
///
/// For `get` the name is the requested virtual path verbatim; for `list` it is the bare name of
/// the directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    name: String,
    metadata: Metadata,
}

impl FileEntry {
    pub fn new<S: Into<String>>(name: S, metadata: Metadata) -> FileEntry {
        FileEntry {
            name: name.into(),
            metadata,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn len(&self) -> u64 {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.metadata.modified()
    }

    pub fn mode(&self) -> u32 {
        self.metadata.mode()
    }

    pub fn is_file(&self) -> bool {
        self.metadata.is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_entry_delegates_to_metadata() {
        let now = SystemTime::now();
        let entry = FileEntry::new(
            "notes.txt",
            Metadata::new(EntryType::File, 42)
                .with_modified(now)
                .with_mode(0o644),
        );

        assert_eq!(entry.name(), "notes.txt");
        assert_eq!(entry.len(), 42);
        assert!(!entry.is_empty());
        assert_eq!(entry.modified(), Some(now));
        assert_eq!(entry.mode(), 0o644);
        assert!(entry.is_file());
        assert!(!entry.is_dir());
    }

    #[test]
    fn test_directory_metadata() {
        let meta = Metadata::new(EntryType::Directory, 0);
        assert!(meta.is_dir());
        assert!(!meta.is_file());
        assert_eq!(meta.modified(), None);
        assert_eq!(meta.entry_type(), EntryType::Directory);
    }
}
