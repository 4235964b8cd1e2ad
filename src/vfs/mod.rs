mod entry;
mod host;
mod jail_fs;
mod options;
mod stream;

pub use entry::{EntryType, FileEntry, Metadata};
pub use host::HostStorage;
pub use jail_fs::JailFS;
pub use options::JailOptions;
pub use stream::WriteStream;
