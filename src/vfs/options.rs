use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Construction options of a jail.
///
/// Both fields default to `/`. Missing fields fall back to their defaults when deserializing,
/// so a host can embed this struct in its own configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JailOptions {
    /// Host directory the jail is confined to. Must be absolute.
    pub root: PathBuf,
    /// Initial working directory, as a virtual path.
    pub cwd: String,
}

impl Default for JailOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            cwd: String::from("/"),
        }
    }
}

impl JailOptions {
    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }

    pub fn with_cwd<S: Into<String>>(mut self, cwd: S) -> Self {
        self.cwd = cwd.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = JailOptions::default();
        assert_eq!(options.root, PathBuf::from("/"));
        assert_eq!(options.cwd, "/");
    }

    #[test]
    fn test_builder() {
        let options = JailOptions::default().with_root("/srv/ftp").with_cwd("/pub");
        assert_eq!(options.root, PathBuf::from("/srv/ftp"));
        assert_eq!(options.cwd, "/pub");
    }

    #[test]
    fn test_deserialize_partial() {
        let options: JailOptions = serde_json::from_str(r#"{"root": "/srv/ftp"}"#).unwrap();
        assert_eq!(options.root, PathBuf::from("/srv/ftp"));
        assert_eq!(options.cwd, "/");

        let options: JailOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, JailOptions::default());
    }
}
