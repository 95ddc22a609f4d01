use std::path::{Path, PathBuf};

/// Where the native binding lives locally and where it is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryDescriptor {
    pub path: PathBuf,
    pub url: String,
}

impl BinaryDescriptor {
    pub fn directory(&self) -> Option<&Path> {
        self.path.parent().filter(|parent| !parent.as_os_str().is_empty())
    }
}
