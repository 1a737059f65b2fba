use std::path::PathBuf;

use crate::Version;

/// File inside an installation root recording the build that was installed.
pub const BUILD_RECEIPT_FILE: &str = ".pyvers-build";

/// On-disk evidence that a version is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub version: Version,
    pub root: PathBuf,
    /// Raw build receipt contents, `None` when the receipt is missing or empty.
    pub build_name: Option<String>,
}

impl Installation {
    pub fn build_name(&self) -> Option<&str> {
        self.build_name.as_deref()
    }
}
