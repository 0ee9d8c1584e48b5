//! Where the control extension is loaded from.

use std::path::{Path, PathBuf};

// ============================================================================
// ExtensionSource
// ============================================================================

/// Location of the control extension.
///
/// ```
/// use vehicle_history_reports::driver::profile::ExtensionSource;
///
/// let source = ExtensionSource::packed("./extension.xpi");
/// assert!(source.is_packed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExtensionSource {
    /// Directory holding `manifest.json`.
    Unpacked(PathBuf),
    /// `.xpi` or `.zip` archive.
    Packed(PathBuf),
}

impl ExtensionSource {
    /// Unpacked directory source.
    #[inline]
    #[must_use]
    pub fn unpacked(path: impl Into<PathBuf>) -> Self {
        Self::Unpacked(path.into())
    }

    /// Archive source.
    #[inline]
    #[must_use]
    pub fn packed(path: impl Into<PathBuf>) -> Self {
        Self::Packed(path.into())
    }

    /// Filesystem path of the source.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Unpacked(path) | Self::Packed(path) => path,
        }
    }

    /// Returns `true` for an archive source.
    #[inline]
    #[must_use]
    pub fn is_packed(&self) -> bool {
        matches!(self, Self::Packed(_))
    }
}

impl From<PathBuf> for ExtensionSource {
    /// Directories are unpacked sources; anything else is an archive.
    fn from(path: PathBuf) -> Self {
        if path.is_dir() {
            Self::Unpacked(path)
        } else {
            Self::Packed(path)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_is_unpacked() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = ExtensionSource::from(dir.path().to_path_buf());
        assert!(!source.is_packed());
        assert_eq!(source.path(), dir.path());
    }

    #[test]
    fn test_missing_path_is_packed() {
        let source = ExtensionSource::from(PathBuf::from("./no-such-extension.xpi"));
        assert!(source.is_packed());
    }
}
