//! Directory operations.

use std::collections::BTreeSet;

use crate::{FsError, Path};

/// Directory operations for a filesystem.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsDir`.
pub trait FsDir: Send + Sync {
    /// Create a directory (parent must exist).
    ///
    /// # Errors
    ///
    /// - [`FsError::FileExists`] if anything, including a link, is at `path`
    /// - [`FsError::FileNotFound`] (naming the parent) if the parent does not exist
    /// - [`FsError::NotADirectory`] (naming the parent) if the parent is a file
    fn create_directory(&self, path: &Path) -> Result<(), FsError>;

    /// List the names of a directory's children, following links.
    ///
    /// # Errors
    ///
    /// - [`FsError::FileNotFound`] if `path` does not exist
    /// - [`FsError::NotADirectory`] if `path` is, or is under, a file
    /// - [`FsError::SymbolicLoop`] if `path` cannot be resolved
    fn list_directory(&self, path: &Path) -> Result<BTreeSet<String>, FsError>;

    /// Remove an empty directory. Links are never followed.
    ///
    /// # Errors
    ///
    /// - [`FsError::FileNotFound`] if `path` does not exist
    /// - [`FsError::NotADirectory`] if `path` is a file or a link
    /// - [`FsError::DirectoryNotEmpty`] if the directory has children
    fn remove_empty_directory(&self, path: &Path) -> Result<(), FsError>;

    /// Create a fresh, uniquely named directory and return its path.
    fn temporary_directory(&self) -> Result<Path, FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_dir_is_object_safe() {
        fn _check(_: &dyn FsDir) {}
    }

    #[test]
    fn fs_dir_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: FsDir>() {
            _assert_send_sync::<T>();
        }
    }
}
