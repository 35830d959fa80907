//! File operations.

use crate::{FsError, Handle, Metadata, Mode, Path};

/// File operations for a filesystem.
///
/// All methods use `&self`. Backends manage their own synchronization.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access. Backends should use interior mutability (`RwLock`, `Mutex`)
/// for thread-safe state management.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsFile`.
pub trait FsFile: Send + Sync {
    /// Exclusively create a new file and open it for writing.
    ///
    /// # Errors
    ///
    /// - [`FsError::FileExists`] if anything, including a dangling link, is at `path`
    /// - [`FsError::NotADirectory`] if an ancestor of `path` is a file
    /// - [`FsError::FileNotFound`] if the parent of `path` does not exist
    /// - [`FsError::SymbolicLoop`] (naming the parent) if the parent cannot be resolved
    fn create(&self, path: &Path) -> Result<Handle, FsError>;

    /// Open a file, following links.
    ///
    /// Write and append modes create the file if it is missing, including
    /// at the source of a dangling link. Write mode truncates.
    ///
    /// # Errors
    ///
    /// - [`FsError::FileNotFound`] if `path` (read) or its parent (write) is missing
    /// - [`FsError::NotADirectory`] if an ancestor of `path` is a file
    /// - [`FsError::IsADirectory`] if `path` is a directory
    /// - [`FsError::SymbolicLoop`] if `path` cannot be resolved
    fn open(&self, path: &Path, mode: Mode) -> Result<Handle, FsError>;

    /// Remove a file or link. Links are removed, not followed.
    ///
    /// # Errors
    ///
    /// - [`FsError::FileNotFound`] if `path` does not exist
    /// - [`FsError::NotADirectory`] if an ancestor of `path` is a file
    /// - [`FsError::IsADirectory`] or [`FsError::PermissionError`] if `path`
    ///   is a directory, depending on the platform
    fn remove_file(&self, path: &Path) -> Result<(), FsError>;

    /// Get metadata for a path, following links.
    ///
    /// # Errors
    ///
    /// - [`FsError::FileNotFound`] if `path` does not exist
    /// - [`FsError::NotADirectory`] if an ancestor of `path` is a file
    /// - [`FsError::SymbolicLoop`] if `path` cannot be resolved
    fn stat(&self, path: &Path) -> Result<Metadata, FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_file_is_object_safe() {
        fn _check(_: &dyn FsFile) {}
    }

    #[test]
    fn fs_file_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        fn _check<T: FsFile>() {
            _assert_send_sync::<T>();
        }
    }
}
