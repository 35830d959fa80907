//! Symbolic link operations.

use crate::{AnyPath, FsError, Metadata, Path};

/// Symbolic link operations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsLink`.
pub trait FsLink: Send + Sync {
    /// Create a symbolic link at `to` pointing at `source`.
    ///
    /// # Arguments
    ///
    /// * `source` - Where the link points; stored as given and need not exist.
    ///   A relative source is resolved from the directory containing the link.
    /// * `to` - The path where the link is created
    ///
    /// # Errors
    ///
    /// - [`FsError::FileExists`] if anything, including a dangling link, is at `to`
    /// - [`FsError::FileNotFound`] (naming the parent) if the parent of `to` does not exist
    /// - [`FsError::NotADirectory`] (naming the parent) if the parent of `to` is a file
    fn link(&self, source: &AnyPath, to: &Path) -> Result<(), FsError>;

    /// Read the source recorded by a link, exactly as it was given.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotASymlink`] if `path` exists but is not a link
    /// - [`FsError::NotADirectory`] if an ancestor of `path` is a file
    /// - [`FsError::FileNotFound`] if `path` does not exist
    fn readlink(&self, path: &Path) -> Result<AnyPath, FsError>;

    /// Get metadata without following a final link.
    ///
    /// # Errors
    ///
    /// - [`FsError::FileNotFound`] if `path` does not exist
    /// - [`FsError::NotADirectory`] if an ancestor of `path` is a file
    fn lstat(&self, path: &Path) -> Result<Metadata, FsError>;

    /// Resolve every link in `path`.
    ///
    /// Missing components are not an error; they are kept as given after
    /// the deepest existing prefix is resolved.
    ///
    /// # Errors
    ///
    /// - [`FsError::SymbolicLoop`] if resolution revisits a link
    fn realpath(&self, path: &Path) -> Result<Path, FsError>;
}
