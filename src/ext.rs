//! # Extension Traits
//!
//! Derived operations built only from the primitives in [`Filesystem`].
//!
//! ## Overview
//!
//! [`FilesystemExt`] is blanket-implemented for every backend, so derived
//! operations behave identically everywhere.
//!
//! ## Available Methods
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`exists`](FilesystemExt::exists) | Whether anything resolves at the path |
//! | [`is_dir`](FilesystemExt::is_dir) / [`is_file`](FilesystemExt::is_file) | Type checks, following links |
//! | [`is_link`](FilesystemExt::is_link) | Whether the path itself is a link |
//! | [`touch`](FilesystemExt::touch) | Create or truncate a file |
//! | [`children`](FilesystemExt::children) / [`glob_children`](FilesystemExt::glob_children) | Child paths |
//! | [`get_contents`](FilesystemExt::get_contents) / [`get_text`](FilesystemExt::get_text) | Read a whole file |
//! | [`set_contents`](FilesystemExt::set_contents) / [`create_with_contents`](FilesystemExt::create_with_contents) | Write a whole file |
//! | [`remove`](FilesystemExt::remove) / [`removing`](FilesystemExt::removing) | Recursive removal |
//! | [`create_directory_with`](FilesystemExt::create_directory_with) | `mkdir -p` style creation |
//!
//! ## JSON Support (Feature-Gated)
//!
//! With the `serde` feature enabled, [`FilesystemJson`] adds `read_json` and
//! `write_json`.

use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::ops::Deref;

use tracing::warn;

use crate::{CreateDirectory, Filesystem, FsError, Glob, Mode, Path};

/// Derived operations for any filesystem backend.
///
/// # Example
///
/// ```rust
/// use filesystems::{FilesystemExt, FsDir, MemoryFs, Path};
///
/// let fs = MemoryFs::new();
/// let tempdir = fs.temporary_directory().unwrap();
/// let _cleanup = fs.removing(tempdir.clone());
///
/// let config = &tempdir / "config";
/// fs.set_contents(&config, b"answer = 42").unwrap();
/// assert!(fs.is_file(&config).unwrap());
/// assert_eq!(fs.children(&tempdir).unwrap().into_iter().collect::<Vec<_>>(), [config]);
/// ```
pub trait FilesystemExt: Filesystem {
    /// Whether anything resolves at `path`, following links.
    ///
    /// Missing paths and paths under files are `Ok(false)`.
    ///
    /// # Errors
    ///
    /// - [`FsError::SymbolicLoop`] if `path` cannot be resolved
    fn exists(&self, path: &Path) -> Result<bool, FsError> {
        absent_is_false(self.stat(path).map(|_| true))
    }

    /// Whether `path` resolves to a directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::SymbolicLoop`] if `path` cannot be resolved
    fn is_dir(&self, path: &Path) -> Result<bool, FsError> {
        absent_is_false(self.stat(path).map(|m| m.is_dir()))
    }

    /// Whether `path` resolves to a regular file.
    ///
    /// # Errors
    ///
    /// - [`FsError::SymbolicLoop`] if `path` cannot be resolved
    fn is_file(&self, path: &Path) -> Result<bool, FsError> {
        absent_is_false(self.stat(path).map(|m| m.is_file()))
    }

    /// Whether `path` itself is a symbolic link, dangling or not.
    fn is_link(&self, path: &Path) -> Result<bool, FsError> {
        absent_is_false(self.lstat(path).map(|m| m.is_symlink()))
    }

    /// Open `path` for writing and close it again.
    fn touch(&self, path: &Path) -> Result<(), FsError> {
        self.open(path, Mode::WRITE).map(drop)
    }

    /// The full paths of every child of `path`.
    fn children(&self, path: &Path) -> Result<BTreeSet<Path>, FsError> {
        Ok(self
            .list_directory(path)?
            .into_iter()
            .map(|name| path.join(name))
            .collect())
    }

    /// The children of `path` whose names match `glob`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidGlob`] if `glob` does not compile
    /// - anything [`list_directory`](crate::FsDir::list_directory) raises
    fn glob_children(&self, path: &Path, glob: &str) -> Result<BTreeSet<Path>, FsError> {
        let glob = Glob::new(glob)?;
        Ok(self
            .list_directory(path)?
            .into_iter()
            .filter(|name| glob.is_match(name))
            .map(|name| path.join(name))
            .collect())
    }

    /// Read the whole file as bytes.
    fn get_contents(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        let mut contents = Vec::new();
        self.open(path, Mode::READ)?
            .read_to_end(&mut contents)
            .map_err(|source| io_error(path, source))?;
        Ok(contents)
    }

    /// Read the whole file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// - [`FsError::Io`] if the contents are not valid UTF-8
    fn get_text(&self, path: &Path) -> Result<String, FsError> {
        let mut contents = String::new();
        self.open(path, Mode::READ.text())?
            .read_to_string(&mut contents)
            .map_err(|source| io_error(path, source))?;
        Ok(contents)
    }

    /// Replace the file's contents, creating it if needed.
    fn set_contents(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        self.open(path, Mode::WRITE)?
            .write_all(contents)
            .map_err(|source| io_error(path, source))
    }

    /// Exclusively create a file holding `contents`.
    ///
    /// # Errors
    ///
    /// - [`FsError::FileExists`] if anything is already at `path`
    fn create_with_contents(&self, path: &Path, contents: &[u8]) -> Result<(), FsError> {
        self.create(path)?
            .write_all(contents)
            .map_err(|source| io_error(path, source))
    }

    /// Remove `path` and, for a real directory, everything below it.
    ///
    /// Links to directories are removed without touching their targets.
    /// Removal is not atomic: on error, whatever was removed stays removed.
    fn remove(&self, path: &Path) -> Result<(), FsError> {
        let is_real_directory = self.lstat(path).is_ok_and(|m| m.is_dir());
        if !is_real_directory {
            return self.remove_file(path);
        }

        for child in self.children(path)? {
            self.remove(&child)?;
        }
        self.remove_empty_directory(path)
    }

    /// Remove `path` when the returned guard is dropped.
    ///
    /// Failures during the drop cannot be returned, so they are logged.
    fn removing(&self, path: Path) -> Removing<'_, Self> {
        Removing { fs: self, path }
    }

    /// Create a directory with `mkdir -p` style options.
    ///
    /// # Errors
    ///
    /// - [`FsError::FileExists`] if something other than a directory is at
    ///   `path`, or a directory is there and `allow_existing` is unset
    /// - [`FsError::FileNotFound`] if an ancestor is missing and
    ///   `with_parents` is unset
    /// - [`FsError::NotADirectory`] if an ancestor is a file
    fn create_directory_with(
        &self,
        path: &Path,
        options: CreateDirectory,
    ) -> Result<(), FsError> {
        if options.with_parents {
            for ancestor in path.parent().heritage() {
                match self.create_directory(&ancestor) {
                    Ok(()) | Err(FsError::FileExists { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
        }

        match self.create_directory(path) {
            Err(FsError::FileExists { path: existing }) => {
                if options.allow_existing && self.is_dir(path)? {
                    Ok(())
                } else {
                    Err(FsError::FileExists { path: existing })
                }
            }
            other => other,
        }
    }
}

// Blanket implementation - any backend gets FilesystemExt for free
impl<B: Filesystem + ?Sized> FilesystemExt for B {}

fn absent_is_false(result: Result<bool, FsError>) -> Result<bool, FsError> {
    match result {
        Err(FsError::FileNotFound { .. } | FsError::NotADirectory { .. }) => Ok(false),
        other => other,
    }
}

fn io_error(path: &Path, source: std::io::Error) -> FsError {
    FsError::Io {
        path: path.clone(),
        source,
    }
}

/// Guard returned by [`FilesystemExt::removing`].
///
/// Derefs to the guarded path.
#[must_use = "the path is removed as soon as the guard is dropped"]
pub struct Removing<'a, F: Filesystem + ?Sized> {
    fs: &'a F,
    path: Path,
}

impl<F: Filesystem + ?Sized> std::fmt::Debug for Removing<'_, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Removing").field("path", &self.path).finish()
    }
}

impl<F: Filesystem + ?Sized> Deref for Removing<'_, F> {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.path
    }
}

impl<F: Filesystem + ?Sized> Drop for Removing<'_, F> {
    fn drop(&mut self) {
        if let Err(error) = self.fs.remove(&self.path) {
            warn!(path = %self.path, %error, "failed to remove path on drop");
        }
    }
}

// =============================================================================
// JSON Support (Feature-Gated)
// =============================================================================

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde::{Serialize, de::DeserializeOwned};

    /// JSON serialization extension methods.
    ///
    /// Available when the `serde` feature is enabled.
    pub trait FilesystemJson: Filesystem {
        /// Read a file and deserialize it as JSON.
        ///
        /// # Errors
        ///
        /// - [`FsError::FileNotFound`] if the file doesn't exist
        /// - [`FsError::Io`] if the file isn't valid UTF-8
        /// - [`FsError::Deserialization`] if JSON parsing failed
        fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, FsError> {
            let data = self.get_text(path)?;
            serde_json::from_str(&data).map_err(|e| FsError::Deserialization(e.to_string()))
        }

        /// Serialize a value and write it as pretty-printed JSON.
        ///
        /// # Errors
        ///
        /// - [`FsError::Serialization`] if JSON serialization failed
        /// - anything [`set_contents`](FilesystemExt::set_contents) raises
        fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), FsError> {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| FsError::Serialization(e.to_string()))?;
            self.set_contents(path, json.as_bytes())
        }
    }

    // Blanket implementation
    impl<B: Filesystem + ?Sized> FilesystemJson for B {}
}

#[cfg(feature = "serde")]
pub use json::FilesystemJson;
