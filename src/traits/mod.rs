//! # Filesystem Traits
//!
//! The primitive operations every backend provides.
//!
//! ## Trait Layout
//!
//! ```text
//! FsFile + FsDir + FsLink = Filesystem
//!                               ↓
//!                  FilesystemExt (derived operations, blanket)
//! ```
//!
//! ## Quick Reference
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`FsFile`] | `create`, `open`, `remove_file`, `stat` |
//! | [`FsDir`] | `create_directory`, `list_directory`, `remove_empty_directory`, `temporary_directory` |
//! | [`FsLink`] | `link`, `readlink`, `lstat`, `realpath` |
//!
//! ## Blanket Implementations
//!
//! Implement the component traits, and you get [`Filesystem`] and every
//! derived operation in [`FilesystemExt`](crate::FilesystemExt) automatically.
//! Derived operations are therefore identical across backends.
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync`. Methods take `&self` to enable concurrent
//! access. Backends use interior mutability for thread-safe state management.
//!
//! ## Object Safety
//!
//! All traits are object-safe and can be used as trait objects:
//!
//! ```rust
//! use filesystems::{Filesystem, FilesystemExt, MemoryFs, Path};
//!
//! fn process(fs: &dyn Filesystem) -> bool {
//!     fs.exists(&Path::new(["file.txt"])).unwrap_or(false)
//! }
//!
//! assert!(!process(&MemoryFs::new()));
//! ```

mod fs_dir;
mod fs_file;
mod fs_link;

pub use fs_dir::FsDir;
pub use fs_file::FsFile;
pub use fs_link::FsLink;

/// A complete filesystem backend.
///
/// Combines file ([`FsFile`]), directory ([`FsDir`]) and link ([`FsLink`])
/// primitives.
///
/// # Blanket Implementation
///
/// Automatically implemented for any type that implements all three component traits.
/// You never need to implement `Filesystem` directly.
///
/// # Example
///
/// ```rust
/// use filesystems::{Filesystem, FilesystemExt, FsError, MemoryFs, Path};
///
/// // Generic function that works with any backend
/// fn backup_file<B: Filesystem>(fs: &B, src: &Path, dst: &Path) -> Result<(), FsError> {
///     let data = fs.get_contents(src)?;
///     fs.create_directory_with(&dst.parent(), filesystems::CreateDirectory {
///         with_parents: true,
///         allow_existing: true,
///     })?;
///     fs.set_contents(dst, &data)
/// }
///
/// let fs = MemoryFs::new();
/// let src = Path::new(["src"]);
/// fs.set_contents(&src, b"data").unwrap();
/// backup_file(&fs, &src, &Path::new(["backups", "src"])).unwrap();
/// assert_eq!(fs.get_contents(&Path::new(["backups", "src"])).unwrap(), b"data");
/// ```
pub trait Filesystem: FsFile + FsDir + FsLink {}

// Blanket implementation - any type implementing all three gets Filesystem for free
impl<T: FsFile + FsDir + FsLink> Filesystem for T {}
