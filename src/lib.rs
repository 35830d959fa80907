//! # filesystems
//!
//! A filesystem abstraction with interchangeable backends.
//!
//! Code written against [`Filesystem`] runs unchanged on the host
//! ([`NativeFs`]) or on an isolated in-memory tree ([`MemoryFs`]) that
//! reproduces POSIX error semantics, symbolic links and loop detection
//! included.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use filesystems::{Filesystem, FilesystemExt, FsError, MemoryFs, Path};
//!
//! // Generic function that works with any backend
//! fn archive<F: Filesystem + ?Sized>(fs: &F, from: &Path, to: &Path) -> Result<(), FsError> {
//!     let data = fs.get_contents(from)?;
//!     fs.set_contents(to, &data)
//! }
//!
//! let fs = MemoryFs::new();
//! fs.set_contents(&Path::new(["input"]), b"data").unwrap();
//! archive(&fs, &Path::new(["input"]), &Path::new(["output"])).unwrap();
//! assert_eq!(fs.get_contents(&Path::new(["output"])).unwrap(), b"data");
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Path`] | Absolute path, a sequence of segments under `/` |
//! | [`RelativePath`] / [`AnyPath`] | Relative paths and link sources |
//! | [`Filesystem`] | The twelve primitive operations |
//! | [`FilesystemExt`] | Operations derived from the primitives |
//! | [`FsError`] | POSIX-style state errors and argument errors |
//! | [`Mode`] | `r`, `w` or `a`, optionally `b` or `t` |
//! | [`Metadata`] | File type and size |
//!
//! ---
//!
//! ## Trait Layout
//!
//! ```text
//! FsFile + FsDir + FsLink = Filesystem
//!                               ↓
//!                  FilesystemExt (derived, blanket)
//!                               ↓
//!            Layer / LayerExt (Downward, your own wrappers)
//! ```
//!
//! Composite and extension traits have **blanket implementations**: a
//! backend implements the three component traits and gets the rest for free.
//!
//! ---
//!
//! ## Error Handling
//!
//! All operations return `Result<T, FsError>`. State errors carry the path
//! they concern and render like `strerror(3)`:
//!
//! ```rust
//! use filesystems::{ErrorKind, FsError, Path};
//!
//! let err = FsError::new(ErrorKind::FileNotFound, Path::new(["missing"]));
//! assert_eq!(err.to_string(), "No such file or directory: /missing");
//! assert_eq!(err.kind(), Some(ErrorKind::FileNotFound));
//! ```
//!
//! ---
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync` and take `&self`. [`MemoryFs`] guards its
//! tree with a lock; composite operations are not atomic.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for paths, [`Metadata`] and [`Mode`]; enables `FilesystemJson` |
//! | `clap` | [`AnyPath`] as a command-line argument type |

// Private modules
mod downward;
mod error;
mod ext;
mod glob;
mod layer;
mod memory;
#[cfg(unix)]
mod native;
mod path;
mod resolve;
mod traits;
mod types;

#[cfg(feature = "clap")]
mod cli;

// Public re-exports - paths
pub use path::{AnyPath, Heritage, Path, RelativePath, SEPARATOR};

// Public re-exports - error types
pub use error::{ErrorKind, FsError};

// Public re-exports - core types
pub use types::{
    Activity, CreateDirectory, Encoding, FileIo, FileType, Handle, Metadata, Mode, Platform,
};

// Public re-exports - traits
pub use traits::{Filesystem, FsDir, FsFile, FsLink};

// Public re-exports - backends
pub use memory::MemoryFs;
#[cfg(unix)]
pub use native::NativeFs;

// Public re-exports - infrastructure
pub use downward::{Downward, DownwardLayer};
pub use ext::{FilesystemExt, Removing};
pub use glob::Glob;
pub use layer::{Layer, LayerExt};

// Conditional re-exports
#[cfg(feature = "serde")]
pub use ext::FilesystemJson;

#[cfg(feature = "clap")]
pub use cli::PathValueParser;
