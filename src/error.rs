//! Error types shared by every filesystem backend.
//!
//! State errors mirror POSIX errno values and render exactly like the
//! operating system would report them: `"<strerror>: <path>"`. Argument
//! errors (bad path strings, bad modes, bad globs) are distinct variants
//! that never come from the OS.

use crate::Path;

/// The POSIX-like classification of a filesystem state error.
///
/// # Examples
///
/// ```rust
/// use filesystems::{ErrorKind, FsError, Path};
///
/// let err = FsError::new(ErrorKind::FileNotFound, Path::new(["missing"]));
/// assert_eq!(err.kind(), Some(ErrorKind::FileNotFound));
/// assert_eq!(err.to_string(), "No such file or directory: /missing");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `ENOENT`
    FileNotFound,
    /// `EEXIST`
    FileExists,
    /// `EISDIR`
    IsADirectory,
    /// `ENOTDIR`
    NotADirectory,
    /// `ENOTEMPTY`
    DirectoryNotEmpty,
    /// `EINVAL`, raised when reading a link that is not a link.
    NotASymlink,
    /// `ELOOP`
    SymbolicLoop,
    /// `EPERM`
    PermissionError,
}

impl ErrorKind {
    /// The text `strerror(3)` gives for this kind's errno.
    pub fn strerror(self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "No such file or directory",
            ErrorKind::FileExists => "File exists",
            ErrorKind::IsADirectory => "Is a directory",
            ErrorKind::NotADirectory => "Not a directory",
            ErrorKind::DirectoryNotEmpty => "Directory not empty",
            ErrorKind::NotASymlink => "Invalid argument",
            ErrorKind::SymbolicLoop => "Too many levels of symbolic links",
            ErrorKind::PermissionError => "Operation not permitted",
        }
    }

    /// The host errno for this kind.
    #[cfg(unix)]
    pub fn errno(self) -> i32 {
        match self {
            ErrorKind::FileNotFound => libc::ENOENT,
            ErrorKind::FileExists => libc::EEXIST,
            ErrorKind::IsADirectory => libc::EISDIR,
            ErrorKind::NotADirectory => libc::ENOTDIR,
            ErrorKind::DirectoryNotEmpty => libc::ENOTEMPTY,
            ErrorKind::NotASymlink => libc::EINVAL,
            ErrorKind::SymbolicLoop => libc::ELOOP,
            ErrorKind::PermissionError => libc::EPERM,
        }
    }

    /// Classify a host errno, if it belongs to the taxonomy.
    #[cfg(unix)]
    pub fn from_errno(errno: i32) -> Option<Self> {
        match errno {
            libc::ENOENT => Some(ErrorKind::FileNotFound),
            libc::EEXIST => Some(ErrorKind::FileExists),
            libc::EISDIR => Some(ErrorKind::IsADirectory),
            libc::ENOTDIR => Some(ErrorKind::NotADirectory),
            libc::ENOTEMPTY => Some(ErrorKind::DirectoryNotEmpty),
            libc::EINVAL => Some(ErrorKind::NotASymlink),
            libc::ELOOP => Some(ErrorKind::SymbolicLoop),
            libc::EPERM => Some(ErrorKind::PermissionError),
            _ => None,
        }
    }
}

/// Filesystem error type.
///
/// Uses `#[non_exhaustive]` for forward compatibility.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    // State errors
    /// Path does not exist.
    #[error("No such file or directory: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: Path,
    },

    /// Path already exists when it shouldn't.
    #[error("File exists: {path}")]
    FileExists {
        /// The path that already exists.
        path: Path,
    },

    /// Expected something other than a directory.
    #[error("Is a directory: {path}")]
    IsADirectory {
        /// The directory.
        path: Path,
    },

    /// Expected a directory, or traversed through a file.
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory.
        path: Path,
    },

    /// Directory is not empty when it should be.
    #[error("Directory not empty: {path}")]
    DirectoryNotEmpty {
        /// The path to the non-empty directory.
        path: Path,
    },

    /// Tried to read a link from something that is not a link.
    #[error("Invalid argument: {path}")]
    NotASymlink {
        /// The path that is not a symbolic link.
        path: Path,
    },

    /// Link resolution revisited a link or ran out of budget.
    #[error("Too many levels of symbolic links: {path}")]
    SymbolicLoop {
        /// The link at which resolution gave up.
        path: Path,
    },

    /// Operation not permitted.
    #[error("Operation not permitted: {path}")]
    PermissionError {
        /// The path where the operation was refused.
        path: Path,
    },

    // Argument errors
    /// A path string could not be parsed.
    #[error("invalid path: {value:?}")]
    InvalidPath {
        /// The rejected input.
        value: String,
    },

    /// An open mode string could not be parsed.
    #[error("invalid mode: {mode:?}")]
    InvalidMode {
        /// The rejected mode.
        mode: String,
    },

    /// The root has no siblings.
    #[error("the root path has no siblings")]
    NoSibling,

    /// A glob pattern could not be compiled.
    #[error("invalid glob {pattern:?}: {reason}")]
    InvalidGlob {
        /// The rejected pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    // Other errors
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// I/O error outside the state taxonomy.
    #[error("{source}: {path}")]
    Io {
        /// The path involved in the operation.
        path: Path,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Build a state error of the given kind.
    pub fn new(kind: ErrorKind, path: Path) -> Self {
        match kind {
            ErrorKind::FileNotFound => FsError::FileNotFound { path },
            ErrorKind::FileExists => FsError::FileExists { path },
            ErrorKind::IsADirectory => FsError::IsADirectory { path },
            ErrorKind::NotADirectory => FsError::NotADirectory { path },
            ErrorKind::DirectoryNotEmpty => FsError::DirectoryNotEmpty { path },
            ErrorKind::NotASymlink => FsError::NotASymlink { path },
            ErrorKind::SymbolicLoop => FsError::SymbolicLoop { path },
            ErrorKind::PermissionError => FsError::PermissionError { path },
        }
    }

    /// The state classification, or `None` for argument and other errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            FsError::FileNotFound { .. } => Some(ErrorKind::FileNotFound),
            FsError::FileExists { .. } => Some(ErrorKind::FileExists),
            FsError::IsADirectory { .. } => Some(ErrorKind::IsADirectory),
            FsError::NotADirectory { .. } => Some(ErrorKind::NotADirectory),
            FsError::DirectoryNotEmpty { .. } => Some(ErrorKind::DirectoryNotEmpty),
            FsError::NotASymlink { .. } => Some(ErrorKind::NotASymlink),
            FsError::SymbolicLoop { .. } => Some(ErrorKind::SymbolicLoop),
            FsError::PermissionError { .. } => Some(ErrorKind::PermissionError),
            _ => None,
        }
    }

    /// The path this error concerns, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FsError::FileNotFound { path }
            | FsError::FileExists { path }
            | FsError::IsADirectory { path }
            | FsError::NotADirectory { path }
            | FsError::DirectoryNotEmpty { path }
            | FsError::NotASymlink { path }
            | FsError::SymbolicLoop { path }
            | FsError::PermissionError { path }
            | FsError::Io { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The host errno, for state errors and OS errors that carry one.
    #[cfg(unix)]
    pub fn errno(&self) -> Option<i32> {
        match self {
            FsError::Io { source, .. } => source.raw_os_error(),
            other => other.kind().map(ErrorKind::errno),
        }
    }

    /// Rewrite the carried path, leaving everything else intact.
    pub fn map_path(self, f: impl FnOnce(Path) -> Path) -> Self {
        match self {
            FsError::Io { path, source } => FsError::Io {
                path: f(path),
                source,
            },
            other => match (other.kind(), other.path()) {
                (Some(kind), Some(path)) => FsError::new(kind, f(path.clone())),
                _ => other,
            },
        }
    }
}
