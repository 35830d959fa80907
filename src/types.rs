//! Core types shared by the filesystem traits and backends.

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use crate::FsError;

/// Type of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
}

/// Metadata for a filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// Type of the entry (file, directory, symlink).
    pub file_type: FileType,
    /// Size in bytes. Backends may report zero for directories.
    pub size: u64,
}

impl Metadata {
    /// Returns `true` if this is a regular file.
    #[inline]
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    /// Returns `true` if this is a directory.
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    /// Returns `true` if this is a symbolic link.
    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.file_type == FileType::Symlink
    }
}

/// What an open handle is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Activity {
    /// `r`: read an existing file.
    Read,
    /// `w`: truncate or create, then write.
    Write,
    /// `a`: create if needed, then write after the existing contents.
    Append,
}

/// How contents are meant to be interpreted.
///
/// The bytes stored never differ between encodings; text mode only states
/// that contents are expected to be UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// `b`
    #[default]
    Binary,
    /// `t`
    Text,
}

/// A parsed open mode such as `"rb"`, `"w"` or `"at"`.
///
/// # Grammar
///
/// Exactly one activity character (`r`, `w`, `a`) followed by at most one
/// encoding character (`b`, `t`). A missing encoding means binary.
///
/// # Examples
///
/// ```rust
/// use filesystems::{Activity, Encoding, Mode};
///
/// let mode: Mode = "at".parse().unwrap();
/// assert_eq!(mode.activity, Activity::Append);
/// assert_eq!(mode.encoding, Encoding::Text);
///
/// assert_eq!("w".parse::<Mode>().unwrap(), Mode::WRITE);
/// assert!("rbt".parse::<Mode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mode {
    /// Read, write or append.
    pub activity: Activity,
    /// Binary or text.
    pub encoding: Encoding,
}

impl Mode {
    /// `"rb"`
    pub const READ: Self = Self {
        activity: Activity::Read,
        encoding: Encoding::Binary,
    };

    /// `"wb"`
    pub const WRITE: Self = Self {
        activity: Activity::Write,
        encoding: Encoding::Binary,
    };

    /// `"ab"`
    pub const APPEND: Self = Self {
        activity: Activity::Append,
        encoding: Encoding::Binary,
    };

    /// The same activity in text mode.
    pub const fn text(self) -> Self {
        Self {
            activity: self.activity,
            encoding: Encoding::Text,
        }
    }

    /// Whether handles opened in this mode write.
    pub fn is_write(&self) -> bool {
        !matches!(self.activity, Activity::Read)
    }
}

impl FromStr for Mode {
    type Err = FsError;

    fn from_str(mode: &str) -> Result<Self, FsError> {
        let invalid = || FsError::InvalidMode {
            mode: mode.to_owned(),
        };

        let mut chars = mode.chars();
        let activity = match chars.next() {
            Some('r') => Activity::Read,
            Some('w') => Activity::Write,
            Some('a') => Activity::Append,
            _ => return Err(invalid()),
        };
        let encoding = match chars.next() {
            None => Encoding::Binary,
            Some('b') => Encoding::Binary,
            Some('t') => Encoding::Text,
            Some(_) => return Err(invalid()),
        };
        if chars.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { activity, encoding })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let activity = match self.activity {
            Activity::Read => 'r',
            Activity::Write => 'w',
            Activity::Append => 'a',
        };
        let encoding = match self.encoding {
            Encoding::Binary => 'b',
            Encoding::Text => 't',
        };
        write!(f, "{activity}{encoding}")
    }
}

/// Options for [`FilesystemExt::create_directory_with`](crate::FilesystemExt::create_directory_with).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateDirectory {
    /// Create missing ancestors first, like `mkdir -p`.
    pub with_parents: bool,
    /// Succeed if the directory (or a link to one) already exists.
    pub allow_existing: bool,
}

/// The host flavor whose error conventions a virtual backend imitates.
///
/// Only unlinking a directory differs: Linux reports `EISDIR`, Darwin
/// reports `EPERM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux and other systems reporting `EISDIR`.
    Linux,
    /// macOS and other Darwin systems reporting `EPERM`.
    Darwin,
}

impl Platform {
    /// The platform this crate was compiled for.
    pub const fn host() -> Self {
        if cfg!(target_vendor = "apple") {
            Platform::Darwin
        } else {
            Platform::Linux
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

/// Byte-stream access to an open file.
///
/// Every backend hands out handles through this trait; it is implemented
/// for anything that is `Read + Write + Send`. A handle opened for reading
/// fails writes and vice versa. Dropping a handle closes it.
pub trait FileIo: Read + Write + Send {}

impl<T: Read + Write + Send> FileIo for T {}

/// An open file.
pub type Handle = Box<dyn FileIo>;
