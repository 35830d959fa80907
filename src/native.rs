//! # Native Backend
//!
//! [`NativeFs`] forwards every primitive to the host through `std::fs` and
//! translates OS errors into [`FsError`] state errors.
//!
//! Each operation decides which path an error names, matching what the
//! in-memory backend reports. For instance a loop met while creating a
//! directory names the parent, while a loop met while opening names the
//! path itself.

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io;
use std::os::unix::fs::symlink;
use std::path::PathBuf;

use tracing::debug;
use uuid::Uuid;

use crate::resolve;
use crate::{
    Activity, AnyPath, ErrorKind, FileType, FsDir, FsError, FsFile, FsLink, Handle, Metadata,
    Mode, Path,
};

/// The host filesystem.
///
/// # Examples
///
/// ```rust
/// use filesystems::{FilesystemExt, FsDir, NativeFs};
///
/// let fs = NativeFs::new();
/// let tempdir = fs.temporary_directory().unwrap();
/// let tempdir = fs.removing(tempdir);
/// fs.set_contents(&tempdir.join("file"), b"on disk").unwrap();
/// assert!(fs.is_file(&tempdir.join("file")).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFs;

impl NativeFs {
    /// The host filesystem.
    pub fn new() -> Self {
        Self
    }
}

fn os_path(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string())
}

fn from_os_path(path: &std::path::Path) -> Result<AnyPath, FsError> {
    AnyPath::from_string(&path.to_string_lossy())
}

/// Translate an OS error, naming the path `table` gives for its kind.
///
/// Kinds missing from the table are reported as [`FsError::Io`] naming
/// `path`.
fn translate(error: io::Error, path: &Path, table: &[(ErrorKind, &Path)]) -> FsError {
    let kind = error.raw_os_error().and_then(ErrorKind::from_errno);
    match kind.and_then(|kind| table.iter().find(|(k, _)| *k == kind)) {
        Some((kind, named)) => FsError::new(*kind, (*named).clone()),
        None => FsError::Io {
            path: path.clone(),
            source: error,
        },
    }
}

/// Lookups name the path itself for every kind they can raise.
fn translate_lookup(error: io::Error, path: &Path) -> FsError {
    translate(
        error,
        path,
        &[
            (ErrorKind::FileNotFound, path),
            (ErrorKind::NotADirectory, path),
            (ErrorKind::SymbolicLoop, path),
        ],
    )
}

/// Missing components are kept as given by `realpath`.
fn is_absent(error: &io::Error) -> bool {
    matches!(
        error.raw_os_error().and_then(ErrorKind::from_errno),
        Some(ErrorKind::FileNotFound | ErrorKind::NotADirectory)
    )
}

fn metadata(metadata: &fs::Metadata) -> Metadata {
    let file_type = metadata.file_type();
    let file_type = if file_type.is_symlink() {
        FileType::Symlink
    } else if file_type.is_dir() {
        FileType::Directory
    } else {
        FileType::File
    };
    Metadata {
        file_type,
        size: metadata.len(),
    }
}

impl FsFile for NativeFs {
    fn create(&self, path: &Path) -> Result<Handle, FsError> {
        let parent = path.parent();
        let table = [
            (ErrorKind::FileNotFound, path),
            (ErrorKind::FileExists, path),
            (ErrorKind::NotADirectory, path),
            (ErrorKind::SymbolicLoop, &parent),
        ];
        debug!(%path, "creating file");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(os_path(path))
            .map_err(|e| translate(e, path, &table))?;
        Ok(Box::new(file))
    }

    fn open(&self, path: &Path, mode: Mode) -> Result<Handle, FsError> {
        let table = [
            (ErrorKind::FileNotFound, path),
            (ErrorKind::IsADirectory, path),
            (ErrorKind::NotADirectory, path),
            (ErrorKind::SymbolicLoop, path),
        ];
        let mut options = OpenOptions::new();
        match mode.activity {
            Activity::Read => options.read(true),
            Activity::Write => options.write(true).create(true).truncate(true),
            Activity::Append => options.append(true).create(true),
        };
        if mode.is_write() {
            debug!(%path, %mode, "opening file for writing");
        }

        let file = options
            .open(os_path(path))
            .map_err(|e| translate(e, path, &table))?;
        // Directories open for reading on unix.
        let is_dir = file
            .metadata()
            .map_err(|e| translate(e, path, &table))?
            .is_dir();
        if is_dir {
            return Err(FsError::IsADirectory { path: path.clone() });
        }
        Ok(Box::new(file))
    }

    fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        let parent = path.parent();
        let table = [
            (ErrorKind::FileNotFound, path),
            (ErrorKind::IsADirectory, path),
            (ErrorKind::NotADirectory, path),
            (ErrorKind::PermissionError, path),
            (ErrorKind::SymbolicLoop, &parent),
        ];
        debug!(%path, "removing file");
        fs::remove_file(os_path(path)).map_err(|e| translate(e, path, &table))
    }

    fn stat(&self, path: &Path) -> Result<Metadata, FsError> {
        fs::metadata(os_path(path))
            .map(|m| metadata(&m))
            .map_err(|e| translate_lookup(e, path))
    }
}

impl FsDir for NativeFs {
    fn create_directory(&self, path: &Path) -> Result<(), FsError> {
        let parent = path.parent();
        let table = [
            (ErrorKind::FileExists, path),
            (ErrorKind::FileNotFound, &parent),
            (ErrorKind::NotADirectory, &parent),
            (ErrorKind::SymbolicLoop, &parent),
        ];
        debug!(%path, "creating directory");
        fs::create_dir(os_path(path)).map_err(|e| translate(e, path, &table))
    }

    fn list_directory(&self, path: &Path) -> Result<BTreeSet<String>, FsError> {
        let entries = fs::read_dir(os_path(path)).map_err(|e| translate_lookup(e, path))?;
        entries
            .map(|entry| {
                entry
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .map_err(|source| FsError::Io {
                        path: path.clone(),
                        source,
                    })
            })
            .collect()
    }

    fn remove_empty_directory(&self, path: &Path) -> Result<(), FsError> {
        let parent = path.parent();
        let table = [
            (ErrorKind::DirectoryNotEmpty, path),
            (ErrorKind::FileNotFound, path),
            (ErrorKind::NotADirectory, path),
            (ErrorKind::SymbolicLoop, &parent),
        ];
        debug!(%path, "removing directory");
        fs::remove_dir(os_path(path)).map_err(|e| translate(e, path, &table))
    }

    fn temporary_directory(&self) -> Result<Path, FsError> {
        let base = from_os_path(&std::env::temp_dir())?.relative_to(&Path::root());
        let path = base.join(Uuid::new_v4().simple().to_string());
        self.create_directory(&path)?;
        Ok(path)
    }
}

impl FsLink for NativeFs {
    fn link(&self, source: &AnyPath, to: &Path) -> Result<(), FsError> {
        let parent = to.parent();
        let table = [
            (ErrorKind::FileExists, to),
            (ErrorKind::FileNotFound, &parent),
            (ErrorKind::NotADirectory, &parent),
            (ErrorKind::SymbolicLoop, &parent),
        ];
        debug!(%source, %to, "creating link");
        symlink(source.to_string(), os_path(to)).map_err(|e| translate(e, to, &table))
    }

    fn readlink(&self, path: &Path) -> Result<AnyPath, FsError> {
        let table = [
            (ErrorKind::FileNotFound, path),
            (ErrorKind::NotADirectory, path),
            (ErrorKind::NotASymlink, path),
            (ErrorKind::SymbolicLoop, path),
        ];
        let source = fs::read_link(os_path(path)).map_err(|e| translate(e, path, &table))?;
        from_os_path(&source)
    }

    fn lstat(&self, path: &Path) -> Result<Metadata, FsError> {
        fs::symlink_metadata(os_path(path))
            .map(|m| metadata(&m))
            .map_err(|e| translate_lookup(e, path))
    }

    fn realpath(&self, path: &Path) -> Result<Path, FsError> {
        resolve::realpath(path, |candidate| {
            let metadata = match fs::symlink_metadata(os_path(candidate)) {
                Ok(metadata) => metadata,
                Err(e) if is_absent(&e) => return Ok(None),
                Err(e) => return Err(translate_lookup(e, candidate)),
            };
            if !metadata.file_type().is_symlink() {
                return Ok(None);
            }
            let source =
                fs::read_link(os_path(candidate)).map_err(|e| translate_lookup(e, candidate))?;
            from_os_path(&source).map(Some)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilesystemExt;

    #[test]
    fn translate_names_the_path_from_the_table() {
        let path = Path::new(["dir", "child"]);
        let parent = path.parent();
        let error = io::Error::from_raw_os_error(libc::ENOENT);
        let translated = translate(error, &path, &[(ErrorKind::FileNotFound, &parent)]);
        assert!(matches!(translated, FsError::FileNotFound { ref path } if *path == parent));
    }

    #[test]
    fn translate_falls_back_to_io() {
        let path = Path::new(["file"]);
        let error = io::Error::from_raw_os_error(libc::EACCES);
        let translated = translate(error, &path, &[(ErrorKind::FileNotFound, &path)]);
        assert!(matches!(translated, FsError::Io { .. }));
        assert_eq!(translated.errno(), Some(libc::EACCES));
    }

    #[test]
    fn kinds_absent_from_table_fall_back_to_io() {
        let path = Path::new(["file"]);
        let error = io::Error::from_raw_os_error(libc::EPERM);
        let translated = translate_lookup(error, &path);
        assert!(matches!(translated, FsError::Io { .. }));
    }

    #[test]
    fn temporary_directory_lives_under_temp_dir() {
        let fs = NativeFs::new();
        let tempdir = fs.removing(fs.temporary_directory().unwrap());
        assert!(fs.is_dir(&tempdir).unwrap());
        assert!(os_path(&tempdir).starts_with(std::env::temp_dir()));
    }

    #[test]
    fn opening_a_directory_for_reading_fails() {
        let fs = NativeFs::new();
        let tempdir = fs.removing(fs.temporary_directory().unwrap());
        assert!(matches!(
            fs.open(&tempdir, Mode::READ),
            Err(FsError::IsADirectory { .. })
        ));
    }

    #[test]
    fn missing_components_are_absent() {
        assert!(is_absent(&io::Error::from_raw_os_error(libc::ENOENT)));
        assert!(is_absent(&io::Error::from_raw_os_error(libc::ENOTDIR)));
        assert!(!is_absent(&io::Error::from_raw_os_error(libc::EACCES)));
        assert!(!is_absent(&io::Error::from_raw_os_error(libc::EIO)));
    }

    #[test]
    fn realpath_reports_unreadable_directories() {
        // Root may read any directory, so only check when permissions apply.
        if unsafe { libc::geteuid() } == 0 {
            return;
        }
        use std::os::unix::fs::PermissionsExt;

        let fs = NativeFs::new();
        let tempdir = fs.removing(fs.temporary_directory().unwrap());
        let locked = tempdir.join("locked");
        fs.create_directory(&locked).unwrap();
        std::fs::set_permissions(os_path(&locked), std::fs::Permissions::from_mode(0o000))
            .unwrap();

        let result = fs.realpath(&locked.join("child"));
        std::fs::set_permissions(os_path(&locked), std::fs::Permissions::from_mode(0o755))
            .unwrap();
        assert!(matches!(result, Err(FsError::Io { .. })));
    }
}
