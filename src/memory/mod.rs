//! # In-Memory Backend
//!
//! [`MemoryFs`] keeps a whole filesystem in process memory: directories,
//! files and symbolic links, with the same observable behavior (including
//! error kinds and error paths) as the native backend.
//!
//! ## Content model
//!
//! - Opening for write or append installs a fresh buffer at open time; the
//!   last open wins.
//! - Writers write straight into the buffer they installed.
//! - Readers get a snapshot taken at open time.
//!
//! Instances never share state.

mod handle;
mod tree;

use std::collections::BTreeSet;
use std::io::Cursor;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::{
    Activity, AnyPath, FsDir, FsError, FsFile, FsLink, Handle, Metadata, Mode, Path, Platform,
};

use handle::MemoryHandle;
use tree::{Buffer, Entry, Node, Tree};

/// A filesystem that lives entirely in memory.
///
/// # Examples
///
/// ```rust
/// use filesystems::{FilesystemExt, FsDir, MemoryFs};
///
/// let fs = MemoryFs::new();
/// let dir = fs.temporary_directory().unwrap();
/// fs.set_contents(&(&dir / "hello"), b"world").unwrap();
/// assert_eq!(fs.get_contents(&(&dir / "hello")).unwrap(), b"world");
/// ```
#[derive(Debug, Default)]
pub struct MemoryFs {
    tree: RwLock<Tree>,
    platform: Platform,
}

impl MemoryFs {
    /// An empty filesystem following the host's error conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty filesystem following `platform`'s error conventions.
    pub fn with_platform(platform: Platform) -> Self {
        Self {
            tree: RwLock::default(),
            platform,
        }
    }

    /// The platform whose error conventions this instance follows.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn unlink_directory_error(&self, path: &Path) -> FsError {
        match self.platform {
            Platform::Linux => FsError::IsADirectory { path: path.clone() },
            Platform::Darwin => FsError::PermissionError { path: path.clone() },
        }
    }
}

impl FsFile for MemoryFs {
    fn create(&self, path: &Path) -> Result<Handle, FsError> {
        if path.is_root() {
            return Err(FsError::FileExists { path: path.clone() });
        }
        let mut tree = self.tree.write();
        let location = tree.locate(path, &path.parent())?;
        match tree.lookup(&location) {
            Entry::Found(_) => return Err(FsError::FileExists { path: path.clone() }),
            Entry::UnderFile => return Err(FsError::NotADirectory { path: path.clone() }),
            Entry::Missing => return Err(FsError::FileNotFound { path: path.clone() }),
            Entry::Vacant => {}
        }

        let contents = Buffer::default();
        tree.insert(&location, Node::File(Arc::clone(&contents)));
        debug!(%path, "created file");
        Ok(Box::new(MemoryHandle::Writer(contents)))
    }

    fn open(&self, path: &Path, mode: Mode) -> Result<Handle, FsError> {
        if !mode.is_write() {
            let tree = self.tree.read();
            let real = tree.follow(path)?;
            return match tree.lookup(&real) {
                Entry::Found(Node::File(contents)) => Ok(Box::new(MemoryHandle::Reader(
                    Cursor::new(contents.lock().clone()),
                ))),
                Entry::Found(Node::Directory(_)) => {
                    Err(FsError::IsADirectory { path: path.clone() })
                }
                Entry::UnderFile => Err(FsError::NotADirectory { path: path.clone() }),
                Entry::Found(Node::Link(_)) | Entry::Vacant | Entry::Missing => {
                    Err(FsError::FileNotFound { path: path.clone() })
                }
            };
        }

        let mut tree = self.tree.write();
        let real = tree.follow(path)?;
        let seed = match tree.lookup(&real) {
            Entry::Found(Node::File(contents)) => match mode.activity {
                Activity::Append => contents.lock().clone(),
                Activity::Read | Activity::Write => Vec::new(),
            },
            Entry::Found(Node::Directory(_)) => {
                return Err(FsError::IsADirectory { path: path.clone() });
            }
            Entry::Vacant => Vec::new(),
            Entry::UnderFile => return Err(FsError::NotADirectory { path: path.clone() }),
            Entry::Found(Node::Link(_)) | Entry::Missing => {
                return Err(FsError::FileNotFound { path: path.clone() });
            }
        };

        let contents: Buffer = Arc::new(Mutex::new(seed));
        tree.insert(&real, Node::File(Arc::clone(&contents)));
        debug!(%path, %mode, "opened file for writing");
        Ok(Box::new(MemoryHandle::Writer(contents)))
    }

    fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        if path.is_root() {
            return Err(self.unlink_directory_error(path));
        }
        let mut tree = self.tree.write();
        let location = tree.locate(path, &path.parent())?;
        match tree.lookup(&location) {
            Entry::Found(Node::Directory(_)) => return Err(self.unlink_directory_error(path)),
            Entry::Found(_) => {}
            Entry::UnderFile => return Err(FsError::NotADirectory { path: path.clone() }),
            Entry::Vacant | Entry::Missing => {
                return Err(FsError::FileNotFound { path: path.clone() });
            }
        }
        tree.detach(&location);
        debug!(%path, "removed file");
        Ok(())
    }

    fn stat(&self, path: &Path) -> Result<Metadata, FsError> {
        let tree = self.tree.read();
        let real = tree.follow(path)?;
        metadata_at(&tree, &real, path)
    }
}

impl FsDir for MemoryFs {
    fn create_directory(&self, path: &Path) -> Result<(), FsError> {
        if path.is_root() {
            return Err(FsError::FileExists { path: path.clone() });
        }
        let mut tree = self.tree.write();
        let location = tree.locate(path, &path.parent())?;
        match tree.lookup(&location) {
            Entry::Found(_) => return Err(FsError::FileExists { path: path.clone() }),
            Entry::UnderFile => {
                return Err(FsError::NotADirectory {
                    path: path.parent(),
                });
            }
            Entry::Missing => {
                return Err(FsError::FileNotFound {
                    path: path.parent(),
                });
            }
            Entry::Vacant => {}
        }
        tree.insert(&location, Node::empty_directory());
        debug!(%path, "created directory");
        Ok(())
    }

    fn list_directory(&self, path: &Path) -> Result<BTreeSet<String>, FsError> {
        let tree = self.tree.read();
        let real = tree.follow(path)?;
        match tree.lookup(&real) {
            Entry::Found(Node::Directory(children)) => Ok(children.keys().cloned().collect()),
            Entry::Found(Node::File(_)) | Entry::UnderFile => {
                Err(FsError::NotADirectory { path: path.clone() })
            }
            Entry::Found(Node::Link(_)) | Entry::Vacant | Entry::Missing => {
                Err(FsError::FileNotFound { path: path.clone() })
            }
        }
    }

    fn remove_empty_directory(&self, path: &Path) -> Result<(), FsError> {
        let mut tree = self.tree.write();
        if path.is_root() {
            return Err(if tree.root_is_empty() {
                FsError::PermissionError { path: path.clone() }
            } else {
                FsError::DirectoryNotEmpty { path: path.clone() }
            });
        }

        let location = tree.locate(path, &path.parent())?;
        match tree.lookup(&location) {
            Entry::Found(Node::Directory(children)) if !children.is_empty() => {
                return Err(FsError::DirectoryNotEmpty { path: path.clone() });
            }
            Entry::Found(Node::Directory(_)) => {}
            Entry::Found(_) | Entry::UnderFile => {
                return Err(FsError::NotADirectory { path: path.clone() });
            }
            Entry::Vacant | Entry::Missing => {
                return Err(FsError::FileNotFound { path: path.clone() });
            }
        }
        tree.detach(&location);
        debug!(%path, "removed directory");
        Ok(())
    }

    fn temporary_directory(&self) -> Result<Path, FsError> {
        let path = Path::root().join(Uuid::new_v4().simple().to_string());
        self.create_directory(&path)?;
        Ok(path)
    }
}

impl FsLink for MemoryFs {
    fn link(&self, source: &AnyPath, to: &Path) -> Result<(), FsError> {
        if to.is_root() {
            return Err(FsError::FileExists { path: to.clone() });
        }
        let mut tree = self.tree.write();
        let location = tree.locate(to, &to.parent())?;
        match tree.lookup(&location) {
            Entry::Found(_) => return Err(FsError::FileExists { path: to.clone() }),
            Entry::UnderFile => {
                return Err(FsError::NotADirectory { path: to.parent() });
            }
            Entry::Missing => return Err(FsError::FileNotFound { path: to.parent() }),
            Entry::Vacant => {}
        }
        tree.insert(&location, Node::Link(source.clone()));
        debug!(%source, %to, "created link");
        Ok(())
    }

    fn readlink(&self, path: &Path) -> Result<AnyPath, FsError> {
        let tree = self.tree.read();
        let location = tree.locate(path, path)?;
        match tree.lookup(&location) {
            Entry::Found(Node::Link(source)) => Ok(source.clone()),
            Entry::Found(_) => Err(FsError::NotASymlink { path: path.clone() }),
            Entry::UnderFile => Err(FsError::NotADirectory { path: path.clone() }),
            Entry::Vacant | Entry::Missing => Err(FsError::FileNotFound { path: path.clone() }),
        }
    }

    fn lstat(&self, path: &Path) -> Result<Metadata, FsError> {
        let tree = self.tree.read();
        let location = tree.locate(path, path)?;
        metadata_at(&tree, &location, path)
    }

    fn realpath(&self, path: &Path) -> Result<Path, FsError> {
        self.tree.read().realpath(path)
    }
}

fn metadata_at(tree: &Tree, location: &Path, path: &Path) -> Result<Metadata, FsError> {
    match tree.lookup(location) {
        Entry::Found(node) => Ok(node.metadata()),
        Entry::UnderFile => Err(FsError::NotADirectory { path: path.clone() }),
        Entry::Vacant | Entry::Missing => Err(FsError::FileNotFound { path: path.clone() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, FilesystemExt};
    use std::io::{Read, Write};

    fn p(segments: &[&str]) -> Path {
        Path::new(segments.iter().copied())
    }

    #[test]
    fn fresh_instance_has_empty_root() {
        let fs = MemoryFs::new();
        assert!(fs.list_directory(&Path::root()).unwrap().is_empty());
        assert!(fs.is_dir(&Path::root()).unwrap());
    }

    #[test]
    fn instances_are_isolated() {
        let one = MemoryFs::new();
        let two = MemoryFs::new();
        one.create_directory(&p(&["only-in-one"])).unwrap();
        assert!(!two.exists(&p(&["only-in-one"])).unwrap());
    }

    #[test]
    fn root_cannot_be_created_or_removed() {
        let fs = MemoryFs::new();
        let err = fs.create_directory(&Path::root()).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::FileExists));

        let err = fs.remove_empty_directory(&Path::root()).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::PermissionError));

        fs.touch(&p(&["file"])).unwrap();
        let err = fs.remove_empty_directory(&Path::root()).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::DirectoryNotEmpty));
    }

    #[test]
    fn unlinking_a_directory_depends_on_platform() {
        let linux = MemoryFs::with_platform(Platform::Linux);
        linux.create_directory(&p(&["dir"])).unwrap();
        assert!(matches!(
            linux.remove_file(&p(&["dir"])),
            Err(FsError::IsADirectory { .. })
        ));

        let darwin = MemoryFs::with_platform(Platform::Darwin);
        darwin.create_directory(&p(&["dir"])).unwrap();
        assert!(matches!(
            darwin.remove_file(&p(&["dir"])),
            Err(FsError::PermissionError { .. })
        ));
        assert_eq!(darwin.platform(), Platform::Darwin);
    }

    #[test]
    fn readers_see_snapshot_taken_at_open() {
        let fs = MemoryFs::new();
        let path = p(&["file"]);
        fs.set_contents(&path, b"before").unwrap();

        let mut reader = fs.open(&path, Mode::READ).unwrap();
        fs.set_contents(&path, b"after").unwrap();

        let mut seen = Vec::new();
        reader.read_to_end(&mut seen).unwrap();
        assert_eq!(seen, b"before");
        assert_eq!(fs.get_contents(&path).unwrap(), b"after");
    }

    #[test]
    fn last_write_open_wins() {
        let fs = MemoryFs::new();
        let path = p(&["file"]);
        let mut first = fs.open(&path, Mode::WRITE).unwrap();
        let mut second = fs.open(&path, Mode::WRITE).unwrap();
        first.write_all(b"first").unwrap();
        second.write_all(b"second").unwrap();
        assert_eq!(fs.get_contents(&path).unwrap(), b"second");
    }

    #[test]
    fn writes_are_visible_before_close() {
        let fs = MemoryFs::new();
        let path = p(&["file"]);
        let mut writer = fs.open(&path, Mode::WRITE).unwrap();
        writer.write_all(b"partial").unwrap();
        assert_eq!(fs.get_contents(&path).unwrap(), b"partial");
    }

    #[test]
    fn writing_through_dangling_link_creates_source() {
        let fs = MemoryFs::new();
        fs.link(&p(&["target"]).into(), &p(&["link"])).unwrap();
        fs.set_contents(&p(&["link"]), b"through").unwrap();
        assert_eq!(fs.get_contents(&p(&["target"])).unwrap(), b"through");
        assert!(fs.is_link(&p(&["link"])).unwrap());
    }

    #[test]
    fn create_refuses_dangling_link() {
        let fs = MemoryFs::new();
        fs.link(&p(&["target"]).into(), &p(&["link"])).unwrap();
        let err = fs.create(&p(&["link"])).err().unwrap();
        assert_eq!(err.kind(), Some(ErrorKind::FileExists));
    }

    #[test]
    fn lstat_does_not_follow_final_link() {
        let fs = MemoryFs::new();
        fs.create_directory(&p(&["dir"])).unwrap();
        fs.link(&p(&["dir"]).into(), &p(&["link"])).unwrap();
        assert!(fs.lstat(&p(&["link"])).unwrap().is_symlink());
        assert!(fs.stat(&p(&["link"])).unwrap().is_dir());
    }

    #[test]
    fn stat_reports_file_size() {
        let fs = MemoryFs::new();
        fs.set_contents(&p(&["file"]), b"12345").unwrap();
        assert_eq!(fs.stat(&p(&["file"])).unwrap().size, 5);
    }

    #[test]
    fn links_see_content_created_later() {
        let fs = MemoryFs::new();
        fs.link(&p(&["later"]).into(), &p(&["link"])).unwrap();
        assert!(!fs.exists(&p(&["link"])).unwrap());
        fs.create_directory(&p(&["later"])).unwrap();
        fs.touch(&p(&["later", "file"])).unwrap();
        assert!(fs.is_file(&p(&["link", "file"])).unwrap());
    }

    #[test]
    fn temporary_directories_are_unique() {
        let fs = MemoryFs::new();
        let one = fs.temporary_directory().unwrap();
        let two = fs.temporary_directory().unwrap();
        assert_ne!(one, two);
        assert_eq!(one.segments().len(), 1);
        assert_eq!(one.basename().len(), 32);
        assert!(fs.is_dir(&one).unwrap());
    }

    #[test]
    fn memory_fs_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryFs>();
    }
}
