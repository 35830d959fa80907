//! # Downward View
//!
//! [`Downward`] presents a directory of another backend as the root of a
//! whole filesystem, the way `chroot` does.
//!
//! Every path crossing the boundary is translated: arguments and absolute
//! link sources go down into the inner backend, while returned paths, link
//! sources and error paths come back up. Relative link sources need no
//! translation.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
    AnyPath, Filesystem, FsDir, FsError, FsFile, FsLink, Handle, Layer, Metadata, Mode, Path,
};

/// A backend re-rooted at a directory of `B`.
///
/// The directory must exist for the view to be usable.
///
/// # Paths outside the view
///
/// Paths the inner backend returns that lie outside `root` cannot be
/// expressed in the view and are reported as `/`. This happens, for
/// instance, when [`realpath`](FsLink::realpath) follows a link whose
/// absolute source was written through the inner backend, or when a
/// relative source climbs above `root` with `..`. The same applies to
/// sources returned by [`readlink`](FsLink::readlink) and to paths carried
/// by errors.
///
/// # Examples
///
/// ```rust
/// use filesystems::{Downward, FilesystemExt, FsDir, MemoryFs, Path};
///
/// let memory = MemoryFs::new();
/// memory.create_directory(&Path::new(["subdir"])).unwrap();
/// memory.touch(&Path::new(["subdir", "file"])).unwrap();
///
/// let fs = Downward::new(memory, Path::new(["subdir"]));
/// assert!(fs.exists(&Path::new(["file"])).unwrap());
/// ```
#[derive(Debug)]
pub struct Downward<B> {
    inner: B,
    root: Path,
}

impl<B> Downward<B> {
    /// View `root` of `inner` as `/`.
    pub fn new(inner: B, root: Path) -> Self {
        Self { inner, root }
    }

    /// The directory of the inner backend acting as `/`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Unwrap the inner backend.
    pub fn into_inner(self) -> B {
        self.inner
    }

    fn down(&self, path: &Path) -> Path {
        self.root.descendant(path.segments().iter().cloned())
    }

    /// Paths above the view's root are reported as the root.
    fn up(&self, path: &Path) -> Path {
        path.strip_prefix(&self.root)
            .map_or_else(Path::root, |relative| relative.relative_to(&Path::root()))
    }

    fn down_any(&self, path: &AnyPath) -> AnyPath {
        match path {
            AnyPath::Absolute(path) => AnyPath::Absolute(self.down(path)),
            relative => relative.clone(),
        }
    }

    fn up_any(&self, path: AnyPath) -> AnyPath {
        match path {
            AnyPath::Absolute(path) => AnyPath::Absolute(self.up(&path)),
            relative => relative,
        }
    }

    fn up_error(&self, error: FsError) -> FsError {
        error.map_path(|path| self.up(&path))
    }
}

impl<B: FsFile> FsFile for Downward<B> {
    fn create(&self, path: &Path) -> Result<Handle, FsError> {
        self.inner
            .create(&self.down(path))
            .map_err(|e| self.up_error(e))
    }

    fn open(&self, path: &Path, mode: Mode) -> Result<Handle, FsError> {
        self.inner
            .open(&self.down(path), mode)
            .map_err(|e| self.up_error(e))
    }

    fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        self.inner
            .remove_file(&self.down(path))
            .map_err(|e| self.up_error(e))
    }

    fn stat(&self, path: &Path) -> Result<Metadata, FsError> {
        self.inner
            .stat(&self.down(path))
            .map_err(|e| self.up_error(e))
    }
}

impl<B: FsDir> FsDir for Downward<B> {
    fn create_directory(&self, path: &Path) -> Result<(), FsError> {
        if path.is_root() {
            return Err(FsError::FileExists { path: path.clone() });
        }
        self.inner
            .create_directory(&self.down(path))
            .map_err(|e| self.up_error(e))
    }

    fn list_directory(&self, path: &Path) -> Result<BTreeSet<String>, FsError> {
        self.inner
            .list_directory(&self.down(path))
            .map_err(|e| self.up_error(e))
    }

    fn remove_empty_directory(&self, path: &Path) -> Result<(), FsError> {
        if path.is_root() {
            // The view's root can no more be detached than a real root.
            return Err(if self.list_directory(path)?.is_empty() {
                FsError::PermissionError { path: path.clone() }
            } else {
                FsError::DirectoryNotEmpty { path: path.clone() }
            });
        }
        self.inner
            .remove_empty_directory(&self.down(path))
            .map_err(|e| self.up_error(e))
    }

    fn temporary_directory(&self) -> Result<Path, FsError> {
        let path = Path::root().join(Uuid::new_v4().simple().to_string());
        self.create_directory(&path)?;
        Ok(path)
    }
}

impl<B: FsLink> FsLink for Downward<B> {
    fn link(&self, source: &AnyPath, to: &Path) -> Result<(), FsError> {
        if to.is_root() {
            return Err(FsError::FileExists { path: to.clone() });
        }
        self.inner
            .link(&self.down_any(source), &self.down(to))
            .map_err(|e| self.up_error(e))
    }

    fn readlink(&self, path: &Path) -> Result<AnyPath, FsError> {
        self.inner
            .readlink(&self.down(path))
            .map(|source| self.up_any(source))
            .map_err(|e| self.up_error(e))
    }

    fn lstat(&self, path: &Path) -> Result<Metadata, FsError> {
        self.inner
            .lstat(&self.down(path))
            .map_err(|e| self.up_error(e))
    }

    fn realpath(&self, path: &Path) -> Result<Path, FsError> {
        self.inner
            .realpath(&self.down(path))
            .map(|real| self.up(&real))
            .map_err(|e| self.up_error(e))
    }
}

/// A [`Layer`] producing [`Downward`] views.
#[derive(Debug, Clone)]
pub struct DownwardLayer {
    root: Path,
}

impl DownwardLayer {
    /// Re-root backends at `root`.
    pub fn new(root: Path) -> Self {
        Self { root }
    }
}

impl<B: Filesystem> Layer<B> for DownwardLayer {
    type Backend = Downward<B>;

    fn layer(self, backend: B) -> Self::Backend {
        Downward::new(backend, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, FilesystemExt, LayerExt, MemoryFs};

    fn view() -> Downward<MemoryFs> {
        let memory = MemoryFs::new();
        memory.create_directory(&Path::new(["subdir"])).unwrap();
        memory.layer(DownwardLayer::new(Path::new(["subdir"])))
    }

    #[test]
    fn arguments_are_rooted_below() {
        let fs = view();
        fs.touch(&Path::new(["file"])).unwrap();
        assert!(fs.inner().is_file(&Path::new(["subdir", "file"])).unwrap());
        assert!(!fs.inner().exists(&Path::new(["file"])).unwrap());
    }

    #[test]
    fn error_paths_are_translated_up() {
        let fs = view();
        let err = fs.list_directory(&Path::new(["missing"])).unwrap_err();
        assert!(matches!(err, FsError::FileNotFound { ref path } if *path == Path::new(["missing"])));
    }

    #[test]
    fn absolute_link_sources_round_trip() {
        let fs = view();
        fs.create_directory(&Path::new(["target"])).unwrap();
        let source = AnyPath::from(Path::new(["target"]));
        fs.link(&source, &Path::new(["link"])).unwrap();

        assert_eq!(fs.readlink(&Path::new(["link"])).unwrap(), source);
        assert_eq!(
            fs.inner().readlink(&Path::new(["subdir", "link"])).unwrap(),
            AnyPath::from(Path::new(["subdir", "target"]))
        );
        assert_eq!(
            fs.realpath(&Path::new(["link", "x"])).unwrap(),
            Path::new(["target", "x"])
        );
    }

    #[test]
    fn relative_link_sources_pass_through() {
        let fs = view();
        let source = AnyPath::from_string("elsewhere").unwrap();
        fs.link(&source, &Path::new(["link"])).unwrap();
        assert_eq!(fs.readlink(&Path::new(["link"])).unwrap(), source);
    }

    #[test]
    fn loops_are_reported_inside_the_view() {
        let fs = view();
        let looped = Path::new(["loop"]);
        fs.link(&looped.clone().into(), &looped).unwrap();
        let err = fs.stat(&looped).unwrap_err();
        assert!(matches!(err, FsError::SymbolicLoop { ref path } if *path == looped));
    }

    #[test]
    fn view_root_behaves_like_a_root() {
        let fs = view();
        let err = fs.create_directory(&Path::root()).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::FileExists));

        let err = fs.remove_empty_directory(&Path::root()).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::PermissionError));
        assert!(fs.inner().is_dir(&Path::new(["subdir"])).unwrap());

        fs.touch(&Path::new(["file"])).unwrap();
        let err = fs.remove_empty_directory(&Path::root()).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::DirectoryNotEmpty));
    }

    #[test]
    fn temporary_directories_are_inside_the_view() {
        let fs = view();
        let tempdir = fs.temporary_directory().unwrap();
        assert_eq!(tempdir.segments().len(), 1);
        assert!(fs.inner().is_dir(&fs.root().descendant(tempdir.segments().iter().cloned())).unwrap());
    }

    #[test]
    fn into_inner_returns_backend() {
        let fs = view();
        fs.touch(&Path::new(["file"])).unwrap();
        let memory = fs.into_inner();
        assert!(memory.is_file(&Path::new(["subdir", "file"])).unwrap());
    }

    #[test]
    fn paths_outside_the_view_are_reported_as_root() {
        let fs = view();
        fs.inner().create_directory(&Path::new(["elsewhere"])).unwrap();
        let outside = AnyPath::from(Path::new(["elsewhere"]));
        fs.inner()
            .link(&outside, &Path::new(["subdir", "escape"]))
            .unwrap();

        let escape = Path::new(["escape"]);
        assert_eq!(fs.realpath(&escape).unwrap(), Path::root());
        assert_eq!(fs.readlink(&escape).unwrap(), AnyPath::from(Path::root()));
    }
}
