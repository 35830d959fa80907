//! # Layer Trait
//!
//! Tower-style composition for filesystem backends.
//!
//! ## Overview
//!
//! A [`Layer`] wraps a backend in another backend. The wrapper implements
//! the same primitive traits, so every derived operation keeps working on
//! top of it.
//!
//! ```text
//! Backend ──▶ Layer::layer() ──▶ Wrapped Backend
//! ```
//!
//! Each wrapper provides:
//! 1. A struct that implements [`FsFile`](crate::FsFile),
//!    [`FsDir`](crate::FsDir) and [`FsLink`](crate::FsLink)
//! 2. A `Layer` implementation that creates it
//!
//! ## Fluent Composition
//!
//! ```rust
//! use filesystems::{DownwardLayer, FilesystemExt, FsDir, LayerExt, MemoryFs, Path};
//!
//! let memory = MemoryFs::new();
//! memory.create_directory(&Path::new(["jail"])).unwrap();
//!
//! let jailed = memory.layer(DownwardLayer::new(Path::new(["jail"])));
//! jailed.touch(&Path::new(["inside"])).unwrap();
//! assert!(jailed.inner().is_file(&Path::new(["jail", "inside"])).unwrap());
//! ```

use crate::Filesystem;

/// A layer that wraps a backend to change how it behaves.
///
/// # Type Parameters
///
/// - `B`: The backend type being wrapped
///
/// # Design Notes
///
/// - `layer(self, backend)` consumes both the layer and backend
/// - The resulting `Backend` type should implement [`Filesystem`] again
pub trait Layer<B> {
    /// The resulting backend type after applying this layer.
    type Backend;

    /// Wrap the given backend with this layer's functionality.
    fn layer(self, backend: B) -> Self::Backend;
}

/// Extension trait for fluent layer composition.
///
/// Provides the `.layer()` method on any [`Filesystem`] backend.
pub trait LayerExt: Filesystem + Sized {
    /// Apply a layer to this backend.
    fn layer<L: Layer<Self>>(self, layer: L) -> L::Backend {
        layer.layer(self)
    }
}

// Blanket implementation - any backend gets LayerExt for free
impl<B: Filesystem> LayerExt for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnyPath, FsDir, FsError, FsFile, FsLink, Handle, MemoryFs, Metadata, Mode, Path};
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts primitive calls and forwards them.
    struct Counting<B> {
        inner: B,
        calls: AtomicUsize,
    }

    impl<B> Counting<B> {
        fn tick(&self) {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    impl<B: FsFile> FsFile for Counting<B> {
        fn create(&self, path: &Path) -> Result<Handle, FsError> {
            self.tick();
            self.inner.create(path)
        }
        fn open(&self, path: &Path, mode: Mode) -> Result<Handle, FsError> {
            self.tick();
            self.inner.open(path, mode)
        }
        fn remove_file(&self, path: &Path) -> Result<(), FsError> {
            self.tick();
            self.inner.remove_file(path)
        }
        fn stat(&self, path: &Path) -> Result<Metadata, FsError> {
            self.tick();
            self.inner.stat(path)
        }
    }

    impl<B: FsDir> FsDir for Counting<B> {
        fn create_directory(&self, path: &Path) -> Result<(), FsError> {
            self.tick();
            self.inner.create_directory(path)
        }
        fn list_directory(&self, path: &Path) -> Result<BTreeSet<String>, FsError> {
            self.tick();
            self.inner.list_directory(path)
        }
        fn remove_empty_directory(&self, path: &Path) -> Result<(), FsError> {
            self.tick();
            self.inner.remove_empty_directory(path)
        }
        fn temporary_directory(&self) -> Result<Path, FsError> {
            self.tick();
            self.inner.temporary_directory()
        }
    }

    impl<B: FsLink> FsLink for Counting<B> {
        fn link(&self, source: &AnyPath, to: &Path) -> Result<(), FsError> {
            self.tick();
            self.inner.link(source, to)
        }
        fn readlink(&self, path: &Path) -> Result<AnyPath, FsError> {
            self.tick();
            self.inner.readlink(path)
        }
        fn lstat(&self, path: &Path) -> Result<Metadata, FsError> {
            self.tick();
            self.inner.lstat(path)
        }
        fn realpath(&self, path: &Path) -> Result<Path, FsError> {
            self.tick();
            self.inner.realpath(path)
        }
    }

    struct CountingLayer;

    impl<B: Filesystem> Layer<B> for CountingLayer {
        type Backend = Counting<B>;

        fn layer(self, backend: B) -> Self::Backend {
            Counting {
                inner: backend,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[test]
    fn layer_ext_is_auto_implemented() {
        fn _check<B: Filesystem + LayerExt>() {}
    }

    #[test]
    fn derived_operations_run_through_the_layer() {
        use crate::FilesystemExt;

        let counted = MemoryFs::new().layer(CountingLayer);
        let path = Path::new(["file"]);
        counted.set_contents(&path, b"x").unwrap();
        assert!(counted.is_file(&path).unwrap());
        assert_eq!(counted.calls.load(Ordering::Relaxed), 2);

        fn _takes_filesystem<T: Filesystem>(_: &T) {}
        _takes_filesystem(&counted);
    }
}
