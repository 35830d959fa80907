//! The node tree behind [`MemoryFs`](super::MemoryFs).
//!
//! The tree only ever owns nodes through directories, so it stays a tree
//! no matter how links point. Links are stored unresolved and followed on
//! every lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::resolve;
use crate::{AnyPath, FileType, FsError, Metadata, Path};

/// File contents, shared between the tree and open writers.
pub(crate) type Buffer = Arc<Mutex<Vec<u8>>>;

#[derive(Debug)]
pub(crate) enum Node {
    Directory(BTreeMap<String, Node>),
    File(Buffer),
    Link(AnyPath),
}

impl Node {
    pub(crate) fn empty_directory() -> Self {
        Node::Directory(BTreeMap::new())
    }

    pub(crate) fn metadata(&self) -> Metadata {
        match self {
            Node::Directory(_) => Metadata {
                file_type: FileType::Directory,
                size: 0,
            },
            Node::File(contents) => Metadata {
                file_type: FileType::File,
                size: contents.lock().len() as u64,
            },
            Node::Link(source) => Metadata {
                file_type: FileType::Symlink,
                size: source.to_string().len() as u64,
            },
        }
    }
}

/// What a lookup of a canonical path found.
#[derive(Debug)]
pub(crate) enum Entry<'a> {
    Found(&'a Node),
    /// The parent is a directory without this child.
    Vacant,
    /// Some ancestor is a file.
    UnderFile,
    /// Some ancestor does not exist.
    Missing,
}

#[derive(Debug)]
pub(crate) struct Tree {
    root: Node,
}

impl Default for Tree {
    fn default() -> Self {
        Self {
            root: Node::empty_directory(),
        }
    }
}

impl Tree {
    /// Look up a canonical path without following any link.
    pub(crate) fn lookup(&self, path: &Path) -> Entry<'_> {
        let segments = path.segments();
        let mut node = &self.root;
        for (depth, segment) in segments.iter().enumerate() {
            node = match node {
                Node::Directory(children) => match children.get(segment) {
                    Some(child) => child,
                    None if depth + 1 == segments.len() => return Entry::Vacant,
                    None => return Entry::Missing,
                },
                Node::File(_) => return Entry::UnderFile,
                Node::Link(_) => return Entry::Missing,
            };
        }
        Entry::Found(node)
    }

    /// Resolve every link in `path`.
    pub(crate) fn realpath(&self, path: &Path) -> Result<Path, FsError> {
        resolve::realpath(path, |candidate| match self.lookup(candidate) {
            Entry::Found(Node::Link(source)) => Ok(Some(source.clone())),
            _ => Ok(None),
        })
    }

    /// The canonical location of `path` itself: its parent is resolved,
    /// its final segment is not.
    ///
    /// A loop while resolving the parent is reported at `loop_path`.
    pub(crate) fn locate(&self, path: &Path, loop_path: &Path) -> Result<Path, FsError> {
        if path.is_root() {
            return Ok(Path::root());
        }
        let parent = self
            .realpath(&path.parent())
            .map_err(|e| e.map_path(|_| loop_path.clone()))?;
        Ok(parent.join(path.basename()))
    }

    /// Resolve `path` fully, reporting a loop at `path`.
    pub(crate) fn follow(&self, path: &Path) -> Result<Path, FsError> {
        self.realpath(path)
            .map_err(|e| e.map_path(|_| path.clone()))
    }

    fn children_mut(&mut self, directory: &Path) -> Option<&mut BTreeMap<String, Node>> {
        let mut node = &mut self.root;
        for segment in directory.segments() {
            node = match node {
                Node::Directory(children) => children.get_mut(segment)?,
                _ => return None,
            };
        }
        match node {
            Node::Directory(children) => Some(children),
            _ => None,
        }
    }

    /// Place `node` at a canonical location whose parent is a directory.
    pub(crate) fn insert(&mut self, location: &Path, node: Node) {
        let name = location.basename().to_owned();
        if let Some(children) = self.children_mut(&location.parent()) {
            children.insert(name, node);
        }
    }

    /// Detach whatever is at a canonical location.
    pub(crate) fn detach(&mut self, location: &Path) -> Option<Node> {
        self.children_mut(&location.parent())?
            .remove(location.basename())
    }

    pub(crate) fn root_is_empty(&self) -> bool {
        matches!(&self.root, Node::Directory(children) if children.is_empty())
    }
}
