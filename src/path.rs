//! Path values used by every filesystem backend.
//!
//! Paths here are not `std::path::Path`. They are immutable, ordered lists
//! of opaque string segments, which keeps equality structural and makes the
//! in-memory backend independent of the host's path rules.
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`Path`] | Absolute path; the root has zero segments |
//! | [`RelativePath`] | Segments that must be anchored before use |
//! | [`AnyPath`] | Either of the above, as produced by parsing or stored by links |

use std::fmt;
use std::ops::Div;
use std::str::FromStr;

use crate::FsError;

/// The separator used when parsing and rendering paths.
pub const SEPARATOR: char = std::path::MAIN_SEPARATOR;

/// An absolute path.
///
/// # Examples
///
/// ```rust
/// use filesystems::Path;
///
/// let path = Path::root() / "etc" / "hosts";
/// assert_eq!(path.to_string(), "/etc/hosts");
/// assert_eq!(path.basename(), "hosts");
/// assert_eq!(path.parent(), Path::new(["etc"]));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The root path, which has no segments.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build an absolute path from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse an OS path string.
    ///
    /// A leading separator produces an absolute path, anything else a
    /// relative one. One trailing separator is ignored. Repeated separators
    /// are kept as empty segments.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if `value` is empty
    ///
    /// # Examples
    ///
    /// ```rust
    /// use filesystems::{AnyPath, Path, RelativePath};
    ///
    /// assert_eq!(
    ///     Path::from_string("/a/b/").unwrap(),
    ///     AnyPath::Absolute(Path::new(["a", "b"])),
    /// );
    /// assert_eq!(
    ///     Path::from_string("a//b").unwrap(),
    ///     AnyPath::Relative(RelativePath::new(["a", "", "b"])),
    /// );
    /// ```
    pub fn from_string(value: &str) -> Result<AnyPath, FsError> {
        if value.is_empty() {
            return Err(FsError::InvalidPath {
                value: value.to_owned(),
            });
        }

        let trimmed = match value.strip_suffix(SEPARATOR) {
            Some(rest) if !rest.is_empty() => rest,
            _ => value,
        };

        match trimmed.strip_prefix(SEPARATOR) {
            Some("") => Ok(AnyPath::Absolute(Path::root())),
            Some(rest) => Ok(AnyPath::Absolute(Path::new(rest.split(SEPARATOR)))),
            None => Ok(AnyPath::Relative(RelativePath::new(
                trimmed.split(SEPARATOR),
            ))),
        }
    }

    /// The process's current working directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::Io`] if the working directory cannot be read
    pub fn cwd() -> Result<Self, FsError> {
        let cwd = std::env::current_dir().map_err(|source| FsError::Io {
            path: Path::root(),
            source,
        })?;
        let rendered = cwd.to_string_lossy();
        Ok(Path::from_string(&rendered)?.relative_to(&Path::root()))
    }

    /// The segments making up this path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Traverse to a descendant of this path.
    pub fn descendant<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = self.clone();
        path.segments.extend(segments.into_iter().map(Into::into));
        path
    }

    /// Traverse to a direct child of this path.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        self.descendant([segment])
    }

    /// The parent of this path. The root is its own parent.
    pub fn parent(&self) -> Self {
        let mut path = self.clone();
        path.segments.pop();
        path
    }

    /// Traverse to a sibling of this path.
    ///
    /// # Errors
    ///
    /// - [`FsError::NoSibling`] if this is the root
    pub fn sibling(&self, name: impl Into<String>) -> Result<Self, FsError> {
        if self.is_root() {
            return Err(FsError::NoSibling);
        }
        Ok(self.parent().join(name))
    }

    /// The last segment, or `""` for the root.
    pub fn basename(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// The parent, rendered as a string.
    pub fn dirname(&self) -> String {
        self.parent().to_string()
    }

    /// The top-down chain of non-root ancestors, ending with this path.
    ///
    /// Every call returns a new iterator.
    ///
    /// ```rust
    /// use filesystems::Path;
    ///
    /// let path = Path::new(["a", "b", "c"]);
    /// let chain: Vec<String> = path.heritage().map(|p| p.to_string()).collect();
    /// assert_eq!(chain, ["/a", "/a/b", "/a/b/c"]);
    /// ```
    pub fn heritage(&self) -> Heritage<'_> {
        Heritage {
            path: self,
            depth: 0,
        }
    }

    /// Absolute paths resolve to themselves regardless of `base`.
    pub fn relative_to(&self, _base: &Path) -> Self {
        self.clone()
    }

    /// The segments after `base`, if `base` is a prefix of this path.
    pub fn strip_prefix(&self, base: &Path) -> Option<RelativePath> {
        self.segments
            .strip_prefix(base.segments.as_slice())
            .map(|rest| RelativePath::new(rest.iter().cloned()))
    }

    /// Whether `base` is this path or one of its ancestors.
    pub fn starts_with(&self, base: &Path) -> bool {
        self.segments.starts_with(&base.segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{SEPARATOR}");
        }
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({:?})", self.to_string())
    }
}

impl<S: Into<String>> Div<S> for Path {
    type Output = Path;

    fn div(self, segment: S) -> Path {
        let mut path = self;
        path.segments.push(segment.into());
        path
    }
}

impl<S: Into<String>> Div<S> for &Path {
    type Output = Path;

    fn div(self, segment: S) -> Path {
        self.join(segment)
    }
}

/// Iterator returned by [`Path::heritage`].
#[derive(Debug, Clone)]
pub struct Heritage<'a> {
    path: &'a Path,
    depth: usize,
}

impl Iterator for Heritage<'_> {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        if self.depth >= self.path.segments.len() {
            return None;
        }
        self.depth += 1;
        Some(Path::new(self.path.segments[..self.depth].iter().cloned()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.path.segments.len() - self.depth;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Heritage<'_> {}

/// A path that has not been anchored to a root yet.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelativePath {
    segments: Vec<String>,
}

impl RelativePath {
    /// Build a relative path from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The segments making up this path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Traverse to a descendant of this path.
    pub fn descendant<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = self.clone();
        path.segments.extend(segments.into_iter().map(Into::into));
        path
    }

    /// The last segment, or `""` if there are none.
    pub fn basename(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Anchor this path under `base`.
    pub fn relative_to(&self, base: &Path) -> Path {
        base.descendant(self.segments.iter().cloned())
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelativePath({:?})", self.to_string())
    }
}

impl<S: Into<String>> Div<S> for RelativePath {
    type Output = RelativePath;

    fn div(self, segment: S) -> RelativePath {
        let mut path = self;
        path.segments.push(segment.into());
        path
    }
}

/// Either an absolute or a relative path.
///
/// This is what [`Path::from_string`] produces and what symbolic links
/// record as their source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnyPath {
    /// A rooted path.
    Absolute(Path),
    /// A path that still needs a base.
    Relative(RelativePath),
}

impl AnyPath {
    /// Parse an OS path string. See [`Path::from_string`].
    pub fn from_string(value: &str) -> Result<Self, FsError> {
        Path::from_string(value)
    }

    /// Whether this is a rooted path.
    pub fn is_absolute(&self) -> bool {
        matches!(self, AnyPath::Absolute(_))
    }

    /// Resolve against `base`; absolute paths ignore it.
    pub fn relative_to(&self, base: &Path) -> Path {
        match self {
            AnyPath::Absolute(path) => path.relative_to(base),
            AnyPath::Relative(path) => path.relative_to(base),
        }
    }

    /// Resolve against the current working directory.
    pub fn anchored(&self) -> Result<Path, FsError> {
        match self {
            AnyPath::Absolute(path) => Ok(path.clone()),
            AnyPath::Relative(path) => Ok(path.relative_to(&Path::cwd()?)),
        }
    }

    /// The segments of the underlying path.
    pub fn segments(&self) -> &[String] {
        match self {
            AnyPath::Absolute(path) => path.segments(),
            AnyPath::Relative(path) => path.segments(),
        }
    }
}

impl fmt::Display for AnyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyPath::Absolute(path) => path.fmt(f),
            AnyPath::Relative(path) => path.fmt(f),
        }
    }
}

impl FromStr for AnyPath {
    type Err = FsError;

    fn from_str(value: &str) -> Result<Self, FsError> {
        Path::from_string(value)
    }
}

impl From<Path> for AnyPath {
    fn from(path: Path) -> Self {
        AnyPath::Absolute(path)
    }
}

impl From<&Path> for AnyPath {
    fn from(path: &Path) -> Self {
        AnyPath::Absolute(path.clone())
    }
}

impl From<RelativePath> for AnyPath {
    fn from(path: RelativePath) -> Self {
        AnyPath::Relative(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendant_appends_segments() {
        assert_eq!(
            Path::new(["a", "b"]).descendant(["c"]),
            Path::new(["a", "b", "c"])
        );
        assert_eq!(
            Path::new(["a"]).descendant(["b", "c"]),
            Path::new(["a", "b", "c"])
        );
    }

    #[test]
    fn div_is_single_segment_descendant() {
        assert_eq!(Path::root() / "a" / "b", Path::new(["a", "b"]));
        let base = Path::new(["a"]);
        assert_eq!(&base / "b", Path::new(["a", "b"]));
    }

    #[test]
    fn parent_drops_last_segment() {
        assert_eq!(Path::new(["a", "b"]).parent(), Path::new(["a"]));
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(Path::root().parent(), Path::root());
    }

    #[test]
    fn sibling_replaces_last_segment() {
        assert_eq!(
            Path::new(["a", "b"]).sibling("c").unwrap(),
            Path::new(["a", "c"])
        );
    }

    #[test]
    fn root_has_no_sibling() {
        assert!(matches!(Path::root().sibling("a"), Err(FsError::NoSibling)));
    }

    #[test]
    fn basename_and_dirname() {
        let path = Path::new(["a", "b"]);
        assert_eq!(path.basename(), "b");
        assert_eq!(path.dirname(), "/a");
        assert_eq!(Path::root().basename(), "");
        assert_eq!(Path::root().dirname(), "/");
    }

    #[test]
    fn heritage_is_top_down_and_restartable() {
        let path = Path::new(["a", "b", "c"]);
        let expected = vec![
            Path::new(["a"]),
            Path::new(["a", "b"]),
            Path::new(["a", "b", "c"]),
        ];
        assert_eq!(path.heritage().collect::<Vec<_>>(), expected);
        assert_eq!(path.heritage().collect::<Vec<_>>(), expected);
        assert_eq!(path.heritage().len(), 3);
        assert_eq!(Path::root().heritage().count(), 0);
    }

    #[test]
    fn absolute_relative_to_is_identity() {
        let path = Path::new(["a"]);
        assert_eq!(path.relative_to(&Path::new(["elsewhere"])), path);
    }

    #[test]
    fn relative_path_anchors_under_base() {
        let relative = RelativePath::new(["source", "dir"]);
        assert_eq!(
            relative.relative_to(&Path::new(["tmp"])),
            Path::new(["tmp", "source", "dir"])
        );
    }

    #[test]
    fn from_string_absolute() {
        assert_eq!(
            Path::from_string("/a/b/c").unwrap(),
            AnyPath::Absolute(Path::new(["a", "b", "c"]))
        );
    }

    #[test]
    fn from_string_root() {
        assert_eq!(
            Path::from_string("/").unwrap(),
            AnyPath::Absolute(Path::root())
        );
    }

    #[test]
    fn from_string_relative() {
        assert_eq!(
            Path::from_string("some/path/provided").unwrap(),
            AnyPath::Relative(RelativePath::new(["some", "path", "provided"]))
        );
    }

    #[test]
    fn from_string_strips_one_trailing_separator() {
        assert_eq!(
            Path::from_string("/a/b/").unwrap(),
            AnyPath::Absolute(Path::new(["a", "b"]))
        );
        assert_eq!(
            Path::from_string("a/").unwrap(),
            AnyPath::Relative(RelativePath::new(["a"]))
        );
    }

    #[test]
    fn from_string_keeps_repeated_separators() {
        assert_eq!(
            Path::from_string("/a//b").unwrap(),
            AnyPath::Absolute(Path::new(["a", "", "b"]))
        );
    }

    #[test]
    fn from_string_rejects_empty() {
        assert!(matches!(
            Path::from_string(""),
            Err(FsError::InvalidPath { .. })
        ));
    }

    #[test]
    fn display_round_trips_through_from_string() {
        for text in ["/", "/a", "/a/b/c", "a", "a/b"] {
            assert_eq!(Path::from_string(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn strip_prefix_returns_remaining_segments() {
        let path = Path::new(["base", "x", "y"]);
        assert_eq!(
            path.strip_prefix(&Path::new(["base"])),
            Some(RelativePath::new(["x", "y"]))
        );
        assert_eq!(path.strip_prefix(&Path::new(["other"])), None);
        assert!(path.starts_with(&Path::root()));
    }

    #[test]
    fn cwd_matches_std() {
        let expected = std::env::current_dir().unwrap();
        assert_eq!(Path::cwd().unwrap().to_string(), expected.to_string_lossy());
    }

    #[test]
    fn anchored_relative_uses_cwd() {
        let relative = AnyPath::from_string("a/b/c").unwrap();
        assert_eq!(
            relative.anchored().unwrap(),
            Path::cwd().unwrap().descendant(["a", "b", "c"])
        );
    }
}
