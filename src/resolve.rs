//! Link resolution shared by the backends.

use std::collections::HashSet;

use crate::{AnyPath, FsError, Path};

/// Link dereferences allowed in one resolution (`MAXSYMLINKS`).
pub(crate) const MAX_LINK_DEREFERENCES: usize = 40;

/// Resolve every link in `path`.
///
/// `read_link` returns the recorded source of the link at a canonical path,
/// `None` if nothing there is a link, or an error if the path cannot be
/// inspected. Components that do not exist are kept as given.
///
/// Each segment is resolved on its own: a link seen twice while resolving
/// one segment is a loop. A global budget of [`MAX_LINK_DEREFERENCES`]
/// also stops links that expand into themselves, such as `a -> a/x`. Either
/// way the error names the link at which resolution gave up.
///
/// `.` and `..` are only interpreted inside link sources; segments of
/// `path` itself are taken literally.
pub(crate) fn realpath<F>(path: &Path, read_link: F) -> Result<Path, FsError>
where
    F: Fn(&Path) -> Result<Option<AnyPath>, FsError>,
{
    let mut budget = MAX_LINK_DEREFERENCES;
    walk(Path::root(), path.segments(), false, &read_link, &mut budget)
}

fn walk<F>(
    mut real: Path,
    segments: &[String],
    in_source: bool,
    read_link: &F,
    budget: &mut usize,
) -> Result<Path, FsError>
where
    F: Fn(&Path) -> Result<Option<AnyPath>, FsError>,
{
    for segment in segments {
        if in_source {
            match segment.as_str() {
                "." => continue,
                ".." => {
                    real = real.parent();
                    continue;
                }
                _ => {}
            }
        }

        let mut candidate = real.join(segment.as_str());
        let mut seen = HashSet::new();
        while let Some(source) = read_link(&candidate)? {
            if *budget == 0 || !seen.insert(candidate.clone()) {
                return Err(FsError::SymbolicLoop { path: candidate });
            }
            *budget -= 1;
            candidate = anchor(&source, &candidate.parent(), read_link, budget)?;
        }
        real = candidate;
    }
    Ok(real)
}

/// Where a link in `directory` recording `source` points. Everything but
/// the final component is resolved.
fn anchor<F>(
    source: &AnyPath,
    directory: &Path,
    read_link: &F,
    budget: &mut usize,
) -> Result<Path, FsError>
where
    F: Fn(&Path) -> Result<Option<AnyPath>, FsError>,
{
    let base = match source {
        AnyPath::Absolute(_) => Path::root(),
        AnyPath::Relative(_) => directory.clone(),
    };
    let Some((last, init)) = source.segments().split_last() else {
        return Ok(base);
    };
    let parent = walk(base, init, true, read_link, budget)?;
    Ok(match last.as_str() {
        "." => parent,
        ".." => parent.parent(),
        name => parent.join(name),
    })
}
