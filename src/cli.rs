//! Command-line argument parsing for paths.
//!
//! With the `clap` feature, [`AnyPath`] can be used directly as an argument
//! type:
//!
//! ```rust
//! use clap::{Arg, Command, value_parser};
//! use filesystems::{AnyPath, Path};
//!
//! let matches = Command::new("tool")
//!     .arg(Arg::new("target").value_parser(value_parser!(AnyPath)))
//!     .get_matches_from(["tool", "/srv/data"]);
//!
//! let target: &AnyPath = matches.get_one("target").unwrap();
//! assert_eq!(*target, AnyPath::from(Path::new(["srv", "data"])));
//! ```

use std::ffi::OsStr;

use clap::builder::{TypedValueParser, ValueParserFactory};
use clap::error::ErrorKind;
use clap::{Arg, Command};

use crate::AnyPath;

/// Parses arguments with [`AnyPath::from_string`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PathValueParser;

impl TypedValueParser for PathValueParser {
    type Value = AnyPath;

    fn parse_ref(
        &self,
        cmd: &Command,
        _arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let value = value
            .to_str()
            .ok_or_else(|| clap::Error::new(ErrorKind::InvalidUtf8).with_cmd(cmd))?;
        AnyPath::from_string(value)
            .map_err(|error| clap::Error::raw(ErrorKind::InvalidValue, error).with_cmd(cmd))
    }
}

impl ValueParserFactory for AnyPath {
    type Parser = PathValueParser;

    fn value_parser() -> Self::Parser {
        PathValueParser
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Path, RelativePath};

    fn command() -> Command {
        Command::new("tool").arg(Arg::new("path").value_parser(PathValueParser))
    }

    #[test]
    fn absolute_argument() {
        let matches = command().try_get_matches_from(["tool", "/a/b"]).unwrap();
        let path: &AnyPath = matches.get_one("path").unwrap();
        assert_eq!(*path, AnyPath::from(Path::new(["a", "b"])));
    }

    #[test]
    fn relative_argument() {
        let matches = command().try_get_matches_from(["tool", "a/b"]).unwrap();
        let path: &AnyPath = matches.get_one("path").unwrap();
        assert_eq!(*path, AnyPath::from(RelativePath::new(["a", "b"])));
    }

    #[test]
    fn empty_argument_is_rejected() {
        let err = command().try_get_matches_from(["tool", ""]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }
}
