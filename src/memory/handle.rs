//! Open files of the in-memory backend.

use std::io::{self, Cursor, Read, Write};

use super::tree::Buffer;

/// A handle is either a reader over a snapshot taken at open time or a
/// writer appending straight into the buffer installed in the tree.
#[derive(Debug)]
pub(crate) enum MemoryHandle {
    Reader(Cursor<Vec<u8>>),
    Writer(Buffer),
}

fn unsupported(operation: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("file not open for {operation}"),
    )
}

impl Read for MemoryHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            MemoryHandle::Reader(cursor) => cursor.read(buf),
            MemoryHandle::Writer(_) => Err(unsupported("reading")),
        }
    }
}

impl Write for MemoryHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            MemoryHandle::Reader(_) => Err(unsupported("writing")),
            MemoryHandle::Writer(contents) => {
                contents.lock().extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
