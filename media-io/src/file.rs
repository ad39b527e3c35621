use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, Write},
    path::Path,
};

use crate::{
    bridge::AccessMode,
    error::Error,
    stream::{Stream, StreamCaps, Whence},
    Result,
};

/// File-backed stream. Only the write-only mode may create or truncate;
/// read+write update requires the target to exist.
pub struct FileStream {
    file: File,
    caps: StreamCaps,
}

impl FileStream {
    pub fn open(path: &Path, mode: AccessMode) -> Result<Self> {
        let mut options = OpenOptions::new();

        match mode {
            AccessMode::ReadWrite => options.read(true).write(true),
            AccessMode::Read => options.read(true),
            AccessMode::Write => options.write(true).create(true).truncate(true),
        };

        let file = options
            .open(path)
            .map_err(|err| Error::OpenFailed(format!("{}: {}", path.display(), err).into()))?;

        Ok(Self {
            file,
            caps: mode.caps(),
        })
    }
}

impl Stream for FileStream {
    fn caps(&self) -> StreamCaps {
        self.caps
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.file.read(buf)?)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Ok(self.file.write(buf)?)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        Ok(self.file.seek(whence.seek_from(offset)?)?)
    }

    fn close(&mut self) -> Result<()> {
        Ok(self.file.flush()?)
    }
}
