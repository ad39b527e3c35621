use std::sync::{Arc, RwLock};

use crate::{
    error::Error,
    io_failure_error,
    stream::{Stream, StreamCaps, Whence},
    Result,
};

/// A growable byte buffer shared between stream instances, so bytes written
/// through one handle can be read back through another.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    data: Arc<RwLock<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().map(|data| data.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.data.read().map(|data| data.clone()).unwrap_or_default()
    }
}

/// In-memory stream over a [`SharedBuffer`]: readable, writable, seekable.
pub struct MemoryStream {
    buffer: SharedBuffer,
    pos: usize,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::with_buffer(SharedBuffer::new())
    }

    pub fn with_buffer(buffer: SharedBuffer) -> Self {
        Self { buffer, pos: 0 }
    }

    pub fn buffer(&self) -> SharedBuffer {
        self.buffer.clone()
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream for MemoryStream {
    fn caps(&self) -> StreamCaps {
        StreamCaps::READ | StreamCaps::WRITE | StreamCaps::SEEK
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let data = self.buffer.data.read().map_err(|err| Error::IoFailure(err.to_string().into()))?;

        if self.pos >= data.len() {
            return Ok(0);
        }

        let read_len = buf.len().min(data.len() - self.pos);
        buf[..read_len].copy_from_slice(&data[self.pos..self.pos + read_len]);
        drop(data);

        self.pos += read_len;

        Ok(read_len)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let mut data = self.buffer.data.write().map_err(|err| Error::IoFailure(err.to_string().into()))?;

        if self.pos < data.len() {
            let overlap = (data.len() - self.pos).min(buf.len());
            data[self.pos..self.pos + overlap].copy_from_slice(&buf[..overlap]);
            data.extend_from_slice(&buf[overlap..]);
        } else {
            // Writing past the end zero-fills the gap.
            data.resize(self.pos, 0);
            data.extend_from_slice(buf);
        }
        drop(data);

        self.pos += buf.len();

        Ok(buf.len())
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let len = self.buffer.len() as i64;
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.pos as i64,
            Whence::End => len,
        };

        let target = base
            .checked_add(offset)
            .ok_or_else(|| io_failure_error!("seek offset overflow"))?;

        if target < 0 {
            return Err(io_failure_error!("seek before start of stream"));
        }

        self.pos = target as usize;

        Ok(self.pos as u64)
    }
}

/// A consuming front-read buffer: readable only, never seekable.
pub struct SequentialBuffer {
    data: Vec<u8>,
    pos: usize,
}

impl SequentialBuffer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl Stream for SequentialBuffer {
    fn caps(&self) -> StreamCaps {
        StreamCaps::READ
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let read_len = buf.len().min(self.data.len() - self.pos);
        buf[..read_len].copy_from_slice(&self.data[self.pos..self.pos + read_len]);
        self.pos += read_len;

        Ok(read_len)
    }
}
