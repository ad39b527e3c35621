use std::fmt;
use std::io::SeekFrom;

use bitflags::bitflags;
use log::warn;
use num_enum::TryFromPrimitive;

use crate::{
    already_closed_error, io_failure_error, not_seekable_error,
    registry::{HandleId, HandleRegistry},
    unsupported_error, Result,
};

bitflags! {
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct StreamCaps: u32 {
        const READ = 1;
        const WRITE = 2;
        const SEEK = 4;
    }
}

#[repr(i32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, TryFromPrimitive)]
pub enum Whence {
    Start = 0,
    Current = 1,
    End = 2,
}

impl Whence {
    pub fn from_raw(raw: i32) -> Result<Self> {
        Self::try_from(raw).map_err(|_| unsupported_error!("unknown seek whence"))
    }

    pub fn seek_from(self, offset: i64) -> Result<SeekFrom> {
        match self {
            Whence::Start if offset < 0 => Err(io_failure_error!("seek before start of stream")),
            Whence::Start => Ok(SeekFrom::Start(offset as u64)),
            Whence::Current => Ok(SeekFrom::Current(offset)),
            Whence::End => Ok(SeekFrom::End(offset)),
        }
    }
}

/// An abstract byte stream with an explicit capability set. Implementations
/// override exactly the operations their capabilities declare; the defaults
/// report the matching failure for everything else.
pub trait Stream: Send {
    fn caps(&self) -> StreamCaps;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Err(unsupported_error!("stream is not readable"))
    }

    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(unsupported_error!("stream is not writable"))
    }

    fn seek(&mut self, _offset: i64, _whence: Whence) -> Result<u64> {
        Err(not_seekable_error!("stream is not seekable"))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One open logical stream. The capability set is fixed at open time as the
/// intersection of what the stream supports and what the open granted; the
/// cursor is advisory, the stream's own position is authoritative.
pub struct StreamHandle {
    stream: Option<Box<dyn Stream>>,
    caps: StreamCaps,
    pos: u64,
    registration: Option<(HandleId, HandleRegistry)>,
}

impl StreamHandle {
    pub fn new(stream: Box<dyn Stream>, granted: StreamCaps) -> Self {
        let caps = stream.caps() & granted;

        Self {
            stream: Some(stream),
            caps,
            pos: 0,
            registration: None,
        }
    }

    pub fn caps(&self) -> StreamCaps {
        self.caps
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    pub fn id(&self) -> Option<HandleId> {
        self.registration.as_ref().map(|(id, _)| *id)
    }

    pub(crate) fn attach_registry(&mut self, id: HandleId, registry: HandleRegistry) {
        self.registration = Some((id, registry));
    }

    /// Reads up to `buf.len()` bytes. `Ok(0)` on a non-empty buffer denotes
    /// end of stream and is not an error.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or_else(|| already_closed_error!("read on closed handle"))?;

        if !self.caps.contains(StreamCaps::READ) {
            return Err(unsupported_error!("handle is not readable"));
        }

        let read_len = stream.read(buf)?;
        self.pos += read_len as u64;

        if let Some((id, registry)) = &self.registration {
            registry.record_read(*id, read_len as u64);
        }

        Ok(read_len)
    }

    /// Writes `buf`, returning the count actually written. A short count is
    /// only possible on partial-write transports; callers loop.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or_else(|| already_closed_error!("write on closed handle"))?;

        if !self.caps.contains(StreamCaps::WRITE) {
            return Err(unsupported_error!("handle is not writable"));
        }

        let write_len = stream.write(buf)?;
        self.pos += write_len as u64;

        if let Some((id, registry)) = &self.registration {
            registry.record_write(*id, write_len as u64);
        }

        Ok(write_len)
    }

    /// Returns the new absolute position. `NotSeekable` leaves the cursor
    /// untouched so the engine can fall back to sequential access.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let stream = self.stream.as_mut().ok_or_else(|| already_closed_error!("seek on closed handle"))?;

        if !self.caps.contains(StreamCaps::SEEK) {
            return Err(not_seekable_error!("handle is not seekable"));
        }

        let pos = stream.seek(offset, whence)?;
        self.pos = pos;

        Ok(pos)
    }

    /// Releases the underlying stream exactly once. The registry entry is
    /// retired whether or not the stream's own close succeeds.
    pub fn close(&mut self) -> Result<()> {
        let mut stream = self.stream.take().ok_or_else(|| already_closed_error!("handle closed twice"))?;
        let result = stream.close();

        if let Some((id, registry)) = self.registration.take() {
            registry.unregister(id);
        }

        result
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle")
            .field("caps", &self.caps)
            .field("pos", &self.pos)
            .field("closed", &self.is_closed())
            .field("id", &self.id())
            .finish()
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if self.stream.is_some() {
            if let Some((id, _)) = &self.registration {
                warn!("handle {} dropped without close", id);
            }
        }
    }
}
