use std::path::PathBuf;

use bitflags::bitflags;
use log::debug;

use crate::{
    file::FileStream,
    open_failed_error,
    stream::{StreamCaps, StreamHandle},
    unsupported_error, Result,
};

bitflags! {
    /// The engine's open-flag contract: bit 0 requests read access, bit 1
    /// requests write access. No other bit carries meaning.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct OpenFlags: u32 {
        const READ = 1;
        const WRITE = 2;
    }
}

/// Access intent resolved from [`OpenFlags`]. The combined case is matched
/// first; it is a superset of the single-bit cases.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessMode {
    ReadWrite,
    Read,
    Write,
}

impl AccessMode {
    pub fn from_flags(flags: OpenFlags) -> Result<Self> {
        if flags.contains(OpenFlags::READ | OpenFlags::WRITE) {
            Ok(AccessMode::ReadWrite)
        } else if flags.contains(OpenFlags::READ) {
            Ok(AccessMode::Read)
        } else if flags.contains(OpenFlags::WRITE) {
            Ok(AccessMode::Write)
        } else {
            Err(unsupported_error!("open flags select neither read nor write"))
        }
    }

    /// Checked translation of a raw engine bitmask. Bits beyond the two
    /// contract bits are rejected, never interpreted.
    pub fn from_bits(flags: u32) -> Result<Self> {
        match OpenFlags::from_bits(flags) {
            Some(flags) => Self::from_flags(flags),
            None => Err(unsupported_error!("open flags carry unrecognized bits")),
        }
    }

    pub fn caps(self) -> StreamCaps {
        match self {
            AccessMode::ReadWrite => StreamCaps::READ | StreamCaps::WRITE | StreamCaps::SEEK,
            AccessMode::Read => StreamCaps::READ | StreamCaps::SEEK,
            AccessMode::Write => StreamCaps::WRITE | StreamCaps::SEEK,
        }
    }

    /// Whether opens in this mode are routed through the sandbox resolver.
    /// Read-only access targets pre-existing, caller-approved input and uses
    /// the path as given.
    pub fn sandboxed(self) -> bool {
        !matches!(self, AccessMode::Read)
    }
}

/// Caller-supplied sandbox/path mapping, shared read-only configuration for
/// the whole session.
pub type PathResolver = Box<dyn Fn(&str) -> Result<PathBuf> + Send + Sync>;

/// Translates the engine's flag bitmask into an access intent and opens
/// filesystem-backed streams accordingly.
#[derive(Default)]
pub struct IoBridge {
    resolver: Option<PathResolver>,
}

impl IoBridge {
    pub fn new() -> Self {
        Self { resolver: None }
    }

    pub fn with_resolver(resolver: PathResolver) -> Self {
        Self {
            resolver: Some(resolver),
        }
    }

    pub fn set_resolver(&mut self, resolver: PathResolver) {
        self.resolver = Some(resolver);
    }

    pub fn open(&self, url: &str, flags: OpenFlags) -> Result<StreamHandle> {
        let mode = AccessMode::from_flags(flags)?;
        let path = self.resolve(url, mode)?;

        debug!("opening {:?} as {:?}", path, mode);

        let stream = FileStream::open(&path, mode)?;

        Ok(StreamHandle::new(Box::new(stream), mode.caps()))
    }

    fn resolve(&self, url: &str, mode: AccessMode) -> Result<PathBuf> {
        if !mode.sandboxed() {
            return Ok(PathBuf::from(url));
        }

        match &self.resolver {
            Some(resolver) => resolver(url),
            None => Err(open_failed_error!("write-capable open requires a path resolver")),
        }
    }
}
