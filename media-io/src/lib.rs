pub mod bridge;
pub mod buffer;
pub mod dispatcher;
pub mod error;
pub mod file;
pub mod registry;
pub mod stream;
pub mod trace;

pub use bridge::{AccessMode, IoBridge, OpenFlags, PathResolver};
pub use buffer::{MemoryStream, SequentialBuffer, SharedBuffer};
pub use dispatcher::{OpenFactory, OpenRequest, ProtocolDispatcher};
pub use error::Error;
pub use file::FileStream;
pub use registry::{HandleId, HandleRegistry, HandleStats, RegistryAudit};
pub use stream::{Stream, StreamCaps, StreamHandle, Whence};
pub use trace::{CallLog, CallRecord, StreamOp, TracedStream};

pub type Result<T> = std::result::Result<T, Error>;
