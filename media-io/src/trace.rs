use std::sync::{Arc, Mutex};

use crate::{
    stream::{Stream, StreamCaps, Whence},
    Result,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StreamOp {
    Read,
    Write,
    Seek,
    Close,
}

#[derive(Clone, Debug)]
pub enum CallRecord {
    Read { requested: usize, returned: usize },
    Write { len: usize, written: usize },
    Seek { offset: i64, whence: Whence },
    Close,
}

impl CallRecord {
    pub fn op(&self) -> StreamOp {
        match self {
            CallRecord::Read { .. } => StreamOp::Read,
            CallRecord::Write { .. } => StreamOp::Write,
            CallRecord::Seek { .. } => StreamOp::Seek,
            CallRecord::Close => StreamOp::Close,
        }
    }
}

/// Cloneable view onto a traced stream's call history; clones share one
/// record list.
#[derive(Clone, Default)]
pub struct CallLog {
    records: Arc<Mutex<Vec<CallRecord>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CallRecord> {
        self.records.lock().map(|records| records.clone()).unwrap_or_default()
    }

    pub fn count(&self, op: StreamOp) -> usize {
        self.records().iter().filter(|record| record.op() == op).count()
    }

    pub fn bytes_read(&self) -> u64 {
        self.records()
            .iter()
            .map(|record| match record {
                CallRecord::Read { returned, .. } => *returned as u64,
                _ => 0,
            })
            .sum()
    }

    pub fn bytes_written(&self) -> u64 {
        self.records()
            .iter()
            .map(|record| match record {
                CallRecord::Write { written, .. } => *written as u64,
                _ => 0,
            })
            .sum()
    }

    fn push(&self, record: CallRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

/// Call-logging decorator over any [`Stream`]. Capabilities and results are
/// those of the wrapped stream.
pub struct TracedStream<S> {
    inner: S,
    log: CallLog,
}

impl<S: Stream> TracedStream<S> {
    pub fn new(inner: S) -> Self {
        Self::with_log(inner, CallLog::new())
    }

    pub fn with_log(inner: S, log: CallLog) -> Self {
        Self { inner, log }
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl<S: Stream> Stream for TracedStream<S> {
    fn caps(&self) -> StreamCaps {
        self.inner.caps()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let returned = self.inner.read(buf)?;
        self.log.push(CallRecord::Read {
            requested: buf.len(),
            returned,
        });

        Ok(returned)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let written = self.inner.write(buf)?;
        self.log.push(CallRecord::Write {
            len: buf.len(),
            written,
        });

        Ok(written)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let pos = self.inner.seek(offset, whence)?;
        self.log.push(CallRecord::Seek { offset, whence });

        Ok(pos)
    }

    fn close(&mut self) -> Result<()> {
        let result = self.inner.close();
        self.log.push(CallRecord::Close);

        result
    }
}
