use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use log::{debug, warn};

use crate::{error::Error, Result};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct HandleId(u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct HandleStats {
    pub url: String,
    pub opened_at: Instant,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegistryAudit {
    pub opened: u64,
    pub closed: u64,
}

impl RegistryAudit {
    pub fn leaked(&self) -> u64 {
        self.opened - self.closed
    }

    pub fn is_balanced(&self) -> bool {
        self.opened == self.closed
    }
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    opened: u64,
    closed: u64,
    active: HashMap<HandleId, HandleStats>,
}

/// Session-wide open/close bookkeeping. Not on the correctness path; the
/// audit exists to make handle leaks visible at end of session.
#[derive(Clone, Default)]
pub struct HandleRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, url: &str) -> Result<HandleId> {
        let mut inner = self.lock()?;

        inner.next_id += 1;
        inner.opened += 1;

        let id = HandleId(inner.next_id);
        let stats = HandleStats {
            url: url.to_string(),
            opened_at: Instant::now(),
            bytes_read: 0,
            bytes_written: 0,
        };

        inner.active.insert(id, stats);
        debug!("registered handle {} for {}", id, url);

        Ok(id)
    }

    pub fn unregister(&self, id: HandleId) {
        if let Ok(mut inner) = self.inner.lock() {
            match inner.active.remove(&id) {
                Some(stats) => {
                    inner.closed += 1;
                    debug!(
                        "unregistered handle {} for {}: {} bytes read, {} bytes written",
                        id, stats.url, stats.bytes_read, stats.bytes_written
                    );
                }
                None => warn!("unregister of unknown handle {}", id),
            }
        }
    }

    pub fn record_read(&self, id: HandleId, bytes: u64) {
        if let Ok(mut inner) = self.inner.lock() {
            if let Some(stats) = inner.active.get_mut(&id) {
                stats.bytes_read += bytes;
            }
        }
    }

    pub fn record_write(&self, id: HandleId, bytes: u64) {
        if let Ok(mut inner) = self.inner.lock() {
            if let Some(stats) = inner.active.get_mut(&id) {
                stats.bytes_written += bytes;
            }
        }
    }

    pub fn audit(&self) -> Result<RegistryAudit> {
        let inner = self.lock()?;

        Ok(RegistryAudit {
            opened: inner.opened,
            closed: inner.closed,
        })
    }

    pub fn active_count(&self) -> Result<usize> {
        Ok(self.lock()?.active.len())
    }

    pub fn stats(&self, id: HandleId) -> Result<Option<HandleStats>> {
        Ok(self.lock()?.active.get(&id).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, RegistryInner>> {
        self.inner.lock().map_err(|err| Error::IoFailure(err.to_string().into()))
    }
}
