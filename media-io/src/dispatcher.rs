use log::debug;
use x_variant::Variant;

use crate::{
    bridge::{AccessMode, IoBridge, OpenFlags, PathResolver},
    open_failed_error,
    registry::HandleRegistry,
    stream::{Stream, StreamHandle},
    Result,
};

pub struct OpenRequest<'a> {
    pub url: &'a str,
    pub flags: OpenFlags,
    pub options: Option<&'a Variant>,
}

impl<'a> OpenRequest<'a> {
    pub fn new(url: &'a str, flags: OpenFlags) -> Self {
        Self {
            url,
            flags,
            options: None,
        }
    }

    pub fn with_options(url: &'a str, flags: OpenFlags, options: &'a Variant) -> Self {
        Self {
            url,
            flags,
            options: Some(options),
        }
    }
}

/// Mints new streams on demand for multi-file sessions. Injected at session
/// configuration time; any `FnMut` with the matching signature qualifies.
pub trait OpenFactory: Send {
    fn open(&mut self, url: &str, flags: OpenFlags, options: Option<&Variant>) -> Result<Box<dyn Stream>>;
}

impl<F> OpenFactory for F
where
    F: FnMut(&str, OpenFlags, Option<&Variant>) -> Result<Box<dyn Stream>> + Send,
{
    fn open(&mut self, url: &str, flags: OpenFlags, options: Option<&Variant>) -> Result<Box<dyn Stream>> {
        self(url, flags, options)
    }
}

/// Resolves an open request to a handle: the pre-bound primary stream, a
/// factory-minted stream (scheme prefix stripped first), or a direct
/// filesystem open through the bridge. Every handle is registered before it
/// is returned.
pub struct ProtocolDispatcher {
    bridge: IoBridge,
    registry: HandleRegistry,
    scheme: Option<String>,
    factory: Option<Box<dyn OpenFactory>>,
    primary_url: Option<String>,
    primary: Option<Box<dyn Stream>>,
}

impl ProtocolDispatcher {
    pub fn new() -> Self {
        Self {
            bridge: IoBridge::new(),
            registry: HandleRegistry::new(),
            scheme: None,
            factory: None,
            primary_url: None,
            primary: None,
        }
    }

    /// Pre-binds the single stream of a one-file session. An open request
    /// for `url` hands out this stream instead of minting a new one.
    pub fn bind_stream(&mut self, url: impl Into<String>, stream: Box<dyn Stream>) {
        self.primary_url = Some(url.into());
        self.primary = Some(stream);
    }

    pub fn set_factory(&mut self, scheme: impl Into<String>, factory: Box<dyn OpenFactory>) {
        self.scheme = Some(scheme.into());
        self.factory = Some(factory);
    }

    pub fn set_resolver(&mut self, resolver: PathResolver) {
        self.bridge.set_resolver(resolver);
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn open(&mut self, request: OpenRequest) -> Result<StreamHandle> {
        let OpenRequest { url, flags, options } = request;
        let mode = AccessMode::from_flags(flags)?;

        let mut handle = if self.primary_url.as_deref() == Some(url) {
            let stream = self
                .primary
                .take()
                .ok_or_else(|| open_failed_error!("primary stream is already bound to a handle"))?;

            debug!("open {}: primary stream", url);

            StreamHandle::new(stream, mode.caps())
        } else if let Some(factory) = &mut self.factory {
            let target = match &self.scheme {
                Some(scheme) => url.strip_prefix(scheme.as_str()).unwrap_or(url),
                None => url,
            };

            debug!("open {}: factory target {}", url, target);

            let stream = factory.open(target, flags, options)?;

            StreamHandle::new(stream, mode.caps())
        } else {
            self.bridge.open(url, flags)?
        };

        let id = self.registry.register(url)?;
        handle.attach_registry(id, self.registry.clone());

        Ok(handle)
    }
}

impl Default for ProtocolDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
