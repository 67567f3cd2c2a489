//! The host module-loading protocol a [`ResourceProvider`](crate::ResourceProvider)
//! gets bridged into.
//!
//! The host owns the real unit mechanics (bytecode, linking, namespaces). The bridge
//! only needs the capabilities below.

use crate::error::ApiResult;
use crate::unit::UnitName;
use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("{0} is already defined")]
    AlreadyDefined(String),
    #[error("{0}")]
    Rejected(String),
}

pub type ResourceStream = Box<dyn Read + Send>;

/// Host capability consumed by the loader bridge.
pub trait HostLoader: Send + Sync {
    /// Handle to a registered unit.
    type Unit: Clone + Send + Sync;

    /// Resolves `name` through the host's parent loading mechanism.
    fn resolve_parent(&self, name: &str) -> Option<Self::Unit>;

    /// Registers a namespace segment such as `com.example`.
    fn define_namespace(&self, namespace: &str) -> Result<(), HostError>;

    /// Registers raw bytes as a loadable unit.
    fn define_unit(&self, name: &UnitName, bytes: &[u8]) -> Result<Self::Unit, HostError>;

    /// Eagerly links a unit defined earlier.
    fn link(&self, _unit: &Self::Unit) -> Result<(), HostError> {
        Ok(())
    }

    fn parent_stream(&self, _name: &str) -> Option<ResourceStream> {
        None
    }

    fn parent_locator(&self, _name: &str) -> Option<Arc<dyn Locator>> {
        None
    }

    fn parent_locators(&self, _name: &str) -> ApiResult<Vec<Arc<dyn Locator>>> {
        Ok(Vec::new())
    }
}

impl<H: HostLoader + ?Sized> HostLoader for Arc<H> {
    type Unit = H::Unit;

    fn resolve_parent(&self, name: &str) -> Option<Self::Unit> {
        (**self).resolve_parent(name)
    }

    fn define_namespace(&self, namespace: &str) -> Result<(), HostError> {
        (**self).define_namespace(namespace)
    }

    fn define_unit(&self, name: &UnitName, bytes: &[u8]) -> Result<Self::Unit, HostError> {
        (**self).define_unit(name, bytes)
    }

    fn link(&self, unit: &Self::Unit) -> Result<(), HostError> {
        (**self).link(unit)
    }

    fn parent_stream(&self, name: &str) -> Option<ResourceStream> {
        (**self).parent_stream(name)
    }

    fn parent_locator(&self, name: &str) -> Option<Arc<dyn Locator>> {
        (**self).parent_locator(name)
    }

    fn parent_locators(&self, name: &str) -> ApiResult<Vec<Arc<dyn Locator>>> {
        (**self).parent_locators(name)
    }
}

/// An addressable handle to a resource that can be opened into a [`Connection`].
pub trait Locator: Send + Sync + fmt::Debug {
    fn external_form(&self) -> String;

    fn open_connection(&self) -> ApiResult<Connection>;
}

/// An opened locator. The stream is handed out at most once.
pub struct Connection {
    location: String,
    input: Option<ResourceStream>,
}

impl Connection {
    pub fn new(location: impl Into<String>, input: Option<ResourceStream>) -> Self {
        Self {
            location: location.into(),
            input,
        }
    }

    pub fn connect(&mut self) {}

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    pub fn input_stream(&mut self) -> Option<&mut ResourceStream> {
        self.input.as_mut()
    }

    pub fn into_input_stream(self) -> Option<ResourceStream> {
        self.input
    }

    /// Drains the stream; `None` when the connection has nothing behind it.
    pub fn read_all(self) -> io::Result<Option<Vec<u8>>> {
        match self.input {
            Some(mut input) => {
                let mut bytes = Vec::new();
                input.read_to_end(&mut bytes)?;
                Ok(Some(bytes))
            }
            None => Ok(None),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("location", &self.location)
            .field("has_input", &self.input.is_some())
            .finish()
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location)
    }
}
