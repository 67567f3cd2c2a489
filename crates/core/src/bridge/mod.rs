//! Bridges a [`ResourceProvider`] into a host loading protocol.
//!
//! The host is always asked first. Only what the host's parent chain cannot find is
//! looked up in the provider, materialized through the host and cached here.

pub mod host;
pub mod locator;

pub use host::{ClassFileHost, DefinedUnit};
pub use locator::ProviderLocator;

use crate::config::DEFAULT_LOCATOR_SCHEME;
use classvfs_api::path::SEPARATOR;
use classvfs_api::{
    ApiResult, ClasspathError, HostError, HostLoader, Locator, Resource, ResourcePath, ResourceProvider,
    ResourceStream, UnitName,
};
use dashmap::DashSet;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

pub struct LoaderBridge<H: HostLoader> {
    host: H,
    provider: Arc<dyn ResourceProvider>,
    scheme: String,
    resolved: Mutex<HashMap<String, H::Unit>>,
    namespaces: DashSet<String>,
}

impl<H: HostLoader> LoaderBridge<H> {
    pub fn new(host: H, provider: Arc<dyn ResourceProvider>) -> Self {
        Self::with_scheme(host, provider, DEFAULT_LOCATOR_SCHEME)
    }

    pub fn with_scheme(host: H, provider: Arc<dyn ResourceProvider>, scheme: impl Into<String>) -> Self {
        let scheme = scheme.into();
        info!("Bridging {} as {}://", provider.describe(), scheme);
        Self {
            host,
            provider,
            scheme,
            resolved: Mutex::new(HashMap::new()),
            namespaces: DashSet::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn provider(&self) -> &Arc<dyn ResourceProvider> {
        &self.provider
    }

    /// Loads `name`, parent first, and links it when `link` is set.
    ///
    /// Calls for the same bridge are serialized, so a unit is defined through the
    /// host at most once however many threads ask for it.
    pub fn load_unit(&self, name: &str, link: bool) -> ApiResult<H::Unit> {
        let mut resolved = self.resolved.lock().unwrap_or_else(PoisonError::into_inner);

        let unit = match resolved.get(name) {
            Some(unit) => {
                debug!("{} already resolved", name);
                unit.clone()
            }
            None => match self.host.resolve_parent(name) {
                Some(unit) => {
                    debug!("{} resolved by parent", name);
                    unit
                }
                None => {
                    let unit = self.define_from_provider(name)?;
                    resolved.insert(name.to_string(), unit.clone());
                    unit
                }
            },
        };

        if link {
            self.host.link(&unit).map_err(|e| ClasspathError::Link {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(unit)
    }

    fn define_from_provider(&self, name: &str) -> ApiResult<H::Unit> {
        let unit_name = match UnitName::new(name) {
            Ok(unit_name) => unit_name,
            Err(e) => {
                debug!("{:?} is not a unit name: {}", name, e);
                return Err(ClasspathError::UnitNotFound(name.to_string()));
            }
        };

        let resource = self
            .provider
            .unit(&unit_name)?
            .ok_or_else(|| ClasspathError::UnitNotFound(name.to_string()))?;

        self.define_namespaces(&unit_name)?;

        if resource.is_empty() {
            return Err(ClasspathError::MalformedUnit {
                name: name.to_string(),
                reason: "empty payload".to_string(),
            });
        }

        let unit = self
            .host
            .define_unit(&unit_name, resource.bytes())
            .map_err(|e| ClasspathError::MalformedUnit {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        debug!("Defined {} ({} bytes) from {}", name, resource.len(), self.provider.describe());
        Ok(unit)
    }

    fn define_namespaces(&self, unit_name: &UnitName) -> ApiResult<()> {
        for namespace in unit_name.namespaces() {
            if !self.namespaces.insert(namespace.to_string()) {
                continue;
            }
            match self.host.define_namespace(namespace) {
                Ok(()) | Err(HostError::AlreadyDefined(_)) => {}
                Err(HostError::Rejected(reason)) => {
                    self.namespaces.remove(namespace);
                    return Err(ClasspathError::MalformedUnit {
                        name: unit_name.to_string(),
                        reason: format!("namespace {namespace} rejected: {reason}"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Parent stream first, then the provider's bytes.
    pub fn stream_for(&self, name: &str) -> ApiResult<Option<ResourceStream>> {
        if let Some(stream) = self.host.parent_stream(name) {
            return Ok(Some(stream));
        }
        Ok(lookup_by_name(self.provider.as_ref(), name)?
            .map(|(_, resource)| Box::new(resource.reader()) as ResourceStream))
    }

    pub fn locator_for(&self, name: &str) -> ApiResult<Option<Arc<dyn Locator>>> {
        if let Some(locator) = self.host.parent_locator(name) {
            return Ok(Some(locator));
        }
        self.provider_locator(name)
    }

    /// Every parent locator, followed by this bridge's own when the provider has `name`.
    pub fn enumerate_all(&self, name: &str) -> ApiResult<Vec<Arc<dyn Locator>>> {
        let mut locators = self.host.parent_locators(name)?;
        if let Some(locator) = self.provider_locator(name)? {
            locators.push(locator);
        }
        Ok(locators)
    }

    fn provider_locator(&self, name: &str) -> ApiResult<Option<Arc<dyn Locator>>> {
        Ok(lookup_by_name(self.provider.as_ref(), name)?.map(|(path, resource)| {
            Arc::new(ProviderLocator::new(
                self.provider.clone(),
                path,
                resource,
                &self.scheme,
            )) as Arc<dyn Locator>
        }))
    }
}

/// Resolves a host style resource name such as `a/b.txt` against `provider`.
///
/// Names that cannot be paths are reported as absent.
pub fn lookup_by_name(
    provider: &dyn ResourceProvider,
    name: &str,
) -> ApiResult<Option<(ResourcePath, Resource)>> {
    if name.is_empty() {
        return Ok(None);
    }

    let text = if name.starts_with(SEPARATOR) {
        name.to_string()
    } else {
        format!("{SEPARATOR}{name}")
    };

    let path = match ResourcePath::parse(&text) {
        Ok(path) => path,
        Err(e) => {
            debug!("{:?} is not a resource path: {}", name, e);
            return Ok(None);
        }
    };

    Ok(provider.lookup(&path)?.map(|resource| (path, resource)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::RecordingProvider;

    #[test]
    fn test_lookup_by_name_adds_leading_separator() {
        let provider = RecordingProvider::new().with("/a/b.txt", "ab");

        let (path, resource) = lookup_by_name(&provider, "a/b.txt").unwrap().unwrap();
        assert_eq!(path.as_str(), "/a/b.txt");
        assert_eq!(resource, Resource::from("ab"));

        assert!(lookup_by_name(&provider, "/a/b.txt").unwrap().is_some());
    }

    #[test]
    fn test_lookup_by_name_bad_names_are_absent() {
        let provider = RecordingProvider::new();
        assert!(lookup_by_name(&provider, "").unwrap().is_none());
        assert!(lookup_by_name(&provider, "a//b").unwrap().is_none());
        assert!(lookup_by_name(&provider, "../x").unwrap().is_none());
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_lookup_by_name_propagates_provider_errors() {
        let provider = RecordingProvider::new().failing("/broken");
        assert!(lookup_by_name(&provider, "broken").is_err());
    }
}
