//! A reference [`HostLoader`] for JVM class files.

use super::locator::ProviderLocator;
use super::lookup_by_name;
use classvfs_api::{
    ApiResult, HostError, HostLoader, Locator, Resource, ResourceProvider, ResourceStream, UnitName,
};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use ristretto_classfile::ClassFile;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Namespace whose units are assumed to come from the platform.
const PLATFORM_NAMESPACE: &str = "java.";
const SYSTEM_SCHEME: &str = "system";

/// A unit registered with a [`ClassFileHost`].
#[derive(Debug)]
pub struct DefinedUnit {
    name: UnitName,
    bytes: Resource,
    super_name: Option<String>,
    linked: AtomicBool,
}

impl DefinedUnit {
    pub fn name(&self) -> &UnitName {
        &self.name
    }

    pub fn bytes(&self) -> &Resource {
        &self.bytes
    }

    /// Dotted name of the declared superclass, if any.
    pub fn super_name(&self) -> Option<&str> {
        self.super_name.as_deref()
    }

    pub fn is_linked(&self) -> bool {
        self.linked.load(Ordering::Acquire)
    }
}

#[derive(Default)]
pub struct ClassFileHost {
    units: DashMap<String, Arc<DefinedUnit>>,
    namespaces: DashSet<String>,
    parent: Option<Arc<ClassFileHost>>,
    system: Option<Arc<dyn ResourceProvider>>,
}

impl ClassFileHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units defined in `parent` (or its ancestors) are found before this host's own.
    pub fn with_parent(parent: Arc<ClassFileHost>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Backs the parent resource hooks with `system`.
    pub fn with_system_resources(mut self, system: Arc<dyn ResourceProvider>) -> Self {
        self.system = Some(system);
        self
    }

    /// Looks `name` up here and up the parent chain.
    pub fn find(&self, name: &str) -> Option<Arc<DefinedUnit>> {
        if let Some(unit) = self.parent.as_ref().and_then(|parent| parent.find(name)) {
            return Some(unit);
        }
        self.units.get(name).map(|unit| unit.value().clone())
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.has_namespace(namespace))
    }

    fn system_lookup(&self, name: &str) -> Option<(classvfs_api::ResourcePath, Resource)> {
        let system = self.system.as_ref()?;
        match lookup_by_name(system.as_ref(), name) {
            Ok(found) => found,
            Err(e) => {
                warn!("System resource lookup for {} failed: {}", name, e);
                None
            }
        }
    }

    fn system_locator(&self, name: &str) -> Option<Arc<dyn Locator>> {
        let system = self.system.as_ref()?;
        let (path, resource) = self.system_lookup(name)?;
        Some(Arc::new(ProviderLocator::new(system.clone(), path, resource, SYSTEM_SCHEME)))
    }
}

fn parse(name: &UnitName, bytes: &[u8]) -> Result<ClassFile, HostError> {
    ClassFile::from_bytes(&mut Cursor::new(bytes.to_vec()))
        .map_err(|e| HostError::Rejected(format!("{name} is not a class file: {e:?}")))
}

fn dotted(internal: &str) -> String {
    internal.replace('/', ".")
}

impl HostLoader for ClassFileHost {
    type Unit = Arc<DefinedUnit>;

    fn resolve_parent(&self, name: &str) -> Option<Self::Unit> {
        self.parent.as_ref().and_then(|parent| parent.find(name))
    }

    fn define_namespace(&self, namespace: &str) -> Result<(), HostError> {
        if self.namespaces.insert(namespace.to_string()) {
            Ok(())
        } else {
            Err(HostError::AlreadyDefined(namespace.to_string()))
        }
    }

    fn define_unit(&self, name: &UnitName, bytes: &[u8]) -> Result<Self::Unit, HostError> {
        if self.units.contains_key(name.as_str()) {
            return Err(HostError::AlreadyDefined(name.to_string()));
        }

        let class_file = parse(name, bytes)?;
        let declared = class_file
            .class_name()
            .map_err(|e| HostError::Rejected(format!("{name} has no readable class name: {e:?}")))?;
        let declared = dotted(&declared.to_string());
        if declared != name.as_str() {
            return Err(HostError::Rejected(format!(
                "{name} declares itself as {declared}"
            )));
        }

        let super_name = if class_file.super_class == 0 {
            None
        } else {
            let super_class = class_file
                .constant_pool
                .try_get_class(class_file.super_class)
                .map_err(|e| HostError::Rejected(format!("{name} has a broken superclass: {e:?}")))?;
            Some(dotted(&super_class.to_string()))
        };

        let unit = Arc::new(DefinedUnit {
            name: name.clone(),
            bytes: Resource::from(bytes),
            super_name,
            linked: AtomicBool::new(false),
        });

        match self.units.entry(name.to_string()) {
            Entry::Occupied(_) => Err(HostError::AlreadyDefined(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(unit.clone());
                debug!("Defined class {}", name);
                Ok(unit)
            }
        }
    }

    /// Linking only checks that the superclass is reachable from this host.
    fn link(&self, unit: &Self::Unit) -> Result<(), HostError> {
        if unit.is_linked() {
            return Ok(());
        }
        if let Some(super_name) = unit.super_name() {
            if !super_name.starts_with(PLATFORM_NAMESPACE) && self.find(super_name).is_none() {
                return Err(HostError::Rejected(format!(
                    "superclass {super_name} of {} is not defined",
                    unit.name()
                )));
            }
        }
        unit.linked.store(true, Ordering::Release);
        Ok(())
    }

    fn parent_stream(&self, name: &str) -> Option<ResourceStream> {
        self.system_lookup(name)
            .map(|(_, resource)| Box::new(resource.reader()) as ResourceStream)
    }

    fn parent_locator(&self, name: &str) -> Option<Arc<dyn Locator>> {
        self.system_locator(name)
    }

    fn parent_locators(&self, name: &str) -> ApiResult<Vec<Arc<dyn Locator>>> {
        Ok(self.system_locator(name).into_iter().collect())
    }
}
