use classvfs_api::path::SEPARATOR;
use classvfs_api::{ApiResult, Connection, Locator, Resource, ResourcePath, ResourceProvider, ResourceStream};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

enum LocatorState {
    /// Bytes captured when the locator was handed out, not yet streamed.
    Unconsumed(Resource),
    /// Captured bytes are gone; every open asks the provider again.
    Refetch,
}

/// Locator for a resource found through a provider.
///
/// The first connection streams the bytes captured at creation. Later connections
/// look the path up again, so a caller that opens the same locator twice sees
/// whatever the provider holds at that moment.
pub struct ProviderLocator {
    provider: Arc<dyn ResourceProvider>,
    path: ResourcePath,
    external_form: String,
    state: Mutex<LocatorState>,
}

impl ProviderLocator {
    pub fn new(
        provider: Arc<dyn ResourceProvider>,
        path: ResourcePath,
        captured: Resource,
        scheme: &str,
    ) -> Self {
        let external_form = external_form(scheme, &path);
        Self {
            provider,
            path,
            external_form,
            state: Mutex::new(LocatorState::Unconsumed(captured)),
        }
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }
}

/// `scheme://a/b.txt` for the path `/a/b.txt`.
pub fn external_form(scheme: &str, path: &ResourcePath) -> String {
    let text = path.as_str();
    format!("{scheme}://{}", text.strip_prefix(SEPARATOR).unwrap_or(text))
}

impl Locator for ProviderLocator {
    fn external_form(&self) -> String {
        self.external_form.clone()
    }

    fn open_connection(&self) -> ApiResult<Connection> {
        let previous = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *state, LocatorState::Refetch)
        };

        let resource = match previous {
            LocatorState::Unconsumed(resource) => Some(resource),
            LocatorState::Refetch => {
                debug!("Re-fetching {} for {}", self.path, self.external_form);
                self.provider.lookup(&self.path)?
            }
        };

        let input = resource.map(|resource| Box::new(resource.reader()) as ResourceStream);
        Ok(Connection::new(self.external_form.clone(), input))
    }
}

impl fmt::Debug for ProviderLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderLocator")
            .field("external_form", &self.external_form)
            .field("provider", &self.provider.describe())
            .finish()
    }
}

impl fmt::Display for ProviderLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.external_form)
    }
}
