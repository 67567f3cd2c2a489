//! Providers, nested archive flattening and the loader bridge on top of the
//! `classvfs-api` data model.

pub mod bridge;
pub mod config;
pub mod logging;
pub mod manifest;
pub mod provider;

pub use bridge::{ClassFileHost, DefinedUnit, LoaderBridge, ProviderLocator};
pub use config::ClasspathConfig;
pub use manifest::{Manifest, ManifestError};
