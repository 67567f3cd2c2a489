//! Resource providers and the helpers that build them.
//!
//! Every constructor hands back an `Arc<dyn ResourceProvider>` so the results can be
//! cascaded with [`composite`] and shared with a loader bridge.

pub mod archive;
pub mod classpath;
pub mod composite;
pub mod fake;
pub mod libs;
mod listing;
pub mod map;

pub use archive::ArchiveProvider;
pub use classpath::{ClasspathRoots, HostClasspathProvider};
pub use composite::CompositeProvider;
pub use fake::{EmptyProvider, RecordingProvider};
pub use map::MapProvider;

use classvfs_api::{ApiResult, ExternalClasspath, LineEnding, Resource, ResourcePath, ResourceProvider};
use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;
use zip::ZipArchive;

/// Tries `providers` in order. See [`CompositeProvider::with`].
pub fn composite(providers: Vec<Arc<dyn ResourceProvider>>) -> ApiResult<Arc<dyn ResourceProvider>> {
    CompositeProvider::with(providers)
}

pub fn map(table: BTreeMap<ResourcePath, Resource>, line_ending: LineEnding) -> Arc<dyn ResourceProvider> {
    Arc::new(MapProvider::new(table, line_ending))
}

pub fn archive<R>(archive: ZipArchive<R>, label: &str, line_ending: LineEnding) -> Arc<dyn ResourceProvider>
where
    R: Read + Seek + Send + 'static,
{
    Arc::new(ArchiveProvider::new(archive, label, line_ending))
}

pub fn archive_file(path: &Path, line_ending: LineEnding) -> ApiResult<Arc<dyn ResourceProvider>> {
    Ok(Arc::new(ArchiveProvider::open(path, line_ending)?))
}

/// Reads an archive whose `libs_prefix` entries are archives themselves.
pub fn archive_with_libs<R: Read>(
    reader: R,
    label: &str,
    libs_prefix: &str,
    line_ending: LineEnding,
) -> ApiResult<Arc<dyn ResourceProvider>> {
    libs::flatten(reader, label, libs_prefix, line_ending)
}

pub fn host_classpath<C>(classpath: C) -> Arc<dyn ResourceProvider>
where
    C: ExternalClasspath + 'static,
{
    Arc::new(HostClasspathProvider::new(classpath))
}

pub fn fake() -> Arc<dyn ResourceProvider> {
    Arc::new(EmptyProvider)
}
