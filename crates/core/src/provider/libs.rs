//! Flattening of archives that carry further archives under a libs prefix.

use super::composite::CompositeProvider;
use super::map::MapProvider;
use crate::manifest::Manifest;
use classvfs_api::path::SEPARATOR;
use classvfs_api::{ApiResult, ClasspathError, LineEnding, Resource, ResourcePath, ResourceProvider};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::sync::Arc;
use tracing::{debug, info};
use zip::ZipArchive;

pub const DEFAULT_LIBS_PREFIX: &str = "libs/";

/// Reads the whole archive from `reader` and turns it into a provider.
///
/// Every entry under `libs_prefix` is treated as an archive of its own and flattened
/// the same way. The result looks up the outer archive's entries first, then each
/// nested archive in the order it was found.
pub fn flatten<R: Read>(
    mut reader: R,
    label: &str,
    libs_prefix: &str,
    line_ending: LineEnding,
) -> ApiResult<Arc<dyn ResourceProvider>> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ClasspathError::archive_format(label, ResourcePath::root().as_str(), e))?;
    flatten_bytes(bytes, label, libs_prefix, line_ending)
}

fn flatten_bytes(
    bytes: Vec<u8>,
    label: &str,
    libs_prefix: &str,
    line_ending: LineEnding,
) -> ApiResult<Arc<dyn ResourceProvider>> {
    let root = ResourcePath::root();
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ClasspathError::archive_format(label, root.as_str(), e))?;

    let mut table = BTreeMap::new();
    let mut nested: Vec<(String, Vec<u8>)> = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ClasspathError::archive_format(label, root.as_str(), e))?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|e| ClasspathError::archive_format(label, &name, e))?;

        if name.starts_with(libs_prefix) {
            nested.push((name, content));
            continue;
        }

        let path = ResourcePath::parse(&format!("{SEPARATOR}{name}"))?;
        if path.is_manifest() {
            let manifest = Manifest::parse(&content)
                .map_err(|e| ClasspathError::archive_format(label, &name, e))?;
            table.insert(ResourcePath::manifest(), Resource::from(manifest.to_bytes()));
        } else {
            table.insert(path, Resource::from(content));
        }
    }

    info!(
        "Flattened {}: {} entries, {} nested archives",
        label,
        table.len(),
        nested.len()
    );

    let mut providers: Vec<Arc<dyn ResourceProvider>> =
        vec![Arc::new(MapProvider::new(table, line_ending))];
    for (name, content) in nested {
        let nested_label = format!("{label}!/{name}");
        debug!("Flattening nested archive {}", nested_label);
        providers.push(flatten_bytes(content, &nested_label, libs_prefix, line_ending)?);
    }

    CompositeProvider::with(providers)
}
