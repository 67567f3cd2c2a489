use super::listing;
use crate::manifest::Manifest;
use classvfs_api::path::SEPARATOR;
use classvfs_api::{ApiResult, ClasspathError, LineEnding, Resource, ResourcePath, ResourceProvider};
use once_cell::sync::OnceCell;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, trace};
use zip::ZipArchive;

const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Serves the entries of an already opened zip archive.
///
/// Directory entries resolve to a listing of the entries directly beneath them. The
/// manifest is found whatever the case of its entry name and is handed out in its
/// canonical serialized form.
pub struct ArchiveProvider<R> {
    archive: Mutex<ZipArchive<R>>,
    label: String,
    line_ending: LineEnding,
    entries: OnceCell<Vec<ResourcePath>>,
}

impl ArchiveProvider<File> {
    pub fn open(path: &Path, line_ending: LineEnding) -> ApiResult<Self> {
        let label = path.display().to_string();
        let file = File::open(path).map_err(|source| ClasspathError::Io {
            path: label.clone(),
            source,
        })?;
        let archive = ZipArchive::new(file)
            .map_err(|e| ClasspathError::archive_format(&label, ResourcePath::root().as_str(), e))?;
        info!("Opened archive {} with {} entries", label, archive.len());
        Ok(Self::new(archive, label, line_ending))
    }
}

impl<R: Read + Seek + Send> ArchiveProvider<R> {
    pub fn new(archive: ZipArchive<R>, label: impl Into<String>, line_ending: LineEnding) -> Self {
        Self {
            archive: Mutex::new(archive),
            label: label.into(),
            line_ending,
            entries: OnceCell::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn format_error(&self, path: &ResourcePath, message: impl std::fmt::Display) -> ClasspathError {
        ClasspathError::archive_format(&self.label, path.as_str(), message)
    }

    /// Every entry name that parses as a path, in archive order.
    fn entries(&self) -> &[ResourcePath] {
        self.entries.get_or_init(|| {
            let archive = self.archive.lock().unwrap_or_else(PoisonError::into_inner);
            archive
                .file_names()
                .filter_map(|name| {
                    let text = format!("{SEPARATOR}{name}");
                    match ResourcePath::parse(&text) {
                        Ok(path) => Some(path),
                        Err(e) => {
                            trace!("Skipping entry {:?} in {}: {}", name, self.label, e);
                            None
                        }
                    }
                })
                .collect()
        })
    }

    fn manifest(&self, path: &ResourcePath) -> ApiResult<Option<Resource>> {
        let mut archive = self.archive.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(name) = archive
            .file_names()
            .find(|name| name.eq_ignore_ascii_case(MANIFEST_ENTRY))
            .map(str::to_string)
        else {
            return Ok(None);
        };

        let mut entry = archive
            .by_name(&name)
            .map_err(|e| self.format_error(path, e))?;
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| self.format_error(path, e))?;

        let manifest = Manifest::parse(&bytes).map_err(|e| self.format_error(path, e))?;
        Ok(Some(Resource::from(manifest.to_bytes())))
    }
}

enum Entry {
    Directory,
    File(Vec<u8>),
}

impl<R: Read + Seek + Send> ResourceProvider for ArchiveProvider<R> {
    fn lookup(&self, path: &ResourcePath) -> ApiResult<Option<Resource>> {
        if path.is_manifest() {
            return self.manifest(path);
        }

        let name = path
            .as_str()
            .strip_prefix(SEPARATOR)
            .unwrap_or(path.as_str());

        let found = {
            let mut archive = self.archive.lock().unwrap_or_else(PoisonError::into_inner);
            let index = archive
                .index_for_name(name)
                .or_else(|| archive.index_for_name(&format!("{name}{SEPARATOR}")));
            match index {
                None => None,
                Some(index) => {
                    let mut entry = archive
                        .by_index(index)
                        .map_err(|e| self.format_error(path, e))?;
                    if entry.is_dir() {
                        Some(Entry::Directory)
                    } else {
                        let mut bytes = Vec::new();
                        entry
                            .read_to_end(&mut bytes)
                            .map_err(|e| self.format_error(path, e))?;
                        Some(Entry::File(bytes))
                    }
                }
            }
        };

        match found {
            None => {
                debug!("{} not found in {}", path, self.label);
                Ok(None)
            }
            Some(Entry::File(bytes)) => Ok(Some(Resource::from(bytes))),
            Some(Entry::Directory) => Ok(listing::synthesize(path, self.entries(), self.line_ending)),
        }
    }

    fn describe(&self) -> String {
        format!("archive({})", self.label)
    }
}
