use classvfs_api::path::SEPARATOR;
use classvfs_api::{ApiResult, ClasspathError, ExternalClasspath, Resource, ResourcePath, ResourceProvider};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};
use zip::ZipArchive;

pub const CLASSPATH_ENV: &str = "CLASSPATH";

/// Adapts an [`ExternalClasspath`] to the provider interface.
pub struct HostClasspathProvider<C> {
    classpath: C,
}

impl<C: ExternalClasspath> HostClasspathProvider<C> {
    pub fn new(classpath: C) -> Self {
        Self { classpath }
    }

    pub fn classpath(&self) -> &C {
        &self.classpath
    }
}

impl<C: ExternalClasspath> ResourceProvider for HostClasspathProvider<C> {
    fn lookup(&self, path: &ResourcePath) -> ApiResult<Option<Resource>> {
        let relative = path.as_str().strip_prefix(SEPARATOR).unwrap_or(path.as_str());
        Ok(self.classpath.read(relative)?.map(Resource::from))
    }

    fn describe(&self) -> String {
        format!("classpath({})", self.classpath.describe())
    }
}

enum Root {
    Directory(PathBuf),
    Archive {
        location: PathBuf,
        archive: Mutex<ZipArchive<File>>,
    },
}

impl Root {
    fn location(&self) -> &Path {
        match self {
            Root::Directory(location) => location,
            Root::Archive { location, .. } => location,
        }
    }

    fn read(&self, relative: &str) -> ApiResult<Option<Vec<u8>>> {
        match self {
            Root::Directory(dir) => {
                let file = dir.join(relative);
                if !file.is_file() {
                    return Ok(None);
                }
                match fs::read(&file) {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                    Err(source) => Err(ClasspathError::Io {
                        path: file.display().to_string(),
                        source,
                    }),
                }
            }
            Root::Archive { location, archive } => {
                let mut archive = archive.lock().unwrap_or_else(PoisonError::into_inner);
                let Some(index) = archive.index_for_name(relative) else {
                    return Ok(None);
                };
                let mut entry = archive.by_index(index).map_err(|e| {
                    ClasspathError::archive_format(location.display().to_string(), relative, e)
                })?;
                if entry.is_dir() {
                    return Ok(None);
                }
                let mut bytes = Vec::new();
                entry
                    .read_to_end(&mut bytes)
                    .map_err(|source| ClasspathError::Io {
                        path: format!("{}!/{}", location.display(), relative),
                        source,
                    })?;
                Ok(Some(bytes))
            }
        }
    }
}

/// An ordered set of directories and archive files, searched first to last.
pub struct ClasspathRoots {
    roots: Vec<Root>,
}

impl ClasspathRoots {
    /// Opens every entry up front. Entries that do not exist are skipped.
    pub fn open<I, P>(entries: I) -> ApiResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut roots = Vec::new();
        for entry in entries {
            let entry = entry.as_ref();
            if entry.as_os_str().is_empty() {
                continue;
            }
            if entry.is_dir() {
                roots.push(Root::Directory(entry.to_path_buf()));
            } else if entry.is_file() {
                let file = File::open(entry).map_err(|source| ClasspathError::Io {
                    path: entry.display().to_string(),
                    source,
                })?;
                let archive = ZipArchive::new(file).map_err(|e| {
                    ClasspathError::archive_format(
                        entry.display().to_string(),
                        ResourcePath::root().as_str(),
                        e,
                    )
                })?;
                roots.push(Root::Archive {
                    location: entry.to_path_buf(),
                    archive: Mutex::new(archive),
                });
            } else {
                warn!("Classpath entry {} does not exist, skipping", entry.display());
            }
        }
        info!("Opened classpath with {} roots", roots.len());
        Ok(Self { roots })
    }

    /// Opens the roots named by the `CLASSPATH` environment variable.
    pub fn from_env() -> ApiResult<Self> {
        match std::env::var_os(CLASSPATH_ENV) {
            Some(value) => Self::parse(&value),
            None => {
                debug!("{} is not set", CLASSPATH_ENV);
                Ok(Self { roots: Vec::new() })
            }
        }
    }

    /// Opens the roots in a platform separated list such as `a.jar:classes`.
    pub fn parse(value: &OsStr) -> ApiResult<Self> {
        Self::open(std::env::split_paths(value))
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl ExternalClasspath for ClasspathRoots {
    fn read(&self, relative: &str) -> ApiResult<Option<Vec<u8>>> {
        for root in &self.roots {
            if let Some(bytes) = root.read(relative)? {
                return Ok(Some(bytes));
            }
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        let locations: Vec<String> = self
            .roots
            .iter()
            .map(|root| root.location().display().to_string())
            .collect();
        locations.join(if cfg!(windows) { ";" } else { ":" })
    }
}
