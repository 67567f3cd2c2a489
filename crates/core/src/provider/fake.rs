//! Providers and fixtures for tests.

use classvfs_api::{ApiResult, ClasspathError, Resource, ResourcePath, ResourceProvider};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

/// A scripted provider that remembers every path it was asked for.
#[derive(Default)]
pub struct RecordingProvider {
    table: HashMap<ResourcePath, Resource>,
    failing: HashSet<ResourcePath>,
    calls: Mutex<Vec<ResourcePath>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. Panics on a malformed path, this is only meant for fixtures.
    pub fn with(mut self, path: &str, resource: impl Into<Resource>) -> Self {
        self.table.insert(fixture_path(path), resource.into());
        self
    }

    /// Makes lookups of `path` fail.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(fixture_path(path));
        self
    }

    pub fn calls(&self) -> Vec<ResourcePath> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

fn fixture_path(path: &str) -> ResourcePath {
    match ResourcePath::parse(path) {
        Ok(path) => path,
        Err(e) => panic!("bad fixture path: {e}"),
    }
}

impl ResourceProvider for RecordingProvider {
    fn lookup(&self, path: &ResourcePath) -> ApiResult<Option<Resource>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.clone());

        if self.failing.contains(path) {
            return Err(ClasspathError::archive_format("recording", path.as_str(), "scripted failure"));
        }
        Ok(self.table.get(path).cloned())
    }

    fn describe(&self) -> String {
        format!("recording({} entries)", self.table.len())
    }
}

/// Finds nothing, ever.
pub struct EmptyProvider;

impl ResourceProvider for EmptyProvider {
    fn lookup(&self, _path: &ResourcePath) -> ApiResult<Option<Resource>> {
        Ok(None)
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

/// A minimal class file declaring `internal` (slash form, e.g. `a/b/C`) with the
/// given superclass and no members.
pub fn class_file(internal: &str, super_internal: &str) -> Vec<u8> {
    fn utf8(out: &mut Vec<u8>, text: &str) {
        out.push(1);
        out.extend_from_slice(&(text.len() as u16).to_be_bytes());
        out.extend_from_slice(text.as_bytes());
    }

    let mut out = vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34];
    out.extend_from_slice(&5u16.to_be_bytes());
    utf8(&mut out, internal);
    out.extend_from_slice(&[7, 0, 1]);
    utf8(&mut out, super_internal);
    out.extend_from_slice(&[7, 0, 3]);
    // access flags, this, super
    out.extend_from_slice(&[0x00, 0x21, 0x00, 0x02, 0x00, 0x04]);
    // interfaces, fields, methods, attributes
    out.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
    out
}
