//! Rooted, immutable resource paths.
//!
//! Every path is a chain of [`ResourceName`]s hanging off the single ROOT. Nodes are
//! reference counted and only ever point at ancestors that were built before them,
//! so clones are cheap and the chain cannot cycle.
//!
//! The manifest path is special: `/META-INF/MANIFEST.MF` equals (and hashes like)
//! any spelling of it that differs only in ASCII case. Every other path compares
//! byte for byte.

use crate::error::PathError;
use crate::name::ResourceName;
use crate::unit::{UNIT_SUFFIX, UnitName};
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

pub const SEPARATOR: char = '/';

const CURRENT: &str = ".";
const PARENT: &str = "..";
const MANIFEST_TEXT: &str = "/META-INF/MANIFEST.MF";

static ROOT: Lazy<ResourcePath> = Lazy::new(|| {
    ResourcePath(Arc::new(PathNode {
        text: ResourceName::ROOT.to_string(),
        name: ResourceName::new_unchecked(ResourceName::ROOT),
        parent: None,
    }))
});

static MANIFEST: Lazy<ResourcePath> = Lazy::new(|| {
    ResourcePath::root()
        .child(ResourceName::new_unchecked("META-INF"))
        .child(ResourceName::new_unchecked("MANIFEST.MF"))
});

struct PathNode {
    text: String,
    name: ResourceName,
    parent: Option<ResourcePath>,
}

#[derive(Clone)]
pub struct ResourcePath(Arc<PathNode>);

impl ResourcePath {
    /// The unique root path `/`.
    pub fn root() -> Self {
        ROOT.clone()
    }

    /// The `/META-INF/MANIFEST.MF` singleton.
    pub fn manifest() -> Self {
        MANIFEST.clone()
    }

    /// Parses `text`, resolving `.` and `..` segments as it goes.
    ///
    /// A single trailing separator is dropped, so `/a/b/` is the same path as `/a/b`.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        if !text.starts_with(SEPARATOR) {
            return Err(PathError::malformed(text, "missing leading '/'"));
        }

        match text {
            "/" => Ok(Self::root()),
            MANIFEST_TEXT => Ok(Self::manifest()),
            _ => Self::parse_segments(text),
        }
    }

    fn parse_segments(text: &str) -> Result<Self, PathError> {
        let body = &text[SEPARATOR.len_utf8()..];
        let body = body.strip_suffix(SEPARATOR).unwrap_or(body);

        let mut result = Self::root();
        for segment in body.split(SEPARATOR) {
            match segment {
                "" => return Err(PathError::malformed(text, "empty name")),
                CURRENT => {}
                PARENT => {
                    result = result
                        .parent()
                        .cloned()
                        .ok_or_else(|| PathError::AboveRoot(text.to_string()))?;
                }
                name => result = result.child(ResourceName::new_unchecked(name)),
            }
        }
        Ok(result)
    }

    /// Maps `a.b.C` to `/a/b/C.class`.
    pub fn from_unit_name(name: &UnitName) -> Result<Self, PathError> {
        let mut text = String::with_capacity(name.as_str().len() + UNIT_SUFFIX.len() + 1);
        text.push(SEPARATOR);
        text.push_str(&name.internal_name());
        text.push_str(UNIT_SUFFIX);
        Self::parse(&text)
    }

    pub fn as_str(&self) -> &str {
        &self.0.text
    }

    pub fn name(&self) -> &ResourceName {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&ResourcePath> {
        self.0.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        Arc::ptr_eq(&self.0, &ROOT.0)
    }

    pub fn is_manifest(&self) -> bool {
        self.0.text.eq_ignore_ascii_case(MANIFEST_TEXT)
    }

    /// Number of names below the root; the root itself is depth 0.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(parent) = current.parent() {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Names from the outermost directory down to this path's own name.
    pub fn names(&self) -> Vec<ResourceName> {
        let mut names = Vec::with_capacity(self.depth());
        let mut current = self;
        while let Some(parent) = current.parent() {
            names.push(current.name().clone());
            current = parent;
        }
        names.reverse();
        names
    }

    pub fn append(&self, name: &ResourceName) -> Self {
        if name.is_root() {
            self.clone()
        } else {
            self.child(name.clone())
        }
    }

    pub fn append_path(&self, path: &ResourcePath) -> Self {
        path.names()
            .iter()
            .fold(self.clone(), |parent, name| parent.append(name))
    }

    fn child(&self, name: ResourceName) -> Self {
        let mut text = String::with_capacity(self.0.text.len() + 1 + name.as_str().len());
        text.push_str(&self.0.text);
        if !self.is_root() {
            text.push(SEPARATOR);
        }
        text.push_str(name.as_str());

        ResourcePath(Arc::new(PathNode {
            text,
            name,
            parent: Some(self.clone()),
        }))
    }

    /// Text used for equality, hashing and ordering. Manifest spellings collapse
    /// onto the canonical text so all three stay consistent.
    fn key(&self) -> &str {
        if self.is_manifest() {
            MANIFEST_TEXT
        } else {
            &self.0.text
        }
    }
}

impl PartialEq for ResourcePath {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.key() == other.key()
    }
}

impl Eq for ResourcePath {}

impl Hash for ResourcePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for ResourcePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Byte order of the path text, except that every spelling of the manifest path
/// sorts where `/META-INF/MANIFEST.MF` does. `/meta-inf/manifest.mf` therefore sorts
/// before `/Z` even though its own text would not.
impl Ord for ResourcePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourcePath({:?})", self.as_str())
    }
}

impl FromStr for ResourcePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ResourcePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
