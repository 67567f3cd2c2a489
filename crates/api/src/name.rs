use crate::error::{ApiResult, ClasspathError};
use once_cell::sync::OnceCell;
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The name portion of a resource path. Names are case-sensitive.
#[derive(Clone)]
pub struct ResourceName {
    name: SmolStr,
    extension: OnceCell<Option<SmolStr>>,
}

impl ResourceName {
    pub const ROOT: &'static str = "/";

    pub fn new(name: impl AsRef<str>) -> ApiResult<Self> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(ClasspathError::InvalidArgument(
                "Empty resource name".to_string(),
            ));
        }
        if name != Self::ROOT && name.contains('/') {
            return Err(ClasspathError::InvalidArgument(format!(
                "Resource name {name:?} contains '/'"
            )));
        }
        Ok(Self::new_unchecked(name))
    }

    /// Callers guarantee a non-empty segment without separators.
    pub(crate) fn new_unchecked(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            extension: OnceCell::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn is_root(&self) -> bool {
        self.name.as_str() == Self::ROOT
    }

    /// Returns the file extension without the '.', if one was present.
    ///
    /// `"a.txt"` gives `Some("txt")`, `"a."` gives `Some("")` and `"a"` gives `None`.
    pub fn extension(&self) -> Option<&str> {
        self.extension
            .get_or_init(|| self.name.rfind('.').map(|dot| SmolStr::new(&self.name[dot + 1..])))
            .as_deref()
    }
}

impl PartialEq for ResourceName {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ResourceName {}

impl Hash for ResourceName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for ResourceName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResourceName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceName({:?})", self.name.as_str())
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
