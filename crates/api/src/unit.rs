use crate::error::{ApiResult, ClasspathError};
use crate::path::ResourcePath;
use std::fmt;

/// Suffix appended to a unit's internal name to find its bytes.
pub const UNIT_SUFFIX: &str = ".class";

/// Separator between namespace segments in a qualified unit name.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Fully qualified name of a loadable unit, e.g. `com.example.Widget`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitName(String);

impl UnitName {
    pub fn new(name: impl Into<String>) -> ApiResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ClasspathError::InvalidArgument("Empty unit name".to_string()));
        }
        if name.contains('/') {
            return Err(ClasspathError::InvalidArgument(format!(
                "Unit name {name:?} contains '/'"
            )));
        }
        if name.split(NAMESPACE_SEPARATOR).any(str::is_empty) {
            return Err(ClasspathError::InvalidArgument(format!(
                "Unit name {name:?} contains an empty segment"
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn simple_name(&self) -> &str {
        self.0
            .rsplit_once(NAMESPACE_SEPARATOR)
            .map(|(_, simple)| simple)
            .unwrap_or(&self.0)
    }

    /// The enclosing namespace, `None` for a unit in the unnamed namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.0
            .rsplit_once(NAMESPACE_SEPARATOR)
            .map(|(namespace, _)| namespace)
    }

    /// Every enclosing namespace, outermost first: `a.b.C` gives `["a", "a.b"]`.
    pub fn namespaces(&self) -> Vec<&str> {
        let Some(namespace) = self.namespace() else {
            return Vec::new();
        };
        namespace
            .match_indices(NAMESPACE_SEPARATOR)
            .map(|(idx, _)| &namespace[..idx])
            .chain(std::iter::once(namespace))
            .collect()
    }

    /// Slash separated form, `a/b/C`.
    pub fn internal_name(&self) -> String {
        self.0.replace(NAMESPACE_SEPARATOR, "/")
    }

    pub fn resource_path(&self) -> ApiResult<ResourcePath> {
        Ok(ResourcePath::from_unit_name(self)?)
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UnitName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_names() {
        for bad in ["", "a..B", ".A", "A.", "a/B"] {
            assert!(UnitName::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_parts() {
        let name = UnitName::new("com.example.Widget").unwrap();
        assert_eq!(name.simple_name(), "Widget");
        assert_eq!(name.namespace(), Some("com.example"));
        assert_eq!(name.namespaces(), vec!["com", "com.example"]);
        assert_eq!(name.internal_name(), "com/example/Widget");
        assert_eq!(
            name.resource_path().unwrap().as_str(),
            "/com/example/Widget.class"
        );
    }

    #[test]
    fn test_unnamed_namespace() {
        let name = UnitName::new("Main").unwrap();
        assert_eq!(name.simple_name(), "Main");
        assert_eq!(name.namespace(), None);
        assert!(name.namespaces().is_empty());
    }
}
