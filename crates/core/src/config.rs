use crate::provider::libs::DEFAULT_LIBS_PREFIX;
use classvfs_api::{ApiResult, ClasspathError, LineEnding};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_LOCATOR_SCHEME: &str = "classvfs";

/// Settings shared by providers, the loader bridge and logging.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClasspathConfig {
    /// Terminator for synthesized directory listings.
    pub line_ending: LineEnding,
    /// Entries under this prefix are flattened as nested archives.
    pub libs_prefix: String,
    /// Scheme of locators handed out for provider resources.
    pub locator_scheme: String,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
    pub log_dir: PathBuf,
}

impl Default for ClasspathConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::default(),
            libs_prefix: DEFAULT_LIBS_PREFIX.to_string(),
            locator_scheme: DEFAULT_LOCATOR_SCHEME.to_string(),
            log_filter: "info".to_string(),
            log_dir: default_log_dir(),
        }
    }
}

impl ClasspathConfig {
    pub fn load(path: &Path) -> ApiResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ClasspathError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|e| match e {
            ClasspathError::Config { message, .. } => ClasspathError::Config {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_json(text: &str) -> ApiResult<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| ClasspathError::Config {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ApiResult<()> {
        if self.libs_prefix.is_empty() {
            return Err(ClasspathError::Config {
                path: "<inline>".to_string(),
                message: "libs_prefix must not be empty".to_string(),
            });
        }
        if self.locator_scheme.is_empty() || self.locator_scheme.contains(':') {
            return Err(ClasspathError::Config {
                path: "<inline>".to_string(),
                message: format!("invalid locator_scheme {:?}", self.locator_scheme),
            });
        }
        Ok(())
    }
}

fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".classvfs/logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ClasspathConfig::default();
        assert_eq!(config.line_ending, LineEnding::Lf);
        assert_eq!(config.libs_prefix, "libs/");
        assert_eq!(config.locator_scheme, "classvfs");
        assert_eq!(config.log_filter, "info");
        assert!(config.log_dir.ends_with(".classvfs/logs"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ClasspathConfig::from_json(r#"{"line_ending": "crlf"}"#).unwrap();
        assert_eq!(config.line_ending, LineEnding::CrLf);
        assert_eq!(config.libs_prefix, "libs/");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"libs_prefix": "BOOT-INF/lib/", "locator_scheme": "jarvfs"}}"#).unwrap();

        let config = ClasspathConfig::load(file.path()).unwrap();
        assert_eq!(config.libs_prefix, "BOOT-INF/lib/");
        assert_eq!(config.locator_scheme, "jarvfs");
    }

    #[test]
    fn test_invalid_json_names_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        match ClasspathConfig::load(file.path()) {
            Err(ClasspathError::Config { path, .. }) => {
                assert_eq!(path, file.path().display().to_string());
            }
            other => panic!("expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_scheme() {
        assert!(ClasspathConfig::from_json(r#"{"locator_scheme": "a:b"}"#).is_err());
        assert!(ClasspathConfig::from_json(r#"{"libs_prefix": ""}"#).is_err());
    }
}
