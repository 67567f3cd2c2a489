/// Failure to turn text into a [`crate::ResourcePath`].
///
/// Ascending above the root is reported on its own so callers can tell a bad
/// `..` apart from text that is not a path at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Failed to parse {path:?}, message: {message}")]
    Malformed { path: String, message: String },
    #[error("Invalid path {0:?}")]
    AboveRoot(String),
}

impl PathError {
    pub(crate) fn malformed(path: &str, message: impl Into<String>) -> Self {
        PathError::Malformed {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClasspathError {
    #[error(transparent)]
    InvalidPath(#[from] PathError),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Error reading {path} from {archive}, {message}")]
    ArchiveFormat {
        archive: String,
        path: String,
        message: String,
    },
    #[error("Unable to load resource {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Unit not found: {0}")]
    UnitNotFound(String),
    #[error("Malformed unit {name}: {reason}")]
    MalformedUnit { name: String, reason: String },
    #[error("Failed to link {name}: {reason}")]
    Link { name: String, reason: String },
    #[error("Invalid configuration {path}: {message}")]
    Config { path: String, message: String },
}

impl ClasspathError {
    pub fn archive_format(
        archive: impl Into<String>,
        path: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        ClasspathError::ArchiveFormat {
            archive: archive.into(),
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True for the "nothing there" outcome, as opposed to a broken source.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClasspathError::UnitNotFound(_))
    }
}

pub type ApiResult<T> = std::result::Result<T, ClasspathError>;
