pub mod error;
pub mod host;
pub mod line_ending;
pub mod name;
pub mod path;
pub mod provider;
pub mod resource;
pub mod unit;

// Re-export commonly used types
pub use error::{ApiResult, ClasspathError, PathError};
pub use host::{Connection, HostError, HostLoader, Locator, ResourceStream};
pub use line_ending::LineEnding;
pub use name::ResourceName;
pub use path::ResourcePath;
pub use provider::{ExternalClasspath, ResourceProvider};
pub use resource::Resource;
pub use unit::UnitName;
