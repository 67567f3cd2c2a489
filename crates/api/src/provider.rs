use crate::error::ApiResult;
use crate::path::ResourcePath;
use crate::resource::Resource;
use crate::unit::UnitName;

/// A source of resources addressed by [`ResourcePath`].
///
/// Implementations are read-only once built and must tolerate concurrent lookups
/// from any thread.
pub trait ResourceProvider: Send + Sync {
    /// Returns the resource at `path`, or `None` when this provider has nothing there.
    fn lookup(&self, path: &ResourcePath) -> ApiResult<Option<Resource>>;

    /// Returns the bytes of the named unit.
    fn unit(&self, name: &UnitName) -> ApiResult<Option<Resource>> {
        self.lookup(&ResourcePath::from_unit_name(name)?)
    }

    /// Human readable description, used in logs and error messages.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// An already configured classpath that lives outside this crate.
///
/// Paths handed to [`ExternalClasspath::read`] are relative, without a leading `/`.
pub trait ExternalClasspath: Send + Sync {
    fn read(&self, relative: &str) -> ApiResult<Option<Vec<u8>>>;

    fn describe(&self) -> String;
}
