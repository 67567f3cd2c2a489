use classvfs_api::{ApiResult, ClasspathError, Resource, ResourcePath, ResourceProvider};
use std::sync::Arc;

/// Tries each provider in turn until one has the path.
///
/// Only the first hit is ever visible: two providers with the same path (listings
/// included) are not merged. Merge tables into one provider before cascading if that
/// matters.
pub struct CompositeProvider {
    providers: Vec<Arc<dyn ResourceProvider>>,
}

impl CompositeProvider {
    /// Empty lists are rejected and a single provider comes back as-is.
    pub fn with(
        mut providers: Vec<Arc<dyn ResourceProvider>>,
    ) -> ApiResult<Arc<dyn ResourceProvider>> {
        match providers.len() {
            0 => Err(ClasspathError::InvalidArgument(
                "Empty ResourceProvider list".to_string(),
            )),
            1 => Ok(providers.remove(0)),
            _ => Ok(Arc::new(Self { providers })),
        }
    }

    pub fn providers(&self) -> &[Arc<dyn ResourceProvider>] {
        &self.providers
    }
}

impl ResourceProvider for CompositeProvider {
    fn lookup(&self, path: &ResourcePath) -> ApiResult<Option<Resource>> {
        for provider in &self.providers {
            if let Some(resource) = provider.lookup(path)? {
                return Ok(Some(resource));
            }
        }
        Ok(None)
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.providers.iter().map(|p| p.describe()).collect();
        format!("[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fake::RecordingProvider;

    fn path(text: &str) -> ResourcePath {
        ResourcePath::parse(text).unwrap()
    }

    #[test]
    fn test_empty_fails() {
        assert!(matches!(
            CompositeProvider::with(vec![]),
            Err(ClasspathError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_single_provider_returned_unchanged() {
        let only: Arc<dyn ResourceProvider> = Arc::new(RecordingProvider::new());
        let composite = CompositeProvider::with(vec![only.clone()]).unwrap();
        assert!(Arc::ptr_eq(&only, &composite));
    }

    #[test]
    fn test_first_hit_wins_and_short_circuits() {
        let a = Arc::new(RecordingProvider::new());
        let b = Arc::new(RecordingProvider::new().with("/p", "from b"));
        let c = Arc::new(RecordingProvider::new().with("/p", "from c"));

        let composite =
            CompositeProvider::with(vec![a.clone(), b.clone(), c.clone()]).unwrap();

        assert_eq!(
            composite.lookup(&path("/p")).unwrap(),
            Some(Resource::from("from b"))
        );
        assert_eq!(a.call_count(), 1);
        assert_eq!(b.call_count(), 1);
        assert_eq!(c.call_count(), 0);
    }

    #[test]
    fn test_all_miss_is_absent() {
        let a = Arc::new(RecordingProvider::new());
        let b = Arc::new(RecordingProvider::new());
        let composite = CompositeProvider::with(vec![a.clone(), b.clone()]).unwrap();

        assert_eq!(composite.lookup(&path("/missing")).unwrap(), None);
        assert_eq!(a.calls(), vec![path("/missing")]);
        assert_eq!(b.calls(), vec![path("/missing")]);
    }

    #[test]
    fn test_listings_are_not_merged() {
        let a = Arc::new(RecordingProvider::new().with("/dir", "a\n"));
        let b = Arc::new(RecordingProvider::new().with("/dir", "b\n"));
        let composite = CompositeProvider::with(vec![a, b]).unwrap();

        assert_eq!(
            composite.lookup(&path("/dir")).unwrap(),
            Some(Resource::from("a\n"))
        );
    }

    #[test]
    fn test_error_stops_the_search() {
        let failing = Arc::new(RecordingProvider::new().failing("/p"));
        let later = Arc::new(RecordingProvider::new().with("/p", "later"));
        let composite = CompositeProvider::with(vec![failing, later.clone()]).unwrap();

        assert!(composite.lookup(&path("/p")).is_err());
        assert_eq!(later.call_count(), 0);
    }
}
