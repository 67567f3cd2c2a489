use super::listing;
use classvfs_api::{ApiResult, LineEnding, Resource, ResourceName, ResourcePath, ResourceProvider};
use std::collections::BTreeMap;

/// A provider over a fixed path to resource table.
///
/// Paths that are not in the table but have entries directly beneath them resolve to a
/// listing of those entries, in table order.
pub struct MapProvider {
    table: BTreeMap<ResourcePath, Resource>,
    children: BTreeMap<ResourcePath, Vec<ResourceName>>,
    line_ending: LineEnding,
}

impl MapProvider {
    pub fn new(table: BTreeMap<ResourcePath, Resource>, line_ending: LineEnding) -> Self {
        let mut children: BTreeMap<ResourcePath, Vec<ResourceName>> = BTreeMap::new();
        for path in table.keys() {
            if let Some(parent) = path.parent() {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(path.name().clone());
            }
        }

        Self {
            table,
            children,
            line_ending,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl ResourceProvider for MapProvider {
    fn lookup(&self, path: &ResourcePath) -> ApiResult<Option<Resource>> {
        if let Some(resource) = self.table.get(path) {
            return Ok(Some(resource.clone()));
        }

        Ok(self
            .children
            .get(path)
            .and_then(|names| listing::render(names.iter().cloned(), self.line_ending)))
    }

    fn describe(&self) -> String {
        format!("map({} entries)", self.table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> ResourcePath {
        ResourcePath::parse(text).unwrap()
    }

    fn provider(line_ending: LineEnding) -> MapProvider {
        let mut table = BTreeMap::new();
        table.insert(path("/d/y"), Resource::from("R2"));
        table.insert(path("/d/x"), Resource::from("R1"));
        table.insert(path("/d/sub/z"), Resource::from("R3"));
        table.insert(path("/top.txt"), Resource::from("top"));
        MapProvider::new(table, line_ending)
    }

    #[test]
    fn test_exact_entry() {
        let provider = provider(LineEnding::Lf);
        assert_eq!(
            provider.lookup(&path("/d/x")).unwrap(),
            Some(Resource::from("R1"))
        );
    }

    #[test]
    fn test_listing_in_sorted_order() {
        let provider = provider(LineEnding::Lf);
        assert_eq!(
            provider.lookup(&path("/d")).unwrap(),
            Some(Resource::from("x\ny\n"))
        );
        assert_eq!(
            provider.lookup(&path("/d/sub")).unwrap(),
            Some(Resource::from("z\n"))
        );
    }

    #[test]
    fn test_listing_uses_line_ending() {
        let provider = provider(LineEnding::CrLf);
        assert_eq!(
            provider.lookup(&ResourcePath::root()).unwrap(),
            Some(Resource::from("top.txt\r\n"))
        );
    }

    #[test]
    fn test_unknown_is_absent() {
        let provider = provider(LineEnding::Lf);
        assert_eq!(provider.lookup(&path("/d/z")).unwrap(), None);
        assert_eq!(provider.lookup(&path("/top.txt/inner")).unwrap(), None);
    }

    #[test]
    fn test_manifest_any_case() {
        let mut table = BTreeMap::new();
        table.insert(ResourcePath::manifest(), Resource::from("Manifest-Version: 1.0\r\n\r\n"));
        let provider = MapProvider::new(table, LineEnding::Lf);
        assert!(provider
            .lookup(&path("/meta-inf/manifest.mf"))
            .unwrap()
            .is_some());
    }
}
