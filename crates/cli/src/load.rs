use classvfs_api::ResourceProvider;
use classvfs_core::ClasspathConfig;
use classvfs_core::bridge::{ClassFileHost, LoaderBridge};
use std::io::Write;
use std::sync::Arc;
use tracing::info;

pub fn run<W: Write>(
    provider: Arc<dyn ResourceProvider>,
    config: &ClasspathConfig,
    name: &str,
    link: bool,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let bridge = LoaderBridge::with_scheme(ClassFileHost::new(), provider, config.locator_scheme.as_str());
    let unit = bridge.load_unit(name, link)?;
    info!("Loaded {}", unit.name());

    writeln!(out, "{}", unit.name())?;
    writeln!(out, "  bytes:  {}", unit.bytes().len())?;
    if let Some(super_name) = unit.super_name() {
        writeln!(out, "  super:  {super_name}")?;
    }
    writeln!(out, "  linked: {}", unit.is_linked())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use classvfs_core::provider::RecordingProvider;
    use classvfs_core::provider::fake::class_file;

    #[test]
    fn test_reports_loaded_unit() {
        let bytes = class_file("a/b/C", "a/b/Base");
        let provider = Arc::new(RecordingProvider::new().with("/a/b/C.class", bytes.clone()));
        let mut out = Vec::new();

        run(provider, &ClasspathConfig::default(), "a.b.C", false, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "a.b.C");
        assert_eq!(lines[1], format!("  bytes:  {}", bytes.len()));
        assert_eq!(lines[2], "  super:  a.b.Base");
        assert_eq!(lines[3], "  linked: false");
    }

    #[test]
    fn test_link_failure_fails() {
        let provider = Arc::new(
            RecordingProvider::new().with("/a/b/C.class", class_file("a/b/C", "a/b/Missing")),
        );
        let mut out = Vec::new();
        assert!(run(provider, &ClasspathConfig::default(), "a.b.C", true, &mut out).is_err());
        assert!(out.is_empty());
    }
}
