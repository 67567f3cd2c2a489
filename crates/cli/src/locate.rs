use classvfs_api::ResourceProvider;
use classvfs_core::ClasspathConfig;
use classvfs_core::bridge::{ClassFileHost, LoaderBridge};
use std::io::Write;
use std::sync::Arc;

pub fn run<W: Write>(
    provider: Arc<dyn ResourceProvider>,
    config: &ClasspathConfig,
    name: &str,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let bridge = LoaderBridge::with_scheme(ClassFileHost::new(), provider, config.locator_scheme.as_str());
    let locators = bridge.enumerate_all(name)?;
    if locators.is_empty() {
        return Err(format!("{name} not found").into());
    }
    for locator in locators {
        writeln!(out, "{}", locator.external_form())?;
    }
    Ok(())
}
