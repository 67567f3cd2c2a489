use classvfs_api::{ResourcePath, ResourceProvider};
use std::io::Write;

pub fn run<W: Write>(
    provider: &dyn ResourceProvider,
    path: &str,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = ResourcePath::parse(path)?;
    let resource = provider
        .lookup(&path)?
        .ok_or_else(|| format!("{path} not found in {}", provider.describe()))?;
    out.write_all(resource.bytes())?;
    out.flush()?;
    Ok(())
}

pub fn manifest<W: Write>(
    provider: &dyn ResourceProvider,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let resource = provider
        .lookup(&ResourcePath::manifest())?
        .ok_or_else(|| format!("no manifest in {}", provider.describe()))?;
    out.write_all(resource.bytes())?;
    out.flush()?;
    Ok(())
}
