use clap::Args;
use classvfs_api::{ApiResult, ClasspathError, ResourceProvider};
use classvfs_core::ClasspathConfig;
use classvfs_core::provider::{self, ClasspathRoots};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Where resources come from. Every flag can be repeated.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Archive to read entries from
    #[arg(long = "archive", value_name = "FILE", global = true)]
    pub archives: Vec<PathBuf>,

    /// Archive whose libs/ entries are archives too
    #[arg(long = "fat-archive", value_name = "FILE", global = true)]
    pub fat_archives: Vec<PathBuf>,

    /// Directory or archive on the external classpath
    #[arg(long = "classpath", value_name = "ENTRY", global = true)]
    pub classpath: Vec<PathBuf>,

    /// Append the entries of $CLASSPATH
    #[arg(long, global = true)]
    pub env_classpath: bool,
}

impl SourceArgs {
    /// Fat archives first, then archives, then the classpath.
    pub fn build(&self, config: &ClasspathConfig) -> ApiResult<Arc<dyn ResourceProvider>> {
        let mut providers: Vec<Arc<dyn ResourceProvider>> = Vec::new();

        for path in &self.fat_archives {
            let label = path.display().to_string();
            let file = File::open(path).map_err(|source| ClasspathError::Io {
                path: label.clone(),
                source,
            })?;
            providers.push(provider::archive_with_libs(
                file,
                &label,
                &config.libs_prefix,
                config.line_ending,
            )?);
        }

        for path in &self.archives {
            providers.push(provider::archive_file(path, config.line_ending)?);
        }

        if !self.classpath.is_empty() {
            providers.push(provider::host_classpath(ClasspathRoots::open(&self.classpath)?));
        }
        if self.env_classpath {
            providers.push(provider::host_classpath(ClasspathRoots::from_env()?));
        }

        let provider = provider::composite(providers)?;
        info!("Sources: {}", provider.describe());
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classvfs_api::{Resource, ResourcePath};
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn write_jar(path: &std::path::Path, name: &str, content: &[u8]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_no_sources_fails() {
        let result = SourceArgs::default().build(&ClasspathConfig::default());
        assert!(matches!(result, Err(ClasspathError::InvalidArgument(_))));
    }

    #[test]
    fn test_fat_archives_before_archives_before_classpath() {
        let dir = tempdir().unwrap();
        let fat = dir.path().join("fat.jar");
        let plain = dir.path().join("plain.jar");
        let classes = dir.path().join("classes");
        write_jar(&fat, "who.txt", b"fat");
        write_jar(&plain, "who.txt", b"plain");
        std::fs::create_dir_all(&classes).unwrap();
        std::fs::write(classes.join("who.txt"), b"classpath").unwrap();
        std::fs::write(classes.join("only-dir.txt"), b"dir").unwrap();

        let args = SourceArgs {
            archives: vec![plain],
            fat_archives: vec![fat],
            classpath: vec![classes],
            env_classpath: false,
        };
        let provider = args.build(&ClasspathConfig::default()).unwrap();

        let who = ResourcePath::parse("/who.txt").unwrap();
        assert_eq!(provider.lookup(&who).unwrap(), Some(Resource::from("fat")));
        let only = ResourcePath::parse("/only-dir.txt").unwrap();
        assert_eq!(provider.lookup(&only).unwrap(), Some(Resource::from("dir")));
    }
}
