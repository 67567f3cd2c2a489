mod common;

use classvfs_api::{ClasspathError, LineEnding, Resource, ResourcePath};
use classvfs_core::provider;
use std::fs::File;
use tempfile::tempdir;

fn path(text: &str) -> ResourcePath {
    ResourcePath::parse(text).unwrap()
}

#[test]
fn test_archive_file_resolves_entries_and_listings() {
    let dir = tempdir().unwrap();
    let jar = dir.path().join("app.jar");
    common::write_jar(
        &jar,
        &[
            ("META-INF/", b""),
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\nMain-Class: a.Main\n"),
            ("a/", b""),
            ("a/Main.class", b"\xCA\xFE\xBA\xBE"),
            ("a/readme.txt", b"hello"),
        ],
    );

    let archive = provider::archive_file(&jar, LineEnding::Lf).unwrap();

    assert_eq!(
        archive.lookup(&path("/a/readme.txt")).unwrap(),
        Some(Resource::from("hello"))
    );
    assert_eq!(
        archive.lookup(&path("/a")).unwrap(),
        Some(Resource::from("Main.class\nreadme.txt\n"))
    );
    assert_eq!(
        archive.lookup(&path("/META-INF/MANIFEST.MF")).unwrap(),
        Some(Resource::from(
            "Manifest-Version: 1.0\r\nMain-Class: a.Main\r\n\r\n"
        ))
    );
    assert_eq!(archive.lookup(&path("/b")).unwrap(), None);
    assert!(archive.describe().contains("app.jar"));
}

#[test]
fn test_archive_file_missing_is_io_error() {
    let dir = tempdir().unwrap();
    let result = provider::archive_file(&dir.path().join("missing.jar"), LineEnding::Lf);
    assert!(matches!(result, Err(ClasspathError::Io { .. })));
}

#[test]
fn test_archive_file_not_a_zip_is_format_error() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus.jar");
    std::fs::write(&bogus, b"definitely not a zip").unwrap();

    match provider::archive_file(&bogus, LineEnding::Lf) {
        Err(ClasspathError::ArchiveFormat { archive, .. }) => {
            assert!(archive.ends_with("bogus.jar"));
        }
        _ => panic!("expected a format error"),
    }
}

#[test]
fn test_fat_archive_from_file() {
    let dir = tempdir().unwrap();
    let inner = common::jar_bytes(&[("z", b"Z"), ("shared.txt", b"inner")]);
    let fat = dir.path().join("fat.jar");
    common::write_jar(
        &fat,
        &[
            ("libs/", b""),
            ("libs/inner.jar", &inner),
            ("y", b"Y"),
            ("shared.txt", b"outer"),
        ],
    );

    let file = File::open(&fat).unwrap();
    let provider = provider::archive_with_libs(file, "fat.jar", "libs/", LineEnding::Lf).unwrap();

    assert_eq!(provider.lookup(&path("/y")).unwrap(), Some(Resource::from("Y")));
    assert_eq!(provider.lookup(&path("/z")).unwrap(), Some(Resource::from("Z")));
    assert_eq!(
        provider.lookup(&path("/shared.txt")).unwrap(),
        Some(Resource::from("outer"))
    );
    assert_eq!(provider.lookup(&path("/libs/inner.jar")).unwrap(), None);
}

#[test]
fn test_composite_of_archives_first_hit_wins() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.jar");
    let second = dir.path().join("second.jar");
    common::write_jar(&first, &[("only-first", b"1"), ("both", b"first")]);
    common::write_jar(&second, &[("only-second", b"2"), ("both", b"second")]);

    let cascade = provider::composite(vec![
        provider::archive_file(&first, LineEnding::Lf).unwrap(),
        provider::archive_file(&second, LineEnding::Lf).unwrap(),
    ])
    .unwrap();

    assert_eq!(cascade.lookup(&path("/both")).unwrap(), Some(Resource::from("first")));
    assert_eq!(cascade.lookup(&path("/only-second")).unwrap(), Some(Resource::from("2")));
    assert_eq!(cascade.lookup(&path("/neither")).unwrap(), None);
}

#[test]
fn test_fake_provider_finds_nothing() {
    let fake = provider::fake();
    assert_eq!(fake.lookup(&ResourcePath::root()).unwrap(), None);
    assert_eq!(fake.lookup(&ResourcePath::manifest()).unwrap(), None);
}
