//! Reading and writing archive manifests (`META-INF/MANIFEST.MF`).
//!
//! The text format is a main section followed by named sections, separated by blank
//! lines. Each header is `Key: Value`; long headers continue on lines that start with
//! a single space. Output always uses `\r\n` and wraps at 72 bytes.

use indexmap::IndexMap;
use indexmap::map::Entry;

pub const MANIFEST_VERSION: &str = "Manifest-Version";
pub const NAME: &str = "Name";

const LINE_LIMIT: usize = 72;
const CRLF: &[u8] = b"\r\n";

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("invalid manifest header at line {line}: {text:?}")]
    InvalidHeader { line: usize, text: String },
    #[error("continuation at line {line} has no header to continue")]
    OrphanContinuation { line: usize },
    #[error("manifest section starting at line {line} has no Name header")]
    MissingName { line: usize },
}

/// Ordered headers with case-insensitive keys.
///
/// Entries are keyed by the ASCII-lowercased name and keep the spelling they were
/// first inserted with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, (String, String)>);

impl Attributes {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(&key.to_ascii_lowercase())
            .map(|(_, value)| value.as_str())
    }

    /// Inserts or replaces a header, keeping the first spelling of its key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.entry(key.to_ascii_lowercase()) {
            Entry::Occupied(mut entry) => entry.get_mut().1 = value,
            Entry::Vacant(entry) => {
                entry.insert((key, value));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.values().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn extend(&mut self, other: Attributes) {
        for (key, value) in other.0.into_values() {
            self.insert(key, value);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: Attributes,
    sections: IndexMap<String, Attributes>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_attributes(&self) -> &Attributes {
        &self.main
    }

    pub fn main_attributes_mut(&mut self) -> &mut Attributes {
        &mut self.main
    }

    pub fn section(&self, name: &str) -> Option<&Attributes> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: impl Into<String>) -> &mut Attributes {
        self.sections.entry(name.into()).or_default()
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, ManifestError> {
        let text = std::str::from_utf8(bytes)?;
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        let mut reader = SectionReader::default();
        for (idx, line) in normalized.split('\n').enumerate() {
            let number = idx + 1;

            if let Some(rest) = line.strip_prefix(' ') {
                match reader.pending.as_mut() {
                    Some((_, value)) => value.push_str(rest),
                    None => return Err(ManifestError::OrphanContinuation { line: number }),
                }
                continue;
            }

            reader.flush_header();
            if line.is_empty() {
                reader.close_section(number + 1)?;
                continue;
            }

            let (key, value) = line
                .split_once(':')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| ManifestError::InvalidHeader {
                    line: number,
                    text: line.to_string(),
                })?;
            let value = value.strip_prefix(' ').unwrap_or(value);
            reader.pending = Some((key.to_string(), value.to_string()));
        }

        reader.flush_header();
        reader.close_section(0)?;
        Ok(reader.manifest)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();

        if let Some(version) = self.main.get(MANIFEST_VERSION) {
            write_header(&mut out, MANIFEST_VERSION, version);
        }
        for (key, value) in self.main.iter() {
            if !key.eq_ignore_ascii_case(MANIFEST_VERSION) {
                write_header(&mut out, key, value);
            }
        }
        out.extend_from_slice(CRLF);

        for (name, attributes) in &self.sections {
            write_header(&mut out, NAME, name);
            for (key, value) in attributes.iter() {
                write_header(&mut out, key, value);
            }
            out.extend_from_slice(CRLF);
        }
        out
    }
}

#[derive(Default)]
struct SectionReader {
    manifest: Manifest,
    in_main: bool,
    started: bool,
    name: Option<String>,
    attributes: Attributes,
    pending: Option<(String, String)>,
    section_line: usize,
}

impl SectionReader {
    fn flush_header(&mut self) {
        let Some((key, value)) = self.pending.take() else {
            return;
        };
        if !self.started {
            self.started = true;
            self.in_main = true;
        }
        if !self.in_main && self.name.is_none() && key.eq_ignore_ascii_case(NAME) {
            self.name = Some(value);
        } else {
            self.attributes.insert(key, value);
        }
    }

    /// Ends the current section; `next_line` is where the following one begins.
    fn close_section(&mut self, next_line: usize) -> Result<(), ManifestError> {
        let attributes = std::mem::take(&mut self.attributes);
        if self.in_main || !self.started {
            self.manifest.main.extend(attributes);
            self.started = true;
            self.in_main = false;
        } else if self.name.is_some() || !attributes.is_empty() {
            let name = self.name.take().ok_or(ManifestError::MissingName {
                line: self.section_line.max(1),
            })?;
            self.manifest.section_mut(name).extend(attributes);
        }
        self.section_line = next_line;
        Ok(())
    }
}

fn write_header(out: &mut Vec<u8>, key: &str, value: &str) {
    let line = format!("{key}: {value}");
    let mut rest = line.as_str();
    let mut limit = LINE_LIMIT;

    loop {
        if rest.len() <= limit {
            out.extend_from_slice(rest.as_bytes());
            out.extend_from_slice(CRLF);
            return;
        }
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.extend_from_slice(rest[..cut].as_bytes());
        out.extend_from_slice(CRLF);
        out.push(b' ');
        rest = &rest[cut..];
        limit = LINE_LIMIT - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Manifest-Version: 1.0\r\n\
Created-By: test\r\n\
Main-Class: com.example.Main\r\n\
\r\n\
Name: com/example/\r\n\
Sealed: true\r\n\
\r\n";

    #[test]
    fn test_parse_sections() {
        let manifest = Manifest::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(manifest.main_attributes().get("manifest-version"), Some("1.0"));
        assert_eq!(
            manifest.main_attributes().get("Main-Class"),
            Some("com.example.Main")
        );
        let section = manifest.section("com/example/").unwrap();
        assert_eq!(section.get("Sealed"), Some("true"));
        assert_eq!(section.get("Name"), None);
    }

    #[test]
    fn test_write_is_canonical() {
        let manifest = Manifest::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(String::from_utf8(manifest.to_bytes()).unwrap(), SAMPLE);
    }

    #[test]
    fn test_version_written_first() {
        let mut manifest = Manifest::new();
        manifest.main_attributes_mut().insert("Created-By", "me");
        manifest.main_attributes_mut().insert(MANIFEST_VERSION, "1.0");
        assert_eq!(
            String::from_utf8(manifest.to_bytes()).unwrap(),
            "Manifest-Version: 1.0\r\nCreated-By: me\r\n\r\n"
        );
    }

    #[test]
    fn test_unix_line_endings_and_continuations() {
        let text = "Manifest-Version: 1.0\nClass-Path: a.jar\n  b.jar\n";
        let manifest = Manifest::parse(text.as_bytes()).unwrap();
        assert_eq!(
            manifest.main_attributes().get("Class-Path"),
            Some("a.jar b.jar")
        );
    }

    #[test]
    fn test_long_header_wraps_at_72_bytes() {
        let value = "x".repeat(150);
        let mut manifest = Manifest::new();
        manifest.main_attributes_mut().insert("Class-Path", value.clone());

        let bytes = manifest.to_bytes();
        let text = String::from_utf8(bytes.clone()).unwrap();
        for line in text.split("\r\n") {
            assert!(line.len() <= LINE_LIMIT, "line too long: {line:?}");
        }
        assert!(text.lines().nth(1).unwrap().starts_with(' '));

        let reparsed = Manifest::parse(&bytes).unwrap();
        assert_eq!(reparsed.main_attributes().get("Class-Path"), Some(value.as_str()));
    }

    #[test]
    fn test_wrap_respects_char_boundaries() {
        let value = "é".repeat(60);
        let mut manifest = Manifest::new();
        manifest.main_attributes_mut().insert("Title", value.clone());

        let reparsed = Manifest::parse(&manifest.to_bytes()).unwrap();
        assert_eq!(reparsed.main_attributes().get("Title"), Some(value.as_str()));
    }

    #[test]
    fn test_attribute_keys_ignore_case() {
        let mut attributes = Attributes::default();
        attributes.insert("Main-Class", "a.Main");
        attributes.insert("MAIN-CLASS", "b.Main");

        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes.get("main-class"), Some("b.Main"));
        assert_eq!(attributes.iter().collect::<Vec<_>>(), vec![("Main-Class", "b.Main")]);
    }

    #[test]
    fn test_invalid_header_fails() {
        assert!(matches!(
            Manifest::parse(b"Manifest-Version 1.0\r\n"),
            Err(ManifestError::InvalidHeader { line: 1, .. })
        ));
        assert!(matches!(
            Manifest::parse(b" orphan\r\n"),
            Err(ManifestError::OrphanContinuation { line: 1 })
        ));
    }

    #[test]
    fn test_section_without_name_fails() {
        let text = "Manifest-Version: 1.0\r\n\r\nSealed: true\r\n\r\n";
        assert!(matches!(
            Manifest::parse(text.as_bytes()),
            Err(ManifestError::MissingName { line: 3 })
        ));
    }
}
