use chunkwise_core::{Document, Error, Result, SourceType};
use serde::Deserialize;

use crate::{require_file, Loader};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Replace invalid UTF-8 sequences instead of failing
    pub lossy_utf8: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self { lossy_utf8: true }
    }
}

/// Loads a plain text file (`.txt`, `.md`, `.rst`, ...) as a single document.
#[derive(Debug, Clone, Default)]
pub struct TextLoader {
    pub options: TextOptions,
}

impl TextLoader {
    pub fn new(options: TextOptions) -> Self {
        Self { options }
    }
}

impl Loader for TextLoader {
    fn load(&self, target: &str) -> Result<Vec<Document>> {
        let path = require_file(SourceType::Text, target)?;
        let bytes = std::fs::read(path).map_err(|e| Error::loader(SourceType::Text, target, e))?;

        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) if self.options.lossy_utf8 => {
                tracing::warn!("{} is not valid UTF-8, decoding lossily", target);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
            Err(e) => return Err(Error::loader(SourceType::Text, target, e)),
        };

        Ok(vec![Document::with_source(content, target)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_text_loading() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "Hello, local world!").unwrap();

        let target = file_path.to_string_lossy().to_string();
        let docs = TextLoader::default().load(&target)?;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content.trim(), "Hello, local world!");
        assert_eq!(docs[0].source(), Some(target.as_str()));

        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = TextLoader::default().load("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: SourceType::Text, .. }));
    }

    #[test]
    fn test_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("latin1.txt");
        std::fs::write(&file_path, b"caf\xe9").unwrap();
        let target = file_path.to_string_lossy().to_string();

        let docs = TextLoader::default().load(&target).unwrap();
        assert_eq!(docs[0].content, "caf\u{fffd}");

        let strict = TextLoader::new(TextOptions { lossy_utf8: false });
        assert!(matches!(
            strict.load(&target),
            Err(Error::Loader { source_type: SourceType::Text, .. })
        ));
    }
}
