use chunkwise_core::{Document, Error, Result, SourceType};
use serde::Deserialize;

use crate::{require_file, Loader};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: char,
    pub quote: char,
    /// Column names for files without a header row
    pub fieldnames: Option<Vec<String>>,
    /// Column whose value becomes each row's `source` instead of the file path
    pub source_column: Option<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            fieldnames: None,
            source_column: None,
        }
    }
}

/// Loads a CSV file, one document per row rendered as `column: value` lines.
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    pub options: CsvOptions,
}

impl CsvLoader {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }
}

fn ascii(c: char, what: &str, target: &str) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| Error::loader(SourceType::Csv, target, format!("{} {:?} is not ASCII", what, c)))
}

impl Loader for CsvLoader {
    fn load(&self, target: &str) -> Result<Vec<Document>> {
        let path = require_file(SourceType::Csv, target)?;
        let fail = |e: ::csv::Error| Error::loader(SourceType::Csv, target, e);

        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(ascii(self.options.delimiter, "delimiter", target)?)
            .quote(ascii(self.options.quote, "quote", target)?)
            .has_headers(self.options.fieldnames.is_none())
            .flexible(true)
            .from_path(path)
            .map_err(fail)?;

        let headers: Vec<String> = match &self.options.fieldnames {
            Some(names) => names.clone(),
            None => reader
                .headers()
                .map_err(fail)?
                .iter()
                .map(|h| h.trim().to_string())
                .collect(),
        };

        let source_idx = match &self.options.source_column {
            Some(column) => Some(headers.iter().position(|h| h == column).ok_or_else(|| {
                Error::loader(
                    SourceType::Csv,
                    target,
                    format!("source column `{}` not found in header", column),
                )
            })?),
            None => None,
        };

        let mut docs = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(fail)?;

            let content = headers
                .iter()
                .zip(record.iter())
                .map(|(k, v)| format!("{}: {}", k, v.trim()))
                .collect::<Vec<_>>()
                .join("\n");
            let source = source_idx
                .and_then(|i| record.get(i))
                .unwrap_or(target)
                .to_string();

            docs.push(Document::with_source(content, source).with_metadata("row", row));
        }

        tracing::debug!("Loaded {} rows from {}", docs.len(), target);
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, body: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_rows_become_documents() {
        let dir = TempDir::new().unwrap();
        let target = write_csv(&dir, "attendance.csv", "name, day\nAda, Mon\nLinus, Tue\n");

        let docs = CsvLoader::default().load(&target).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "name: Ada\nday: Mon");
        assert_eq!(docs[1].metadata["row"], 1);
        assert_eq!(docs[1].source(), Some(target.as_str()));
    }

    #[test]
    fn test_custom_dialect_and_fieldnames() {
        let dir = TempDir::new().unwrap();
        let target = write_csv(&dir, "data.csv", "a;'x;y'\nb;z\n");

        let loader = CsvLoader::new(CsvOptions {
            delimiter: ';',
            quote: '\'',
            fieldnames: Some(vec!["key".into(), "value".into()]),
            source_column: Some("key".into()),
        });
        let docs = loader.load(&target).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "key: a\nvalue: x;y");
        assert_eq!(docs[0].source(), Some("a"));
    }

    #[test]
    fn test_unknown_source_column() {
        let dir = TempDir::new().unwrap();
        let target = write_csv(&dir, "data.csv", "a,b\n1,2\n");

        let loader = CsvLoader::new(CsvOptions {
            source_column: Some("url".into()),
            ..CsvOptions::default()
        });
        assert!(matches!(loader.load(&target), Err(Error::Loader { .. })));
    }

    #[test]
    fn test_missing_csv() {
        let err = CsvLoader::default().load("AUG 2025.csv").unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: SourceType::Csv, .. }));
    }
}
