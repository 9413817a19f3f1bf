use serde::Deserialize;

/// Languages with a code-aware separator hierarchy for [`crate::RecursiveSplitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    Python,
    #[serde(alias = "js")]
    JavaScript,
    Go,
    Java,
    Cpp,
    Markdown,
}

impl Language {
    /// Separators from the coarsest boundary (definitions, headings) down to single characters.
    pub fn separators(&self) -> Vec<&'static str> {
        let mut seps: Vec<&'static str> = match self {
            Language::Rust => vec![
                "\nfn ", "\nconst ", "\nlet ", "\nif ", "\nwhile ", "\nfor ", "\nloop ", "\nmatch ",
            ],
            Language::Python => vec!["\nclass ", "\ndef ", "\n\tdef "],
            Language::JavaScript => vec![
                "\nfunction ", "\nconst ", "\nlet ", "\nvar ", "\nclass ", "\nif ", "\nfor ",
                "\nwhile ", "\nswitch ", "\ncase ", "\ndefault ",
            ],
            Language::Go => vec![
                "\nfunc ", "\nvar ", "\nconst ", "\ntype ", "\nif ", "\nfor ", "\nswitch ", "\ncase ",
            ],
            Language::Java => vec![
                "\nclass ", "\npublic ", "\nprotected ", "\nprivate ", "\nstatic ", "\nif ", "\nfor ",
                "\nwhile ", "\nswitch ", "\ncase ",
            ],
            Language::Cpp => vec![
                "\nclass ", "\nvoid ", "\nint ", "\nfloat ", "\ndouble ", "\nif ", "\nfor ",
                "\nwhile ", "\nswitch ", "\ncase ",
            ],
            Language::Markdown => vec![
                "\n# ", "\n## ", "\n### ", "\n#### ", "\n##### ", "\n###### ", "```\n", "\n***\n",
                "\n---\n", "\n___\n",
            ],
        };
        seps.extend(["\n\n", "\n", " ", ""]);
        seps
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "rs" => Some(Language::Rust),
            "py" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "ts" | "tsx" => Some(Language::JavaScript),
            "go" => Some(Language::Go),
            "java" => Some(Language::Java),
            "c" | "cc" | "cpp" | "cxx" | "h" | "hpp" => Some(Language::Cpp),
            "md" | "markdown" => Some(Language::Markdown),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecursiveSplitter, TextSplitter};
    use chunkwise_core::SplitConfig;

    #[test]
    fn test_hierarchy_ends_with_characters() {
        for lang in [Language::Rust, Language::Python, Language::Markdown] {
            assert_eq!(lang.separators().last(), Some(&""));
        }
    }

    #[test]
    fn test_python_splits_on_definitions() {
        let code = "import os\n\ndef first():\n    return 1\n\ndef second():\n    return 2\n";
        let splitter =
            RecursiveSplitter::for_language(Language::Python, SplitConfig::new(30, 0).unwrap());
        let chunks = splitter.create_documents(&[code]).unwrap();

        assert_eq!(chunks.len(), 3);
        assert!(chunks[1].content.starts_with("def first"));
        assert!(chunks[2].content.starts_with("def second"));
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("RS"), Some(Language::Rust));
        assert_eq!(Language::from_extension("tsx"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("txt"), None);
    }
}
