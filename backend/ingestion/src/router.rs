use chunkwise_core::{Chunk, Document, Error, Result, Source, SourceType, SplitConfig};
use splitter::{CharacterSplitter, Language, RecursiveSplitter, TextSplitter};

use crate::{require_file, LoaderRegistry};

/// What [`SourceRouter::load`] hands back: raw documents, or chunks when asked to split.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Documents(Vec<Document>),
    Chunks(Vec<Chunk>),
}

impl Loaded {
    pub fn len(&self) -> usize {
        match self {
            Loaded::Documents(docs) => docs.len(),
            Loaded::Chunks(chunks) => chunks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten to documents; chunks keep their metadata.
    pub fn into_documents(self) -> Vec<Document> {
        match self {
            Loaded::Documents(docs) => docs,
            Loaded::Chunks(chunks) => chunks.into_iter().map(Document::from).collect(),
        }
    }
}

/// Input accepted by [`SourceRouter::split_auto`].
#[derive(Debug, Clone, Copy)]
pub enum AutoInput<'a> {
    /// Raw text, or a path when it ends in `.pdf`
    Text(&'a str),
    Documents(&'a [Document]),
}

/// Resolves a source to a loader, runs it and optionally chunks the result.
#[derive(Debug)]
pub struct SourceRouter {
    registry: LoaderRegistry,
}

impl SourceRouter {
    pub fn new(registry: LoaderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LoaderRegistry {
        &self.registry
    }

    /// The explicit type if given, otherwise the one implied by a single
    /// source's extension.
    pub fn resolve(&self, source: &Source, source_type: Option<SourceType>) -> Result<SourceType> {
        if let Some(st) = source_type {
            return Ok(st);
        }

        match source {
            Source::One(target) => {
                SourceType::from_path(target).ok_or_else(|| Error::UnresolvedSourceType {
                    input: target.clone(),
                })
            }
            Source::Many(targets) => Err(Error::UnresolvedSourceType {
                input: targets.join(", "),
            }),
        }
    }

    pub fn load_documents(&self, source: &Source, source_type: Option<SourceType>) -> Result<Vec<Document>> {
        let st = self.resolve(source, source_type)?;
        let loader = self.registry.get(st)?;

        if st.is_file_based() {
            for target in source.targets() {
                require_file(st, target)?;
            }
        }

        let mut docs = Vec::new();
        for target in source.targets() {
            let loaded = loader.load(target)?;
            tracing::debug!("Loaded {} documents from {} ({})", loaded.len(), target, st);
            docs.extend(loaded);
        }

        tracing::info!(
            "Loaded {} documents from {} {} source(s)",
            docs.len(),
            source.targets().len(),
            st
        );
        Ok(docs)
    }

    pub fn load(
        &self,
        source: &Source,
        source_type: Option<SourceType>,
        chunk: bool,
        config: &SplitConfig,
    ) -> Result<Loaded> {
        let docs = self.load_documents(source, source_type)?;
        if !chunk {
            return Ok(Loaded::Documents(docs));
        }

        let chunks = RecursiveSplitter::new(*config).split_documents(&docs)?;
        Ok(Loaded::Chunks(chunks))
    }

    /// Pick a splitting strategy from the shape of the input.
    ///
    /// Documents get the recursive splitter. A string ending in `.pdf` is
    /// loaded first. Other text uses the code-aware separators of `language`
    /// when one is given, plain paragraph splitting otherwise.
    pub fn split_auto(
        &self,
        input: AutoInput<'_>,
        config: &SplitConfig,
        language: Option<Language>,
    ) -> Result<Vec<Chunk>> {
        match input {
            AutoInput::Documents(docs) => RecursiveSplitter::new(*config).split_documents(docs),
            AutoInput::Text(text) if text.to_lowercase().ends_with(".pdf") => {
                let docs = self.load_documents(&Source::from(text), Some(SourceType::Pdf))?;
                RecursiveSplitter::new(*config).split_documents(&docs)
            }
            AutoInput::Text(text) => match language {
                Some(language) => {
                    RecursiveSplitter::for_language(language, *config).create_documents(&[text])
                }
                None => CharacterSplitter::new(*config).create_documents(&[text]),
            },
        }
    }
}
