//! Seam between chunking and whatever embeds and indexes the chunks.
//!
//! Nothing here computes embeddings or searches vectors; callers plug in a
//! model and a store and `Retriever` wires chunks through both.

use crate::{BoxError, Chunk, Error, Result};
use std::path::Path;

pub trait Embeddings {
    /// Embed a batch of texts, one vector per input, in order.
    fn embed_documents(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, BoxError>;

    fn embed_query(&self, text: &str) -> std::result::Result<Vec<f32>, BoxError> {
        self.embed_documents(&[text])
            .map(|mut batch| batch.pop().unwrap_or_default())
    }
}

pub trait VectorStore {
    fn add(&mut self, chunks: &[Chunk], vectors: Vec<Vec<f32>>) -> std::result::Result<(), BoxError>;

    /// Nearest chunks to `vector`, best first, with their scores.
    fn similarity_search_by_vector(
        &self,
        vector: &[f32],
        k: usize,
    ) -> std::result::Result<Vec<(Chunk, f32)>, BoxError>;

    /// Persist the index under `dir`.
    fn save_local(&self, dir: &Path) -> std::result::Result<(), BoxError>;

    /// Reopen an index written by `save_local`.
    fn load_local(dir: &Path) -> std::result::Result<Self, BoxError>
    where
        Self: Sized;
}

/// Couples an embedding model with a store.
pub struct Retriever<E, S> {
    embeddings: E,
    store: S,
}

impl<E: Embeddings, S: VectorStore> Retriever<E, S> {
    pub fn new(embeddings: E, store: S) -> Self {
        Self { embeddings, store }
    }

    /// Pair `embeddings` with a store previously saved under `dir`.
    pub fn load_local(embeddings: E, dir: &Path) -> Result<Self> {
        let store = S::load_local(dir).map_err(Error::Store)?;
        Ok(Self { embeddings, store })
    }

    /// Embed and add chunks. Returns the number of chunks indexed.
    pub fn index(&mut self, chunks: &[Chunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let vectors = self
            .embeddings
            .embed_documents(&texts)
            .map_err(Error::Embedding)?;
        if vectors.len() != chunks.len() {
            return Err(Error::Embedding(
                format!(
                    "expected {} vectors, embedding model returned {}",
                    chunks.len(),
                    vectors.len()
                )
                .into(),
            ));
        }

        self.store.add(chunks, vectors).map_err(Error::Store)?;
        Ok(chunks.len())
    }

    pub fn similarity_search_with_score(&self, query: &str, k: usize) -> Result<Vec<(Chunk, f32)>> {
        let vector = self.embeddings.embed_query(query).map_err(Error::Embedding)?;
        self.store
            .similarity_search_by_vector(&vector, k)
            .map_err(Error::Store)
    }

    pub fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        Ok(self
            .similarity_search_with_score(query, k)?
            .into_iter()
            .map(|(chunk, _)| chunk)
            .collect())
    }

    pub fn save_local(&self, dir: &Path) -> Result<()> {
        self.store.save_local(dir).map_err(Error::Store)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
