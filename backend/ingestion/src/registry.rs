use chunkwise_core::{Error, Result, SourceType};
use serde::Deserialize;
use std::collections::HashMap;

use crate::{CsvLoader, CsvOptions, HttpOptions, Loader, PdfLoader, TextLoader, TextOptions, WebLoader, WebOptions};

#[cfg(feature = "arxiv")]
use crate::{ArxivLoader, ArxivOptions};
#[cfg(feature = "wikipedia")]
use crate::{WikipediaLoader, WikipediaOptions};

/// Per-loader settings, read from the `[loaders]` config table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    pub http: HttpOptions,
    pub text: TextOptions,
    pub csv: CsvOptions,
    pub web: WebOptions,
    #[cfg(feature = "arxiv")]
    pub arxiv: ArxivOptions,
    #[cfg(feature = "wikipedia")]
    pub wikipedia: WikipediaOptions,
}

/// Which loader handles which [`SourceType`].
///
/// Optional capabilities simply have no entry; asking for them yields
/// [`Error::CapabilityUnavailable`].
#[derive(Default)]
pub struct LoaderRegistry {
    loaders: HashMap<SourceType, Box<dyn Loader>>,
}

impl LoaderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every loader compiled into this build.
    pub fn with_defaults(options: &LoaderOptions) -> Self {
        let mut registry = Self::new();
        registry.register(SourceType::Text, TextLoader::new(options.text.clone()));
        registry.register(SourceType::Pdf, PdfLoader);
        registry.register(SourceType::Csv, CsvLoader::new(options.csv.clone()));
        registry.register(
            SourceType::Web,
            WebLoader::new(options.web.clone(), options.http.clone()),
        );

        #[cfg(feature = "arxiv")]
        registry.register(
            SourceType::Arxiv,
            ArxivLoader::new(options.arxiv.clone(), options.http.clone()),
        );
        #[cfg(feature = "wikipedia")]
        registry.register(
            SourceType::Wikipedia,
            WikipediaLoader::new(options.wikipedia.clone(), options.http.clone()),
        );

        tracing::debug!("Registered loaders: {:?}", registry.available());
        registry
    }

    /// Install `loader` for `source_type`, replacing any previous one.
    pub fn register(&mut self, source_type: SourceType, loader: impl Loader + 'static) -> &mut Self {
        self.loaders.insert(source_type, Box::new(loader));
        self
    }

    pub fn get(&self, source_type: SourceType) -> Result<&dyn Loader> {
        self.loaders
            .get(&source_type)
            .map(|loader| loader.as_ref())
            .ok_or(Error::CapabilityUnavailable(source_type))
    }

    pub fn contains(&self, source_type: SourceType) -> bool {
        self.loaders.contains_key(&source_type)
    }

    /// Registered types, in declaration order.
    pub fn available(&self) -> Vec<SourceType> {
        SourceType::ALL
            .into_iter()
            .filter(|st| self.contains(*st))
            .collect()
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("available", &self.available())
            .finish()
    }
}
