//! JSON-to-Qdrant populator: ingestion of text records with embeddings.
//!
//! This crate reads a JSON array of records, resolves a valid point id per
//! record, computes embeddings via a pluggable provider, and upserts the
//! resulting points into a Qdrant collection (created on first use).
//!
//! The design is flat (no deep nesting) and splits responsibilities into
//! focused modules.

mod config;
mod embed;
mod errors;
mod ids;
mod ingest;
mod io_json;
mod qdrant_facade;
mod record;

pub use config::{DistanceKind, PopulateConfig};
pub use embed::{EmbeddingsProvider, openai::OpenAiEmbedder};
pub use errors::PopulateError;
pub use ids::{PointKey, RawId, Resolution, resolve};
pub use qdrant_facade::{PointStore, QdrantFacade};
pub use record::InputRecord;

use tracing::debug;

/// High-level facade that wires configuration and the Qdrant client.
///
/// This is the single entry point recommended for application code.
pub struct Populator {
    cfg: PopulateConfig,
    client: qdrant_facade::QdrantFacade,
}

impl Populator {
    /// Constructs a new populator from the given configuration.
    ///
    /// # Errors
    /// Returns `PopulateError::Qdrant` if the client initialization fails,
    /// `PopulateError::Config` if the configuration is invalid.
    pub fn new(cfg: PopulateConfig) -> Result<Self, PopulateError> {
        debug!("Populator::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    /// Runs the full populate flow: ensure the collection exists, read the
    /// input file, build points and upsert them in batches.
    ///
    /// Returns the number of points handed to Qdrant in acknowledged upsert
    /// calls; per-point confirmation is left to Qdrant's own semantics.
    ///
    /// # Errors
    /// Collection bootstrap, file I/O, JSON parsing and an empty input are
    /// fatal. Per-record and per-batch failures are logged and skipped.
    pub async fn run(&self, provider: &dyn EmbeddingsProvider) -> Result<usize, PopulateError> {
        ingest::run_pipeline(
            &self.client,
            provider,
            &self.cfg.input_file,
            self.cfg.vector_size,
            self.cfg.batch_size,
        )
        .await
    }
}
