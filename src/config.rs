//! Runtime and collection configuration.
//!
//! All knobs are read once from the environment into an explicit
//! [`PopulateConfig`] that is passed by reference into every component.

use crate::errors::PopulateError;
use std::path::PathBuf;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Configuration for a populate run.
#[derive(Clone, Debug)]
pub struct PopulateConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Dimensionality used when the collection has to be created.
    pub vector_size: u64,
    /// OpenAI API key for the embeddings endpoint.
    pub openai_api_key: String,
    /// Base URL of the embeddings API, e.g. `https://api.openai.com`.
    pub openai_api_base: String,
    /// Embedding model identifier.
    pub embedding_model: String,
    /// Path to the JSON input file (array of records).
    pub input_file: PathBuf,
    /// Max points per upsert call. `None` submits everything in one call.
    pub batch_size: Option<usize>,
}

impl PopulateConfig {
    /// Builds the configuration strictly from environment variables.
    ///
    /// Required: `COLLECTION_NAME`, `OPENAI_API_KEY`, `JSON_INPUT_FILE`.
    /// Everything else falls back to a sane default.
    ///
    /// # Errors
    /// Returns `PopulateError::Config` when a required variable is missing
    /// or a numeric variable fails to parse.
    pub fn from_env() -> Result<Self, PopulateError> {
        let host = env_or("QDRANT_HOST", "localhost");
        let port = env_parse_or::<u16>("QDRANT_PORT", 6334)?;

        let cfg = Self {
            qdrant_url: format!("http://{host}:{port}"),
            qdrant_api_key: env_opt("QDRANT_API_KEY"),
            collection: must_env("COLLECTION_NAME")?,
            distance: DistanceKind::Cosine,
            vector_size: env_parse_or::<u64>("VECTOR_SIZE", 1536)?,
            openai_api_key: must_env("OPENAI_API_KEY")?,
            openai_api_base: env_or("OPENAI_API_BASE", "https://api.openai.com"),
            embedding_model: env_or("EMBEDDING_MODEL", "text-embedding-ada-002"),
            input_file: PathBuf::from(must_env("JSON_INPUT_FILE")?),
            batch_size: env_opt_usize("BATCH_SIZE")?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), PopulateError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(PopulateError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(PopulateError::Config("collection is empty".into()));
        }
        if self.vector_size == 0 {
            return Err(PopulateError::Config("vector_size must be > 0".into()));
        }
        if self.batch_size == Some(0) {
            return Err(PopulateError::Config("batch_size must be > 0".into()));
        }
        Ok(())
    }
}

/// Fetches a required, non-empty environment variable.
fn must_env(name: &'static str) -> Result<String, PopulateError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PopulateError::Config(format!(
            "missing required environment variable: {name}"
        ))),
    }
}

/// Fetches an optional env var, treating empty values as unset.
fn env_opt(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Fetches an env var or falls back to `default`.
fn env_or(name: &'static str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

/// Parses a numeric env var or falls back to `default` when unset.
fn env_parse_or<T: std::str::FromStr>(
    name: &'static str,
    default: T,
) -> Result<T, PopulateError> {
    match env_opt(name) {
        Some(v) => v
            .parse::<T>()
            .map_err(|_| PopulateError::Config(format!("invalid number in {name}: {v}"))),
        None => Ok(default),
    }
}

/// Parses an optional `usize` from env (`Ok(None)` if unset/empty).
fn env_opt_usize(name: &'static str) -> Result<Option<usize>, PopulateError> {
    match env_opt(name) {
        Some(v) => v
            .parse::<usize>()
            .map(Some)
            .map_err(|_| PopulateError::Config(format!("invalid number in {name}: {v}"))),
        None => Ok(None),
    }
}
