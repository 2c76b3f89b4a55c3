//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! Concentrates all Qdrant interactions behind a minimal API, hiding the
//! verbose builder pattern and keeping the rest of the application decoupled
//! from `qdrant-client`.

use crate::config::{DistanceKind, PopulateConfig};
use crate::errors::PopulateError;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, VectorParamsBuilder,
};
use std::{future::Future, pin::Pin};
use tracing::{debug, info};

/// Storage seam over the point database.
///
/// Mirrors the [`crate::EmbeddingsProvider`] seam: the ingestion pipeline
/// only depends on this trait, so it can be exercised without a live server.
pub trait PointStore: Send + Sync {
    /// Creates the target collection when it does not exist yet.
    fn ensure_collection<'a>(
        &'a self,
        vector_size: u64,
    ) -> Pin<Box<dyn Future<Output = Result<(), PopulateError>> + Send + 'a>>;

    /// Upserts one batch of points, returning how many were handed over.
    fn upsert_points<'a>(
        &'a self,
        points: Vec<PointStruct>,
    ) -> Pin<Box<dyn Future<Output = Result<usize, PopulateError>> + Send + 'a>>;
}

/// A facade over the Qdrant client.
///
/// Encapsulates the underlying client, the target collection name and the
/// distance function of the vector space.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    distance: DistanceKind,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Uses the builder-based API of `qdrant-client` and supports optional
    /// API key authentication.
    pub fn new(cfg: &PopulateConfig) -> Result<Self, PopulateError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| PopulateError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
        })
    }

    /// Ensures that the collection exists in Qdrant.
    ///
    /// - If the collection name is already listed → no-op.
    /// - If missing → creates it with the given dimensionality.
    ///
    /// An existing collection is used as-is; its shape is not verified.
    pub async fn ensure_collection(&self, vector_size: u64) -> Result<(), PopulateError> {
        info!(
            "Ensuring collection '{}' with size={} distance={:?}",
            self.collection, vector_size, self.distance
        );

        let listed = self
            .client
            .list_collections()
            .await
            .map_err(|e| PopulateError::Qdrant(e.to_string()))?;

        if listed
            .collections
            .iter()
            .any(|c| c.name == self.collection)
        {
            debug!("Collection '{}' already exists", self.collection);
            return Ok(());
        }

        let distance = match self.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(vector_size, distance)),
            )
            .await
            .map_err(|e| PopulateError::Qdrant(e.to_string()))?;

        info!("Collection '{}' created successfully", self.collection);
        Ok(())
    }

    /// Upserts (inserts or updates) a batch of points into the collection.
    ///
    /// Returns the number of points handed to Qdrant.
    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<usize, PopulateError> {
        if points.is_empty() {
            debug!("No points provided for upsert");
            return Ok(0);
        }

        let count = points.len();
        info!(
            "Upserting {} points into collection '{}'",
            count, self.collection
        );

        let res = self
            .client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| PopulateError::Qdrant(e.to_string()))?;

        debug!("Upsert operation result={:?}", res.result);
        Ok(count)
    }
}

impl PointStore for QdrantFacade {
    fn ensure_collection<'a>(
        &'a self,
        vector_size: u64,
    ) -> Pin<Box<dyn Future<Output = Result<(), PopulateError>> + Send + 'a>> {
        Box::pin(QdrantFacade::ensure_collection(self, vector_size))
    }

    fn upsert_points<'a>(
        &'a self,
        points: Vec<PointStruct>,
    ) -> Pin<Box<dyn Future<Output = Result<usize, PopulateError>> + Send + 'a>> {
        Box::pin(QdrantFacade::upsert_points(self, points))
    }
}
