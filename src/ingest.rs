//! End-to-end ingestion pipeline: records → resolve ids → embed → points →
//! batched upsert into Qdrant.
//!
//! The pipeline is strictly sequential: one embedding request at a time, one
//! upsert call at a time, so points always land in input order. A failing
//! record or batch is logged and skipped, never fatal.

use crate::embed::EmbeddingsProvider;
use crate::errors::PopulateError;
use crate::ids;
use crate::io_json;
use crate::qdrant_facade::PointStore;
use crate::record::InputRecord;

use indicatif::{ProgressBar, ProgressStyle};
use qdrant_client::qdrant::{ListValue, PointStruct, Struct, Value as QValue, value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Runs the full populate flow against a point store: ensure the collection
/// exists, read the input file, build points and upsert them in batches.
///
/// Returns the number of points handed to the store in acknowledged calls.
///
/// # Errors
/// Collection bootstrap, file I/O, JSON parsing and an empty input array are
/// fatal. Per-record and per-batch failures are logged and skipped.
pub async fn run_pipeline(
    store: &dyn PointStore,
    provider: &dyn EmbeddingsProvider,
    input_file: impl AsRef<Path>,
    vector_size: u64,
    batch_size: Option<usize>,
) -> Result<usize, PopulateError> {
    store.ensure_collection(vector_size).await?;

    let records = io_json::read_records(input_file.as_ref())?;
    info!(
        "Populating with {} records from {:?}",
        records.len(),
        input_file.as_ref()
    );

    let points = build_points(&records, provider).await;
    Ok(upsert_in_batches(store, points, batch_size).await)
}

/// Builds Qdrant points for the given records, in input order.
///
/// Records without a usable `text` are skipped before any embedding call;
/// a failed embedding request skips only that record. Both cases are logged
/// with the record index.
pub async fn build_points(
    records: &[InputRecord],
    provider: &dyn EmbeddingsProvider,
) -> Vec<PointStruct> {
    let total = records.len();
    let mut points = Vec::with_capacity(total);

    for (i, record) in records.iter().enumerate() {
        let Some(text) = record.text_for_embedding() else {
            warn!("Record {}/{} has no 'text' field, skipping", i + 1, total);
            continue;
        };

        info!(
            "Processing record {}/{}: embedding '{}'",
            i + 1,
            total,
            preview(text)
        );

        let vector = match provider.embed(text).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Record {}/{} failed to embed, skipping: {e}", i + 1, total);
                continue;
            }
        };

        let resolution = ids::resolve(&record.id);
        let payload = payload_from_metadata(&record.metadata);

        info!(
            "Record {}/{} prepared with id {}{}",
            i + 1,
            total,
            resolution.key,
            if resolution.synthesized { " (new)" } else { "" }
        );

        points.push(PointStruct {
            id: Some(resolution.key.into()),
            payload,
            vectors: Some(vector.into()),
            ..Default::default()
        });
    }

    points
}

/// Submits points in contiguous chunks of at most `batch_size`, preserving
/// order. A failed chunk is logged; subsequent chunks are still attempted.
///
/// Returns the number of points in the acknowledged chunks.
pub async fn upsert_in_batches(
    store: &dyn PointStore,
    points: Vec<PointStruct>,
    batch_size: Option<usize>,
) -> usize {
    if points.is_empty() {
        warn!("No valid points to upsert");
        return 0;
    }

    let chunk_size = effective_batch_size(batch_size, points.len());
    let total_chunks = points.len().div_ceil(chunk_size);

    let pb = ProgressBar::new(total_chunks as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap()
        .progress_chars("##-"),
    );

    let mut submitted = 0;
    for (n, chunk) in points.chunks(chunk_size).enumerate() {
        match store.upsert_points(chunk.to_vec()).await {
            Ok(count) => {
                info!("Upserted {} points in batch {}/{}", count, n + 1, total_chunks);
                submitted += count;
            }
            Err(e) => {
                warn!("Batch {}/{} failed: {e}", n + 1, total_chunks);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    submitted
}

/// Resolves the chunk size: unset batch size means one chunk with everything.
fn effective_batch_size(batch_size: Option<usize>, total: usize) -> usize {
    batch_size.unwrap_or(total).max(1)
}

/// Converts a record's metadata map into a Qdrant payload.
fn payload_from_metadata(metadata: &serde_json::Map<String, serde_json::Value>) -> HashMap<String, QValue> {
    metadata
        .iter()
        .map(|(k, v)| (k.clone(), json_to_qvalue(v.clone())))
        .collect()
}

/// Converts `serde_json::Value` into Qdrant `Value` (handles arrays/objects).
fn json_to_qvalue(v: serde_json::Value) -> QValue {
    use value::Kind as K;
    match v {
        serde_json::Value::String(s) => QValue {
            kind: Some(K::StringValue(s)),
        },
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                QValue {
                    kind: Some(K::IntegerValue(i)),
                }
            } else if let Some(f) = n.as_f64() {
                QValue {
                    kind: Some(K::DoubleValue(f)),
                }
            } else {
                QValue {
                    kind: Some(K::StringValue(n.to_string())),
                }
            }
        }
        serde_json::Value::Bool(b) => QValue {
            kind: Some(K::BoolValue(b)),
        },
        serde_json::Value::Array(arr) => {
            let vals: Vec<QValue> = arr.into_iter().map(json_to_qvalue).collect();
            QValue {
                kind: Some(K::ListValue(ListValue { values: vals })),
            }
        }
        serde_json::Value::Object(map) => {
            let fields = map
                .into_iter()
                .map(|(k, v)| (k, json_to_qvalue(v)))
                .collect();
            QValue {
                kind: Some(K::StructValue(Struct { fields })),
            }
        }
        serde_json::Value::Null => QValue { kind: None },
    }
}

/// Clamps a text to a short log-friendly preview.
fn preview(text: &str) -> &str {
    let end = text
        .char_indices()
        .take_while(|(i, _)| *i < 50)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &text[..end]
}
