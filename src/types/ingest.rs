//! Ingestion stream wire types

use serde::{Deserialize, Serialize};

/// One event decoded from a `data: <json>` line of the ingestion stream.
///
/// Every field is optional; which ones are present depends on the event.
/// An absent field means "unknown", never zero. Fields are decoded one by
/// one: a value of an unexpected JSON type only loses that field, never the
/// rest of the event (see [`lenient`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionEvent {
    /// Event tag, see [`EventKind`]
    #[serde(deserialize_with = "lenient::text")]
    pub event: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub job_id: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub pages_total: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub pages_processed: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub chunks: Option<u64>,
    #[serde(deserialize_with = "lenient::text")]
    pub report_path: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub collection: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub batch_index: Option<u64>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_docs: Option<u64>,
    /// Running count of ingested documents on `ingest_batch`.
    ///
    /// Not part of the documented event shape; current servers usually omit
    /// it, in which case batch progress stays at its 75% floor.
    #[serde(deserialize_with = "lenient::count")]
    pub ingested_so_far: Option<u64>,
    #[serde(deserialize_with = "lenient::text")]
    pub reason: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::object")]
    pub result: Option<IngestionResult>,
}

/// Nested outcome carried by `ingest_finished` / `completed`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionResult {
    #[serde(deserialize_with = "lenient::text")]
    pub error: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub ingested: Option<u64>,
    #[serde(deserialize_with = "lenient::text")]
    pub collection: Option<String>,
}

/// Per-field decoders for stream events.
///
/// Each reads the raw JSON value and keeps what it can use; anything else
/// becomes `None`.
pub mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings as-is, numbers in their JSON text form (`123` becomes `"123"`).
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Any non-negative finite number; fractional values are rounded
    /// (`2.0` is `2`).
    pub fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u64)
            }),
            _ => None,
        })
    }

    /// A nested object; any other value (or an undecodable one) is `None`.
    pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            v @ Value::Object(_) => serde_json::from_value(v).ok(),
            _ => None,
        })
    }
}

/// Known event tags of the ingestion stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Started,
    ReportSaved,
    ChunkingStarted,
    ChunkingFinished,
    IngestStarted,
    IngestBatch,
    IngestFinished,
    Completed,
    WorkerDone,
    Other(String),
}

impl EventKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "started" => Self::Started,
            "report_saved" => Self::ReportSaved,
            "chunking_started" => Self::ChunkingStarted,
            "chunking_finished" => Self::ChunkingFinished,
            "ingest_started" => Self::IngestStarted,
            "ingest_batch" => Self::IngestBatch,
            "ingest_finished" => Self::IngestFinished,
            "completed" => Self::Completed,
            "worker_done" => Self::WorkerDone,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Started => "started",
            Self::ReportSaved => "report_saved",
            Self::ChunkingStarted => "chunking_started",
            Self::ChunkingFinished => "chunking_finished",
            Self::IngestStarted => "ingest_started",
            Self::IngestBatch => "ingest_batch",
            Self::IngestFinished => "ingest_finished",
            Self::Completed => "completed",
            Self::WorkerDone => "worker_done",
            Self::Other(tag) => tag,
        }
    }
}

impl IngestionEvent {
    /// Dispatch tag of this event; `None` when the payload carries no tag.
    pub fn kind(&self) -> Option<EventKind> {
        self.event.as_deref().map(EventKind::parse)
    }

    /// `job_id` if present and non-empty
    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref().filter(|s| !s.is_empty())
    }

    /// `report_path` if present and non-empty
    pub fn report_path(&self) -> Option<&str> {
        self.report_path.as_deref().filter(|s| !s.is_empty())
    }
}
