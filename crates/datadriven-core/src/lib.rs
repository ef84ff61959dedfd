use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// A single test case's input. Opaque to this crate unless a loader built it.
pub type Dataset = Value;

/// Label -> dataset mapping, iterated in insertion order.
pub type LabeledData = Map<String, Dataset>;

/// One expanded test case: the dataset plus the label that names it in test output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEntry {
    pub label: String,
    pub data: Dataset,
}

impl DataEntry {
    pub fn new(label: impl Into<String>, data: Dataset) -> Self {
        Self {
            label: label.into(),
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// DataSetSource
// ---------------------------------------------------------------------------

/// Signature of a deferred dataset computation.
pub type DeferredData = dyn Fn() -> Result<LabeledData, DataDrivenError> + Send + Sync;

/// One registered unit contributing one or more labeled datasets to a test method.
#[derive(Clone)]
pub enum DataSetSource {
    /// A single label and dataset supplied directly.
    Pair { label: String, data: Dataset },
    /// A whole label -> dataset mapping supplied directly.
    Mapping(LabeledData),
    /// A computation producing a mapping. Only the consumer invokes it.
    Deferred(Arc<DeferredData>),
}

impl DataSetSource {
    pub fn pair(label: impl Into<String>, data: Dataset) -> Self {
        DataSetSource::Pair {
            label: label.into(),
            data,
        }
    }

    pub fn mapping(data: LabeledData) -> Self {
        DataSetSource::Mapping(data)
    }

    pub fn deferred<F>(compute: F) -> Self
    where
        F: Fn() -> Result<LabeledData, DataDrivenError> + Send + Sync + 'static,
    {
        DataSetSource::Deferred(Arc::new(compute))
    }

    /// Build a source from a dynamic argument list and an optional computation.
    ///
    /// Zero arguments take the computation, one argument must be a label -> dataset
    /// object, two arguments are a label and its dataset. A label that is not a
    /// string is used in its JSON text form (`1` becomes `"1"`). A computation
    /// passed alongside arguments is ignored.
    pub fn from_args(
        args: Vec<Value>,
        block: Option<Arc<DeferredData>>,
    ) -> Result<Self, DataDrivenError> {
        let count = args.len();
        let mut args = args.into_iter();
        match (count, args.next(), args.next()) {
            (0, _, _) => block.map(DataSetSource::Deferred).ok_or_else(|| {
                DataDrivenError::InvalidArgument(
                    "no block is given: a deferred data computation is required without arguments"
                        .to_string(),
                )
            }),
            (1, Some(Value::Object(map)), _) => Ok(DataSetSource::Mapping(map)),
            (1, Some(other), _) => Err(DataDrivenError::InvalidArgument(format!(
                "expected a label => dataset mapping, got {}",
                value_kind(&other)
            ))),
            (2, Some(label), Some(data)) => Ok(DataSetSource::Pair {
                label: label_text(label),
                data,
            }),
            (n, _, _) => Err(DataDrivenError::InvalidArgument(format!(
                "wrong number of arguments ({n} for 1..2)"
            ))),
        }
    }

    /// Short name of the variant, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            DataSetSource::Pair { .. } => "pair",
            DataSetSource::Mapping(_) => "mapping",
            DataSetSource::Deferred(_) => "deferred",
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, DataSetSource::Deferred(_))
    }

    /// The data this source contributes, as a mapping. A pair becomes the
    /// one-entry mapping `{label => data}`; a deferred source is invoked once.
    pub fn resolve(&self) -> Result<LabeledData, DataDrivenError> {
        match self {
            DataSetSource::Pair { label, data } => {
                let mut map = LabeledData::new();
                map.insert(label.clone(), data.clone());
                Ok(map)
            }
            DataSetSource::Mapping(map) => Ok(map.clone()),
            DataSetSource::Deferred(compute) => compute(),
        }
    }
}

impl fmt::Debug for DataSetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSetSource::Pair { label, data } => f
                .debug_struct("Pair")
                .field("label", label)
                .field("data", data)
                .finish(),
            DataSetSource::Mapping(map) => f.debug_tuple("Mapping").field(map).finish(),
            DataSetSource::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

fn label_text(label: Value) -> String {
    match label {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// AttributeStore
// ---------------------------------------------------------------------------

/// Per-test-method storage the registry appends data sources to.
///
/// The list is append-only during definition. `data_sources` is `None` until
/// the first registration; `data_sources_mut` creates the empty list on demand.
pub trait AttributeStore {
    fn data_sources(&self) -> Option<&[DataSetSource]>;

    fn data_sources_mut(&mut self) -> &mut Vec<DataSetSource>;
}

// ---------------------------------------------------------------------------
// DataLoader trait (implementations in datadriven-loaders)
// ---------------------------------------------------------------------------

/// Reads one data file and registers a labeled dataset per record into `target`.
pub trait DataLoader: Send + Sync {
    /// Load the file at `path`, returning how many entries were registered.
    fn load(&self, path: &Path, target: &mut dyn AttributeStore)
        -> Result<usize, DataDrivenError>;
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type shared by every datadriven crate. Raised while test definitions
/// are built, or while a runner expands deferred sources.
#[derive(Debug, Error)]
pub enum DataDrivenError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("malformed CSV at line {line}: {message}")]
    MalformedCsv { line: u64, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("deferred data error: {0}")]
    Deferred(String),
}
