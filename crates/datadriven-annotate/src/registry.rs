use std::sync::Arc;

use datadriven_core::{
    AttributeStore, DataDrivenError, DataSetSource, Dataset, DeferredData, LabeledData,
};
use serde_json::Value;

/// Register data for a test method from a dynamic argument list.
///
/// Accepts `[label, dataset]`, `[mapping]`, or no arguments plus a deferred
/// computation. Any other shape fails with `InvalidArgument` and leaves
/// `target` untouched.
pub fn register<S>(
    target: &mut S,
    args: Vec<Value>,
    block: Option<Arc<DeferredData>>,
) -> Result<(), DataDrivenError>
where
    S: AttributeStore + ?Sized,
{
    let source = DataSetSource::from_args(args, block)?;
    append(target, source);
    Ok(())
}

/// Register a single labeled dataset.
pub fn data<S>(target: &mut S, label: impl Into<String>, dataset: Dataset)
where
    S: AttributeStore + ?Sized,
{
    append(target, DataSetSource::pair(label, dataset));
}

/// Register a whole label -> dataset mapping.
pub fn data_set<S>(target: &mut S, mapping: LabeledData)
where
    S: AttributeStore + ?Sized,
{
    append(target, DataSetSource::mapping(mapping));
}

/// Register a computation that produces a mapping when the runner expands it.
pub fn data_with<S, F>(target: &mut S, compute: F)
where
    S: AttributeStore + ?Sized,
    F: Fn() -> Result<LabeledData, DataDrivenError> + Send + Sync + 'static,
{
    append(target, DataSetSource::deferred(compute));
}

fn append<S>(target: &mut S, source: DataSetSource)
where
    S: AttributeStore + ?Sized,
{
    let kind = source.kind();
    let sources = target.data_sources_mut();
    sources.push(source);
    tracing::debug!(kind, sources = sources.len(), "data source registered");
}
