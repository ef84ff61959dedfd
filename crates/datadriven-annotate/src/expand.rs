use datadriven_core::{DataDrivenError, DataEntry, DataSetSource};

/// Flatten registered sources into the ordered entries a runner executes.
///
/// Sources are visited in registration order and each mapping in insertion
/// order. Every deferred source is invoked exactly once per call; the first
/// error it returns aborts the expansion.
pub fn expand(sources: &[DataSetSource]) -> Result<Vec<DataEntry>, DataDrivenError> {
    let mut entries = Vec::new();
    for source in sources {
        if source.is_deferred() {
            tracing::trace!("invoking deferred data source");
        }
        entries.extend(
            source
                .resolve()?
                .into_iter()
                .map(|(label, data)| DataEntry { label, data }),
        );
    }
    Ok(entries)
}
