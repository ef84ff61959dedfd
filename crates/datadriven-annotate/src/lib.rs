mod expand;
mod registry;
mod test_case;

pub use expand::expand;
pub use registry::{data, data_set, data_with, register};
pub use test_case::{TestCase, TestMethod};

// Re-export core types so callers only need this crate to declare data.
pub use datadriven_core::{
    AttributeStore, DataDrivenError, DataEntry, DataSetSource, Dataset, DeferredData, LabeledData,
};
