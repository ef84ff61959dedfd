//! Datadriven: labeled datasets for data-driven tests.
//!
//! Attach several named inputs to one test method so a runner executes the
//! body once per dataset. Datasets are registered inline, as a whole mapping,
//! as a deferred computation, or loaded from a CSV file.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `default` | `annotate`, `loaders` |
//! | `annotate` | Registry: `data`, `data_set`, `data_with`, `register`, `TestMethod`, `TestCase`, `expand` |
//! | `loaders` | `CsvLoader`, `LoaderRegistry`, `load_data`, `coerce_cell` |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use datadriven::annotate::TestCase;
//! use datadriven::loaders::load_data;
//! use serde_json::json;
//!
//! let mut case = TestCase::new("ParserTest");
//! let method = case.method("test_parse");
//! method.data("empty", json!("")).data("word", json!("hello"));
//! load_data("fixtures/parse.csv", method)?;
//!
//! for entry in method.entries()? {
//!     println!("{}: {}", entry.label, entry.data);
//! }
//! ```

/// Core types: DataSetSource, DataEntry, AttributeStore, DataLoader, DataDrivenError.
/// Always available.
pub use datadriven_core as core;

/// Dataset registry and consumer-side expansion.
#[cfg(feature = "annotate")]
pub use datadriven_annotate as annotate;

/// Data file loaders: CSV and extension dispatch.
#[cfg(feature = "loaders")]
pub use datadriven_loaders as loaders;
