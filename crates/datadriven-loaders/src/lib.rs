mod coerce;
mod csv_loader;
mod loader_registry;

pub use coerce::coerce_cell;
pub use csv_loader::CsvLoader;
pub use loader_registry::{load_data, LoaderRegistry};

// Re-export the loader seam from core for convenience
pub use datadriven_core::{AttributeStore, DataDrivenError, DataLoader};
