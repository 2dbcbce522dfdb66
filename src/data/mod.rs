//! Data module - CSV loading and column extraction

mod loader;
mod processor;

pub use loader::{preview_rows, read_csv, DataLoader, DatasetPreview, LoaderError};
pub use processor::{DataProcessor, GroupKey, ProcessorError, RowGroup};
