//! CSV Data Loader Module
//! Handles CSV file loading and dataset preview using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File could not be read as a CSV table: {0}")]
    MalformedFile(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// First rows of a dataset rendered as text, for the preview grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// Owns the dataset of the current session.
///
/// Loading a new file replaces the previous dataset; nothing is kept between
/// uploads.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file, replacing any previously loaded dataset.
    pub fn load_csv(&mut self, file_path: impl AsRef<Path>) -> Result<&DataFrame, LoaderError> {
        let path = file_path.as_ref();
        self.clear();

        let df = read_csv(path)?;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "dataset loaded"
        );

        self.file_path = Some(path.to_path_buf());
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Drop the current dataset.
    pub fn clear(&mut self) {
        self.df = None;
        self.file_path = None;
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

/// Read a CSV file into a DataFrame.
///
/// Column types are inferred from the first 10k rows; cells that fail to
/// parse under the inferred type become nulls.
pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    debug!(path = %path.display(), "reading csv");

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    Ok(df)
}

/// Render the first `n` rows of a dataset as strings.
pub fn preview_rows(df: &DataFrame, n: usize) -> DatasetPreview {
    let head = df.head(Some(n));

    let headers = head
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rows = (0..head.height())
        .map(|i| {
            head.get_columns()
                .iter()
                .map(|col| match col.get(i) {
                    Ok(AnyValue::Null) | Err(_) => String::new(),
                    Ok(val) => val.to_string().trim_matches('"').to_string(),
                })
                .collect()
        })
        .collect();

    DatasetPreview {
        headers,
        rows,
        total_rows: df.height(),
    }
}
