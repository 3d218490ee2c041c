//! IO utilities for loading datasets from delimited text files.

pub mod delimited;

pub use delimited::{delimiter_for_path, read_dataset, read_dataset_with_config, DatasetReaderConfig};
