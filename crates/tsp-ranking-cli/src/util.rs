use anyhow::Result;
use std::path::PathBuf;

use tsp_ranking::io::delimiter_for_path;

/// Check that a dataset path exists and has a `.csv`, `.tsv` or `.tab` extension.
pub fn validate_data_file(path: &str) -> Result<PathBuf> {
    let pb = PathBuf::from(path);

    if delimiter_for_path(&pb).is_none() {
        anyhow::bail!("Data file must have a .csv, .tsv or .tab extension: {}", path);
    }
    if !pb.is_file() {
        anyhow::bail!("Data file does not exist: {}", path);
    }

    Ok(pb)
}
