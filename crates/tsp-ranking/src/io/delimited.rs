//! CSV / TSV dataset reader.
use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::StringRecord;
use ndarray::Array2;

use crate::data_handling::{Dataset, NUM_CLASSES};

/// Configuration for reading a delimited dataset file.
#[derive(Debug, Clone, Default)]
pub struct DatasetReaderConfig {
    /// Column holding the class label. Defaults to the last column.
    pub class_column: Option<String>,
    /// Labels of the first and second class, in that order. When `None`,
    /// labels are assigned in order of first appearance.
    pub class_labels: Option<(String, String)>,
    /// Override the delimiter; otherwise `.tsv`/`.tab` mean tab and anything else comma.
    pub delimiter: Option<u8>,
}

/// Tokens read as a missing value.
const MISSING_TOKENS: [&str; 4] = ["", "?", "NA", "NaN"];

fn is_missing(value: &str) -> bool {
    MISSING_TOKENS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
}

/// Read a dataset with the default configuration.
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    read_dataset_with_config(path, &DatasetReaderConfig::default())
}

/// Read a header-first delimited file into a `Dataset`.
///
/// The class column keeps its position, so the dataset's class index is the
/// column index in the file.
pub fn read_dataset_with_config<P: AsRef<Path>>(
    path: P,
    config: &DatasetReaderConfig,
) -> Result<Dataset> {
    let path = path.as_ref();
    let delimiter = config
        .delimiter
        .or_else(|| delimiter_for_path(path))
        .unwrap_or(b',');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset file: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read dataset header row")?
        .clone();
    if headers.is_empty() {
        bail!("Dataset header row is empty: {}", path.display());
    }

    let class_idx = match &config.class_column {
        Some(name) => find_column(&headers, name)
            .ok_or_else(|| anyhow!("Missing class column '{}'", name))?,
        None => headers.len() - 1,
    };

    let mut labels = ClassLabels::new(config.class_labels.clone());
    let mut values = Vec::new();
    let mut n_rows = 0;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        if record.len() != headers.len() {
            bail!(
                "Row {} has {} fields, expected {}",
                row_idx + 1,
                record.len(),
                headers.len()
            );
        }

        for (col, field) in record.iter().enumerate() {
            let value = if col == class_idx {
                labels
                    .encode(field)
                    .with_context(|| format!("Invalid class label at row {}", row_idx + 1))?
            } else if is_missing(field) {
                f64::NAN
            } else {
                field.parse::<f64>().with_context(|| {
                    format!(
                        "Invalid value for '{}' at row {}",
                        headers.get(col).unwrap_or(""),
                        row_idx + 1
                    )
                })?
            };
            values.push(value);
        }
        n_rows += 1;
    }

    let matrix = Array2::from_shape_vec((n_rows, headers.len()), values)
        .context("Failed to build value matrix")?;
    let names = headers.iter().map(str::to_string).collect();

    log::debug!(
        "Read {} instances x {} attributes from {} (class labels {:?})",
        n_rows,
        headers.len(),
        path.display(),
        labels.known()
    );

    Ok(Dataset::new(matrix, class_idx)?.with_attribute_names(names)?)
}

/// Field delimiter implied by a `.csv`, `.tsv` or `.tab` extension.
pub fn delimiter_for_path(path: &Path) -> Option<u8> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") | Some("tab") => Some(b'\t'),
        Some("csv") => Some(b','),
        _ => None,
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

/// Maps the two class labels of a file to the class values 0 and 1.
struct ClassLabels {
    fixed: bool,
    map: HashMap<String, usize>,
    order: Vec<String>,
}

impl ClassLabels {
    fn new(labels: Option<(String, String)>) -> Self {
        let mut class_labels = ClassLabels {
            fixed: labels.is_some(),
            map: HashMap::new(),
            order: Vec::new(),
        };
        if let Some((first, second)) = labels {
            class_labels.insert(first);
            class_labels.insert(second);
        }
        class_labels
    }

    fn insert(&mut self, label: String) -> usize {
        let next = self.order.len();
        self.order.push(label.clone());
        self.map.insert(label, next);
        next
    }

    fn encode(&mut self, field: &str) -> Result<f64> {
        if is_missing(field) {
            return Ok(f64::NAN);
        }
        if let Some(&class) = self.map.get(field) {
            return Ok(class as f64);
        }
        if self.fixed {
            bail!("Unknown class label '{}', expected one of {:?}", field, self.order);
        }
        if self.order.len() == NUM_CLASSES {
            bail!(
                "More than two class labels: '{}' after {:?}",
                field,
                self.order
            );
        }
        Ok(self.insert(field.to_string()) as f64)
    }

    fn known(&self) -> &[String] {
        &self.order
    }
}
