//! The labeled numeric dataset consumed by the ranker.
//!
//! A `Dataset` is an instances × attributes matrix in which one column holds
//! the class. Class values are class indices: `0.0` for the first class,
//! `1.0` for the second and `NaN` for a missing class.
use ndarray::{Array2, Axis};

use crate::error::{RankingError, Result};

/// Number of classes the pair statistic discriminates between.
pub const NUM_CLASSES: usize = 2;

#[derive(Debug, Clone)]
pub struct Dataset {
    values: Array2<f64>,
    class_index: usize,
    attribute_names: Vec<String>,
}

impl Dataset {
    /// Wrap a value matrix whose column `class_index` holds the class.
    pub fn new(values: Array2<f64>, class_index: usize) -> Result<Self> {
        if class_index >= values.ncols() {
            return Err(RankingError::InvalidData(format!(
                "class index {} out of range for {} attributes",
                class_index,
                values.ncols()
            )));
        }

        for (row, &class_value) in values.column(class_index).iter().enumerate() {
            if !class_value.is_nan() && class_value != 0.0 && class_value != 1.0 {
                return Err(RankingError::InvalidData(format!(
                    "unsupported class value {} at instance {}; expected 0, 1 or missing",
                    class_value, row
                )));
            }
        }

        let attribute_names = (0..values.ncols())
            .map(|attr| {
                if attr == class_index {
                    "class".to_string()
                } else {
                    format!("attr_{}", attr)
                }
            })
            .collect();

        Ok(Dataset {
            values,
            class_index,
            attribute_names,
        })
    }

    /// Build a dataset from a feature matrix and per-instance labels.
    ///
    /// The class column is appended after the features, so it ends up at
    /// index `features.ncols()`.
    pub fn from_features_and_labels(
        features: &Array2<f64>,
        labels: &[Option<usize>],
    ) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(RankingError::InvalidData(format!(
                "{} labels given for {} instances",
                labels.len(),
                features.nrows()
            )));
        }

        let (n_rows, n_features) = features.dim();
        let mut values = Array2::zeros((n_rows, n_features + 1));
        for (row, &label) in labels.iter().enumerate() {
            for attr in 0..n_features {
                values[[row, attr]] = features[[row, attr]];
            }
            values[[row, n_features]] = match label {
                Some(class) if class < NUM_CLASSES => class as f64,
                Some(class) => {
                    return Err(RankingError::InvalidData(format!(
                        "label {} at instance {} is not a binary class index",
                        class, row
                    )))
                }
                None => f64::NAN,
            };
        }

        Dataset::new(values, n_features)
    }

    /// Replace the default attribute names. The name list must cover every column.
    pub fn with_attribute_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.num_attributes() {
            return Err(RankingError::InvalidData(format!(
                "{} attribute names given for {} attributes",
                names.len(),
                self.num_attributes()
            )));
        }
        self.attribute_names = names;
        Ok(self)
    }

    pub fn num_attributes(&self) -> usize {
        self.values.ncols()
    }

    pub fn num_instances(&self) -> usize {
        self.values.nrows()
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn value(&self, row: usize, attr: usize) -> f64 {
        self.values[[row, attr]]
    }

    /// Class index of an instance, `None` when the class is missing.
    pub fn class_value(&self, row: usize) -> Option<usize> {
        let class_value = self.values[[row, self.class_index]];
        if class_value.is_nan() {
            None
        } else {
            Some(class_value as usize)
        }
    }

    pub fn attribute_name(&self, attr: usize) -> &str {
        &self.attribute_names[attr]
    }

    /// Number of instances per class, ignoring missing classes.
    pub fn class_counts(&self) -> [usize; NUM_CLASSES] {
        let mut counts = [0; NUM_CLASSES];
        for row in 0..self.num_instances() {
            if let Some(class) = self.class_value(row) {
                counts[class] += 1;
            }
        }
        counts
    }

    /// Copy of the dataset without the instances whose class is missing.
    pub fn delete_with_missing_class(&self) -> Dataset {
        let keep: Vec<usize> = (0..self.num_instances())
            .filter(|&row| self.class_value(row).is_some())
            .collect();

        Dataset {
            values: self.values.select(Axis(0), &keep),
            class_index: self.class_index,
            attribute_names: self.attribute_names.clone(),
        }
    }

    pub fn log_summary(&self) {
        let counts = self.class_counts();
        log::info!("----- Input Data Summary -----");
        log::info!(
            "{} instances ({} first class, {} second class, {} missing class)",
            self.num_instances(),
            counts[0],
            counts[1],
            self.num_instances() - counts[0] - counts[1]
        );
        log::info!(
            "{} attributes, class attribute '{}' at index {}",
            self.num_attributes(),
            self.attribute_name(self.class_index),
            self.class_index
        );
        log::info!("------------------------------");
    }
}
