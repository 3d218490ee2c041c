//! Seedable random draws over instances and attributes.
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::data_handling::{Dataset, NUM_CLASSES};
use crate::error::{RankingError, Result};

/// Random source for a session. A fixed seed makes every draw reproducible.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Instances drawn once per evaluator build, partitioned by class.
#[derive(Debug, Clone)]
pub struct InstanceSample {
    /// Sampled row indices, ascending.
    rows: Vec<usize>,
    /// Class of each sampled row, aligned with `rows`.
    classes: Vec<usize>,
    class_counts: [usize; NUM_CLASSES],
}

impl InstanceSample {
    /// Draw `round(fraction_pct / 100 * instances)` distinct rows.
    ///
    /// `dataset` must not contain missing classes.
    pub fn draw<R: Rng + ?Sized>(dataset: &Dataset, fraction_pct: f64, rng: &mut R) -> Result<Self> {
        let available = dataset.num_instances();
        if !(fraction_pct > 0.0) {
            return Err(RankingError::InvalidData(format!(
                "instance sample percentage must be positive, got {}",
                fraction_pct
            )));
        }

        let size = (available as f64 * fraction_pct / 100.0).round() as usize;
        if size > available {
            return Err(RankingError::InvalidData(format!(
                "requested sample of {} instances but only {} are available",
                size, available
            )));
        }
        if size < 2 {
            return Err(RankingError::InvalidData(format!(
                "instance sample of {} is too small for pairwise scoring",
                size
            )));
        }

        let mut rows = index::sample(rng, available, size).into_vec();
        rows.sort_unstable();
        Self::from_rows(dataset, rows)
    }

    /// Build a sample from explicit rows.
    pub fn from_rows(dataset: &Dataset, rows: Vec<usize>) -> Result<Self> {
        let mut classes = Vec::with_capacity(rows.len());
        let mut class_counts = [0; NUM_CLASSES];
        for &row in &rows {
            let class = dataset.class_value(row).ok_or_else(|| {
                RankingError::InvalidData(format!("sampled instance {} has no class", row))
            })?;
            classes.push(class);
            class_counts[class] += 1;
        }

        Ok(InstanceSample {
            rows,
            classes,
            class_counts,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Iterate `(row, class)` over the sample.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().copied().zip(self.classes.iter().copied())
    }

    pub fn class_counts(&self) -> [usize; NUM_CLASSES] {
        self.class_counts
    }
}

/// The attributes still available for subset draws within one session.
///
/// Every draw removes its attributes from the pool, so subsets of one
/// session never overlap. The class attribute is never in the pool.
#[derive(Debug, Clone)]
pub struct AttributePool {
    used: Vec<bool>,
    class_index: usize,
}

impl AttributePool {
    pub fn new(num_attributes: usize, class_index: usize) -> Self {
        AttributePool {
            used: vec![false; num_attributes],
            class_index,
        }
    }

    /// Attributes that can still be drawn.
    pub fn available(&self) -> Vec<usize> {
        self.used
            .iter()
            .enumerate()
            .filter(|&(attr, &used)| !used && attr != self.class_index)
            .map(|(attr, _)| attr)
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.available().len()
    }

    /// Draw `size` unused attributes uniformly and mark them used.
    ///
    /// Returns `None`, leaving the pool untouched, when fewer than `size`
    /// attributes remain.
    pub fn draw<R: Rng + ?Sized>(&mut self, size: usize, rng: &mut R) -> Option<Vec<usize>> {
        let available = self.available();
        if available.len() < size {
            return None;
        }

        let mut drawn: Vec<usize> = index::sample(rng, available.len(), size)
            .into_iter()
            .map(|pos| available[pos])
            .collect();
        drawn.sort_unstable();
        for &attr in &drawn {
            self.used[attr] = true;
        }
        Some(drawn)
    }
}
