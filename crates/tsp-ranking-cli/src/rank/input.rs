use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use tsp_ranking::config::{ExhaustionPolicy, PairEnumeration};
use tsp_ranking::io::DatasetReaderConfig;
use tsp_ranking::RankingConfig;

use crate::util::validate_data_file;

/// Everything the `rank` command needs: where the data lives, how to read
/// it, and the ranking session parameters.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RankCommandConfig {
    pub version: String,
    pub data_file: String,
    /// Output path (`.csv` or `.tsv`). Written to stdout when `None`.
    pub output_file: Option<String>,
    /// Class column name; the last column when `None`.
    pub class_column: Option<String>,
    /// Labels of the first and second class.
    pub class_labels: Option<(String, String)>,
    pub ranking: RankingConfig,
}

impl Default for RankCommandConfig {
    fn default() -> Self {
        RankCommandConfig {
            version: clap::crate_version!().to_string(),
            data_file: String::new(),
            output_file: None,
            class_column: None,
            class_labels: None,
            ranking: RankingConfig::default(),
        }
    }
}

impl RankCommandConfig {
    /// Load the JSON config (if any), then apply command-line overrides.
    ///
    /// Fields missing from the JSON file, or holding invalid values, fall
    /// back to their defaults with a warning.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = RankCommandConfig::default();

        if let Some(config_path) = config_path {
            let config_json = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let partial: serde_json::Value = serde_json::from_str(&config_json)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            macro_rules! load_or_default {
                ($source:expr, $target:expr, $field:ident) => {
                    if let Some(val) = $source.get(stringify!($field)) {
                        if let Ok(parsed) = serde_json::from_value(val.clone()) {
                            $target.$field = parsed;
                        } else {
                            log::warn!(
                                "Config Invalid value for '{}', using default: {:?}",
                                stringify!($field),
                                $target.$field
                            );
                        }
                    } else {
                        log::warn!(
                            "Config Missing field '{}', using default: {:?}",
                            stringify!($field),
                            $target.$field
                        );
                    }
                };
            }

            load_or_default!(partial, config, data_file);
            load_or_default!(partial, config, output_file);
            load_or_default!(partial, config, class_column);
            load_or_default!(partial, config, class_labels);

            // session parameters fall back field by field
            match partial.get("ranking") {
                Some(ranking) if ranking.is_object() => {
                    load_or_default!(ranking, config.ranking, run_count);
                    load_or_default!(ranking, config.ranking, objects_in_run_pct);
                    load_or_default!(ranking, config.ranking, top_pairs_per_run);
                    load_or_default!(ranking, config.ranking, top_attributes_out);
                    load_or_default!(ranking, config.ranking, debug);
                    load_or_default!(ranking, config.ranking, seed);
                    load_or_default!(ranking, config.ranking, pair_enumeration);
                    load_or_default!(ranking, config.ranking, exhaustion_policy);
                }
                Some(_) => log::warn!(
                    "Config Invalid value for 'ranking', using default: {:?}",
                    config.ranking
                ),
                None => log::warn!(
                    "Config Missing field 'ranking', using default: {:?}",
                    config.ranking
                ),
            }
        }

        config.apply_overrides(matches)?;
        validate_data_file(&config.data_file)?;
        Ok(config)
    }

    fn apply_overrides(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Some(data) = matches.get_one::<String>("data") {
            self.data_file = data.clone();
        }
        if let Some(output) = matches.get_one::<String>("output_file") {
            self.output_file = Some(output.clone());
        }
        if let Some(column) = matches.get_one::<String>("class_column") {
            self.class_column = Some(column.clone());
        }
        if let Some(&runs) = matches.get_one::<usize>("runs") {
            self.ranking.run_count = runs;
        }
        if let Some(&pct) = matches.get_one::<f64>("objects_pct") {
            self.ranking.objects_in_run_pct = pct;
        }
        if let Some(&top_pairs) = matches.get_one::<usize>("top_pairs") {
            self.ranking.top_pairs_per_run = top_pairs;
        }
        if let Some(&top_attributes) = matches.get_one::<usize>("top_attributes") {
            self.ranking.top_attributes_out = top_attributes;
        }
        if let Some(&seed) = matches.get_one::<u64>("seed") {
            self.ranking.seed = Some(seed);
        }
        if let Some(enumeration) = matches.get_one::<String>("pair_enumeration") {
            self.ranking.pair_enumeration =
                PairEnumeration::from_str(enumeration).map_err(anyhow::Error::msg)?;
        }
        if let Some(policy) = matches.get_one::<String>("exhaustion") {
            self.ranking.exhaustion_policy =
                ExhaustionPolicy::from_str(policy).map_err(anyhow::Error::msg)?;
        }
        if matches.get_flag("quiet") {
            self.ranking.debug = false;
        }
        Ok(())
    }

    pub fn reader_config(&self) -> DatasetReaderConfig {
        DatasetReaderConfig {
            class_column: self.class_column.clone(),
            class_labels: self.class_labels.clone(),
            delimiter: None,
        }
    }
}
