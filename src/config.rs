//! Pipeline configuration.
//!
//! [`PipelineConfig::default`] reproduces the stock behavior: clean
//! `data/raw/sales_data_raw.csv` into `data/processed/sales_data_clean.csv`,
//! trim the product/category text fields, require `product_name` and
//! `order_id`, and impute `price` and `quantity`. A YAML file can override any
//! subset of fields; omitted fields keep their defaults.

use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

pub const DEFAULT_INPUT_PATH: &str = "data/raw/sales_data_raw.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/sales_data_clean.csv";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

const DEFAULT_TEXT_FIELDS: &[&str] = &["product_name", "category", "product", "category_name"];
const DEFAULT_ESSENTIAL_FIELDS: &[&str] = &["product_name", "order_id"];

/// Tokens read as missing cells when they make up the entire field.
const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// What to do when two source labels normalize to the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Keep the column encountered last and drop the ones it shadows.
    #[default]
    KeepLast,
    /// Rename later duplicates to `label_2`, `label_3`, ...
    Suffix,
    /// Abort the run.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericField {
    pub name: String,
    /// Round to whole numbers and store as integers after imputation.
    #[serde(default)]
    pub integral: bool,
}

impl NumericField {
    pub fn fractional(name: &str) -> Self {
        Self {
            name: name.to_string(),
            integral: false,
        }
    }

    pub fn integral(name: &str) -> Self {
        Self {
            name: name.to_string(),
            integral: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub essential_fields: Vec<String>,
    pub numeric_fields: Vec<NumericField>,
    pub text_fields_to_trim: Vec<String>,
    pub na_values: Vec<String>,
    pub collision_policy: CollisionPolicy,
    /// Input delimiter (`,`, `tab`, `;`, `|`, or any single ASCII character).
    pub delimiter: Option<String>,
    pub output_delimiter: Option<String>,
    pub input_encoding: Option<String>,
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            essential_fields: to_strings(DEFAULT_ESSENTIAL_FIELDS),
            numeric_fields: vec![
                NumericField::fractional("price"),
                NumericField::integral("quantity"),
            ],
            text_fields_to_trim: to_strings(DEFAULT_TEXT_FIELDS),
            na_values: to_strings(DEFAULT_NA_VALUES),
            collision_policy: CollisionPolicy::default(),
            delimiter: None,
            output_delimiter: None,
            input_encoding: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: PipelineConfig = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing config YAML {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut named = self
            .essential_fields
            .iter()
            .chain(&self.text_fields_to_trim)
            .chain(self.numeric_fields.iter().map(|f| &f.name));
        if named.any(|name| name.trim().is_empty()) {
            return Err(PipelineError::InvalidConfig(
                "field names must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for field in &self.numeric_fields {
            if !seen.insert(field.name.as_str()) {
                return Err(PipelineError::InvalidConfig(format!(
                    "numeric field '{}' is listed more than once",
                    field.name
                )));
            }
            if self.essential_fields.contains(&field.name) {
                return Err(PipelineError::InvalidConfig(format!(
                    "'{}' cannot be both essential and imputed",
                    field.name
                )));
            }
        }
        Ok(())
    }

    pub fn is_na(&self, raw: &str) -> bool {
        self.na_values.iter().any(|token| token == raw)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_pipeline() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_path, PathBuf::from("data/raw/sales_data_raw.csv"));
        assert_eq!(
            config.output_path,
            PathBuf::from("data/processed/sales_data_clean.csv")
        );
        assert_eq!(config.essential_fields, vec!["product_name", "order_id"]);
        assert_eq!(
            config.numeric_fields,
            vec![NumericField::fractional("price"), NumericField::integral("quantity")]
        );
        assert_eq!(config.collision_policy, CollisionPolicy::KeepLast);
        assert!(config.is_na(""));
        assert!(config.is_na("N/A"));
        assert!(!config.is_na(" "));
        config.validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let yaml = "output_path: out/clean.csv\ncollision_policy: suffix\nnumeric_fields:\n  - name: units\n    integral: true\n";
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.output_path, PathBuf::from("out/clean.csv"));
        assert_eq!(config.collision_policy, CollisionPolicy::Suffix);
        assert_eq!(config.numeric_fields, vec![NumericField::integral("units")]);
        assert_eq!(config.input_path, PathBuf::from(DEFAULT_INPUT_PATH));
        assert_eq!(config.preview_rows, DEFAULT_PREVIEW_ROWS);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_yaml::from_str::<PipelineConfig>("inputs: x.csv\n");
        assert!(err.is_err());
    }

    #[test]
    fn validate_rejects_overlapping_roles() {
        let config = PipelineConfig {
            numeric_fields: vec![NumericField::fractional("order_id")],
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn validate_rejects_duplicate_numeric_fields() {
        let config = PipelineConfig {
            numeric_fields: vec![
                NumericField::fractional("price"),
                NumericField::integral("price"),
            ],
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
