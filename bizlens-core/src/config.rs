use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for the whole dashboard.
///
/// Every section falls back to its defaults, so a partial YAML file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub recommend: RecommendConfig,
    pub segmentation: SegmentationConfig,
    pub reporting: ReportingConfig,
}

/// Mock data generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Seed every view reseeds its generator with
    pub seed: u64,
    /// Default row count for the insights table
    pub insight_rows: usize,
    /// Number of generated customers
    pub customers: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            insight_rows: 200,
            customers: 200,
        }
    }
}

/// Recommender settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Default number of recommendations
    pub top_n: usize,
    /// Upper bound accepted from the view selector
    pub max_top_n: usize,
    /// Factor applied to the first recommendation's score
    pub boost: f64,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_n: 3,
            max_top_n: 5,
            boost: crate::recommend::DEFAULT_BOOST,
        }
    }
}

/// K-Means parameters for customer segmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub clusters: usize,
    pub n_init: usize,
    pub max_iter: usize,
    pub tolerance: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            clusters: 4,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Profit goal shown on the gauge
    pub profit_target: u64,
    pub csv_file_name: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            profit_target: 5_000_000,
            csv_file_name: "production_report.csv".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `config.yaml` if it exists, otherwise use defaults.
    pub fn load_or_default() -> Self {
        Self::load("config.yaml").unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.recommend.top_n == 0 || self.recommend.top_n > self.recommend.max_top_n {
            return Err(ConfigError::Invalid(format!(
                "recommend.top_n must be in 1..={}",
                self.recommend.max_top_n
            )));
        }
        if !self.recommend.boost.is_finite() || self.recommend.boost < 1.0 {
            return Err(ConfigError::Invalid(
                "recommend.boost must be a finite number of at least 1.0".into(),
            ));
        }
        if self.segmentation.clusters == 0 || self.segmentation.n_init == 0 {
            return Err(ConfigError::Invalid(
                "segmentation.clusters and segmentation.n_init must be at least 1".into(),
            ));
        }
        if self.data.insight_rows < 2 {
            return Err(ConfigError::Invalid("data.insight_rows must be at least 2".into()));
        }
        Ok(())
    }
}
