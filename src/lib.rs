//! College basketball postseason prediction
//!
//! A batch pipeline that turns per-team season statistics into predicted
//! tournament finishes using gradient-boosted decision trees.

pub mod data;
pub mod features;
pub mod model;
pub mod predict;
pub mod publish;
pub mod training;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conference code for teams with no conference affiliation
pub const INDEPENDENT_CONF: &str = "ind";

/// The model's feature columns, in the exact order every feature matrix
/// uses. The first 15 come straight from the raw season data; `win_perc`
/// and `wab_perc` are derived during feature engineering.
pub const FEATURE_NAMES: [&str; 17] = [
    "ADJOE", "ADJDE", "EFG_O", "EFG_D", "TOR", "TORD", "ORB", "DRB", "FTR", "FTRD", "Two_PO",
    "Two_PD", "Three_PO", "Three_PD", "ADJ_T", "win_perc", "wab_perc",
];

/// One team-season of raw statistics from the source dataset
///
/// Serde renames match the dataset's column headers exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRecord {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Conf")]
    pub conf: String,
    #[serde(rename = "Games")]
    pub games: u32,
    #[serde(rename = "Wins")]
    pub wins: u32,
    /// Wins above bubble: performance relative to a hypothetical bubble team
    #[serde(rename = "WAB")]
    pub wab: f64,
    #[serde(rename = "Power_Rating")]
    pub power_rating: f64,
    /// Raw outcome label; may hold the play-in value `R68` that feature
    /// engineering collapses into `DIDNT_MAKE`
    #[serde(rename = "Postseason")]
    pub postseason: String,
    #[serde(rename = "ADJOE")]
    pub adjoe: f64,
    #[serde(rename = "ADJDE")]
    pub adjde: f64,
    #[serde(rename = "EFG_O")]
    pub efg_o: f64,
    #[serde(rename = "EFG_D")]
    pub efg_d: f64,
    #[serde(rename = "TOR")]
    pub tor: f64,
    #[serde(rename = "TORD")]
    pub tord: f64,
    #[serde(rename = "ORB")]
    pub orb: f64,
    #[serde(rename = "DRB")]
    pub drb: f64,
    #[serde(rename = "FTR")]
    pub ftr: f64,
    #[serde(rename = "FTRD")]
    pub ftrd: f64,
    #[serde(rename = "Two_PO")]
    pub two_po: f64,
    #[serde(rename = "Two_PD")]
    pub two_pd: f64,
    #[serde(rename = "Three_PO")]
    pub three_po: f64,
    #[serde(rename = "Three_PD")]
    pub three_pd: f64,
    #[serde(rename = "ADJ_T")]
    pub adj_t: f64,
}

/// A season record after feature engineering: every raw column plus the
/// derived features, with the postseason label normalized
///
/// Kept flat so the csv crate can round-trip it as the engineered dataset
/// file shared between pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineeredRecord {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Conf")]
    pub conf: String,
    #[serde(rename = "Games")]
    pub games: u32,
    #[serde(rename = "Wins")]
    pub wins: u32,
    #[serde(rename = "WAB")]
    pub wab: f64,
    #[serde(rename = "Power_Rating")]
    pub power_rating: f64,
    /// Normalized outcome label, never `R68`
    #[serde(rename = "Postseason")]
    pub postseason: String,
    #[serde(rename = "ADJOE")]
    pub adjoe: f64,
    #[serde(rename = "ADJDE")]
    pub adjde: f64,
    #[serde(rename = "EFG_O")]
    pub efg_o: f64,
    #[serde(rename = "EFG_D")]
    pub efg_d: f64,
    #[serde(rename = "TOR")]
    pub tor: f64,
    #[serde(rename = "TORD")]
    pub tord: f64,
    #[serde(rename = "ORB")]
    pub orb: f64,
    #[serde(rename = "DRB")]
    pub drb: f64,
    #[serde(rename = "FTR")]
    pub ftr: f64,
    #[serde(rename = "FTRD")]
    pub ftrd: f64,
    #[serde(rename = "Two_PO")]
    pub two_po: f64,
    #[serde(rename = "Two_PD")]
    pub two_pd: f64,
    #[serde(rename = "Three_PO")]
    pub three_po: f64,
    #[serde(rename = "Three_PD")]
    pub three_pd: f64,
    #[serde(rename = "ADJ_T")]
    pub adj_t: f64,
    /// Mean power rating of the (Year, Conf) group, or 0.5 for independents
    pub avg_conf_power_rating: f64,
    pub win_perc: f64,
    pub wab_perc: f64,
}

impl EngineeredRecord {
    /// The record's feature vector, in [`FEATURE_NAMES`] order
    pub fn features(&self) -> [f64; FEATURE_NAMES.len()] {
        [
            self.adjoe,
            self.adjde,
            self.efg_o,
            self.efg_d,
            self.tor,
            self.tord,
            self.orb,
            self.drb,
            self.ftr,
            self.ftrd,
            self.two_po,
            self.two_pd,
            self.three_po,
            self.three_pd,
            self.adj_t,
            self.win_perc,
            self.wab_perc,
        ]
    }
}

/// One team's predicted tournament finish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(rename = "Team")]
    pub team: String,
    /// Predicted outcome rank (0 = missed the tournament, 7 = champions)
    pub pred_factor: u8,
    /// The rank decoded to its result phrase
    pub pred_round: String,
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum HoopsError {
    #[error("Could not retrieve dataset: {0}")]
    DataUnavailable(#[from] reqwest::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Publish failed: {0}")]
    Publish(#[from] rusqlite::Error),

    #[error("Model artifact error: {0}")]
    Artifact(#[from] serde_json::Error),

    #[error("Model not trained - run `hoops train` first")]
    NoModel,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, HoopsError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub pipeline: PipelineConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub dataset_url: String,
    pub raw_data_path: String,
    pub engineered_data_path: String,
    pub model_path: String,
    pub predictions_path: String,
    /// SQLite database holding the published `preds` table
    pub sink_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Season to predict; every other year becomes training data
    pub target_year: i32,
}

/// Hyperparameters for the gradient-boosted classifier, recorded verbatim
/// in the trained artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub learning_rate: f64,
    pub n_estimators: usize,
    pub min_samples_leaf: usize,
    pub max_depth: usize,
    /// Seed for every stochastic choice made during fitting; identical
    /// seeds and inputs yield bit-identical artifacts
    pub random_state: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                dataset_url: "https://cbb-season-data.s3.amazonaws.com/cbb.csv".to_string(),
                raw_data_path: "data/cbb.csv".to_string(),
                engineered_data_path: "data/cbb_engineered.csv".to_string(),
                model_path: "model/postseason_gbm.json".to_string(),
                predictions_path: "data/predictions.csv".to_string(),
                sink_path: "data/preds.db".to_string(),
            },
            pipeline: PipelineConfig { target_year: 2020 },
            model: ModelConfig {
                learning_rate: 0.1,
                n_estimators: 100,
                min_samples_leaf: 1,
                max_depth: 3,
                random_state: 42,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HoopsError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| HoopsError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HoopsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
