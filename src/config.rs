//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsmind/rsmind.toml`
//! 3. Explicit config file passed on the command line
//! 4. Environment variables: `RSMIND_*` prefix

use std::path::Path;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::errors::MapResult;

/// Knobs shared by the generators and the evaluation driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// QA pairs generated per annotated image
    pub questions_per_sample: usize,
    /// Deepest level sampled by level questions (synthetic data caps at 8
    /// levels, i.e. 0..=7)
    pub max_level: usize,
    /// Minimum intersection-over-self ratio for region membership
    pub overlap_threshold: f64,
    /// Difficulty filter: maps with more nodes are dropped from test sets
    pub node_budget: usize,
    /// Train share of a split
    pub train_ratio: f64,
    /// Fixed RNG seed; unset means entropy-seeded
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            questions_per_sample: 1,
            max_level: 7,
            overlap_threshold: 0.5,
            node_budget: 60,
            train_ratio: 0.9,
            seed: None,
        }
    }
}

impl Settings {
    /// Loads settings through the layered sources. Missing files are fine;
    /// a malformed file or value is a configuration error.
    pub fn load(explicit: Option<&Path>) -> MapResult<Settings> {
        let mut builder = Config::builder();

        if let Some(dirs) = ProjectDirs::from("", "", "rsmind") {
            let global = dirs.config_dir().join("rsmind.toml");
            builder = builder.add_source(File::from(global).required(false));
        }
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }
        builder = builder.add_source(Environment::with_prefix("RSMIND").try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }
}
