//! Simulation configuration.
//!
//! Values are layered, later layers winning:
//!
//! 1. [`SimConfig::default`]
//! 2. environment (`ICA_SIZE`, `ICA_Q`, `ICA_CYCLES`, `ICA_SEED`,
//!    `ICA_NEIGHBORHOOD`, `ICA_OUTPUT_DIR`)
//! 3. a JSON file (fields omitted from the file keep their current value)
//! 4. command-line flags

use std::path::{Path, PathBuf};

use ica_lattice::Neighborhood;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Everything needed to build and drive one lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Interior side length `L`
    pub size: usize,
    /// Threshold scale `q`
    pub threshold_scale: f64,
    /// Cycles to run
    pub cycles: u64,
    /// Fixed seed; `None` draws one
    pub seed: Option<u64>,
    /// Update rule topology
    pub neighborhood: Neighborhood,
    /// Directory for the data log and plot script
    pub output_dir: PathBuf,
    /// Write the `.dat` data log
    pub write_log: bool,
    /// Write the gnuplot `.plt` script
    pub write_plot: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            size: 64,
            threshold_scale: 1.0,
            cycles: 100,
            seed: None,
            neighborhood: Neighborhood::VonNeumann,
            output_dir: PathBuf::from("."),
            write_log: true,
            write_plot: false,
        }
    }
}

impl SimConfig {
    /// Defaults overridden by `ICA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from a variable lookup.
    ///
    /// Taking the lookup as a function keeps this testable without touching
    /// the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ICA_SIZE") {
            self.size = parse_var("ICA_SIZE", &v)?;
        }
        if let Some(v) = lookup("ICA_Q") {
            self.threshold_scale = parse_var("ICA_Q", &v)?;
        }
        if let Some(v) = lookup("ICA_CYCLES") {
            self.cycles = parse_var("ICA_CYCLES", &v)?;
        }
        if let Some(v) = lookup("ICA_SEED") {
            self.seed = Some(parse_var("ICA_SEED", &v)?);
        }
        if let Some(v) = lookup("ICA_NEIGHBORHOOD") {
            self.neighborhood = v.parse().map_err(Error::Config)?;
        }
        if let Some(v) = lookup("ICA_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        Ok(())
    }

    /// Merge a JSON file over this configuration.
    pub fn merge_json_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        self.merge_json(&text)
    }

    /// Merge a JSON document over this configuration.
    pub fn merge_json(&mut self, text: &str) -> Result<()> {
        let mut current = serde_json::to_value(&*self)?;
        let overrides: serde_json::Value = serde_json::from_str(text)?;

        match (&mut current, overrides) {
            (serde_json::Value::Object(base), serde_json::Value::Object(fields)) => {
                base.extend(fields);
            }
            _ => return Err(Error::Config("config file must be a JSON object".into())),
        }

        *self = serde_json::from_value(current)?;
        Ok(())
    }

    /// Reject values the lattice cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::Config("size must be positive".into()));
        }
        if !self.threshold_scale.is_finite() || self.threshold_scale < 0.0 {
            return Err(Error::Config(format!(
                "threshold scale must be finite and non-negative, got {}",
                self.threshold_scale
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid {}='{}': {}", key, value, e)))
}
