use super::defs::*;
use super::error::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_SWEEPS: usize = 10_000;
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000;

/// Settings for a policy iteration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Number of rows and columns of the grid.
    #[serde(alias = "N")]
    pub n: Discrete,

    /// Evaluation stops once the largest per-sweep change of any state value drops below this.
    pub theta: Continous,

    pub discount: Continous,

    #[serde(default = "default_max_sweeps")]
    pub max_sweeps: Option<usize>,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: Option<usize>,
}

fn default_max_sweeps() -> Option<usize> {
    Some(DEFAULT_MAX_SWEEPS)
}

fn default_max_iterations() -> Option<usize> {
    Some(DEFAULT_MAX_ITERATIONS)
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            n: 4,
            theta: 0.001,
            discount: 0.9,
            max_sweeps: default_max_sweeps(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl Configuration {
    pub fn new(n: Discrete, theta: Continous, discount: Continous) -> Result<Self> {
        let config = Self {
            n,
            theta,
            discount,
            ..Default::default()
        };
        config.validate()?;

        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config = serde_json::from_str::<Self>(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n < 2 {
            return Err(GridWorldError::InvalidConfiguration(format!(
                "N must be at least 2, got {}",
                self.n
            )));
        }

        if !self.theta.is_finite() || self.theta <= 0. {
            return Err(GridWorldError::InvalidConfiguration(format!(
                "theta must be a positive number, got {}",
                self.theta
            )));
        }

        if !(0.0..=1.0).contains(&self.discount) {
            return Err(GridWorldError::InvalidConfiguration(format!(
                "discount must be in [0, 1], got {}",
                self.discount
            )));
        }

        if self.max_sweeps == Some(0) || self.max_iterations == Some(0) {
            return Err(GridWorldError::InvalidConfiguration(
                "iteration limits must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
