use crate::error::{KernelError, Result};
use serde::{Deserialize, Serialize};

/// Default geometric tolerance shared by every predicate of a hull or poly.
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Default number of projected-gradient steps used for nearest-point queries
/// under non-similarity transforms.
pub const DEFAULT_REFINE_ITERATIONS: usize = 24;

/// Numerical settings owned by each hull and poly instance.
///
/// Fields are only reachable through validated constructors, deserialization
/// included, so a stored config is always usable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawKernelConfig")]
pub struct KernelConfig {
    epsilon: f64,
    refine_iterations: usize,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawKernelConfig {
    epsilon: f64,
    refine_iterations: usize,
}

impl Default for RawKernelConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            refine_iterations: DEFAULT_REFINE_ITERATIONS,
        }
    }
}

impl TryFrom<RawKernelConfig> for KernelConfig {
    type Error = KernelError;

    fn try_from(raw: RawKernelConfig) -> Result<Self> {
        KernelConfig::new(raw.epsilon)?.with_refine_iterations(raw.refine_iterations)
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            refine_iterations: DEFAULT_REFINE_ITERATIONS,
        }
    }
}

impl KernelConfig {
    pub fn new(epsilon: f64) -> Result<Self> {
        let config = Self {
            epsilon,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_refine_iterations(self, refine_iterations: usize) -> Result<Self> {
        let config = Self {
            refine_iterations,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(KernelError::InvalidTolerance(self.epsilon));
        }
        if self.refine_iterations == 0 {
            return Err(KernelError::InvalidIterations);
        }
        Ok(())
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn refine_iterations(&self) -> usize {
        self.refine_iterations
    }
}
