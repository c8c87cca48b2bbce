use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::sim::{ChromaticityPoint, SimulationParams, SimulationRun};

// ---------------------------------------------------------------------------
// RunRecord – what gets written to / read from disk
// ---------------------------------------------------------------------------

/// Points of a run plus, when known, the seed and parameters that produced
/// them. CSV and Parquet files carry points only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub params: Option<SimulationParams>,
    #[serde(default)]
    pub points: Vec<ChromaticityPoint>,
}

impl RunRecord {
    /// Record of a finished run; the params carry the seed actually used so
    /// re-running them reproduces the points.
    pub fn from_run(run: &SimulationRun) -> Self {
        let mut params = run.params.clone();
        params.seed = Some(run.seed);
        Self {
            seed: Some(run.seed),
            params: Some(params),
            points: run.points.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct machine indices present in the points.
    pub fn machines(&self) -> BTreeSet<usize> {
        self.points.iter().map(|p| p.machine).collect()
    }

    /// Distinct LED indices present in the points.
    pub fn leds(&self) -> BTreeSet<usize> {
        self.points.iter().map(|p| p.led).collect()
    }

    /// Number of objects, taken as one past the largest object index.
    pub fn object_count(&self) -> usize {
        self.points.iter().map(|p| p.object + 1).max().unwrap_or(0)
    }
}
