pub mod random_waypoint;
pub mod sweep;
pub mod waypoint;

pub use random_waypoint::{RandomWaypoint, RandomWaypointSampler, TargetRegion};
pub use sweep::{LinearSweep, LinearSweepSampler};
pub use waypoint::{WaypointLoop, WaypointLoopSampler};

use crate::prelude::ConfigError;
use crate::scenario::bounds::Position;
use serde::{Deserialize, Serialize};

/// The finite set of supported mobility kinds. Dispatch is an exhaustive
/// match, so adding a kind is a compile-time-checked change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MobilityPattern {
    /// Holds the launch position for the whole run.
    Static,
    WaypointLoop(WaypointLoop),
    RandomWaypoint(RandomWaypoint),
    LinearSweep(LinearSweep),
}

impl MobilityPattern {
    /// Semantic parameter check, run once per UAV before the clock starts.
    pub fn validate(&self, uav_id: &str) -> Result<(), ConfigError> {
        match self {
            MobilityPattern::Static => Ok(()),
            MobilityPattern::WaypointLoop(params) => params.validate(uav_id),
            MobilityPattern::RandomWaypoint(params) => params.validate(uav_id),
            MobilityPattern::LinearSweep(params) => params.validate(uav_id),
        }
    }

    /// Builds the runtime sampler that answers `position_at(t)` for a UAV
    /// launched at `start`.
    pub fn sampler(&self, start: Position) -> PatternSampler {
        match self {
            MobilityPattern::Static => PatternSampler::Static { start },
            MobilityPattern::WaypointLoop(params) => {
                PatternSampler::WaypointLoop(WaypointLoopSampler::new(params, start))
            }
            MobilityPattern::RandomWaypoint(params) => {
                PatternSampler::RandomWaypoint(RandomWaypointSampler::new(params, start))
            }
            MobilityPattern::LinearSweep(params) => {
                PatternSampler::LinearSweep(LinearSweepSampler::new(params, start))
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            MobilityPattern::Static => "static",
            MobilityPattern::WaypointLoop(_) => "waypoint_loop",
            MobilityPattern::RandomWaypoint(_) => "random_waypoint",
            MobilityPattern::LinearSweep(_) => "linear_sweep",
        }
    }
}

/// Per-UAV runtime state for position queries. The scheduler queries with a
/// non-decreasing `t`; the randomized sampler relies on that to extend its
/// path lazily. Queries at `t <= 0` always return the launch position.
#[derive(Debug)]
pub enum PatternSampler {
    Static { start: Position },
    WaypointLoop(WaypointLoopSampler),
    RandomWaypoint(RandomWaypointSampler),
    LinearSweep(LinearSweepSampler),
}

impl PatternSampler {
    pub fn position_at(&mut self, t: f64) -> Position {
        match self {
            PatternSampler::Static { start } => *start,
            PatternSampler::WaypointLoop(sampler) => sampler.position_at(t),
            PatternSampler::RandomWaypoint(sampler) => sampler.position_at(t),
            PatternSampler::LinearSweep(sampler) => sampler.position_at(t),
        }
    }
}
