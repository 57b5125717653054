use serde::{Deserialize, Serialize};

/// The atomic trace record: one UAV's resolved position at one tick. Speed
/// is the displacement from the same UAV's previous sample over the clock
/// step, 0 on the first tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub uav_id: String,
    pub tick: u64,
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub altitude: f64,
    pub speed: f64,
}

impl TrajectorySample {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        uav_id: impl Into<String>,
        tick: u64,
        timestamp: f64,
        x: f64,
        y: f64,
        altitude: f64,
        speed: f64,
    ) -> Self {
        Self {
            uav_id: uav_id.into(),
            tick,
            timestamp,
            x,
            y,
            altitude,
            speed,
        }
    }
}
