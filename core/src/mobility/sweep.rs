use crate::prelude::ConfigError;
use crate::scenario::bounds::Position;
use serde::{Deserialize, Serialize};

/// Back-and-forth shuttle between two fixed endpoints at constant speed,
/// reflecting at each end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSweep {
    pub from: Position,
    pub to: Position,
    pub speed: f64,
}

impl LinearSweep {
    pub fn validate(&self, uav_id: &str) -> Result<(), ConfigError> {
        if self.speed <= 0.0 {
            return Err(ConfigError::new(
                uav_id,
                format!("linear sweep speed must be positive, got {}", self.speed),
            ));
        }
        if self.from.distance_to(&self.to) <= 0.0 {
            return Err(ConfigError::new(uav_id, "linear sweep endpoints coincide"));
        }
        Ok(())
    }
}

/// Triangle-wave parameterization of the sweep leg.
#[derive(Debug)]
pub struct LinearSweepSampler {
    start: Position,
    from: Position,
    to: Position,
    speed: f64,
    leg: f64,
}

impl LinearSweepSampler {
    pub fn new(params: &LinearSweep, start: Position) -> Self {
        Self {
            start,
            from: params.from,
            to: params.to,
            speed: params.speed,
            leg: params.from.distance_to(&params.to),
        }
    }

    pub fn position_at(&mut self, t: f64) -> Position {
        if t <= 0.0 {
            return self.start;
        }
        let travelled = (self.speed * t) % (2.0 * self.leg);
        if travelled <= self.leg {
            self.from.lerp(&self.to, travelled / self.leg)
        } else {
            self.to.lerp(&self.from, (travelled - self.leg) / self.leg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn shuttle() -> LinearSweep {
        LinearSweep {
            from: Position::new(0.0, 0.0, 50.0),
            to: Position::new(8.0, 0.0, 50.0),
            speed: 2.0,
        }
    }

    #[test]
    fn rejects_zero_speed_and_coincident_endpoints() {
        let mut params = shuttle();
        params.speed = -1.0;
        assert!(params.validate("uav1").is_err());

        let mut params = shuttle();
        params.to = params.from;
        assert!(params.validate("uav1").is_err());
    }

    #[test]
    fn reflects_at_each_endpoint() {
        let params = shuttle();
        let mut sampler = LinearSweepSampler::new(&params, params.from);

        assert_relative_eq!(sampler.position_at(2.0).x, 4.0);
        assert_relative_eq!(sampler.position_at(4.0).x, 8.0);
        // Past the far end the direction reverses.
        assert_relative_eq!(sampler.position_at(6.0).x, 4.0);
        assert_relative_eq!(sampler.position_at(8.0).x, 0.0);
        // And the cycle repeats.
        assert_relative_eq!(sampler.position_at(10.0).x, 4.0);
    }

    #[test]
    fn zero_time_holds_the_launch_position() {
        let params = shuttle();
        let start = Position::new(100.0, 100.0, 30.0);
        let mut sampler = LinearSweepSampler::new(&params, start);
        assert_eq!(sampler.position_at(0.0), start);
    }
}
