use crate::prelude::ConfigError;
use crate::scenario::bounds::Position;
use serde::{Deserialize, Serialize};

/// Closed-loop patrol over an ordered waypoint list at constant speed. The
/// route runs w0 -> w1 -> ... -> wn-1 and back to w0 along the closing
/// segment, so the position is continuous and speed-consistent everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointLoop {
    pub waypoints: Vec<Position>,
    pub speed: f64,
}

impl WaypointLoop {
    pub fn validate(&self, uav_id: &str) -> Result<(), ConfigError> {
        if self.waypoints.len() < 2 {
            return Err(ConfigError::new(
                uav_id,
                format!(
                    "waypoint loop needs at least 2 waypoints, got {}",
                    self.waypoints.len()
                ),
            ));
        }
        if self.speed <= 0.0 {
            return Err(ConfigError::new(
                uav_id,
                format!("waypoint loop speed must be positive, got {}", self.speed),
            ));
        }
        if loop_length(&self.waypoints) <= 0.0 {
            return Err(ConfigError::new(uav_id, "waypoints are all coincident"));
        }
        Ok(())
    }
}

fn loop_length(waypoints: &[Position]) -> f64 {
    let mut total = 0.0;
    for i in 0..waypoints.len() {
        let next = &waypoints[(i + 1) % waypoints.len()];
        total += waypoints[i].distance_to(next);
    }
    total
}

/// Precomputed cyclic arc-length table for a waypoint loop.
#[derive(Debug)]
pub struct WaypointLoopSampler {
    start: Position,
    points: Vec<Position>,
    /// cumulative[i] is the arc length at points[i]; the final entry is the
    /// full loop length, back at points[0].
    cumulative: Vec<f64>,
    speed: f64,
}

impl WaypointLoopSampler {
    pub fn new(params: &WaypointLoop, start: Position) -> Self {
        let points = params.waypoints.clone();
        let mut cumulative = Vec::with_capacity(points.len() + 1);
        cumulative.push(0.0);
        let mut total = 0.0;
        for i in 0..points.len() {
            let next = points[(i + 1) % points.len()];
            total += points[i].distance_to(&next);
            cumulative.push(total);
        }
        Self {
            start,
            points,
            cumulative,
            speed: params.speed,
        }
    }

    pub fn position_at(&mut self, t: f64) -> Position {
        if t <= 0.0 {
            return self.start;
        }
        let total = self.cumulative[self.points.len()];
        let arc = (self.speed * t) % total;
        for i in 0..self.points.len() {
            if arc <= self.cumulative[i + 1] {
                let segment = self.cumulative[i + 1] - self.cumulative[i];
                let from = self.points[i];
                if segment <= 0.0 {
                    return from;
                }
                let to = self.points[(i + 1) % self.points.len()];
                return from.lerp(&to, (arc - self.cumulative[i]) / segment);
            }
        }
        self.points[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn out_and_back() -> WaypointLoop {
        WaypointLoop {
            waypoints: vec![Position::new(0.0, 0.0, 50.0), Position::new(10.0, 0.0, 50.0)],
            speed: 2.0,
        }
    }

    #[test]
    fn rejects_short_waypoint_lists_and_bad_speeds() {
        let mut params = out_and_back();
        params.waypoints.truncate(1);
        assert!(params.validate("uav1").is_err());

        let mut params = out_and_back();
        params.speed = 0.0;
        assert!(params.validate("uav1").is_err());

        let params = WaypointLoop {
            waypoints: vec![Position::new(1.0, 1.0, 50.0), Position::new(1.0, 1.0, 50.0)],
            speed: 2.0,
        };
        assert!(params.validate("uav1").is_err());
    }

    #[test]
    fn advances_monotonically_then_returns_along_closing_segment() {
        let params = out_and_back();
        let mut sampler = WaypointLoopSampler::new(&params, params.waypoints[0]);

        // speed 2 over a 10-unit leg: x climbs 0..10 across ticks 0..5.
        for tick in 0..=5u64 {
            let p = sampler.position_at(tick as f64);
            assert_relative_eq!(p.x, 2.0 * tick as f64);
            assert_relative_eq!(p.y, 0.0);
        }
        // Closing segment brings it back toward the first waypoint.
        assert_relative_eq!(sampler.position_at(6.0).x, 8.0);
        assert_relative_eq!(sampler.position_at(10.0).x, 0.0);
    }

    #[test]
    fn displacement_per_step_never_exceeds_speed_times_dt() {
        let params = WaypointLoop {
            waypoints: vec![
                Position::new(0.0, 0.0, 50.0),
                Position::new(12.0, 0.0, 50.0),
                Position::new(12.0, 7.0, 60.0),
            ],
            speed: 3.0,
        };
        let mut sampler = WaypointLoopSampler::new(&params, params.waypoints[0]);
        let dt = 0.5;
        let mut previous = sampler.position_at(0.0);
        for tick in 1..=100u64 {
            let current = sampler.position_at(tick as f64 * dt);
            let displacement = previous.distance_to(&current);
            assert!(
                displacement <= params.speed * dt + 1e-9,
                "tick {} moved {}",
                tick,
                displacement
            );
            previous = current;
        }
    }

    #[test]
    fn negative_time_clamps_to_launch_position() {
        let params = out_and_back();
        let start = Position::new(-3.0, -3.0, 40.0);
        let mut sampler = WaypointLoopSampler::new(&params, start);
        assert_eq!(sampler.position_at(-1.0), start);
        assert_eq!(sampler.position_at(0.0), start);
    }
}
