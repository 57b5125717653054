use crate::prelude::ConfigError;
use crate::scenario::bounds::Position;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Region the randomized pattern draws its targets from: an x/y rectangle
/// plus an altitude band. The band may be degenerate (fixed altitude).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetRegion {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_altitude: f64,
    pub max_altitude: f64,
}

/// Randomized waypoint pattern: each time a target is reached the next one
/// is drawn uniformly from `region` with a per-UAV generator seeded from
/// configuration, so the same seed reproduces the same path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomWaypoint {
    pub region: TargetRegion,
    pub speed: f64,
    pub seed: u64,
}

impl RandomWaypoint {
    pub fn validate(&self, uav_id: &str) -> Result<(), ConfigError> {
        if self.speed <= 0.0 {
            return Err(ConfigError::new(
                uav_id,
                format!("random waypoint speed must be positive, got {}", self.speed),
            ));
        }
        let region = &self.region;
        if region.min_x >= region.max_x || region.min_y >= region.max_y {
            return Err(ConfigError::new(
                uav_id,
                "random waypoint region must have positive x and y extent",
            ));
        }
        if region.min_altitude > region.max_altitude {
            return Err(ConfigError::new(
                uav_id,
                "random waypoint altitude band is inverted",
            ));
        }
        Ok(())
    }
}

/// Lazily materialized random path. Segments are drawn on demand as the
/// clock reaches them, which keeps queries O(1) amortized while staying a
/// pure function of (seed, t) for non-decreasing t.
#[derive(Debug)]
pub struct RandomWaypointSampler {
    rng: StdRng,
    region: TargetRegion,
    speed: f64,
    start: Position,
    seg_from: Position,
    seg_to: Position,
    seg_start: f64,
    seg_duration: f64,
}

impl RandomWaypointSampler {
    pub fn new(params: &RandomWaypoint, start: Position) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let seg_to = draw_target(&mut rng, &params.region, &start);
        let seg_duration = start.distance_to(&seg_to) / params.speed;
        Self {
            rng,
            region: params.region,
            speed: params.speed,
            start,
            seg_from: start,
            seg_to,
            seg_start: 0.0,
            seg_duration,
        }
    }

    pub fn position_at(&mut self, t: f64) -> Position {
        if t <= 0.0 {
            return self.start;
        }
        while t >= self.seg_start + self.seg_duration {
            self.seg_start += self.seg_duration;
            self.seg_from = self.seg_to;
            self.seg_to = draw_target(&mut self.rng, &self.region, &self.seg_from);
            self.seg_duration = self.seg_from.distance_to(&self.seg_to) / self.speed;
        }
        let fraction = ((t - self.seg_start) / self.seg_duration).clamp(0.0, 1.0);
        self.seg_from.lerp(&self.seg_to, fraction)
    }
}

/// Draws the next target, redrawing the rare coincident point so segment
/// durations stay strictly positive.
fn draw_target(rng: &mut StdRng, region: &TargetRegion, current: &Position) -> Position {
    loop {
        let candidate = Position::new(
            rng.gen_range(region.min_x..region.max_x),
            rng.gen_range(region.min_y..region.max_y),
            sample_band(rng, region.min_altitude, region.max_altitude),
        );
        if current.distance_to(&candidate) > 1e-9 {
            return candidate;
        }
    }
}

fn sample_band(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if min < max {
        rng.gen_range(min..max)
    } else {
        min
    }
}
