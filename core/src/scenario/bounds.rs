use serde::{Deserialize, Serialize};

/// A point in scenario space: planar coordinates plus altitude, all in the
/// reference traffic scenario's coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub altitude: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, altitude: f64) -> Self {
        Self { x, y, altitude }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.altitude - self.altitude;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Linear interpolation toward `other`, `fraction` in [0, 1].
    pub fn lerp(&self, other: &Position, fraction: f64) -> Position {
        Position {
            x: self.x + (other.x - self.x) * fraction,
            y: self.y + (other.y - self.y) * fraction,
            altitude: self.altitude + (other.altitude - self.altitude) * fraction,
        }
    }
}

/// What to do with a position that leaves the spatial envelope. There is no
/// implicit default; configuration must name one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Pull the offending coordinate to the nearest envelope face.
    Clamp,
    /// Abort the run with a descriptive violation.
    Reject,
}

/// Horizontal polygon no UAV may enter, applied at every altitude.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoFlyZone {
    pub name: String,
    /// Polygon vertices on the xy plane, in order; the closing edge back to
    /// the first vertex is implied.
    pub vertices: Vec<(f64, f64)>,
}

impl NoFlyZone {
    /// Even-odd ray-crossing test on the xy plane.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let vertices = &self.vertices;
        if vertices.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = vertices.len() - 1;
        for i in 0..vertices.len() {
            let (xi, yi) = vertices[i];
            let (xj, yj) = vertices[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// The spatial envelope shared read-only by every UAV in a run, derived from
/// the reference traffic scenario's map extent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_altitude: f64,
    pub max_altitude: f64,
    #[serde(default)]
    pub no_fly_zones: Vec<NoFlyZone>,
}

impl ScenarioBounds {
    pub fn contains(&self, position: &Position) -> bool {
        position.x >= self.min_x
            && position.x <= self.max_x
            && position.y >= self.min_y
            && position.y <= self.max_y
            && position.altitude >= self.min_altitude
            && position.altitude <= self.max_altitude
    }

    /// Nearest envelope point for an axis-aligned box: clamp each coordinate
    /// independently. In-bounds positions come back unchanged.
    pub fn clamp(&self, position: &Position) -> Position {
        Position {
            x: position.x.clamp(self.min_x, self.max_x),
            y: position.y.clamp(self.min_y, self.max_y),
            altitude: position.altitude.clamp(self.min_altitude, self.max_altitude),
        }
    }
}

/// The single authoritative discrete clock: horizon `duration` seconds at a
/// fixed `step`, ticks 0..=tick_count().
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeAxis {
    pub duration: f64,
    pub step: f64,
}

impl TimeAxis {
    pub fn new(duration: f64, step: f64) -> Self {
        Self { duration, step }
    }

    /// N = floor(duration / step). Samples cover the inclusive range [0, N].
    pub fn tick_count(&self) -> u64 {
        (self.duration / self.step).floor() as u64
    }

    pub fn timestamp(&self, tick: u64) -> f64 {
        tick as f64 * self.step
    }
}
