use std::fmt;
use std::path::PathBuf;

/// A single per-UAV mobility parameter failure, caught at validate time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub uav_id: String,
    pub message: String,
}

impl ConfigError {
    pub fn new(uav_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uav_id: uav_id.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uav {}: {}", self.uav_id, self.message)
    }
}

/// Every validation failure of a run, collected before anything executes so
/// a broken scenario is reported in one pass.
#[derive(Debug, Clone, Default)]
pub struct ConfigErrors {
    errors: Vec<ConfigError>,
}

impl ConfigErrors {
    pub fn push(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.errors.iter()
    }

    /// An empty collection dissolves into `Ok`, anything else becomes the
    /// aggregate `EngineError::Config`.
    pub fn into_result(self) -> EngineResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Config(self))
        }
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}", error)?;
        }
        Ok(())
    }
}

/// Fatal runtime failure: a UAV position the boundary policy refuses.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("uav {uav_id} at tick {tick}: {reason} (position {x:.2}, {y:.2}, altitude {altitude:.2})")]
pub struct BoundaryViolation {
    pub uav_id: String,
    pub tick: u64,
    pub x: f64,
    pub y: f64,
    pub altitude: f64,
    pub reason: String,
}

/// Common error type for engine execution.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid mobility configuration:\n{0}")]
    Config(ConfigErrors),
    #[error(transparent)]
    Boundary(#[from] BoundaryViolation),
    #[error("trace i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_dissolves_into_ok() {
        assert!(ConfigErrors::default().into_result().is_ok());
    }

    #[test]
    fn aggregate_error_lists_every_uav() {
        let mut errors = ConfigErrors::default();
        errors.push(ConfigError::new("uav1", "speed must be positive"));
        errors.push(ConfigError::new("uav2", "needs at least 2 waypoints"));

        let err = errors.into_result().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("uav1: speed must be positive"));
        assert!(message.contains("uav2: needs at least 2 waypoints"));
    }

    #[test]
    fn boundary_violation_names_uav_tick_and_coordinate() {
        let violation = BoundaryViolation {
            uav_id: "uav7".into(),
            tick: 42,
            x: 1500.0,
            y: -3.5,
            altitude: 80.0,
            reason: "outside scenario envelope".into(),
        };
        let message = violation.to_string();
        assert!(message.contains("uav7"));
        assert!(message.contains("tick 42"));
        assert!(message.contains("1500.00"));
    }
}
