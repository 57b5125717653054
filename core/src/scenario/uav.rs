use crate::mobility::MobilityPattern;
use crate::scenario::bounds::Position;
use serde::{Deserialize, Serialize};

/// One UAV declaration: stable identity, launch position, mobility pattern.
/// Immutable for the run's duration; positions are derived per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UavSpec {
    pub id: String,
    pub start: Position,
    pub pattern: MobilityPattern,
}

impl UavSpec {
    pub fn new(id: impl Into<String>, start: Position, pattern: MobilityPattern) -> Self {
        Self {
            id: id.into(),
            start,
            pattern,
        }
    }
}
