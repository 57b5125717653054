pub mod bounds;
pub mod uav;

pub use bounds::{BoundaryPolicy, NoFlyZone, Position, ScenarioBounds, TimeAxis};
pub use uav::UavSpec;
