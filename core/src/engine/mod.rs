pub mod guard;
pub mod scheduler;

pub use guard::{BoundaryGuard, BoundaryOutcome, SeparationRule};
pub use scheduler::{FrameStream, RunSummary, Scheduler, TickFrame};
