pub mod sample;
pub mod writer;

pub use sample::TrajectorySample;
pub use writer::TraceWriter;
