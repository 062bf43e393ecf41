//! Training loops, evaluation, and training telemetry.

pub mod session;
pub mod telemetry;
pub mod trainer;
