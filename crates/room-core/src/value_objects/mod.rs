//! Value objects - immutable types that represent domain concepts

mod liveness;

pub use liveness::LivenessPolicy;

/// Unix epoch milliseconds
pub type Timestamp = i64;
