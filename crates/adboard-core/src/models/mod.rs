//! Data models for adboard

pub mod curve;
pub mod material;

pub use curve::{Curve, Sample};
pub use material::{ChannelMetrics, Material};
