//! 值对象

mod bio_metrics;
mod display_name;

pub use bio_metrics::*;
pub use display_name::*;
