//! 应用层

pub mod context;
pub mod services;
