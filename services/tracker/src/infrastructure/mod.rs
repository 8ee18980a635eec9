//! 基础设施层

pub mod auth;
pub mod persistence;
pub mod storage;
