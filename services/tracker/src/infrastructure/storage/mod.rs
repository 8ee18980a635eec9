//! 对象存储适配

mod local_storage;

pub use local_storage::*;
