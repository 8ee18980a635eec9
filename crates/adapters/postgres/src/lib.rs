//! fittrack-adapter-postgres - PostgreSQL 适配器

mod connection;
mod profile_store;

pub use connection::*;
pub use profile_store::*;
