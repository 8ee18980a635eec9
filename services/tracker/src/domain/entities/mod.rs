//! 领域实体

mod activity;
mod bio_profile;
mod food_log;
mod profile;
mod progress_photo;

pub use activity::*;
pub use bio_profile::*;
pub use food_log::*;
pub use profile::*;
pub use progress_photo::*;
