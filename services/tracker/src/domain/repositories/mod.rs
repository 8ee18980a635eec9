//! Repository trait 定义

mod activity_repository;
mod bio_profile_repository;
mod food_log_repository;
mod profile_repository;
mod progress_photo_repository;

pub use activity_repository::*;
pub use bio_profile_repository::*;
pub use food_log_repository::*;
pub use profile_repository::*;
pub use progress_photo_repository::*;
