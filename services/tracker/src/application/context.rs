//! 服务组装
//!
//! 一个登录会话共享同一个 `IdentityResolver`，所有会话范围的服务都从这里拿到它的克隆。

use std::sync::Arc;

use fittrack_ports::{AuthSessionPort, ObjectStoragePort, ProfileStorePort};
use sqlx::PgPool;

use crate::application::services::{
    ActivityService, BioProfileService, FoodLogService, ProfileService, ProgressPhotoService,
};
use crate::domain::repositories::{
    ActivityRepository, BioProfileRepository, FoodLogRepository, ProfileRepository,
    ProgressPhotoRepository,
};
use crate::identity::{IdentityResolver, SessionController};
use crate::infrastructure::persistence::{
    PostgresActivityRepository, PostgresBioProfileRepository, PostgresFoodLogRepository,
    PostgresProfileRepository, PostgresProgressPhotoRepository,
};

/// 全部 Repository
#[derive(Clone)]
pub struct Repositories {
    pub profiles: Arc<dyn ProfileRepository>,
    pub bio_profiles: Arc<dyn BioProfileRepository>,
    pub activity: Arc<dyn ActivityRepository>,
    pub food_logs: Arc<dyn FoodLogRepository>,
    pub photos: Arc<dyn ProgressPhotoRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            profiles: Arc::new(PostgresProfileRepository::new(pool.clone())),
            bio_profiles: Arc::new(PostgresBioProfileRepository::new(pool.clone())),
            activity: Arc::new(PostgresActivityRepository::new(pool.clone())),
            food_logs: Arc::new(PostgresFoodLogRepository::new(pool.clone())),
            photos: Arc::new(PostgresProgressPhotoRepository::new(pool)),
        }
    }
}

/// 一个会话的服务集合
pub struct SessionServices {
    pub resolver: IdentityResolver,
    pub session: SessionController,
    pub profiles: ProfileService,
    pub bio_profiles: BioProfileService,
    pub activity: ActivityService,
    pub photos: ProgressPhotoService,
    pub food_logs: FoodLogService,
}

impl SessionServices {
    pub fn new(
        auth: Arc<dyn AuthSessionPort>,
        store: Arc<dyn ProfileStorePort>,
        storage: Arc<dyn ObjectStoragePort>,
        repos: Repositories,
        photo_bucket: Option<String>,
    ) -> Self {
        let resolver = IdentityResolver::new(auth.clone(), store);

        Self {
            session: SessionController::new(auth, resolver.clone()),
            profiles: ProfileService::new(resolver.clone(), repos.profiles),
            bio_profiles: BioProfileService::new(resolver.clone(), repos.bio_profiles.clone()),
            activity: ActivityService::new(resolver.clone(), repos.activity, repos.bio_profiles),
            photos: ProgressPhotoService::new(
                resolver.clone(),
                storage,
                repos.photos,
                photo_bucket,
            ),
            food_logs: FoodLogService::new(repos.food_logs),
            resolver,
        }
    }
}
