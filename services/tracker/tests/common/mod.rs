//! 集成测试共用的内存实现

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use fittrack_common::{SessionIdentity, UserId};
use fittrack_errors::{AppError, AppResult};
use fittrack_ports::{
    FoodRecognitionPort, NutritionFacts, NutritionSearchPort, ObjectStoragePort, ProfileStorePort,
    Recognition, RecognizedFood,
};
use fittrack_tracker::application::context::Repositories;
use fittrack_tracker::domain::entities::{
    BioProfile, FoodLog, Profile, ProgressPhoto, StepLog, WaterLog,
};
use fittrack_tracker::domain::repositories::{
    ActivityRepository, BioProfileRepository, FoodLogRepository, ProfileRepository,
    ProgressPhotoRepository,
};
use parking_lot::Mutex;
use uuid::Uuid;

/// 资料库：会话身份 -> 用户 ID
#[derive(Default)]
pub struct MemoryProfileStore {
    users: Mutex<HashMap<SessionIdentity, UserId>>,
    pub lookups: AtomicUsize,
}

impl MemoryProfileStore {
    pub fn with_user(session: &str, user: &str) -> Arc<Self> {
        let store = Self::default();
        store.insert(session, user);
        Arc::new(store)
    }

    pub fn insert(&self, session: &str, user: &str) {
        self.users
            .lock()
            .insert(SessionIdentity::from(session), UserId::from(user));
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStorePort for MemoryProfileStore {
    async fn lookup_internal_id(&self, session: &SessionIdentity) -> AppResult<Option<UserId>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self.users.lock().get(session).cloned())
    }

    async fn user_exists(&self, user_id: &UserId) -> AppResult<bool> {
        Ok(self.users.lock().values().any(|id| id == user_id))
    }
}

#[derive(Default)]
pub struct MemoryProfiles {
    pub rows: Mutex<HashMap<UserId, Profile>>,
}

#[async_trait]
impl ProfileRepository for MemoryProfiles {
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<Profile>> {
        Ok(self.rows.lock().get(id).cloned())
    }

    async fn update(&self, profile: &Profile) -> AppResult<()> {
        self.rows.lock().insert(profile.id.clone(), profile.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBioProfiles {
    rows: Mutex<HashMap<UserId, BioProfile>>,
}

#[async_trait]
impl BioProfileRepository for MemoryBioProfiles {
    async fn find_by_user(&self, user_id: &UserId) -> AppResult<Option<BioProfile>> {
        Ok(self.rows.lock().get(user_id).cloned())
    }

    async fn upsert(&self, profile: &BioProfile) -> AppResult<()> {
        self.rows
            .lock()
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }
}

/// 饮水/步数：读写之前让出调度，使并发请求真正交错
#[derive(Default)]
pub struct MemoryActivity {
    water: Mutex<HashMap<(UserId, NaiveDate), WaterLog>>,
    steps: Mutex<HashMap<(UserId, NaiveDate), StepLog>>,
    pub writes: AtomicUsize,
}

impl MemoryActivity {
    async fn update_water(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        apply: impl FnOnce(&mut WaterLog),
    ) -> WaterLog {
        tokio::task::yield_now().await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut water = self.water.lock();
        let log = water
            .entry((user_id.clone(), date))
            .or_insert_with(|| WaterLog::empty(user_id.clone(), date));
        apply(log);
        log.clone()
    }
}

#[async_trait]
impl ActivityRepository for MemoryActivity {
    async fn find_water(&self, user_id: &UserId, date: NaiveDate) -> AppResult<Option<WaterLog>> {
        tokio::task::yield_now().await;
        Ok(self.water.lock().get(&(user_id.clone(), date)).cloned())
    }

    async fn increment_water(&self, user_id: &UserId, date: NaiveDate) -> AppResult<WaterLog> {
        Ok(self.update_water(user_id, date, WaterLog::add_glass).await)
    }

    async fn decrement_water(&self, user_id: &UserId, date: NaiveDate) -> AppResult<WaterLog> {
        Ok(self.update_water(user_id, date, WaterLog::remove_glass).await)
    }

    async fn find_steps(&self, user_id: &UserId, date: NaiveDate) -> AppResult<Option<StepLog>> {
        tokio::task::yield_now().await;
        Ok(self.steps.lock().get(&(user_id.clone(), date)).cloned())
    }

    async fn record_steps_max(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        steps: u32,
    ) -> AppResult<StepLog> {
        tokio::task::yield_now().await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.steps.lock();
        let log = rows
            .entry((user_id.clone(), date))
            .or_insert_with(|| StepLog::empty(user_id.clone(), date));
        log.record(steps);
        Ok(log.clone())
    }
}

#[derive(Default)]
pub struct MemoryFoodLogs {
    pub rows: Mutex<Vec<FoodLog>>,
    pub reject_creates: AtomicBool,
}

#[async_trait]
impl FoodLogRepository for MemoryFoodLogs {
    async fn create(&self, log: &FoodLog) -> AppResult<()> {
        if self.reject_creates.load(Ordering::SeqCst) {
            return Err(AppError::database("food_logs unavailable"));
        }
        self.rows.lock().push(log.clone());
        Ok(())
    }

    async fn list(
        &self,
        user_id: &UserId,
        date: Option<NaiveDate>,
        limit: u32,
    ) -> AppResult<Vec<FoodLog>> {
        let mut logs: Vec<FoodLog> = self
            .rows
            .lock()
            .iter()
            .filter(|log| &log.user_id == user_id)
            .filter(|log| date.is_none_or(|d| log.logged_date == d))
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        logs.truncate(limit as usize);
        Ok(logs)
    }

    async fn find_by_date(&self, user_id: &UserId, date: NaiveDate) -> AppResult<Vec<FoodLog>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|log| &log.user_id == user_id && log.logged_date == date)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FoodLog>> {
        Ok(self.rows.lock().iter().find(|log| log.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|log| log.id != id);
        Ok(rows.len() != before)
    }
}

/// 照片元数据；`reject_saves` 置位后写入返回数据库错误
#[derive(Default)]
pub struct MemoryPhotos {
    rows: Mutex<Vec<ProgressPhoto>>,
    pub reject_saves: AtomicBool,
}

#[async_trait]
impl ProgressPhotoRepository for MemoryPhotos {
    async fn save(&self, photo: &ProgressPhoto) -> AppResult<()> {
        if self.reject_saves.load(Ordering::SeqCst) {
            return Err(AppError::database("progress_photos unavailable"));
        }
        self.rows.lock().push(photo.clone());
        Ok(())
    }

    async fn list_by_user(&self, user_id: &UserId) -> AppResult<Vec<ProgressPhoto>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|photo| &photo.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProgressPhoto>> {
        Ok(self.rows.lock().iter().find(|photo| photo.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows.lock().retain(|photo| photo.id != id);
        Ok(())
    }
}

/// 对象存储：记录上传的对象及其内容类型
#[derive(Default)]
pub struct MemoryStorage {
    pub objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    pub reject_removals: AtomicBool,
}

#[async_trait]
impl ObjectStoragePort for MemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<()> {
        self.objects.lock().insert(
            format!("{}/{}", bucket, path),
            (bytes, content_type.to_string()),
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("https://storage.test/{}/{}", bucket, path)
    }

    async fn remove(&self, bucket: &str, path: &str) -> AppResult<()> {
        if self.reject_removals.load(Ordering::SeqCst) {
            return Err(AppError::internal("storage offline"));
        }
        self.objects.lock().remove(&format!("{}/{}", bucket, path));
        Ok(())
    }
}

/// 固定食物表的营养数据库，按名称包含匹配
#[derive(Default)]
pub struct MemoryNutrition {
    foods: Vec<(u64, NutritionFacts)>,
}

impl MemoryNutrition {
    pub fn with_foods() -> Arc<Self> {
        let fact = |name: &str, calories: f64, protein: f64| NutritionFacts {
            food_name: name.to_string(),
            serving_size: Some("100g".to_string()),
            calories,
            protein,
            carbs: 0.0,
            fat: 3.6,
            source: "usda".to_string(),
        };
        Arc::new(Self {
            foods: vec![
                (171077, fact("Chicken, breast, roasted", 165.0, 31.0)),
                (171078, fact("Chicken, thigh, roasted", 209.0, 26.0)),
                (175167, fact("Salmon, Atlantic, cooked", 206.0, 22.0)),
            ],
        })
    }
}

#[async_trait]
impl NutritionSearchPort for MemoryNutrition {
    async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<NutritionFacts>> {
        let query = query.to_lowercase();
        Ok(self
            .foods
            .iter()
            .filter(|(_, facts)| facts.food_name.to_lowercase().contains(&query))
            .take(limit as usize)
            .map(|(_, facts)| facts.clone())
            .collect())
    }

    async fn details(&self, food_id: u64) -> AppResult<Option<NutritionFacts>> {
        Ok(self
            .foods
            .iter()
            .find(|(id, _)| *id == food_id)
            .map(|(_, facts)| facts.clone()))
    }
}

/// 总是识别出同一份早餐
#[derive(Default)]
pub struct StubRecognizer {
    pub images: Mutex<Vec<(usize, String)>>,
    pub descriptions: Mutex<Vec<String>>,
}

impl StubRecognizer {
    fn breakfast() -> Recognition {
        let food = |name: &str, calories: f64, protein: f64, confidence: f64| RecognizedFood {
            food_name: name.to_string(),
            serving_size: None,
            calories,
            protein,
            carbs: 20.0,
            fat: 10.0,
            confidence,
        };
        Recognition {
            food_items: vec![
                food("Scrambled eggs", 180.0, 12.0, 90.0),
                food("Toast", 160.0, 5.0, 80.0),
            ],
            ai_confidence: 85.0,
        }
    }
}

#[async_trait]
impl FoodRecognitionPort for StubRecognizer {
    async fn analyze_image(&self, image: &[u8], mime_type: &str) -> AppResult<Recognition> {
        self.images.lock().push((image.len(), mime_type.to_string()));
        Ok(Self::breakfast())
    }

    async fn analyze_text(&self, description: &str) -> AppResult<Recognition> {
        self.descriptions.lock().push(description.to_string());
        Ok(Self::breakfast())
    }
}

/// 全部使用内存实现的 Repository，保留具体类型以便断言
pub struct MemoryRepos {
    pub profiles: Arc<MemoryProfiles>,
    pub bio_profiles: Arc<MemoryBioProfiles>,
    pub activity: Arc<MemoryActivity>,
    pub food_logs: Arc<MemoryFoodLogs>,
    pub photos: Arc<MemoryPhotos>,
}

impl MemoryRepos {
    pub fn new() -> Self {
        Self {
            profiles: Arc::default(),
            bio_profiles: Arc::default(),
            activity: Arc::default(),
            food_logs: Arc::default(),
            photos: Arc::default(),
        }
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            profiles: self.profiles.clone(),
            bio_profiles: self.bio_profiles.clone(),
            activity: self.activity.clone(),
            food_logs: self.food_logs.clone(),
            photos: self.photos.clone(),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
