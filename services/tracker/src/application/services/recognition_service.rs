//! AI 食物识别服务
//!
//! 识别结果总是返回给调用方；请求保存时写入一条 AI 来源的饮食日志，
//! 保存失败只记录日志，不影响识别结果。

use std::sync::Arc;

use chrono::NaiveDate;
use fittrack_common::UserId;
use fittrack_errors::{AppError, AppResult};
use fittrack_ports::{FoodRecognitionPort, ObjectStoragePort, Recognition};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{FoodItem, FoodLog, MealType, NutritionTotals};
use crate::domain::repositories::FoodLogRepository;

/// 图片上限 10 MiB
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const SUPPORTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// 识别结果写入哪个用户的哪一餐
#[derive(Debug, Clone)]
pub struct SaveTarget {
    pub user_id: UserId,
    pub meal_type: MealType,
    pub logged_date: NaiveDate,
}

/// 识别结果
#[derive(Debug, Clone, Serialize)]
pub struct RecognizedMeal {
    pub food_items: Vec<FoodItem>,
    #[serde(flatten)]
    pub totals: NutritionTotals,
    pub ai_confidence: f64,
    /// 已保存的日志 ID
    pub saved_log_id: Option<Uuid>,
}

impl From<Recognition> for RecognizedMeal {
    fn from(recognition: Recognition) -> Self {
        let food_items: Vec<FoodItem> = recognition
            .food_items
            .into_iter()
            .map(|food| FoodItem {
                food_name: food.food_name,
                serving_size: food.serving_size,
                nutrition: NutritionTotals {
                    calories: food.calories,
                    protein: food.protein,
                    carbs: food.carbs,
                    fat: food.fat,
                },
            })
            .collect();
        let mut totals = NutritionTotals::default();
        for item in &food_items {
            totals.add(&item.nutrition);
        }

        Self {
            food_items,
            totals,
            ai_confidence: recognition.ai_confidence,
            saved_log_id: None,
        }
    }
}

struct UploadedImage<'a> {
    bytes: Vec<u8>,
    content_type: &'a str,
}

pub struct RecognitionService {
    recognizer: Arc<dyn FoodRecognitionPort>,
    logs: Arc<dyn FoodLogRepository>,
    storage: Arc<dyn ObjectStoragePort>,
    bucket: Option<String>,
}

impl RecognitionService {
    pub fn new(
        recognizer: Arc<dyn FoodRecognitionPort>,
        logs: Arc<dyn FoodLogRepository>,
        storage: Arc<dyn ObjectStoragePort>,
        bucket: Option<String>,
    ) -> Self {
        Self {
            recognizer,
            logs,
            storage,
            bucket,
        }
    }

    /// 识别食物照片
    pub async fn recognize_image(
        &self,
        image: Vec<u8>,
        content_type: &str,
        save: Option<SaveTarget>,
    ) -> AppResult<RecognizedMeal> {
        if !SUPPORTED_IMAGE_TYPES.contains(&content_type) {
            return Err(AppError::validation(
                "Only JPEG, PNG, and WebP images are supported",
            ));
        }
        if image.is_empty() {
            return Err(AppError::validation("Image is empty"));
        }
        if image.len() > MAX_IMAGE_BYTES {
            return Err(AppError::validation("Image too large (max 10MB)"));
        }

        let recognition = self.recognizer.analyze_image(&image, content_type).await?;
        let mut meal = RecognizedMeal::from(recognition);

        if let Some(target) = save {
            let upload = UploadedImage {
                bytes: image,
                content_type,
            };
            meal.saved_log_id = self.try_save(&meal, target, None, Some(upload)).await;
        }
        Ok(meal)
    }

    /// 根据文字描述估算
    pub async fn recognize_text(
        &self,
        description: &str,
        save: Option<SaveTarget>,
    ) -> AppResult<RecognizedMeal> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::validation("Description cannot be empty"));
        }

        let recognition = self.recognizer.analyze_text(description).await?;
        let mut meal = RecognizedMeal::from(recognition);

        if let Some(target) = save {
            let notes = Some(format!("Text entry: {}", description));
            meal.saved_log_id = self.try_save(&meal, target, notes, None).await;
        }
        Ok(meal)
    }

    async fn try_save(
        &self,
        meal: &RecognizedMeal,
        target: SaveTarget,
        notes: Option<String>,
        image: Option<UploadedImage<'_>>,
    ) -> Option<Uuid> {
        let user_id = target.user_id.clone();
        match self.save(meal, target, notes, image).await {
            Ok(log_id) => {
                info!(user_id = %user_id, log_id = %log_id, "Recognized meal saved");
                Some(log_id)
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to save recognized meal");
                None
            }
        }
    }

    async fn save(
        &self,
        meal: &RecognizedMeal,
        target: SaveTarget,
        notes: Option<String>,
        image: Option<UploadedImage<'_>>,
    ) -> AppResult<Uuid> {
        let stored = match (self.bucket.as_deref(), image) {
            (Some(bucket), Some(image)) => {
                let path = format!(
                    "{}/{}.{}",
                    target.user_id,
                    fittrack_common::new_id(),
                    extension(image.content_type)
                );
                self.storage
                    .upload(bucket, &path, image.bytes, image.content_type)
                    .await?;
                Some((bucket, path))
            }
            _ => None,
        };

        let log = FoodLog::recognized(
            target.user_id,
            target.meal_type,
            target.logged_date,
            notes,
            meal.food_items.clone(),
            meal.ai_confidence,
            stored
                .as_ref()
                .map(|(bucket, path)| self.storage.public_url(bucket, path)),
        );

        if let Err(e) = self.logs.create(&log).await {
            if let Some((bucket, path)) = &stored {
                if let Err(remove_err) = self.storage.remove(bucket, path).await {
                    warn!(error = %remove_err, path = %path, "Failed to remove orphaned food image");
                }
            }
            return Err(e);
        }
        Ok(log.id)
    }
}

fn extension(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}
