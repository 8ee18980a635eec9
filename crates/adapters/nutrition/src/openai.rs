//! OpenAI 兼容接口的食物识别
//!
//! 图片以 data URL 发送，模型按固定 JSON 结构返回食物条目和置信度。

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fittrack_errors::{AppError, AppResult};
use fittrack_ports::{FoodRecognitionPort, Recognition, RecognizedFood};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = r#"You are a professional nutritionist AI. When given a photo or description of food:

1. Identify EVERY food item
2. Estimate the serving size for each item
3. Provide calorie and macronutrient estimates (protein, carbs, fat) in grams
4. Rate your overall confidence from 0-100

Be practical and realistic with portions. If a food item is partially hidden or unclear,
make your best estimate and lower the confidence score.

Respond ONLY with valid JSON in this exact format, no other text:
{
  "food_items": [
    {
      "food_name": "food name here",
      "serving_size": "estimated serving size",
      "calories": 0,
      "protein": 0,
      "carbs": 0,
      "fat": 0,
      "confidence": 85
    }
  ],
  "overall_confidence": 85
}"#;

const MAX_TOKENS: u32 = 1500;
const TEMPERATURE: f64 = 0.2;

/// 未给出置信度时的默认值
const DEFAULT_CONFIDENCE: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: Option<Secret<String>>,
    pub model: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<Secret<String>>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct OpenAiRecognizer {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiRecognizer {
    pub fn new(config: OpenAiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build recognition client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn complete(&self, user_content: Value) -> AppResult<Recognition> {
        let Some(api_key) = &self.config.api_key else {
            return Err(AppError::external_service("Food recognition is not configured"));
        };

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_content },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Recognition request failed");
                AppError::external_service(format!("AI analysis failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Recognition service returned an error status");
            return Err(AppError::external_service(format!(
                "AI analysis failed with status {}",
                status
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Invalid AI response: {}", e)))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let recognition = parse_recognition(&content);
        debug!(
            items = recognition.food_items.len(),
            confidence = recognition.ai_confidence,
            "Food recognized"
        );
        Ok(recognition)
    }
}

#[async_trait]
impl FoodRecognitionPort for OpenAiRecognizer {
    async fn analyze_image(&self, image: &[u8], mime_type: &str) -> AppResult<Recognition> {
        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(image));
        self.complete(json!([
            {
                "type": "text",
                "text": "Analyze this food photo. Identify all food items and estimate their nutritional content.",
            },
            {
                "type": "image_url",
                "image_url": { "url": data_url, "detail": "high" },
            },
        ]))
        .await
    }

    async fn analyze_text(&self, description: &str) -> AppResult<Recognition> {
        self.complete(Value::String(format!(
            "Estimate the nutritional content of this meal: {}",
            description
        )))
        .await
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// 解析模型输出
///
/// 允许 markdown 代码块包裹或 JSON 前后夹杂文字；完全无法解析时返回空结果、置信度 0。
pub fn parse_recognition(raw: &str) -> Recognition {
    let Some(data) = extract_json(raw) else {
        warn!("Could not parse recognition output as JSON");
        return Recognition {
            food_items: Vec::new(),
            ai_confidence: 0.0,
        };
    };

    let food_items = data
        .get("food_items")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(recognized_food).collect())
        .unwrap_or_default();

    Recognition {
        food_items,
        ai_confidence: number(data.get("overall_confidence"), DEFAULT_CONFIDENCE),
    }
}

fn extract_json(raw: &str) -> Option<Value> {
    let cleaned = strip_code_fence(raw.trim());
    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Some(value);
    }

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&cleaned[start..=end]).ok()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn recognized_food(item: &Value) -> RecognizedFood {
    RecognizedFood {
        food_name: item
            .get("food_name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        serving_size: item
            .get("serving_size")
            .and_then(Value::as_str)
            .map(str::to_string),
        calories: number(item.get("calories"), 0.0),
        protein: number(item.get("protein"), 0.0),
        carbs: number(item.get("carbs"), 0.0),
        fat: number(item.get("fat"), 0.0),
        confidence: number(item.get("confidence"), DEFAULT_CONFIDENCE),
    }
}

/// 数字或数字字符串
fn number(value: Option<&Value>, default: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}
