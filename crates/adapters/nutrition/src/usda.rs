//! USDA FoodData Central 客户端

use std::time::Duration;

use async_trait::async_trait;
use fittrack_errors::{AppError, AppResult};
use fittrack_ports::{NutritionFacts, NutritionSearchPort};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use tracing::{debug, warn};

/// 搜索时包含的数据集
const SEARCH_DATA_TYPES: &str = "Survey (FNDDS),Foundation,SR Legacy";

const SOURCE: &str = "usda";

/// USDA 客户端配置
#[derive(Debug, Clone)]
pub struct UsdaConfig {
    pub base_url: String,
    pub api_key: Option<Secret<String>>,
    pub timeout: Duration,
}

impl UsdaConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<Secret<String>>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct UsdaClient {
    client: Client,
    config: UsdaConfig,
}

impl UsdaClient {
    pub fn new(config: UsdaConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build USDA client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    warn!(error = %e, "USDA request failed");
    AppError::external_service(format!("USDA request failed: {}", e))
}

#[async_trait]
impl NutritionSearchPort for UsdaClient {
    async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<NutritionFacts>> {
        let Some(api_key) = &self.config.api_key else {
            debug!("USDA API key not configured, returning no results");
            return Ok(Vec::new());
        };

        let page_size = limit.to_string();
        let response = self
            .client
            .get(self.url("foods/search"))
            .query(&[
                ("api_key", api_key.expose_secret().as_str()),
                ("query", query),
                ("pageSize", page_size.as_str()),
                ("dataType", SEARCH_DATA_TYPES),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "USDA search returned an error status");
            return Ok(Vec::new());
        }

        let body: SearchResponse = response.json().await.map_err(transport_error)?;
        Ok(body.into_facts(query))
    }

    async fn details(&self, food_id: u64) -> AppResult<Option<NutritionFacts>> {
        let Some(api_key) = &self.config.api_key else {
            debug!("USDA API key not configured, returning no details");
            return Ok(None);
        };

        let response = self
            .client
            .get(self.url(&format!("food/{}", food_id)))
            .query(&[("api_key", api_key.expose_secret().as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Ok(None),
            status => {
                warn!(%status, food_id, "USDA details returned an error status");
                return Ok(None);
            }
        }

        let body: DetailResponse = response.json().await.map_err(transport_error)?;
        Ok(Some(body.into_facts()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchFood {
    description: Option<String>,
    serving_size: Option<f64>,
    serving_size_unit: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<SearchNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNutrient {
    #[serde(default)]
    nutrient_name: String,
    unit_name: Option<String>,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailResponse {
    description: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<DetailNutrient>,
}

#[derive(Debug, Deserialize)]
struct DetailNutrient {
    #[serde(default)]
    nutrient: DetailNutrientInfo,
    amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailNutrientInfo {
    #[serde(default)]
    name: String,
    unit_name: Option<String>,
}

/// 一条食物的营养素表，缺失的营养素按 0 处理
#[derive(Debug, Default)]
struct Nutrients {
    calories: Option<f64>,
    kilojoules: Option<f64>,
    protein: f64,
    carbs: f64,
    fat: f64,
}

impl Nutrients {
    fn collect<'a>(rows: impl Iterator<Item = (&'a str, Option<&'a str>, f64)>) -> Self {
        let mut nutrients = Self::default();
        for (name, unit, value) in rows {
            match name {
                "Energy" if unit.is_some_and(|u| u.eq_ignore_ascii_case("kj")) => {
                    nutrients.kilojoules.get_or_insert(value);
                }
                "Energy" => {
                    nutrients.calories.get_or_insert(value);
                }
                "Protein" => nutrients.protein = value,
                "Carbohydrate, by difference" => nutrients.carbs = value,
                "Total lipid (fat)" => nutrients.fat = value,
                _ => {}
            }
        }
        nutrients
    }

    /// 能量优先取千卡，只有千焦时换算
    fn calories(&self) -> f64 {
        self.calories
            .or(self.kilojoules.map(|kj| (kj / 4.184 * 10.0).round() / 10.0))
            .unwrap_or(0.0)
    }

    fn into_facts(self, food_name: String, serving_size: Option<String>) -> NutritionFacts {
        NutritionFacts {
            food_name,
            serving_size,
            calories: self.calories(),
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            source: SOURCE.to_string(),
        }
    }
}

impl SearchResponse {
    fn into_facts(self, query: &str) -> Vec<NutritionFacts> {
        self.foods
            .into_iter()
            .map(|food| {
                let serving = food.serving_size.map(|size| {
                    format!("{}{}", size, food.serving_size_unit.as_deref().unwrap_or("g"))
                });
                let nutrients = Nutrients::collect(food.food_nutrients.iter().map(|n| {
                    (n.nutrient_name.as_str(), n.unit_name.as_deref(), n.value.unwrap_or(0.0))
                }));
                nutrients.into_facts(food.description.unwrap_or_else(|| query.to_string()), serving)
            })
            .collect()
    }
}

impl DetailResponse {
    fn into_facts(self) -> NutritionFacts {
        let nutrients = Nutrients::collect(self.food_nutrients.iter().map(|n| {
            (
                n.nutrient.name.as_str(),
                n.nutrient.unit_name.as_deref(),
                n.amount.unwrap_or(0.0),
            )
        }));
        nutrients.into_facts(
            self.description.unwrap_or_else(|| "Unknown".to_string()),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "totalHits": 2,
        "foods": [
            {
                "fdcId": 171077,
                "description": "Chicken, breast, roasted",
                "servingSize": 100.0,
                "servingSizeUnit": "g",
                "foodNutrients": [
                    { "nutrientName": "Energy", "unitName": "KJ", "value": 690.0 },
                    { "nutrientName": "Energy", "unitName": "KCAL", "value": 165.0 },
                    { "nutrientName": "Protein", "unitName": "G", "value": 31.0 },
                    { "nutrientName": "Total lipid (fat)", "unitName": "G", "value": 3.6 },
                    { "nutrientName": "Carbohydrate, by difference", "unitName": "G", "value": 0.0 }
                ]
            },
            {
                "fdcId": 999,
                "foodNutrients": [
                    { "nutrientName": "Protein", "unitName": "G" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_search_response_maps_macros() {
        let body: SearchResponse = serde_json::from_str(SEARCH_BODY).unwrap();
        let facts = body.into_facts("chicken");

        assert_eq!(facts.len(), 2);
        let chicken = &facts[0];
        assert_eq!(chicken.food_name, "Chicken, breast, roasted");
        assert_eq!(chicken.serving_size.as_deref(), Some("100g"));
        assert_eq!(chicken.calories, 165.0);
        assert_eq!(chicken.protein, 31.0);
        assert_eq!(chicken.fat, 3.6);
        assert_eq!(chicken.source, "usda");
    }

    #[test]
    fn test_search_food_without_description_uses_query() {
        let body: SearchResponse = serde_json::from_str(SEARCH_BODY).unwrap();
        let facts = body.into_facts("chicken");

        assert_eq!(facts[1].food_name, "chicken");
        assert_eq!(facts[1].serving_size, None);
        assert_eq!(facts[1].calories, 0.0);
        assert_eq!(facts[1].protein, 0.0);
    }

    #[test]
    fn test_detail_response_reads_nested_nutrients() {
        let body: DetailResponse = serde_json::from_str(
            r#"{
                "description": "Rice, white, cooked",
                "foodNutrients": [
                    { "nutrient": { "name": "Energy", "unitName": "kJ" }, "amount": 544.0 },
                    { "nutrient": { "name": "Carbohydrate, by difference", "unitName": "g" }, "amount": 28.2 },
                    { "nutrient": { "name": "Protein", "unitName": "g" }, "amount": 2.7 },
                    { "amount": 1.0 }
                ]
            }"#,
        )
        .unwrap();
        let facts = body.into_facts();

        assert_eq!(facts.food_name, "Rice, white, cooked");
        assert_eq!(facts.calories, 130.0);
        assert_eq!(facts.carbs, 28.2);
        assert_eq!(facts.protein, 2.7);
        assert_eq!(facts.fat, 0.0);
    }

    #[tokio::test]
    async fn test_missing_api_key_returns_nothing() {
        let client = UsdaClient::new(UsdaConfig::new("http://127.0.0.1:9", None)).unwrap();
        assert!(!client.is_configured());
        assert!(client.search("apple", 5).await.unwrap().is_empty());
        assert_eq!(client.details(171077).await.unwrap(), None);
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = UsdaClient::new(UsdaConfig::new("https://fdc.test/v1/", None)).unwrap();
        assert_eq!(client.url("foods/search"), "https://fdc.test/v1/foods/search");
    }
}
