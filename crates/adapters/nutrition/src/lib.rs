//! fittrack-adapter-nutrition - 外部营养数据与食物识别服务适配器
//!
//! - `UsdaClient`: USDA FoodData Central 营养数据库
//! - `OpenAiRecognizer`: OpenAI 兼容 chat completions 接口的食物识别

mod openai;
mod usda;

pub use openai::*;
pub use usda::*;
