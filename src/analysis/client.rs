use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::config::AnalyzerConfig;

const SYSTEM_PROMPT: &str = r#"You are a nutrition expert. Analyze the food image and respond with JSON of the following structure:
{
    "food_items": [
        {"name": "food name", "portion_size": "estimated portion size", "calories": number, "confidence": number (0.0 to 1.0)}
    ],
    "total_calories": number,
    "analysis_confidence": number (0.0 to 1.0),
    "notes": "any additional observations"
}
Be as accurate as possible with calorie estimates. If you are unsure about a food item, indicate lower confidence. Consider portion sizes carefully."#;

/// Contract for the external food-image analysis provider. Implementations
/// return the raw response text; interpretation and fallback policy live in
/// `normalize`, so a failing or slow provider can never break entry creation.
#[async_trait]
pub trait FoodAnalyzer: Send + Sync {
    async fn analyze(&self, image_base64: &str) -> anyhow::Result<String>;
}

/// OpenAI-compatible chat-completions client with vision input.
pub struct VisionAnalyzer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl VisionAnalyzer {
    pub fn new(cfg: &AnalyzerConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build analyzer http client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl FoodAnalyzer for VisionAnalyzer {
    async fn analyze(&self, image_base64: &str) -> anyhow::Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": [
                    {"type": "text", "text": "Please analyze this food image and provide detailed nutritional information in the requested JSON format."},
                    {"type": "image_url", "image_url": {
                        "url": format!("data:image/jpeg;base64,{}", image_base64)
                    }}
                ]}
            ],
            "max_tokens": 800
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("analyzer request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("analyzer returned {}: {}", status, text);
        }

        let payload: serde_json::Value = resp.json().await.context("analyzer response body")?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .context("analyzer response missing message content")?;
        debug!(model = %self.model, chars = content.len(), "analyzer response received");
        Ok(content.to_string())
    }
}
