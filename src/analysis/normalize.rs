use serde::Deserialize;
use serde_json::json;
use tracing::warn;

const FALLBACK_FOOD_NAME: &str = "Unknown food";
const FALLBACK_CALORIES: f64 = 200.0;
const FALLBACK_CONFIDENCE_ERROR: f64 = 0.2;
const FALLBACK_CONFIDENCE_UNPARSEABLE: f64 = 0.3;
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Canonical result of a food analysis, ready to persist as an entry.
#[derive(Debug, Clone)]
pub struct NormalizedAnalysis {
    pub food_name: String,
    pub calories: f64,
    pub confidence: f64,
    /// Raw analysis payload kept for audit, opaque to the aggregators.
    pub detail: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    food_items: Vec<RawFoodItem>,
    total_calories: Option<f64>,
    analysis_confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawFoodItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    calories: f64,
}

/// Convert the analyzer outcome into a canonical record. Total: a provider
/// error maps to the low-confidence fallback, an unparseable response to a
/// slightly-less-low one, so entry creation never fails on analyzer
/// unreliability.
pub fn normalize(outcome: anyhow::Result<String>) -> NormalizedAnalysis {
    let text = match outcome {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "analyzer call failed, using fallback");
            return fallback(
                FALLBACK_CONFIDENCE_ERROR,
                format!("Error occurred: {}", e),
            );
        }
    };

    let Some(value) = extract_json(&text) else {
        warn!("analyzer response not parseable as JSON, using fallback");
        return fallback(
            FALLBACK_CONFIDENCE_UNPARSEABLE,
            format!("Analysis text: {}", text),
        );
    };

    let raw: RawAnalysis = match serde_json::from_value(value.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "analyzer JSON has unexpected shape, using fallback");
            return fallback(
                FALLBACK_CONFIDENCE_UNPARSEABLE,
                format!("Analysis text: {}", text),
            );
        }
    };

    let food_name = raw
        .food_items
        .iter()
        .map(|i| i.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    // Trust the provider total; sum the items only when it is absent.
    let calories = raw
        .total_calories
        .unwrap_or_else(|| raw.food_items.iter().map(|i| i.calories).sum());
    let confidence = raw
        .analysis_confidence
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    NormalizedAnalysis {
        food_name,
        calories,
        confidence,
        detail: value,
    }
}

fn fallback(confidence: f64, notes: String) -> NormalizedAnalysis {
    let detail = json!({
        "food_items": [
            {"name": FALLBACK_FOOD_NAME, "portion_size": "1 serving",
             "calories": FALLBACK_CALORIES, "confidence": confidence}
        ],
        "total_calories": FALLBACK_CALORIES,
        "analysis_confidence": confidence,
        "notes": notes,
    });
    NormalizedAnalysis {
        food_name: FALLBACK_FOOD_NAME.to_string(),
        calories: FALLBACK_CALORIES,
        confidence,
        detail,
    }
}

/// Pull a JSON object out of a model response that may wrap it in markdown
/// fences or surrounding prose.
fn extract_json(text: &str) -> Option<serde_json::Value> {
    let candidate = if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        match rest.find("```") {
            Some(end) => rest[..end].trim(),
            None => rest.trim(),
        }
    } else {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end < start {
            return None;
        }
        text[start..=end].trim()
    };
    serde_json::from_str(candidate).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> String {
        json!({
            "food_items": [
                {"name": "Grilled chicken", "portion_size": "150g", "calories": 250.0, "confidence": 0.9},
                {"name": "Rice", "portion_size": "1 cup", "calories": 200.0, "confidence": 0.85}
            ],
            "total_calories": 450.0,
            "analysis_confidence": 0.85,
            "notes": "well lit photo"
        })
        .to_string()
    }

    #[test]
    fn parses_clean_json() {
        let n = normalize(Ok(sample_response()));
        assert_eq!(n.food_name, "Grilled chicken, Rice");
        assert_eq!(n.calories, 450.0);
        assert_eq!(n.confidence, 0.85);
        assert_eq!(n.detail["notes"], "well lit photo");
    }

    #[test]
    fn parses_markdown_fenced_json() {
        let text = format!("Here is the analysis:\n```json\n{}\n```\nEnjoy!", sample_response());
        let n = normalize(Ok(text));
        assert_eq!(n.food_name, "Grilled chicken, Rice");
        assert_eq!(n.calories, 450.0);
    }

    #[test]
    fn parses_json_embedded_in_prose() {
        let text = format!("Sure! {} Hope this helps.", sample_response());
        let n = normalize(Ok(text));
        assert_eq!(n.calories, 450.0);
    }

    #[test]
    fn sums_items_when_total_absent() {
        let text = json!({
            "food_items": [
                {"name": "Apple", "calories": 95.0},
                {"name": "Banana", "calories": 105.0}
            ],
            "analysis_confidence": 0.7
        })
        .to_string();
        let n = normalize(Ok(text));
        assert_eq!(n.calories, 200.0);
        assert_eq!(n.food_name, "Apple, Banana");
    }

    #[test]
    fn missing_confidence_defaults() {
        let text = json!({
            "food_items": [{"name": "Toast", "calories": 120.0}],
            "total_calories": 120.0
        })
        .to_string();
        let n = normalize(Ok(text));
        assert_eq!(n.confidence, 0.5);
    }

    #[test]
    fn confidence_is_clamped() {
        let text = json!({
            "food_items": [{"name": "Soup", "calories": 80.0}],
            "total_calories": 80.0,
            "analysis_confidence": 1.7
        })
        .to_string();
        let n = normalize(Ok(text));
        assert_eq!(n.confidence, 1.0);
    }

    #[test]
    fn garbage_text_falls_back_unparseable() {
        let n = normalize(Ok("I cannot identify any food in this image.".into()));
        assert_eq!(n.food_name, "Unknown food");
        assert_eq!(n.calories, 200.0);
        assert_eq!(n.confidence, 0.3);
        assert!(n.detail["notes"]
            .as_str()
            .unwrap()
            .starts_with("Analysis text:"));
    }

    #[test]
    fn provider_error_falls_back_lower_confidence() {
        let n = normalize(Err(anyhow::anyhow!("request timed out")));
        assert_eq!(n.food_name, "Unknown food");
        assert_eq!(n.calories, 200.0);
        assert_eq!(n.confidence, 0.2);
        assert!(n.detail["notes"]
            .as_str()
            .unwrap()
            .contains("request timed out"));
    }
}
