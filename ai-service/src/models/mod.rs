use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Body of `POST /process`, as sent by the gateway.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProcessRequest {
    #[validate(length(min = 1, message = "store_id must not be empty"))]
    pub store_id: String,

    #[validate(length(min = 1, message = "question must not be empty"))]
    pub question: String,

    #[validate(length(min = 1, message = "access_token must not be empty"))]
    pub access_token: String,
}

/// Serialized lowercase; parsed case-insensitively since models are loose
/// about capitalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(serde::de::Error::unknown_variant(
                &raw,
                &["low", "medium", "high"],
            )),
        }
    }
}

/// The answer returned to the merchant.
///
/// Keys a model adds beyond `answer` and `confidence` are kept in `extra`
/// and returned as they came.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub answer: String,
    pub confidence: Confidence,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Insight {
    pub fn new(answer: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            answer: answer.into(),
            confidence,
            extra: Map::new(),
        }
    }
}
