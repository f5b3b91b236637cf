use serde::Deserialize;

/// Raw `store_id`/`question` parameters as they arrive from the query string
/// or the request body. Either may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionParams {
    pub store_id: Option<String>,
    pub question: Option<String>,
}

impl QuestionParams {
    /// Fields present in `self` win over those in `fallback`.
    pub fn or(self, fallback: QuestionParams) -> QuestionParams {
        QuestionParams {
            store_id: self.store_id.or(fallback.store_id),
            question: self.question.or(fallback.question),
        }
    }

    /// Returns `None` unless both fields are non-blank.
    pub fn into_request(self) -> Option<QuestionRequest> {
        match (non_blank(self.store_id), non_blank(self.question)) {
            (Some(store_id), Some(question)) => Some(QuestionRequest { store_id, question }),
            _ => None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A validated question about one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub store_id: String,
    pub question: String,
}
