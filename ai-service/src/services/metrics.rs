use metrics::counter;

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Cache,
    Simulated,
    Model,
    Rejected,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Cache => "cache",
            AnswerSource::Simulated => "simulated",
            AnswerSource::Model => "model",
            AnswerSource::Rejected => "rejected",
        }
    }
}

pub fn record_answer(source: AnswerSource) {
    counter!("ai_questions_total", "source" => source.as_str()).increment(1);
}

pub fn record_failure() {
    counter!("ai_question_failures_total").increment(1);
}
