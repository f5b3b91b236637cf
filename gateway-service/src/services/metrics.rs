use metrics::counter;

/// How an inbound question ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOutcome {
    Answered,
    Invalid,
    CredentialError,
    TransportError,
    DownstreamError,
    MalformedResponse,
}

impl QuestionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionOutcome::Answered => "answered",
            QuestionOutcome::Invalid => "invalid",
            QuestionOutcome::CredentialError => "credential_error",
            QuestionOutcome::TransportError => "transport_error",
            QuestionOutcome::DownstreamError => "downstream_error",
            QuestionOutcome::MalformedResponse => "malformed_response",
        }
    }
}

pub fn record_question(outcome: QuestionOutcome) {
    counter!("gateway_questions_total", "outcome" => outcome.as_str()).increment(1);
}
