use std::time::Instant;

use thiserror::Error;

use crate::api::models::{AskRequest, AskResponse};
use crate::models::AnswerResult;

#[derive(Debug, Error)]
pub enum AskError {
    #[error("answer service unreachable: {0}")]
    Request(#[source] reqwest::Error),
    #[error("malformed answer payload: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Thin client for the answer service. One POST per question, no retry, no
/// timeout beyond what the transport enforces.
pub struct AskClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AskClient {
    pub fn new(endpoint: impl Into<String>) -> AskClient {
        AskClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts a question and returns a render-ready answer. Error statuses
    /// whose bodies still decode are returned as answers; the service reports
    /// degraded results that way, with a sentinel page label. The service's
    /// own latency figure wins over the round-trip measured here.
    pub async fn ask(&self, question: &str) -> Result<AnswerResult, AskError> {
        let start = Instant::now();

        let response = self
            .http
            .post(&self.endpoint)
            .form(&AskRequest {
                question: question.to_string(),
            })
            .send()
            .await
            .map_err(AskError::Request)?;

        let payload: AskResponse = response.json().await.map_err(AskError::Decode)?;
        let elapsed_ms = start.elapsed().as_millis();

        log::debug!(
            "answer received: page {}, score {}, {} chars",
            payload.page,
            payload.score,
            payload.answer.len()
        );

        Ok(AnswerResult {
            query: question.to_string(),
            answer: payload.answer,
            page: payload.page,
            score: payload.score,
            latency: payload
                .latency
                .unwrap_or_else(|| format!("{elapsed_ms} ms")),
        })
    }
}
