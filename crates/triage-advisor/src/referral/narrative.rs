//! Optional prose explanation of an already computed case.
//!
//! The generator only ever sees engine output. It cannot change scores, flags or
//! triage, and any failure degrades to [`FALLBACK_EXPLANATION`].

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::NarrativeConfig;

use super::envelope::CaseResult;

pub const FALLBACK_EXPLANATION: &str =
    "Narrative explanation unavailable. Refer to the structured rationale and next steps.";

const SYSTEM_PROMPT: &str = "You explain genetics referral triage results to clinicians. \
Use only the structured data provided. Do not change the score, the triage category or the \
indicators, do not add diagnoses, and keep the answer under 150 words.";

/// Turns a finished case into prose.
pub trait NarrativeGenerator: Send + Sync {
    fn explain(
        &self,
        case: &CaseResult,
    ) -> impl Future<Output = Result<String, NarrativeError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative generation is disabled")]
    Disabled,
    #[error("narrative provider quota exceeded")]
    QuotaExceeded,
    #[error("narrative provider returned {status}")]
    Upstream { status: u16 },
    #[error("narrative provider returned no text")]
    EmptyResponse,
    #[error("narrative request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Outcome of the narrative step as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeStatus {
    Disabled,
    /// Proposal-step results are not narrated.
    Skipped,
    Ok,
    Error,
    Timeout,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNarrative;

impl NarrativeGenerator for DisabledNarrative {
    async fn explain(&self, _case: &CaseResult) -> Result<String, NarrativeError> {
        Err(NarrativeError::Disabled)
    }
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct HttpNarrativeClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl HttpNarrativeClient {
    pub fn new(endpoint: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
        }
    }
}

impl NarrativeGenerator for HttpNarrativeClient {
    async fn explain(&self, case: &CaseResult) -> Result<String, NarrativeError> {
        let body = json!({
            "model": self.model,
            "temperature": 0.2,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt_for(case) },
            ],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NarrativeError::QuotaExceeded);
        }
        if !status.is_success() {
            return Err(NarrativeError::Upstream {
                status: status.as_u16(),
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(NarrativeError::EmptyResponse)
    }
}

/// Generator selected from configuration at startup.
#[derive(Debug, Clone)]
pub enum NarrativeBackend {
    Disabled(DisabledNarrative),
    Http(HttpNarrativeClient),
}

impl NarrativeBackend {
    pub fn from_config(config: &NarrativeConfig) -> Self {
        match (&config.enabled, &config.api_key) {
            (true, Some(api_key)) => Self::Http(HttpNarrativeClient::new(
                config.endpoint.clone(),
                api_key.clone(),
                config.model.clone(),
            )),
            _ => Self::Disabled(DisabledNarrative),
        }
    }
}

impl NarrativeGenerator for NarrativeBackend {
    async fn explain(&self, case: &CaseResult) -> Result<String, NarrativeError> {
        match self {
            NarrativeBackend::Disabled(inner) => inner.explain(case).await,
            NarrativeBackend::Http(inner) => inner.explain(case).await,
        }
    }
}

/// Structured summary of the case; raw patient free text is never forwarded.
pub(crate) fn prompt_for(case: &CaseResult) -> String {
    let score = case
        .score
        .map(|score| score.to_string())
        .unwrap_or_else(|| "not scored (awaiting confirmation)".to_string());

    format!(
        "Pathway: {pathway}\nMode: {mode}\nTriage: {triage}\nScore: {score}\n\
Suggested indicators: {suggested}\nConfirmed indicators: {used}\n\
Rationale:\n{rationale}\nMissing information: {missing}\nNext steps:\n{steps}",
        pathway = case.pathway.label(),
        mode = case.mode.label(),
        triage = case.triage.label(),
        suggested = join_or_none(&case.suggested_flags, ", "),
        used = join_or_none(&case.used_flags, ", "),
        rationale = bullets(&case.rationale),
        missing = join_or_none(&case.missing_information, ", "),
        steps = bullets(&case.next_steps),
    )
}

fn join_or_none(items: &[String], separator: &str) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(separator)
    }
}

fn bullets(items: &[String]) -> String {
    if items.is_empty() {
        return "- none".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::referral::{Intake, Pathway, TriageEngine};

    #[test]
    fn prompt_carries_engine_output_but_not_free_text() {
        let intake = Intake {
            pathway: Pathway::Oncogenetics,
            clinical_notes: Some("Jane Roe, pancreatic cancer at 48".to_string()),
            confirmed_flags: Some(vec!["pancreatic_cancer".to_string()]),
            ..Intake::default()
        };
        let case = TriageEngine::default().assess(&intake);

        let prompt = prompt_for(&case);
        assert!(prompt.contains("Triage: discuss"));
        assert!(prompt.contains("Score: 30"));
        assert!(prompt.contains("pancreatic_cancer"));
        assert!(!prompt.contains("Jane Roe"));
    }

    #[test]
    fn backend_stays_disabled_without_key() {
        let config = NarrativeConfig {
            enabled: true,
            endpoint: "http://localhost:9/v1/chat/completions".to_string(),
            api_key: None,
            model: "test".to_string(),
            timeout_ms: 50,
        };
        assert!(matches!(
            NarrativeBackend::from_config(&config),
            NarrativeBackend::Disabled(_)
        ));
    }
}
