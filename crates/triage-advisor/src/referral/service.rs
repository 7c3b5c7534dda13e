use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{AssessmentMode, Intake, Pathway};
use super::envelope::{CaseId, CaseResult};
use super::evaluation::{Assessment, TriageEngine};
use super::narrative::{NarrativeError, NarrativeGenerator, NarrativeStatus, FALLBACK_EXPLANATION};

/// Service composing the decision engine with the optional narrative collaborator.
pub struct TriageService<N> {
    engine: TriageEngine,
    narrative: Arc<N>,
    narrative_timeout: Duration,
}

impl<N> TriageService<N>
where
    N: NarrativeGenerator + 'static,
{
    pub fn new(engine: TriageEngine, narrative: Arc<N>, narrative_timeout: Duration) -> Self {
        Self {
            engine,
            narrative,
            narrative_timeout,
        }
    }

    pub fn engine(&self) -> &TriageEngine {
        &self.engine
    }

    /// Run the engine, then make one bounded attempt at a narrative for scored cases.
    ///
    /// The case is final before the narrative starts; the generator only borrows it.
    pub async fn assess(&self, intake: &Intake) -> TriageResponse {
        let case = self.engine.assess(intake);

        let (explanation, llm_status) = match case.mode {
            AssessmentMode::ProposeFlags => {
                (FALLBACK_EXPLANATION.to_string(), NarrativeStatus::Skipped)
            }
            AssessmentMode::ConfirmedFlags => self.narrate(&case).await,
        };

        TriageResponse {
            case,
            explanation,
            llm_status,
            error: None,
        }
    }

    async fn narrate(&self, case: &CaseResult) -> (String, NarrativeStatus) {
        let attempt = tokio::time::timeout(self.narrative_timeout, self.narrative.explain(case));

        match attempt.await {
            Ok(Ok(text)) => (text, NarrativeStatus::Ok),
            Ok(Err(NarrativeError::Disabled)) => {
                (FALLBACK_EXPLANATION.to_string(), NarrativeStatus::Disabled)
            }
            Ok(Err(error)) => {
                warn!(case_id = %case.case_id, %error, "narrative generation failed, using fallback");
                (FALLBACK_EXPLANATION.to_string(), NarrativeStatus::Error)
            }
            Err(_) => {
                warn!(
                    case_id = %case.case_id,
                    timeout_ms = self.narrative_timeout.as_millis() as u64,
                    "narrative generation timed out, using fallback"
                );
                (FALLBACK_EXPLANATION.to_string(), NarrativeStatus::Timeout)
            }
        }
    }
}

/// Wire body for the triage endpoint: the case envelope plus narrative fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResponse {
    #[serde(flatten)]
    pub case: CaseResult,
    pub explanation: String,
    pub llm_status: NarrativeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TriageResponse {
    /// Envelope-shaped body used when the request could not be evaluated at all.
    pub fn failed(error: impl Into<String>) -> Self {
        let case = CaseResult::seal(
            Assessment::unavailable(Pathway::default()),
            CaseId::generate(),
            Utc::now(),
        );

        Self {
            case,
            explanation: FALLBACK_EXPLANATION.to_string(),
            llm_status: NarrativeStatus::Disabled,
            error: Some(error.into()),
        }
    }
}
