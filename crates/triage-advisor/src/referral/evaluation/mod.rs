mod advisory;
mod detector;
mod scorer;

pub use advisory::{advise, missing_information, next_steps, Advisory};
pub use detector::Detection;
pub use scorer::{classify, Scoring, MAX_SCORE, NOT_PRIORITIZED_CEILING, RECOMMENDED_THRESHOLD};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{AssessmentMode, Intake, Pathway, TriageCategory};
use super::envelope::{CaseId, CaseResult};
use super::normalizer::{build_corpus, expand_pathway_shorthand};
use super::registry::RuleRegistry;

/// Stateless engine applying the indicator registry to one intake at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriageEngine {
    registry: RuleRegistry,
}

impl TriageEngine {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Step 1 on its own: propose indicators without scoring anything.
    pub fn detect(&self, intake: &Intake) -> Detection {
        let intake = expand_pathway_shorthand(intake);
        let corpus = build_corpus(&intake);
        detector::detect(&self.registry, intake.pathway, &corpus, &intake)
    }

    /// Step 2 on its own: score an already confirmed indicator list.
    pub fn score(&self, pathway: Pathway, confirmed: &[String]) -> Scoring {
        scorer::score(&self.registry, pathway, confirmed)
    }

    /// Run detection and, when a non-empty confirmation list is present, scoring.
    ///
    /// This is a pure function of the intake; identifiers and timestamps are added
    /// by [`TriageEngine::assess`].
    pub fn evaluate(&self, intake: &Intake) -> Assessment {
        let intake = expand_pathway_shorthand(intake);
        let pathway = intake.pathway;
        let corpus = build_corpus(&intake);
        let detection = detector::detect(&self.registry, pathway, &corpus, &intake);

        let Some(confirmed) = intake.confirmed() else {
            let advisory = advise(pathway, &intake, TriageCategory::PendingConfirmation);
            return Assessment {
                pathway,
                mode: AssessmentMode::ProposeFlags,
                triage: TriageCategory::PendingConfirmation,
                score: None,
                rationale: detection.rationale,
                suggested_flags: detection.suggested,
                used_flags: Vec::new(),
                ignored_flags: Vec::new(),
                missing_information: advisory.missing_information,
                next_steps: advisory.next_steps,
            };
        };

        let scoring = scorer::score(&self.registry, pathway, confirmed);
        let triage = classify(scoring.score);
        let advisory = advise(pathway, &intake, triage);

        Assessment {
            pathway,
            mode: AssessmentMode::ConfirmedFlags,
            triage,
            score: Some(scoring.score),
            rationale: scoring.rationale,
            suggested_flags: detection.suggested,
            used_flags: scoring.used,
            ignored_flags: scoring.ignored,
            missing_information: advisory.missing_information,
            next_steps: advisory.next_steps,
        }
    }

    /// Evaluate and wrap the outcome in a freshly identified case envelope.
    pub fn assess(&self, intake: &Intake) -> CaseResult {
        let result = CaseResult::seal(self.evaluate(intake), CaseId::generate(), Utc::now());

        info!(
            case_id = %result.case_id,
            pathway = result.pathway.label(),
            mode = result.mode.label(),
            triage = result.triage.label(),
            "triage case assessed"
        );

        result
    }
}

/// Engine output before it is stamped with an identifier and creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub pathway: Pathway,
    pub mode: AssessmentMode,
    pub triage: TriageCategory,
    pub score: Option<u8>,
    pub rationale: Vec<String>,
    pub suggested_flags: Vec<String>,
    pub used_flags: Vec<String>,
    pub ignored_flags: Vec<String>,
    pub missing_information: Vec<String>,
    pub next_steps: Vec<String>,
}

impl Assessment {
    /// Placeholder used by the boundary when no intake could be read at all.
    pub fn unavailable(pathway: Pathway) -> Self {
        Self {
            pathway,
            mode: AssessmentMode::ProposeFlags,
            triage: TriageCategory::PendingConfirmation,
            score: None,
            rationale: Vec::new(),
            suggested_flags: Vec::new(),
            used_flags: Vec::new(),
            ignored_flags: Vec::new(),
            missing_information: Vec::new(),
            next_steps: Vec::new(),
        }
    }
}
