use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{AssessmentMode, Pathway, TriageCategory};
use super::evaluation::Assessment;

pub const DISCLAIMER: &str = "Educational decision-support tool. It does not provide a diagnosis or \
medical advice; referral decisions remain with the treating clinician.";

/// Random, non-sequential identifier for a single case result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl CaseId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final record handed back to callers; Step 1 and Step 2 share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    pub case_id: CaseId,
    pub created_at: DateTime<Utc>,
    pub pathway: Pathway,
    pub mode: AssessmentMode,
    pub triage: TriageCategory,
    pub score: Option<u8>,
    pub rationale: Vec<String>,
    pub suggested_flags: Vec<String>,
    pub used_flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_flags: Vec<String>,
    pub missing_information: Vec<String>,
    pub next_steps: Vec<String>,
    pub disclaimer: String,
}

impl CaseResult {
    pub fn seal(assessment: Assessment, case_id: CaseId, created_at: DateTime<Utc>) -> Self {
        let Assessment {
            pathway,
            mode,
            triage,
            score,
            rationale,
            suggested_flags,
            used_flags,
            ignored_flags,
            missing_information,
            next_steps,
        } = assessment;

        Self {
            case_id,
            created_at,
            pathway,
            mode,
            triage,
            score,
            rationale,
            suggested_flags,
            used_flags,
            ignored_flags,
            missing_information,
            next_steps,
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    /// A null score means the case still waits for human confirmation.
    pub fn is_pending(&self) -> bool {
        self.score.is_none()
    }
}
