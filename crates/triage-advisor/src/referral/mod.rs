//! Two-step genetics referral triage.
//!
//! Step 1 proposes red-flag indicators found by literal phrase matching. Step 2 runs
//! only when a clinician sends back a non-empty list of confirmed indicators; it sums
//! their weights (clamped to 100), assigns a triage category, and derives missing
//! information and next steps. Every call is a pure function of its intake.

pub mod domain;
pub mod envelope;
pub mod evaluation;
pub mod narrative;
pub mod normalizer;
pub mod registry;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AssessmentMode, Intake, IntakeError, Pathway, PregnancyStatus, TriageCategory};
pub use envelope::{CaseId, CaseResult, DISCLAIMER};
pub use evaluation::{Assessment, Detection, Scoring, TriageEngine};
pub use narrative::{
    DisabledNarrative, HttpNarrativeClient, NarrativeBackend, NarrativeError, NarrativeGenerator,
    NarrativeStatus, FALLBACK_EXPLANATION,
};
pub use registry::{ExtraCondition, ExtraIndicator, IndicatorDescriptor, Rule, RuleRegistry};
pub use router::triage_router;
pub use service::{TriageResponse, TriageService};
