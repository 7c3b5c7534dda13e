use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::referral::{
    CaseResult, Intake, NarrativeError, NarrativeGenerator, Pathway, PregnancyStatus,
    TriageEngine, TriageService,
};

pub(super) fn engine() -> TriageEngine {
    TriageEngine::default()
}

pub(super) fn oncology_intake() -> Intake {
    Intake {
        pathway: Pathway::Oncogenetics,
        patient_age: Some("44".to_string()),
        patient_sex: Some("female".to_string()),
        chief_concern: Some("Breast cancer diagnosed at 38".to_string()),
        clinical_notes: Some("Early onset breast cancer, ER positive.".to_string()),
        family_history_summary: Some(
            "Mother with ovarian cancer; two relatives with breast cancer on the maternal side"
                .to_string(),
        ),
        ..Intake::default()
    }
}

pub(super) fn prenatal_intake() -> Intake {
    Intake {
        pathway: Pathway::Prenatal,
        patient_age: Some("31".to_string()),
        patient_sex: Some("female".to_string()),
        chief_concern: Some("Abnormal first trimester scan".to_string()),
        clinical_notes: Some("NIPT positive for trisomy 18".to_string()),
        family_history_summary: Some("No known genetic conditions".to_string()),
        pregnancy_status: Some(PregnancyStatus::Pregnant),
        gestational_weeks: Some(13),
        ..Intake::default()
    }
}

pub(super) fn pediatric_intake() -> Intake {
    Intake {
        pathway: Pathway::Pediatric,
        patient_age: Some("3".to_string()),
        patient_sex: Some("male".to_string()),
        chief_concern: Some("Speech delay and seizures".to_string()),
        clinical_notes: Some("Hypotonia noted since infancy".to_string()),
        family_history_summary: Some("Parents are first cousins".to_string()),
        hpo_terms: vec!["HP:0001263".to_string()],
        ..Intake::default()
    }
}

pub(super) fn confirmed(mut intake: Intake, ids: &[&str]) -> Intake {
    intake.confirmed_flags = Some(ids.iter().map(|id| id.to_string()).collect());
    intake
}

pub(super) fn build_service<N>(narrative: N, timeout: Duration) -> TriageService<N>
where
    N: NarrativeGenerator + 'static,
{
    TriageService::new(engine(), Arc::new(narrative), timeout)
}

/// Returns fixed prose and counts how often it was asked.
#[derive(Default, Clone)]
pub(super) struct StaticNarrative {
    pub(super) calls: Arc<AtomicUsize>,
}

impl StaticNarrative {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NarrativeGenerator for StaticNarrative {
    async fn explain(&self, case: &CaseResult) -> Result<String, NarrativeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Case triaged as {}.", case.triage.label()))
    }
}

pub(super) struct QuotaNarrative;

impl NarrativeGenerator for QuotaNarrative {
    async fn explain(&self, _case: &CaseResult) -> Result<String, NarrativeError> {
        Err(NarrativeError::QuotaExceeded)
    }
}

pub(super) struct SlowNarrative;

impl NarrativeGenerator for SlowNarrative {
    async fn explain(&self, _case: &CaseResult) -> Result<String, NarrativeError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
