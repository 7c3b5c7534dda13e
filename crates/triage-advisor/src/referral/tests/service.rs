use std::time::Duration;

use super::common::*;
use crate::referral::{
    AssessmentMode, DisabledNarrative, NarrativeStatus, TriageCategory, FALLBACK_EXPLANATION,
};

#[tokio::test]
async fn scored_cases_are_narrated_once() {
    let narrative = StaticNarrative::default();
    let service = build_service(narrative.clone(), Duration::from_secs(1));
    let intake = confirmed(
        oncology_intake(),
        &["early_onset_cancer", "multiple_relatives_cancer"],
    );

    let response = service.assess(&intake).await;

    assert_eq!(response.llm_status, NarrativeStatus::Ok);
    assert_eq!(response.explanation, "Case triaged as recommended.");
    assert_eq!(narrative.calls(), 1);
    assert!(response.error.is_none());
}

#[tokio::test]
async fn proposals_skip_the_narrative() {
    let narrative = StaticNarrative::default();
    let service = build_service(narrative.clone(), Duration::from_secs(1));

    let response = service.assess(&oncology_intake()).await;

    assert_eq!(response.case.mode, AssessmentMode::ProposeFlags);
    assert_eq!(response.llm_status, NarrativeStatus::Skipped);
    assert_eq!(response.explanation, FALLBACK_EXPLANATION);
    assert_eq!(narrative.calls(), 0);
}

#[tokio::test]
async fn narrative_failure_leaves_the_case_untouched() {
    let intake = confirmed(prenatal_intake(), &["positive_screening"]);
    let expected = engine().evaluate(&intake);
    let service = build_service(QuotaNarrative, Duration::from_secs(1));

    let response = service.assess(&intake).await;

    assert_eq!(response.llm_status, NarrativeStatus::Error);
    assert_eq!(response.explanation, FALLBACK_EXPLANATION);
    assert_eq!(response.case.score, expected.score);
    assert_eq!(response.case.triage, TriageCategory::Discuss);
    assert_eq!(response.case.used_flags, expected.used_flags);
    assert_eq!(response.case.rationale, expected.rationale);
}

#[tokio::test]
async fn slow_narrative_times_out() {
    let service = build_service(SlowNarrative, Duration::from_millis(20));
    let intake = confirmed(pediatric_intake(), &["seizures"]);

    let response = service.assess(&intake).await;

    assert_eq!(response.llm_status, NarrativeStatus::Timeout);
    assert_eq!(response.explanation, FALLBACK_EXPLANATION);
    assert_eq!(response.case.score, Some(30));
}

#[tokio::test]
async fn disabled_narrative_reports_disabled() {
    let service = build_service(DisabledNarrative, Duration::from_secs(1));
    let intake = confirmed(pediatric_intake(), &["seizures", "hypotonia"]);

    let response = service.assess(&intake).await;

    assert_eq!(response.llm_status, NarrativeStatus::Disabled);
    assert_eq!(response.explanation, FALLBACK_EXPLANATION);
    assert_eq!(response.case.score, Some(55));
}

#[tokio::test]
async fn response_flattens_the_case_fields() {
    let service = build_service(DisabledNarrative, Duration::from_secs(1));

    let response = service.assess(&pediatric_intake()).await;
    let value = serde_json::to_value(&response).expect("serialize response");

    assert_eq!(value["pathway"], "pediatric");
    assert_eq!(value["llm_status"], "skipped");
    assert!(value.get("case").is_none());
    assert!(value.get("error").is_none());
}
