use super::common::*;
use crate::referral::evaluation::Detection;
use crate::referral::{Intake, Pathway, PregnancyStatus};

fn suggested(detection: &Detection) -> Vec<&str> {
    detection.suggested.iter().map(String::as_str).collect()
}

#[test]
fn oncogenetics_rules_fire_in_registry_order() {
    let detection = engine().detect(&oncology_intake());

    assert_eq!(
        suggested(&detection),
        vec![
            "early_onset_cancer",
            "ovarian_cancer",
            "multiple_relatives_cancer"
        ]
    );
    assert_eq!(detection.rationale.len(), 4, "three rules plus the family history note");
    assert!(detection
        .rationale
        .last()
        .expect("family history note")
        .contains("Family history"));
}

#[test]
fn a_rule_fires_once_even_when_several_phrases_match() {
    let intake = Intake {
        clinical_notes: Some(
            "Early onset disease; early-onset in sister; diagnosed before 50".to_string(),
        ),
        ..Intake::default()
    };

    let detection = engine().detect(&intake);

    assert_eq!(suggested(&detection), vec!["early_onset_cancer"]);
    assert_eq!(detection.rationale.len(), 1);
}

#[test]
fn pancreatic_cancer_mention_is_proposed() {
    let intake = Intake {
        pathway: Pathway::Oncogenetics,
        clinical_notes: Some("Father had Pancreatic Cancer at 52".to_string()),
        ..Intake::default()
    };

    let detection = engine().detect(&intake);

    assert!(detection.suggested.contains(&"pancreatic_cancer".to_string()));
    assert!(!detection
        .suggested
        .contains(&"pancreatic_melanoma_cluster".to_string()));
}

#[test]
fn pancreatic_and_melanoma_mentions_form_a_cluster() {
    let intake = Intake {
        chief_concern: Some("Melanoma at 45".to_string()),
        family_history_summary: Some("Father with pancreatic cancer".to_string()),
        ..Intake::default()
    };

    let detection = engine().detect(&intake);

    assert_eq!(
        suggested(&detection),
        vec!["pancreatic_cancer", "pancreatic_melanoma_cluster"]
    );
}

#[test]
fn extra_indicators_ignore_structured_lists() {
    let intake = Intake {
        hpo_terms: vec!["pancreatic cancer".to_string()],
        ..Intake::default()
    };

    let detection = engine().detect(&intake);

    assert!(detection.suggested.is_empty());
}

#[test]
fn positive_nipt_note_is_normalized_and_proposed() {
    let detection = engine().detect(&prenatal_intake());

    assert_eq!(suggested(&detection), vec!["positive_screening"]);
}

#[test]
fn prenatal_shorthand_in_notes_reaches_detection() {
    let intake = Intake {
        pathway: Pathway::Prenatal,
        clinical_notes: Some("NT 3.9 mm at 12 weeks; previous pregnancy with T21".to_string()),
        ..Intake::default()
    };

    let detection = engine().detect(&intake);

    assert_eq!(
        suggested(&detection),
        vec!["increased_nt", "previous_aneuploidy"]
    );
}

#[test]
fn advanced_maternal_age_requires_pregnancy() {
    let mut intake = Intake {
        pathway: Pathway::Prenatal,
        patient_age: Some("37".to_string()),
        pregnancy_status: Some(PregnancyStatus::NotPregnant),
        ..Intake::default()
    };
    assert!(engine().detect(&intake).suggested.is_empty());

    intake.pregnancy_status = Some(PregnancyStatus::Pregnant);
    assert_eq!(
        suggested(&engine().detect(&intake)),
        vec!["advanced_maternal_age"]
    );
}

#[test]
fn pediatric_detection_uses_text_and_hpo_terms() {
    let detection = engine().detect(&pediatric_intake());

    assert_eq!(
        suggested(&detection),
        vec!["developmental_delay", "seizures", "hypotonia", "consanguinity"]
    );
}

#[test]
fn rules_from_other_pathways_never_fire() {
    let intake = Intake {
        pathway: Pathway::Pediatric,
        clinical_notes: Some("Increased nuchal translucency and ovarian cancer".to_string()),
        ..Intake::default()
    };

    let detection = engine().detect(&intake);

    assert!(detection.suggested.is_empty());
    assert!(detection.rationale.is_empty());
}
