use super::super::domain::{Intake, Pathway, PregnancyStatus, TriageCategory};

const ONCOGENETICS_NEXT_STEPS: &[&str] = &[
    "Collect a three-generation family history with cancer types and ages at diagnosis.",
    "Gather pathology reports for the patient and affected relatives where available.",
    "Consider referral to genetic counseling for a hereditary cancer risk assessment.",
];

const PRENATAL_NEXT_STEPS: &[&str] = &[
    "Collect ultrasound reports and prenatal screening results (NIPT, combined screening).",
    "Refer urgently to prenatal genetics or fetal medicine; gestational timing is critical.",
];

const PEDIATRIC_NEXT_STEPS: &[&str] = &[
    "Document the phenotype with HPO terms, growth parameters and developmental history.",
    "Refer to pediatric genetics for a diagnostic evaluation.",
];

const NO_REFERRAL_STEPS: &[&str] = &[
    "No genetics referral is indicated on the confirmed indicators.",
    "Reassess if new personal or family history findings emerge.",
];

/// Missing information and recommended actions for one case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advisory {
    pub missing_information: Vec<String>,
    pub next_steps: Vec<String>,
}

/// Derive the advisory for a pathway, applying low-risk suppression.
///
/// A `not_prioritized` outcome swaps the next steps for the no-referral message and
/// drops missing information, except on the prenatal pathway where timing always
/// warrants preparedness.
pub fn advise(pathway: Pathway, intake: &Intake, triage: TriageCategory) -> Advisory {
    let missing_information = missing_information(pathway, intake);

    if triage == TriageCategory::NotPrioritized {
        return Advisory {
            missing_information: match pathway {
                Pathway::Prenatal => missing_information,
                Pathway::Oncogenetics | Pathway::Pediatric => Vec::new(),
            },
            next_steps: to_owned(NO_REFERRAL_STEPS),
        };
    }

    Advisory {
        missing_information,
        next_steps: to_owned(next_steps(pathway)),
    }
}

pub fn next_steps(pathway: Pathway) -> &'static [&'static str] {
    match pathway {
        Pathway::Oncogenetics => ONCOGENETICS_NEXT_STEPS,
        Pathway::Prenatal => PRENATAL_NEXT_STEPS,
        Pathway::Pediatric => PEDIATRIC_NEXT_STEPS,
    }
}

pub fn missing_information(pathway: Pathway, intake: &Intake) -> Vec<String> {
    let mut missing = Vec::new();

    if intake.age_years().is_none() {
        missing.push("Patient age");
    }
    if !intake.has_known_sex() {
        missing.push("Patient sex");
    }
    if !intake.has_chief_concern() {
        missing.push("Chief concern");
    }
    if !intake.has_family_history() {
        missing.push("Family history summary");
    }

    match pathway {
        Pathway::Prenatal => {
            if matches!(
                intake.pregnancy_status,
                None | Some(PregnancyStatus::NotApplicable)
            ) {
                missing.push("Pregnancy status");
            }
            if intake.is_pregnant() && intake.gestational_weeks.is_none() {
                missing.push("Gestational age (weeks)");
            }
        }
        Pathway::Pediatric => {
            if intake.hpo_terms.is_empty() {
                missing.push("HPO terms describing the phenotype");
            }
        }
        Pathway::Oncogenetics => {}
    }

    to_owned(&missing)
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
