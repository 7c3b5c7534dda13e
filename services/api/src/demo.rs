use clap::Args;
use std::io;
use std::path::PathBuf;
use triage_advisor::error::AppError;
use triage_advisor::referral::{
    CaseResult, Intake, Pathway, PregnancyStatus, TriageEngine, DISCLAIMER,
};

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Path to a JSON intake document
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Pretty-print the case envelope
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Referral pathway to demonstrate (oncogenetics, prenatal, pediatric)
    #[arg(long, value_parser = parse_pathway, default_value = "oncogenetics")]
    pub(crate) pathway: Pathway,
}

fn parse_pathway(raw: &str) -> Result<Pathway, String> {
    Pathway::parse(raw).ok_or_else(|| {
        format!("unknown pathway '{raw}', expected oncogenetics, prenatal or pediatric")
    })
}

/// Engine only; no narrative is attempted from the command line.
pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.input)?;
    let intake = Intake::from_json(&raw)?;
    let case = TriageEngine::default().assess(&intake);

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&case)
    } else {
        serde_json::to_string(&case)
    }
    .map_err(io::Error::other)?;

    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = TriageEngine::default();
    let (proposal, scored) = walkthrough(&engine, sample_intake(args.pathway));

    println!("Genetics triage demo ({})", args.pathway.label());
    println!("\nStep 1: proposed red flags");
    render_case(&proposal);

    println!("\nStep 2: every proposed flag confirmed");
    render_case(&scored);

    println!("\n{DISCLAIMER}");
    Ok(())
}

/// Step 1, then Step 2 with the clinician confirming everything that was proposed.
fn walkthrough(engine: &TriageEngine, mut intake: Intake) -> (CaseResult, CaseResult) {
    let proposal = engine.assess(&intake);
    intake.confirmed_flags = Some(proposal.suggested_flags.clone());
    let scored = engine.assess(&intake);
    (proposal, scored)
}

fn render_case(case: &CaseResult) {
    println!("  Case: {}", case.case_id);
    println!("  Created: {}", case.created_at.to_rfc3339());
    println!("  Mode: {}", case.mode.label());
    println!("  Triage: {}", case.triage.label());
    match case.score {
        Some(score) => println!("  Score: {score}/100"),
        None => println!("  Score: awaiting confirmation"),
    }

    render_list("Suggested flags", &case.suggested_flags);
    if !case.is_pending() {
        render_list("Confirmed flags", &case.used_flags);
    }
    render_list("Rationale", &case.rationale);
    render_list("Missing information", &case.missing_information);
    render_list("Next steps", &case.next_steps);
}

fn render_list(title: &str, items: &[String]) {
    if items.is_empty() {
        println!("  {title}: none");
        return;
    }

    println!("  {title}:");
    for item in items {
        println!("    - {item}");
    }
}

fn sample_intake(pathway: Pathway) -> Intake {
    match pathway {
        Pathway::Oncogenetics => Intake {
            pathway,
            patient_age: Some("42".to_string()),
            patient_sex: Some("female".to_string()),
            chief_concern: Some("Triple negative breast cancer diagnosed at 41".to_string()),
            clinical_notes: Some("Early onset presentation, no genetic testing so far".to_string()),
            family_history_summary: Some(
                "Mother with ovarian cancer at 55; father had pancreatic cancer".to_string(),
            ),
            ..Intake::default()
        },
        Pathway::Prenatal => Intake {
            pathway,
            patient_age: Some("36".to_string()),
            patient_sex: Some("female".to_string()),
            chief_concern: Some("Increased nuchal translucency at first trimester scan".to_string()),
            clinical_notes: Some("NT 3.6 mm; NIPT pending".to_string()),
            family_history_summary: Some("Parents are first cousins".to_string()),
            pregnancy_status: Some(PregnancyStatus::Pregnant),
            gestational_weeks: Some(12),
            ..Intake::default()
        },
        Pathway::Pediatric => Intake {
            pathway,
            patient_age: Some("2".to_string()),
            patient_sex: Some("male".to_string()),
            chief_concern: Some("Global delay and loss of skills since 18 months".to_string()),
            clinical_notes: Some("Hypotonia, two febrile seizures".to_string()),
            family_history_summary: Some("No similar cases in the family".to_string()),
            hpo_terms: vec!["HP:0001263".to_string(), "HP:0001250".to_string()],
            ..Intake::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_advisor::referral::{AssessmentMode, TriageCategory};

    #[test]
    fn every_sample_proposes_flags() {
        let engine = TriageEngine::default();
        for pathway in Pathway::ALL {
            let proposal = engine.assess(&sample_intake(pathway));
            assert_eq!(proposal.mode, AssessmentMode::ProposeFlags);
            assert!(
                !proposal.suggested_flags.is_empty(),
                "{pathway:?} sample proposes nothing"
            );
        }
    }

    #[test]
    fn walkthrough_confirms_every_suggestion() {
        let engine = TriageEngine::default();
        for pathway in Pathway::ALL {
            let (proposal, scored) = walkthrough(&engine, sample_intake(pathway));

            assert_eq!(scored.mode, AssessmentMode::ConfirmedFlags);
            assert_eq!(scored.used_flags, proposal.suggested_flags);
            assert_eq!(scored.triage, TriageCategory::Recommended, "{pathway:?}");
        }
    }

    #[test]
    fn unknown_demo_pathway_is_rejected() {
        assert_eq!(parse_pathway("pediatric"), Ok(Pathway::Pediatric));
        assert!(parse_pathway("dermatology").is_err());
    }
}
