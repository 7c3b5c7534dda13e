use std::borrow::Cow;

use super::domain::{dedup_trimmed, Intake, Pathway};

/// Shorthand group expanded into one canonical indicator token.
///
/// The token is added when any `terms` entry appears in the text and, if `qualifiers`
/// is non-empty, at least one qualifier appears as well.
struct SynonymGroup {
    token: &'static str,
    terms: &'static [&'static str],
    qualifiers: &'static [&'static str],
}

const PRENATAL_SYNONYMS: &[SynonymGroup] = &[
    SynonymGroup {
        token: "previous_aneuploidy",
        terms: &["trisomy 21", "t21", "down syndrome"],
        qualifiers: &[],
    },
    SynonymGroup {
        token: "increased_nt",
        terms: &["nuchal", "nt", "translucency"],
        qualifiers: &[],
    },
    SynonymGroup {
        token: "abnormal_ultrasound",
        terms: &["ultrasound", "anomaly", "malformation"],
        qualifiers: &[],
    },
    SynonymGroup {
        token: "positive_screening",
        terms: &["nipt"],
        qualifiers: &["positive", "high risk"],
    },
];

/// Abbreviations this short only count as whole words ("nt" must not match "patient").
const WHOLE_WORD_MAX_LEN: usize = 3;

/// Build the lower-cased search corpus for one invocation.
///
/// Absent fields contribute nothing; list fields are joined with spaces.
pub fn build_corpus(intake: &Intake) -> String {
    let lists = [
        intake.prenatal_findings.join(" "),
        intake.pediatric_red_flags.join(" "),
        intake.hpo_terms.join(" "),
    ];

    let fields = [
        Some(intake.pathway.label()),
        intake.patient_sex.as_deref(),
        intake.patient_age.as_deref(),
        intake.chief_concern.as_deref(),
        intake.clinical_notes.as_deref(),
        intake.family_history_summary.as_deref(),
    ];

    fields
        .into_iter()
        .flatten()
        .chain(lists.iter().map(String::as_str))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Apply pathway specific shorthand expansion before detection.
///
/// Only the prenatal pathway rewrites anything: its findings list is replaced by the
/// normalized token set. Other pathways borrow the intake untouched.
pub fn expand_pathway_shorthand(intake: &Intake) -> Cow<'_, Intake> {
    match intake.pathway {
        Pathway::Prenatal => {
            let findings = normalize_prenatal_findings(
                &intake.prenatal_findings,
                intake.clinical_notes.as_deref(),
                intake.family_history_summary.as_deref(),
            );
            if findings == intake.prenatal_findings {
                Cow::Borrowed(intake)
            } else {
                let mut expanded = intake.clone();
                expanded.prenatal_findings = findings;
                Cow::Owned(expanded)
            }
        }
        Pathway::Oncogenetics | Pathway::Pediatric => Cow::Borrowed(intake),
    }
}

/// Canonicalize prenatal findings from structured entries plus free text.
///
/// Structured entries are kept (trimmed, de-duplicated) and a canonical token is
/// appended for every synonym group found in the combined findings, notes and family
/// history text.
pub fn normalize_prenatal_findings(
    findings: &[String],
    notes: Option<&str>,
    family_history: Option<&str>,
) -> Vec<String> {
    let mut tokens = dedup_trimmed(findings);

    let text = findings
        .iter()
        .map(String::as_str)
        .chain(notes)
        .chain(family_history)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    for group in PRENATAL_SYNONYMS {
        let term_present = group.terms.iter().any(|term| contains_term(&text, term));
        let qualified = group.qualifiers.is_empty()
            || group
                .qualifiers
                .iter()
                .any(|qualifier| contains_term(&text, qualifier));
        let already_listed = tokens
            .iter()
            .any(|token| token.eq_ignore_ascii_case(group.token));

        if term_present && qualified && !already_listed {
            tokens.push(group.token.to_string());
        }
    }

    tokens
}

/// Substring containment, tightened to whole-word matching for very short abbreviations.
pub(crate) fn contains_term(text: &str, term: &str) -> bool {
    if term.len() > WHOLE_WORD_MAX_LEN {
        return text.contains(term);
    }

    let is_word_char = |c: char| c.is_ascii_alphanumeric();
    text.match_indices(term).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}
