use tracing::debug;

use super::super::domain::{Intake, Pathway};
use super::super::normalizer::contains_term;
use super::super::registry::{ExtraCondition, ExtraIndicator, RuleRegistry};

pub(crate) const FAMILY_HISTORY_NOTE: &str =
    "Family history was provided; review the pedigree for additional risk patterns.";

/// Indicators proposed for human confirmation, in first-detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub suggested: Vec<String>,
    pub rationale: Vec<String>,
}

impl Detection {
    fn record(&mut self, id: &str, rationale: &str) {
        if self.suggested.iter().any(|existing| existing == id) {
            return;
        }
        self.suggested.push(id.to_string());
        self.rationale.push(rationale.to_string());
    }
}

/// Scan the corpus against the pathway rules and the extra indicators for that pathway.
///
/// A rule fires once no matter how many of its phrases match. Nothing here scores.
pub(crate) fn detect(
    registry: &RuleRegistry,
    pathway: Pathway,
    corpus: &str,
    intake: &Intake,
) -> Detection {
    let mut detection = Detection::default();

    for rule in registry.rules_for(pathway) {
        if rule.phrases.iter().any(|phrase| corpus.contains(phrase)) {
            detection.record(rule.id, rule.rationale);
        }
    }

    let narrative = narrative_text(intake);
    for extra in registry.extras_for(pathway) {
        if extra_fires(extra, &narrative, intake) {
            detection.record(extra.id, extra.rationale);
        }
    }

    if intake.has_family_history() {
        detection.rationale.push(FAMILY_HISTORY_NOTE.to_string());
    }

    debug!(
        pathway = pathway.label(),
        suggested = detection.suggested.len(),
        "red flag detection finished"
    );

    detection
}

/// Chief concern, notes and family history only; extras ignore structured lists.
fn narrative_text(intake: &Intake) -> String {
    [
        intake.chief_concern.as_deref(),
        intake.clinical_notes.as_deref(),
        intake.family_history_summary.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

fn extra_fires(extra: &ExtraIndicator, text: &str, intake: &Intake) -> bool {
    match extra.condition {
        ExtraCondition::AnyPhrase(phrases) => phrases.iter().any(|phrase| text.contains(phrase)),
        ExtraCondition::AllGroups(groups) => groups
            .iter()
            .all(|group| group.iter().any(|phrase| contains_term(text, phrase))),
        ExtraCondition::PregnantWithMinimumAge(years) => {
            intake.is_pregnant()
                && intake
                    .age_years()
                    .map(|age| age >= f64::from(years))
                    .unwrap_or(false)
        }
    }
}
