use tracing::debug;

use super::super::domain::{Pathway, TriageCategory};
use super::super::registry::RuleRegistry;

/// Scores at or above this value are recommended for referral.
pub const RECOMMENDED_THRESHOLD: u8 = 70;
/// Scores at or below this value are not prioritized.
pub const NOT_PRIORITIZED_CEILING: u8 = 20;
pub const MAX_SCORE: u8 = 100;

/// Outcome of scoring the human-confirmed indicators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoring {
    pub score: u8,
    pub used: Vec<String>,
    pub ignored: Vec<String>,
    pub rationale: Vec<String>,
}

/// Sum the weights of recognized confirmed indicators and clamp to `0..=100`.
///
/// Unknown ids are skipped without failing and repeated ids count once.
pub(crate) fn score(registry: &RuleRegistry, pathway: Pathway, confirmed: &[String]) -> Scoring {
    let mut scoring = Scoring::default();
    let mut total: u32 = 0;

    for raw in confirmed {
        let id = raw.trim().to_ascii_lowercase();
        if scoring.used.contains(&id) || scoring.ignored.contains(&id) {
            continue;
        }

        match registry.lookup(pathway, &id) {
            Some(indicator) => {
                total += u32::from(indicator.weight);
                scoring.used.push(id);
                scoring.rationale.push(indicator.rationale.to_string());
            }
            None => scoring.ignored.push(id),
        }
    }

    scoring.score = total.min(u32::from(MAX_SCORE)) as u8;

    debug!(
        pathway = pathway.label(),
        raw_total = total,
        score = scoring.score,
        ignored = scoring.ignored.len(),
        "confirmed indicators scored"
    );

    scoring
}

/// Map a clamped score onto a referral category.
pub fn classify(score: u8) -> TriageCategory {
    if score >= RECOMMENDED_THRESHOLD {
        TriageCategory::Recommended
    } else if score > NOT_PRIORITIZED_CEILING {
        TriageCategory::Discuss
    } else {
        TriageCategory::NotPrioritized
    }
}
