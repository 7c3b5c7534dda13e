//! Static indicator tables.
//!
//! Rules are plain data: adding an indicator means adding a table entry, never touching
//! the detector or the scorer. Trigger phrases are matched as lower-case substrings of
//! the normalized corpus, so every phrase here is written in lower case.

use serde::Serialize;

use super::domain::Pathway;

/// One pathway detection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub id: &'static str,
    pub weight: u8,
    pub phrases: &'static [&'static str],
    pub rationale: &'static str,
}

/// Dedicated trigger for an extra indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraCondition {
    /// Any phrase appears in the concern, notes or family history.
    AnyPhrase(&'static [&'static str]),
    /// Every group contributes at least one phrase to the same text.
    AllGroups(&'static [&'static [&'static str]]),
    /// The patient is pregnant and at least this many years old.
    PregnantWithMinimumAge(u8),
}

/// Cross-cutting indicator with its own detection condition, scored like a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraIndicator {
    pub id: &'static str,
    pub pathway: Pathway,
    pub weight: u8,
    pub condition: ExtraCondition,
    pub rationale: &'static str,
}

/// Weight and rationale for a known indicator, regardless of where it was defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub id: &'static str,
    pub weight: u8,
    pub rationale: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Rule,
    Extra,
}

/// Serializable registry entry so form layers can render the confirmation checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorDescriptor {
    pub pathway: Pathway,
    pub id: &'static str,
    pub kind: IndicatorKind,
    pub weight: u8,
    pub phrases: Vec<&'static str>,
    pub rationale: &'static str,
}

/// Immutable pathway to rule-list mapping plus the extra indicator table.
#[derive(Debug, Clone, Copy)]
pub struct RuleRegistry {
    oncogenetics: &'static [Rule],
    prenatal: &'static [Rule],
    pediatric: &'static [Rule],
    extras: &'static [ExtraIndicator],
}

impl RuleRegistry {
    pub const fn new(
        oncogenetics: &'static [Rule],
        prenatal: &'static [Rule],
        pediatric: &'static [Rule],
        extras: &'static [ExtraIndicator],
    ) -> Self {
        Self {
            oncogenetics,
            prenatal,
            pediatric,
            extras,
        }
    }

    /// The registry shipped with the advisor.
    pub const fn standard() -> Self {
        Self::new(
            ONCOGENETICS_RULES,
            PRENATAL_RULES,
            PEDIATRIC_RULES,
            EXTRA_INDICATORS,
        )
    }

    pub fn rules_for(&self, pathway: Pathway) -> &'static [Rule] {
        match pathway {
            Pathway::Oncogenetics => self.oncogenetics,
            Pathway::Prenatal => self.prenatal,
            Pathway::Pediatric => self.pediatric,
        }
    }

    pub fn extras_for(&self, pathway: Pathway) -> impl Iterator<Item = &'static ExtraIndicator> {
        self.extras
            .iter()
            .filter(move |extra| extra.pathway == pathway)
    }

    /// Resolve an indicator id within a pathway; pathway rules take precedence over extras.
    pub fn lookup(&self, pathway: Pathway, id: &str) -> Option<Indicator> {
        if let Some(rule) = self.rules_for(pathway).iter().find(|rule| rule.id == id) {
            return Some(Indicator {
                id: rule.id,
                weight: rule.weight,
                rationale: rule.rationale,
            });
        }

        self.extras_for(pathway)
            .find(|extra| extra.id == id)
            .map(|extra| Indicator {
                id: extra.id,
                weight: extra.weight,
                rationale: extra.rationale,
            })
    }

    pub fn catalog(&self, pathway: Pathway) -> Vec<IndicatorDescriptor> {
        let rules = self
            .rules_for(pathway)
            .iter()
            .map(|rule| IndicatorDescriptor {
                pathway,
                id: rule.id,
                kind: IndicatorKind::Rule,
                weight: rule.weight,
                phrases: rule.phrases.to_vec(),
                rationale: rule.rationale,
            });

        let extras = self.extras_for(pathway).map(|extra| IndicatorDescriptor {
            pathway,
            id: extra.id,
            kind: IndicatorKind::Extra,
            weight: extra.weight,
            phrases: match extra.condition {
                ExtraCondition::AnyPhrase(phrases) => phrases.to_vec(),
                ExtraCondition::AllGroups(groups) => groups.concat(),
                ExtraCondition::PregnantWithMinimumAge(_) => Vec::new(),
            },
            rationale: extra.rationale,
        });

        rules.chain(extras).collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

const CONSANGUINITY_PHRASES: &[&str] = &[
    "consanguin",
    "related parents",
    "parents are cousins",
    "first cousins",
    "cousin marriage",
];

const ONCOGENETICS_RULES: &[Rule] = &[
    Rule {
        id: "known_familial_variant",
        weight: 50,
        phrases: &[
            "known pathogenic variant",
            "known familial variant",
            "familial mutation",
            "pathogenic variant in the family",
            "brca1",
            "brca2",
            "lynch syndrome",
        ],
        rationale: "A known pathogenic variant in the family makes cascade testing appropriate.",
    },
    Rule {
        id: "early_onset_cancer",
        weight: 40,
        phrases: &[
            "early onset",
            "early-onset",
            "diagnosed before 50",
            "before age 50",
            "under 50",
            "young age at diagnosis",
        ],
        rationale: "Cancer diagnosed at a young age points to a possible hereditary predisposition.",
    },
    Rule {
        id: "male_breast_cancer",
        weight: 40,
        phrases: &[
            "male breast cancer",
            "breast cancer in a male",
            "father with breast cancer",
            "brother with breast cancer",
        ],
        rationale: "Breast cancer in a male relative is a classic BRCA2 red flag.",
    },
    Rule {
        id: "ovarian_cancer",
        weight: 35,
        phrases: &[
            "ovarian cancer",
            "fallopian tube cancer",
            "primary peritoneal",
        ],
        rationale: "Epithelial ovarian cancer at any age meets common testing criteria.",
    },
    Rule {
        id: "multiple_relatives_cancer",
        weight: 30,
        phrases: &[
            "multiple relatives",
            "several relatives",
            "two relatives",
            "three relatives",
            "multiple family members",
            "same side of the family",
        ],
        rationale: "Several affected relatives on one side of the family suggest a familial pattern.",
    },
    Rule {
        id: "triple_negative_breast",
        weight: 30,
        phrases: &["triple negative", "triple-negative"],
        rationale: "Triple-negative breast cancer is associated with BRCA1 carriers.",
    },
    Rule {
        id: "lynch_spectrum_cancer",
        weight: 30,
        phrases: &[
            "endometrial cancer",
            "uterine cancer",
            "colorectal cancer",
            "colon cancer",
        ],
        rationale: "Colorectal or endometrial cancer belongs to the Lynch syndrome spectrum.",
    },
    Rule {
        id: "multiple_primaries",
        weight: 25,
        phrases: &[
            "multiple primaries",
            "multiple primary",
            "second primary",
            "two primary cancers",
            "bilateral breast cancer",
        ],
        rationale: "More than one primary cancer in the same person raises hereditary suspicion.",
    },
];

const PRENATAL_RULES: &[Rule] = &[
    Rule {
        id: "abnormal_ultrasound",
        weight: 50,
        phrases: &[
            "abnormal_ultrasound",
            "abnormal ultrasound",
            "structural anomaly",
            "fetal anomaly",
            "fetal malformation",
        ],
        rationale: "Fetal structural findings on ultrasound warrant genetic evaluation.",
    },
    Rule {
        id: "positive_screening",
        weight: 50,
        phrases: &[
            "positive_screening",
            "positive screening",
            "screen positive",
            "high risk screening",
            "high-risk screening",
            "nipt positive",
            "positive nipt",
        ],
        rationale: "A positive or high-risk prenatal screen needs diagnostic follow-up counseling.",
    },
    Rule {
        id: "increased_nt",
        weight: 40,
        phrases: &[
            "increased_nt",
            "increased nuchal",
            "nuchal translucency",
            "thickened nuchal",
        ],
        rationale: "Increased nuchal translucency is associated with aneuploidy and cardiac defects.",
    },
    Rule {
        id: "previous_aneuploidy",
        weight: 40,
        phrases: &[
            "previous_aneuploidy",
            "previous aneuploidy",
            "prior aneuploidy",
            "prior trisomy",
            "previous pregnancy with trisomy",
        ],
        rationale: "A previous pregnancy with aneuploidy raises recurrence risk.",
    },
    Rule {
        id: "parental_carrier",
        weight: 40,
        phrases: &[
            "parental_carrier",
            "balanced translocation",
            "known carrier",
            "carrier couple",
        ],
        rationale: "A parent carrying a known variant or rearrangement affects fetal risk.",
    },
    Rule {
        id: "consanguinity",
        weight: 20,
        phrases: CONSANGUINITY_PHRASES,
        rationale: "Parental consanguinity increases the risk of autosomal recessive conditions.",
    },
];

const PEDIATRIC_RULES: &[Rule] = &[
    Rule {
        id: "developmental_regression",
        weight: 50,
        phrases: &[
            "developmental_regression",
            "regression",
            "loss of skills",
            "lost milestones",
        ],
        rationale: "Loss of previously acquired skills suggests a progressive genetic or metabolic disorder.",
    },
    Rule {
        id: "multiple_congenital_anomalies",
        weight: 45,
        phrases: &[
            "multiple_congenital_anomalies",
            "congenital anomalies",
            "congenital heart",
            "cleft",
        ],
        rationale: "Multiple congenital anomalies frequently have a chromosomal or monogenic cause.",
    },
    Rule {
        id: "developmental_delay",
        weight: 35,
        phrases: &[
            "developmental_delay",
            "developmental delay",
            "global delay",
            "intellectual disability",
            "speech delay",
            "motor delay",
            "hp:0001263",
        ],
        rationale: "Unexplained developmental delay is a first-tier indication for genetic testing.",
    },
    Rule {
        id: "dysmorphic_features",
        weight: 30,
        phrases: &[
            "dysmorphic_features",
            "dysmorphic",
            "dysmorphism",
            "unusual facial features",
        ],
        rationale: "Dysmorphic features point toward a recognizable syndrome.",
    },
    Rule {
        id: "seizures",
        weight: 30,
        phrases: &["seizure", "epilepsy", "convulsion", "hp:0001250"],
        rationale: "Early or refractory seizures have a high diagnostic yield on genetic testing.",
    },
    Rule {
        id: "growth_abnormality",
        weight: 25,
        phrases: &[
            "growth_abnormality",
            "failure to thrive",
            "short stature",
            "overgrowth",
            "microcephaly",
            "macrocephaly",
            "hp:0000252",
        ],
        rationale: "Growth or head-size abnormalities can reflect an underlying syndrome.",
    },
    Rule {
        id: "hypotonia",
        weight: 25,
        phrases: &["hypotonia", "floppy infant", "hp:0001252"],
        rationale: "Unexplained hypotonia in infancy merits a genetic work-up.",
    },
    Rule {
        id: "consanguinity",
        weight: 20,
        phrases: CONSANGUINITY_PHRASES,
        rationale: "Parental consanguinity increases the risk of autosomal recessive conditions.",
    },
];

const EXTRA_INDICATORS: &[ExtraIndicator] = &[
    ExtraIndicator {
        id: "pancreatic_cancer",
        pathway: Pathway::Oncogenetics,
        weight: 30,
        condition: ExtraCondition::AnyPhrase(&[
            "pancreatic cancer",
            "pancreas cancer",
            "pancreatic adenocarcinoma",
        ]),
        rationale: "Pancreatic cancer meets germline testing criteria regardless of family history.",
    },
    ExtraIndicator {
        id: "pancreatic_melanoma_cluster",
        pathway: Pathway::Oncogenetics,
        weight: 35,
        condition: ExtraCondition::AllGroups(&[&["pancreatic", "pancreas"], &["melanoma"]]),
        rationale: "Pancreatic cancer together with melanoma suggests a CDKN2A-related syndrome.",
    },
    ExtraIndicator {
        id: "advanced_maternal_age",
        pathway: Pathway::Prenatal,
        weight: 15,
        condition: ExtraCondition::PregnantWithMinimumAge(35),
        rationale: "Maternal age of 35 or more raises the baseline risk of aneuploidy.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn phrases_are_lowercase_and_weights_bounded() {
        let registry = RuleRegistry::standard();
        for pathway in Pathway::ALL {
            for descriptor in registry.catalog(pathway) {
                assert!(descriptor.weight <= 100, "{} over 100", descriptor.id);
                for phrase in &descriptor.phrases {
                    assert_eq!(*phrase, phrase.to_lowercase(), "{} phrase case", descriptor.id);
                }
            }
        }
    }

    #[test]
    fn indicator_ids_are_unique_per_pathway() {
        let registry = RuleRegistry::standard();
        for pathway in Pathway::ALL {
            let catalog = registry.catalog(pathway);
            let unique: BTreeSet<_> = catalog.iter().map(|descriptor| descriptor.id).collect();
            assert_eq!(unique.len(), catalog.len(), "duplicate id in {pathway:?}");
        }
    }

    #[test]
    fn lookup_resolves_rules_and_extras_within_pathway() {
        let registry = RuleRegistry::standard();

        let rule = registry
            .lookup(Pathway::Oncogenetics, "multiple_primaries")
            .expect("rule known");
        assert_eq!(rule.weight, 25);

        let extra = registry
            .lookup(Pathway::Oncogenetics, "pancreatic_cancer")
            .expect("extra known");
        assert_eq!(extra.weight, 30);

        assert!(registry.lookup(Pathway::Prenatal, "pancreatic_cancer").is_none());
        assert!(registry.lookup(Pathway::Pediatric, "increased_nt").is_none());
    }

    #[test]
    fn catalog_lists_rules_before_extras() {
        let catalog = RuleRegistry::standard().catalog(Pathway::Oncogenetics);
        let first_extra = catalog
            .iter()
            .position(|descriptor| descriptor.kind == IndicatorKind::Extra)
            .expect("oncogenetics has extras");
        assert!(catalog[..first_extra]
            .iter()
            .all(|descriptor| descriptor.kind == IndicatorKind::Rule));

        let cluster = catalog
            .iter()
            .find(|descriptor| descriptor.id == "pancreatic_melanoma_cluster")
            .expect("cluster listed");
        assert_eq!(cluster.phrases, vec!["pancreatic", "pancreas", "melanoma"]);
    }
}
