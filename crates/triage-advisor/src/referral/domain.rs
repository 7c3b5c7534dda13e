use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Referral context selecting which rule set and advisory text apply.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Pathway {
    #[default]
    Oncogenetics,
    Prenatal,
    Pediatric,
}

impl Pathway {
    pub const ALL: [Pathway; 3] = [Pathway::Oncogenetics, Pathway::Prenatal, Pathway::Pediatric];

    pub const fn label(self) -> &'static str {
        match self {
            Pathway::Oncogenetics => "oncogenetics",
            Pathway::Prenatal => "prenatal",
            Pathway::Pediatric => "pediatric",
        }
    }

    /// Parse a caller supplied pathway name, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "oncogenetics" => Some(Pathway::Oncogenetics),
            "prenatal" => Some(Pathway::Prenatal),
            "pediatric" | "paediatric" => Some(Pathway::Pediatric),
            _ => None,
        }
    }

    /// Unknown names fall back to the base pathway instead of failing.
    pub fn parse_or_default(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }
}

/// Pregnancy status captured on the prenatal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyStatus {
    Pregnant,
    NotPregnant,
    Postpartum,
    NotApplicable,
    Unknown,
}

impl PregnancyStatus {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "pregnant" => PregnancyStatus::Pregnant,
            "not_pregnant" => PregnancyStatus::NotPregnant,
            "postpartum" => PregnancyStatus::Postpartum,
            "not_applicable" | "n/a" | "na" => PregnancyStatus::NotApplicable,
            _ => PregnancyStatus::Unknown,
        }
    }
}

/// Everything the caller knows about the patient for one engine invocation.
///
/// Field coercion is deliberately forgiving: numbers may arrive as strings, list fields
/// may arrive as comma separated text, and unexpected JSON kinds collapse to "absent".
/// Bad values surface later as missing-information items, never as errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intake {
    #[serde(default, deserialize_with = "lenient_pathway")]
    pub pathway: Pathway,
    #[serde(default, deserialize_with = "lenient_text")]
    pub patient_age: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub patient_sex: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub chief_concern: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub clinical_notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub family_history_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_pregnancy")]
    pub pregnancy_status: Option<PregnancyStatus>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub gestational_weeks: Option<u32>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub prenatal_findings: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub pediatric_red_flags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub hpo_terms: Vec<String>,
    #[serde(default, deserialize_with = "lenient_optional_list")]
    pub confirmed_flags: Option<Vec<String>>,
}

impl Intake {
    pub fn from_json(raw: &str) -> Result<Self, IntakeError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Age in years when the field holds a usable number.
    pub fn age_years(&self) -> Option<f64> {
        self.patient_age
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|age| age.is_finite() && *age >= 0.0)
    }

    pub fn has_known_sex(&self) -> bool {
        self.patient_sex
            .as_deref()
            .map(str::trim)
            .map(|sex| !sex.is_empty() && !sex.eq_ignore_ascii_case("unknown"))
            .unwrap_or(false)
    }

    pub fn has_chief_concern(&self) -> bool {
        !is_blank(self.chief_concern.as_deref())
    }

    pub fn has_family_history(&self) -> bool {
        !is_blank(self.family_history_summary.as_deref())
    }

    pub fn is_pregnant(&self) -> bool {
        self.pregnancy_status == Some(PregnancyStatus::Pregnant)
    }

    /// Human-confirmed indicators, present only when the list is non-empty.
    ///
    /// An absent list and an explicitly empty list both keep the case in the
    /// proposal step.
    pub fn confirmed(&self) -> Option<&[String]> {
        self.confirmed_flags
            .as_deref()
            .filter(|confirmed| !confirmed.is_empty())
    }
}

/// Failure to read an intake document at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("intake is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Which half of the two-step flow produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentMode {
    ProposeFlags,
    ConfirmedFlags,
}

impl AssessmentMode {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentMode::ProposeFlags => "propose_flags",
            AssessmentMode::ConfirmedFlags => "confirmed_flags",
        }
    }
}

/// Referral priority bucket derived from the confirmed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageCategory {
    Recommended,
    Discuss,
    NotPrioritized,
    PendingConfirmation,
}

impl TriageCategory {
    pub const fn label(self) -> &'static str {
        match self {
            TriageCategory::Recommended => "recommended",
            TriageCategory::Discuss => "discuss",
            TriageCategory::NotPrioritized => "not_prioritized",
            TriageCategory::PendingConfirmation => "pending_confirmation",
        }
    }
}

fn lenient_pathway<'de, D>(deserializer: D) -> Result<Pathway, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => Pathway::parse_or_default(&raw),
        _ => Pathway::default(),
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let text = match value {
        Some(Value::String(raw)) => raw,
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => return Ok(None),
    };
    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

fn lenient_pregnancy<'de, D>(deserializer: D) -> Result<Option<PregnancyStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_text(deserializer)?;
    Ok(text.map(|raw| PregnancyStatus::parse(&raw)))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_text(deserializer)?;
    Ok(text
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 0.0 && *value <= u32::MAX as f64)
        .map(|value| value.trunc() as u32))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_list(deserializer)?.unwrap_or_default())
}

fn lenient_optional_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let entries: Vec<String> = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(raw) => Some(raw),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(raw)) => raw.split(',').map(str::to_string).collect(),
        Some(_) => Vec::new(),
    };
    Ok(Some(dedup_trimmed(entries)))
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |text| text.trim().is_empty())
}

/// Trim entries, drop blanks, and keep the first occurrence of each value.
pub(crate) fn dedup_trimmed<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    for entry in entries {
        let trimmed = entry.as_ref().trim();
        if !trimmed.is_empty() && !seen.iter().any(|existing| existing == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}
