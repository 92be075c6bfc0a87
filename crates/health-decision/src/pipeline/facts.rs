use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of one individual's clinical, lifestyle, and nutritional state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthFacts {
    #[serde(default)]
    pub diagnoses: BTreeSet<String>,
    /// Most-recent-first.
    #[serde(default)]
    pub symptoms: Vec<SymptomEntry>,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    #[serde(default)]
    pub bmi: Option<f64>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub medications: BTreeSet<String>,
    #[serde(default)]
    pub supplements: BTreeSet<String>,
    #[serde(default)]
    pub nutrients: Vec<NutrientReading>,
    #[serde(default)]
    pub diet: Option<DietProfile>,
}

impl HealthFacts {
    pub fn has_diagnosis(&self, code: &str) -> bool {
        self.diagnoses.contains(code)
    }

    pub fn has_any_diagnosis(&self, codes: &[&str]) -> bool {
        codes.iter().any(|code| self.diagnoses.contains(*code))
    }

    /// First entry with the given name, which is the most recent one.
    pub fn most_recent_symptom(&self, name: &str) -> Option<&SymptomEntry> {
        self.symptoms.iter().find(|symptom| symptom.name == name)
    }

    pub fn has_symptom(&self, name: &str) -> bool {
        self.symptoms.iter().any(|symptom| symptom.name == name)
    }

    pub fn age_on(&self, as_of: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|birth| age_on(birth, as_of))
    }
}

/// Whole years elapsed from `birth` to `as_of`, accounting for whether the birthday has
/// occurred yet. `None` when `birth` lies after `as_of`.
pub fn age_on(birth: NaiveDate, as_of: NaiveDate) -> Option<u32> {
    let mut years = as_of.year() - birth.year();
    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Body mass index, only when both metrics are present and height is positive.
pub fn body_mass_index(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    match (height_cm, weight_kg) {
        (Some(height), Some(weight)) if height > 0.0 => {
            let meters = height / 100.0;
            Some(weight / (meters * meters))
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomEntry {
    pub name: String,
    pub severity: i32,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifestyle {
    pub smoking: bool,
    pub smoking_severity: SmokingSeverity,
    pub smoking_years: Option<u32>,
    pub cigarettes_per_day: Option<u32>,
    pub smoking_quit_date: Option<NaiveDate>,
    pub vaping: VapingLevel,
    pub vaping_quit_date: Option<NaiveDate>,
    pub alcohol: AlcoholLevel,
    pub alcohol_units_per_week: Option<f64>,
    pub alcohol_frequency: Option<String>,
}

impl Lifestyle {
    pub fn is_vaping(&self) -> bool {
        self.vaping != VapingLevel::None
    }

    /// Typed lookup used by lifestyle rule predicates. Unset optional fields yield `None`.
    pub fn value_of(&self, field: LifestyleField) -> Option<FactValue> {
        match field {
            LifestyleField::Smoking => Some(FactValue::Bool(self.smoking)),
            LifestyleField::SmokingSeverity => {
                Some(FactValue::Text(self.smoking_severity.as_str().to_string()))
            }
            LifestyleField::SmokingYears => self.smoking_years.map(|v| FactValue::Number(v.into())),
            LifestyleField::CigarettesPerDay => {
                self.cigarettes_per_day.map(|v| FactValue::Number(v.into()))
            }
            LifestyleField::SmokingQuitDate => self
                .smoking_quit_date
                .map(|date| FactValue::Text(date.format("%Y-%m-%d").to_string())),
            LifestyleField::Vaping => Some(FactValue::Text(self.vaping.as_str().to_string())),
            LifestyleField::VapingQuitDate => self
                .vaping_quit_date
                .map(|date| FactValue::Text(date.format("%Y-%m-%d").to_string())),
            LifestyleField::Alcohol => Some(FactValue::Text(self.alcohol.as_str().to_string())),
            LifestyleField::AlcoholUnitsPerWeek => self.alcohol_units_per_week.map(FactValue::Number),
            LifestyleField::AlcoholFrequency => {
                self.alcohol_frequency.clone().map(FactValue::Text)
            }
        }
    }
}

/// Closed set of lifestyle keys a rule may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifestyleField {
    Smoking,
    SmokingSeverity,
    SmokingYears,
    CigarettesPerDay,
    SmokingQuitDate,
    Vaping,
    VapingQuitDate,
    Alcohol,
    AlcoholUnitsPerWeek,
    AlcoholFrequency,
}

impl LifestyleField {
    pub fn parse(key: &str) -> Option<Self> {
        let field = match key {
            "smoking" => Self::Smoking,
            "smoking_severity" => Self::SmokingSeverity,
            "smoking_years" => Self::SmokingYears,
            "cigarettes_per_day" => Self::CigarettesPerDay,
            "smoking_quit_date" => Self::SmokingQuitDate,
            "vaping" => Self::Vaping,
            "vaping_quit_date" => Self::VapingQuitDate,
            "alcohol" => Self::Alcohol,
            "alcohol_units_per_week" => Self::AlcoholUnitsPerWeek,
            "alcohol_frequency" => Self::AlcoholFrequency,
            _ => return None,
        };
        Some(field)
    }
}

/// Scalar a lifestyle field can take. Equality is type-sensitive: `Bool(true)` never
/// equals `Text("true")`.
#[derive(Debug, Clone, PartialEq)]
pub enum FactValue {
    Bool(bool),
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingSeverity {
    #[default]
    None,
    Light,
    Moderate,
    Heavy,
}

impl SmokingSeverity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VapingLevel {
    #[default]
    None,
    Low,
    Moderate,
    High,
}

impl VapingLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholLevel {
    #[default]
    #[serde(alias = "none")]
    Low,
    Moderate,
    High,
}

impl AlcoholLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientReading {
    pub code: String,
    pub value: NutrientValue,
    #[serde(default)]
    pub source: Option<String>,
}

/// Either a qualitative status or a raw lab measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NutrientValue {
    Status(NutrientStatus),
    Measured(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientStatus {
    Deficient,
    Suboptimal,
    Optimal,
    Excess,
}

/// Self-reported eating pattern. Every field is optional; a missing profile altogether
/// means no diet data has been collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietProfile {
    pub diet_type: Option<String>,
    pub meals_per_day: Option<u8>,
    #[serde(alias = "protein_frequency")]
    pub protein_level: Option<IntakeLevel>,
    pub fiber_level: Option<IntakeLevel>,
    #[serde(alias = "processed_food_frequency")]
    pub ultra_processed_food_frequency: Option<Frequency>,
    #[serde(alias = "sugar_intake")]
    pub sugar_level: Option<IntakeLevel>,
    pub vegetables_frequency: Option<Frequency>,
    pub fruits_frequency: Option<Frequency>,
    pub fast_food_frequency: Option<Frequency>,
    pub fried_food_frequency: Option<Frequency>,
    pub seeds_nuts_frequency: Option<Frequency>,
    pub whole_grains_frequency: Option<Frequency>,
    pub fish_frequency: Option<Frequency>,
    pub red_meat_frequency: Option<Frequency>,
    pub late_meals: Option<bool>,
    pub breakfast_skipped: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Never,
    Rare,
    Sometimes,
    Weekly,
    Often,
    Daily,
}

impl Frequency {
    pub fn is_frequent(self) -> bool {
        self >= Self::Often
    }

    pub fn is_rare(self) -> bool {
        self <= Self::Rare
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeLevel {
    Low,
    Moderate,
    High,
}
