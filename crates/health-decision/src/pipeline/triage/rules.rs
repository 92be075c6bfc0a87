use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use super::priority::{LevelPriority, TriageLevel};
use crate::pipeline::facts::{FactValue, HealthFacts, LifestyleField};

const THRESHOLD_SUFFIX: &str = "_severity_gte";

/// Errors raised while loading the rule table. Any of these is fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("unable to read triage rules at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("triage rules are not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("triage_levels_priority must list at least one level")]
    EmptyPriority,
    #[error("rule '{0}' is defined more than once")]
    DuplicateRule(String),
    #[error("rule '{rule_id}' uses level '{level}' missing from triage_levels_priority")]
    UnknownLevel { rule_id: String, level: String },
    #[error("rule '{rule_id}' references unknown lifestyle field '{key}'")]
    UnknownLifestyleField { rule_id: String, key: String },
    #[error("rule '{rule_id}' expects an unsupported value for lifestyle field '{key}'")]
    InvalidLifestyleValue { rule_id: String, key: String },
    #[error("rule '{rule_id}' has a non-numeric threshold for '{key}'")]
    InvalidSymptomThreshold { rule_id: String, key: String },
}

/// Serialized shape of the rule table document.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleTableDocument {
    pub rules: Vec<RuleDocument>,
    pub triage_levels_priority: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleDocument {
    pub id: String,
    pub level: String,
    #[serde(default)]
    pub conditions: ConditionsDocument,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionsDocument {
    #[serde(default)]
    pub diagnoses: Option<Vec<String>>,
    #[serde(default)]
    pub lifestyle: Option<Map<String, Value>>,
    #[serde(default)]
    pub symptoms: Option<Map<String, Value>>,
}

/// One compiled condition of a triage rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Every listed diagnosis code must be present.
    DiagnosesInclude(BTreeSet<String>),
    LifestyleEquals {
        field: LifestyleField,
        expected: FactValue,
    },
    /// The most recent entry for `symptom` must have at least `threshold` severity.
    SymptomSeverityAtLeast { symptom: String, threshold: f64 },
    SymptomPresent { symptom: String },
}

impl Predicate {
    pub fn holds(&self, facts: &HealthFacts) -> bool {
        match self {
            Predicate::DiagnosesInclude(codes) => {
                codes.iter().all(|code| facts.diagnoses.contains(code))
            }
            Predicate::LifestyleEquals { field, expected } => {
                facts.lifestyle.value_of(*field).as_ref() == Some(expected)
            }
            Predicate::SymptomSeverityAtLeast { symptom, threshold } => facts
                .most_recent_symptom(symptom)
                .map(|entry| f64::from(entry.severity) >= *threshold)
                .unwrap_or(false),
            Predicate::SymptomPresent { symptom } => facts.has_symptom(symptom),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriageRule {
    pub id: String,
    pub level: TriageLevel,
    pub predicates: Vec<Predicate>,
}

impl TriageRule {
    /// A rule with no predicates matches every set of facts.
    pub fn matches(&self, facts: &HealthFacts) -> bool {
        self.predicates.iter().all(|predicate| predicate.holds(facts))
    }
}

/// Compiled, read-only rule table shared by every evaluation.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<TriageRule>,
    priority: LevelPriority,
}

impl RuleTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleTableError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RuleTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RuleTableError> {
        let document: RuleTableDocument = serde_json::from_str(raw)?;
        Self::compile(document)
    }

    pub fn compile(document: RuleTableDocument) -> Result<Self, RuleTableError> {
        if document.triage_levels_priority.is_empty() {
            return Err(RuleTableError::EmptyPriority);
        }
        let priority = LevelPriority::new(
            document
                .triage_levels_priority
                .into_iter()
                .map(TriageLevel::from)
                .collect(),
        );

        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(document.rules.len());
        for rule in document.rules {
            if !seen.insert(rule.id.clone()) {
                return Err(RuleTableError::DuplicateRule(rule.id));
            }
            let level = TriageLevel::from(rule.level.clone());
            if !priority.contains(&level) {
                return Err(RuleTableError::UnknownLevel {
                    rule_id: rule.id,
                    level: rule.level,
                });
            }
            let predicates = compile_conditions(&rule.id, rule.conditions)?;
            rules.push(TriageRule {
                id: rule.id,
                level,
                predicates,
            });
        }

        Ok(Self { rules, priority })
    }

    pub fn rules(&self) -> &[TriageRule] {
        &self.rules
    }

    pub fn priority(&self) -> &LevelPriority {
        &self.priority
    }
}

fn compile_conditions(
    rule_id: &str,
    conditions: ConditionsDocument,
) -> Result<Vec<Predicate>, RuleTableError> {
    let mut predicates = Vec::new();

    if let Some(diagnoses) = conditions.diagnoses {
        if !diagnoses.is_empty() {
            predicates.push(Predicate::DiagnosesInclude(diagnoses.into_iter().collect()));
        }
    }

    for (key, value) in conditions.lifestyle.unwrap_or_default() {
        let field =
            LifestyleField::parse(&key).ok_or_else(|| RuleTableError::UnknownLifestyleField {
                rule_id: rule_id.to_string(),
                key: key.clone(),
            })?;
        let expected = match value {
            Value::Bool(flag) => FactValue::Bool(flag),
            Value::String(text) => FactValue::Text(text),
            Value::Number(number) => match number.as_f64() {
                Some(number) => FactValue::Number(number),
                None => {
                    return Err(RuleTableError::InvalidLifestyleValue {
                        rule_id: rule_id.to_string(),
                        key,
                    })
                }
            },
            _ => {
                return Err(RuleTableError::InvalidLifestyleValue {
                    rule_id: rule_id.to_string(),
                    key,
                })
            }
        };
        predicates.push(Predicate::LifestyleEquals { field, expected });
    }

    for (key, value) in conditions.symptoms.unwrap_or_default() {
        match key.strip_suffix(THRESHOLD_SUFFIX) {
            Some(name) => {
                let threshold =
                    value
                        .as_f64()
                        .ok_or_else(|| RuleTableError::InvalidSymptomThreshold {
                            rule_id: rule_id.to_string(),
                            key: key.clone(),
                        })?;
                predicates.push(Predicate::SymptomSeverityAtLeast {
                    symptom: threshold_symptom(name).to_string(),
                    threshold,
                });
            }
            None => predicates.push(Predicate::SymptomPresent { symptom: key }),
        }
    }

    Ok(predicates)
}

/// `pain_severity_gte` has always targeted abdominal pain.
fn threshold_symptom(name: &str) -> &str {
    match name {
        "pain" => "abdominal_pain",
        other => other,
    }
}
