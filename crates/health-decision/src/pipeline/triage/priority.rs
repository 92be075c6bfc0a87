use serde::{Deserialize, Serialize};

/// Clinical urgency category. Levels outside the four well-known ones are carried through
/// verbatim so a rule table may introduce its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TriageLevel {
    Emergency,
    HighRisk,
    Moderate,
    Low,
    Other(String),
}

impl TriageLevel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Emergency => "EMERGENCY",
            Self::HighRisk => "HIGH_RISK",
            Self::Moderate => "MODERATE",
            Self::Low => "LOW",
            Self::Other(label) => label,
        }
    }

    /// Built-in ordering used when a level is absent from the configured priority list.
    const fn intrinsic_severity(&self) -> u8 {
        match self {
            Self::Emergency => 3,
            Self::HighRisk => 2,
            Self::Moderate => 1,
            Self::Low | Self::Other(_) => 0,
        }
    }
}

impl From<String> for TriageLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "EMERGENCY" => Self::Emergency,
            "HIGH_RISK" => Self::HighRisk,
            "MODERATE" => Self::Moderate,
            "LOW" => Self::Low,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for TriageLevel {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<TriageLevel> for String {
    fn from(value: TriageLevel) -> Self {
        match value {
            TriageLevel::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total order over levels, most severe first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPriority {
    levels: Vec<TriageLevel>,
}

impl LevelPriority {
    pub fn new(levels: Vec<TriageLevel>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[TriageLevel] {
        &self.levels
    }

    /// Position in the list; lower is more severe.
    pub fn rank(&self, level: &TriageLevel) -> Option<usize> {
        self.levels.iter().position(|candidate| candidate == level)
    }

    pub fn most_severe(&self) -> Option<&TriageLevel> {
        self.levels.first()
    }

    pub fn contains(&self, level: &TriageLevel) -> bool {
        self.rank(level).is_some()
    }

    /// Whether `level` is as severe as `threshold` or more.
    pub fn is_at_least(&self, level: &TriageLevel, threshold: &TriageLevel) -> bool {
        if level == threshold {
            return true;
        }
        match (self.rank(level), self.rank(threshold)) {
            (Some(level_rank), Some(threshold_rank)) => level_rank <= threshold_rank,
            _ => level.intrinsic_severity() >= threshold.intrinsic_severity()
                && level.intrinsic_severity() > 0,
        }
    }
}

impl Default for LevelPriority {
    fn default() -> Self {
        Self::new(vec![
            TriageLevel::Emergency,
            TriageLevel::HighRisk,
            TriageLevel::Moderate,
            TriageLevel::Low,
        ])
    }
}
