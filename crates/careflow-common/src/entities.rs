//! Core intake types shared by the ranker and the web surface.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Condition tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Condition {
    Critical,
    Serious,
    Stable,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::Critical, Condition::Serious, Condition::Stable];

    /// Fixed priority bonus added on top of the free-text lengths.
    pub fn bonus(&self) -> u64 {
        match self {
            Condition::Critical => 10,
            Condition::Serious  => 5,
            Condition::Stable   => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Critical => "Critical",
            Condition::Serious  => "Serious",
            Condition::Stable   => "Stable",
        }
    }

    /// Lenient parse: trimmed, case-insensitive. Anything unrecognised is `Stable`.
    pub fn parse_lenient(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("critical") {
            Condition::Critical
        } else if s.eq_ignore_ascii_case("serious") {
            Condition::Serious
        } else {
            Condition::Stable
        }
    }
}

impl From<&str> for Condition {
    fn from(s: &str) -> Self {
        Condition::parse_lenient(s)
    }
}

impl From<String> for Condition {
    fn from(s: String) -> Self {
        Condition::parse_lenient(&s)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Raw intake record
// ---------------------------------------------------------------------------

/// Raw task input as captured from the intake form, before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub patient_id: String,
    #[serde(default)]
    pub name: String,
    pub age: u8,
    pub condition: Condition,
    #[serde(default)]
    pub vitals: String,
    #[serde(default)]
    pub lab_results: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_tiers_strictly_ordered() {
        assert!(Condition::Critical.bonus() > Condition::Serious.bonus());
        assert!(Condition::Serious.bonus() > Condition::Stable.bonus());
        assert_eq!(Condition::Stable.bonus(), 1);
    }

    #[test]
    fn test_unknown_condition_falls_back_to_stable() {
        assert_eq!(Condition::from("Unknown"), Condition::Stable);
        assert_eq!(Condition::from(""), Condition::Stable);
        assert_eq!(Condition::from(" critical "), Condition::Critical);
        assert_eq!(Condition::from("SERIOUS"), Condition::Serious);
    }

    #[test]
    fn test_new_task_deserializes_free_form_condition() {
        let json = r#"{"patient_id":"7","name":"C","age":52,"condition":"Unknown","vitals":"HR90"}"#;
        let task: NewTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.condition, Condition::Stable);
        assert_eq!(task.lab_results, "");
        assert_eq!(serde_json::to_value(Condition::Critical).unwrap(), "Critical");
    }
}
