//! Priority score computation.
//!
//! score = len(vitals) + len(lab_results) + bonus(condition)
//!
//! Lengths are counted in characters, not bytes, so a reading such as
//! "37.5°C" scores the same however it is encoded.

use careflow_common::Condition;

/// Compute the priority score for one task. Pure and total.
pub fn priority_score(vitals: &str, lab_results: &str, condition: Condition) -> u64 {
    text_weight(vitals) + text_weight(lab_results) + condition.bonus()
}

fn text_weight(text: &str) -> u64 {
    text.chars().count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_tiers_order_scores() {
        let (v, l) = ("BP120/80", "WBC 7.2");
        let critical = priority_score(v, l, Condition::Critical);
        let serious  = priority_score(v, l, Condition::Serious);
        let stable   = priority_score(v, l, Condition::Stable);
        assert!(critical > serious && serious > stable);
    }

    #[test]
    fn test_reference_scores() {
        assert_eq!(priority_score("BP120", "WBC5", Condition::Stable), 11);
        assert_eq!(priority_score("BP130/80", "WBC-high", Condition::Critical), 26);
    }

    #[test]
    fn test_empty_text_scores_bonus_only() {
        assert_eq!(priority_score("", "", Condition::Serious), 5);
    }

    #[test]
    fn test_unknown_condition_scores_as_stable() {
        let unknown = priority_score("HR88", "", Condition::from("Unknown"));
        assert_eq!(unknown, priority_score("HR88", "", Condition::Stable));
        assert_eq!(unknown, 4 + 1);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // "°" is two bytes in UTF-8
        assert_eq!(priority_score("37.5°C", "", Condition::Stable), 6 + 1);
    }

    #[test]
    fn test_deterministic() {
        let a = priority_score("SpO2 91%", "lactate 4.1", Condition::Critical);
        let b = priority_score("SpO2 91%", "lactate 4.1", Condition::Critical);
        assert_eq!(a, b);
    }
}
