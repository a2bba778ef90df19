//! Scored patient task record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use careflow_common::{Condition, NewTask};
use crate::scorer::priority_score;

/// A patient task with its derived priority score.
///
/// The score is computed once in [`PatientTask::score`] and cannot be changed
/// afterwards; there is no edit path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientTask {
    pub patient_id: String,
    pub name: String,
    pub age: u8,
    pub condition: Condition,
    pub vitals: String,
    pub lab_results: String,
    priority_score: u64,
    created_at: DateTime<Utc>,
}

impl PatientTask {
    /// Score a raw intake record.
    pub fn score(input: NewTask) -> Self {
        let priority_score = priority_score(&input.vitals, &input.lab_results, input.condition);
        Self {
            patient_id: input.patient_id,
            name: input.name,
            age: input.age,
            condition: input.condition,
            vitals: input.vitals,
            lab_results: input.lab_results,
            priority_score,
            created_at: Utc::now(),
        }
    }

    pub fn priority_score(&self) -> u64 {
        self.priority_score
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
