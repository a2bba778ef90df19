//! Owned, insertion-ordered task collection and its ranked view.

use serde::Serialize;
use tracing::debug;

use careflow_common::{Condition, NewTask};
use crate::task::PatientTask;

/// The patient tasks belonging to one session.
///
/// Tasks are kept in insertion order. Ranking never reorders the underlying
/// storage; it produces a sorted view.
#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    tasks: Vec<PatientTask>,
}

/// Tier counts for the dashboard stat cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub total: usize,
    pub critical: usize,
    pub serious: usize,
    pub stable: usize,
    pub highest_score: Option<u64>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score and append a task. Returns the stored record.
    pub fn add_task(&mut self, input: NewTask) -> PatientTask {
        let task = PatientTask::score(input);
        debug!(
            patient_id = %task.patient_id,
            condition = %task.condition,
            score = task.priority_score(),
            "task added"
        );
        self.tasks.push(task.clone());
        task
    }

    /// All tasks by descending priority score. Equal scores keep insertion order.
    pub fn list_by_priority_desc(&self) -> Vec<&PatientTask> {
        let mut ranked: Vec<&PatientTask> = self.tasks.iter().collect();
        // slice::sort_by is stable
        ranked.sort_by(|a, b| b.priority_score().cmp(&a.priority_score()));
        ranked
    }

    /// The `n` highest-priority tasks.
    pub fn top(&self, n: usize) -> Vec<&PatientTask> {
        let mut ranked = self.list_by_priority_desc();
        ranked.truncate(n);
        ranked
    }

    /// Tasks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PatientTask> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn summary(&self) -> BoardSummary {
        let count = |c: Condition| self.tasks.iter().filter(|t| t.condition == c).count();
        BoardSummary {
            total: self.tasks.len(),
            critical: count(Condition::Critical),
            serious: count(Condition::Serious),
            stable: count(Condition::Stable),
            highest_score: self.tasks.iter().map(PatientTask::priority_score).max(),
        }
    }
}
