//! careflow-ranker — Patient task priority scoring and ranking.

pub mod scorer;
pub mod task;
pub mod board;

pub use board::{BoardSummary, TaskBoard};
pub use scorer::priority_score;
pub use task::PatientTask;
