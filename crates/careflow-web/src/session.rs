//! Session-scoped task boards.
//!
//! Every UI session owns its own `TaskBoard`; nothing is shared between
//! sessions. Locks are std locks and are never held across an `.await`.
//!
//! Opening a session first evicts sessions idle longer than the TTL. If the
//! registry is still full, the least recently used session with an empty board
//! is evicted. Only when every slot holds tasks is the request refused.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use careflow_common::error::{CareflowError, Result};
use careflow_common::NewTask;
use careflow_ranker::{PatientTask, TaskBoard};

pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    last_access: Mutex<DateTime<Utc>>,
    board: Mutex<TaskBoard>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_access: Mutex::new(now),
            board: Mutex::new(TaskBoard::new()),
        }
    }

    pub fn add_task(&self, input: NewTask) -> PatientTask {
        self.board
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add_task(input)
    }

    /// Run `f` against a consistent snapshot of the board.
    pub fn with_board<R>(&self, f: impl FnOnce(&TaskBoard) -> R) -> R {
        let board = self.board.lock().unwrap_or_else(PoisonError::into_inner);
        f(&board)
    }

    pub fn last_access(&self) -> DateTime<Utc> {
        *self.last_access.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn touch(&self, now: DateTime<Utc>) {
        *self.last_access.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.last_access()).to_std().is_ok_and(|idle| idle > ttl)
    }
}

/// A newly opened session plus any sessions evicted to make room for it.
pub struct Opened {
    pub session: Arc<Session>,
    pub evicted: Vec<Uuid>,
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            idle_ttl,
        }
    }

    pub fn create(&self) -> Result<Opened> {
        self.create_at(Utc::now())
    }

    pub fn create_at(&self, now: DateTime<Utc>) -> Result<Opened> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        let mut evicted: Vec<Uuid> = sessions
            .values()
            .filter(|s| s.is_idle(now, self.idle_ttl))
            .map(|s| s.id)
            .collect();

        if sessions.len() - evicted.len() >= self.max_sessions {
            let spare = sessions
                .values()
                .filter(|s| !evicted.contains(&s.id) && s.with_board(TaskBoard::is_empty))
                .min_by_key(|s| s.last_access())
                .map(|s| s.id);
            match spare {
                Some(id) => evicted.push(id),
                None => return Err(CareflowError::SessionLimitReached(sessions.len())),
            }
        }

        for id in &evicted {
            sessions.remove(id);
            info!(session = %id, "session evicted");
        }

        let session = Arc::new(Session::new(now));
        sessions.insert(session.id, Arc::clone(&session));
        info!(session = %session.id, active = sessions.len(), "session opened");
        Ok(Opened { session, evicted })
    }

    /// Look up a session and mark it as used.
    pub fn get(&self, id: Uuid) -> Result<Arc<Session>> {
        let session = self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(CareflowError::SessionNotFound(id))?;
        session.touch(Utc::now());
        Ok(session)
    }

    pub fn remove(&self, id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        match sessions.remove(&id) {
            Some(_) => {
                info!(session = %id, active = sessions.len(), "session closed");
                Ok(())
            }
            None => Err(CareflowError::SessionNotFound(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careflow_common::Condition;

    const TTL: Duration = Duration::from_secs(60);

    fn intake(id: &str) -> NewTask {
        NewTask {
            patient_id: id.into(),
            name: "N".into(),
            age: 33,
            condition: Condition::Serious,
            vitals: "HR100".into(),
            lab_results: String::new(),
        }
    }

    #[test]
    fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new(8, TTL);
        let a = registry.create().unwrap().session;
        let b = registry.create().unwrap().session;

        a.add_task(intake("a-1"));
        a.add_task(intake("a-2"));
        b.add_task(intake("b-1"));

        assert_eq!(a.with_board(TaskBoard::len), 2);
        assert_eq!(b.with_board(TaskBoard::len), 1);
        let b_ids: Vec<String> = b.with_board(|board| board.iter().map(|t| t.patient_id.clone()).collect());
        assert_eq!(b_ids, vec!["b-1".to_string()]);
    }

    #[test]
    fn test_limit_enforced_when_every_board_has_tasks() {
        let registry = SessionRegistry::new(1, TTL);
        registry.create().unwrap().session.add_task(intake("1"));
        let err = registry.create().err().unwrap();
        assert!(matches!(err, CareflowError::SessionLimitReached(1)));
    }

    #[test]
    fn test_full_registry_evicts_least_recent_empty_board() {
        let registry = SessionRegistry::new(3, TTL);
        let t0 = Utc::now();
        let busy = registry.create_at(t0).unwrap().session;
        busy.add_task(intake("1"));
        let older = registry.create_at(t0 + chrono::Duration::seconds(1)).unwrap().session;
        let newer = registry.create_at(t0 + chrono::Duration::seconds(2)).unwrap().session;

        let opened = registry.create_at(t0 + chrono::Duration::seconds(3)).unwrap();
        assert_eq!(opened.evicted, vec![older.id]);
        assert_eq!(registry.len(), 3);
        assert!(registry.get(busy.id).is_ok());
        assert!(registry.get(newer.id).is_ok());
        assert!(registry.get(older.id).is_err());
    }

    #[test]
    fn test_idle_sessions_swept_on_create() {
        let registry = SessionRegistry::new(8, TTL);
        let t0 = Utc::now();
        let stale = registry.create_at(t0).unwrap().session;
        stale.add_task(intake("1"));

        let later = t0 + chrono::Duration::seconds(61);
        let opened = registry.create_at(later).unwrap();
        assert_eq!(opened.evicted, vec![stale.id]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_recent_access_keeps_session_alive() {
        let registry = SessionRegistry::new(8, TTL);
        let t0 = Utc::now();
        let session = registry.create_at(t0).unwrap().session;
        session.touch(t0 + chrono::Duration::seconds(50));

        let opened = registry.create_at(t0 + chrono::Duration::seconds(100)).unwrap();
        assert!(opened.evicted.is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_frees_slot_and_forgets_board() {
        let registry = SessionRegistry::new(1, TTL);
        let s = registry.create().unwrap().session;
        s.add_task(intake("1"));
        registry.remove(s.id).unwrap();
        assert!(registry.is_empty());
        assert!(matches!(registry.get(s.id), Err(CareflowError::SessionNotFound(_))));
        assert!(registry.create().is_ok());
    }

    #[test]
    fn test_unknown_session() {
        let registry = SessionRegistry::new(4, TTL);
        assert!(registry.get(Uuid::new_v4()).is_err());
        assert!(registry.remove(Uuid::new_v4()).is_err());
    }
}
