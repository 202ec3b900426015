//! Session lifecycle engine
//!
//! Validates and applies state transitions for a single pomodoro session,
//! including the paused-time bookkeeping. This is pure in-memory logic;
//! the session repository drives it inside one transaction per mutation.
//!
//! Transition table:
//!
//! ```text
//! pending --(activate)--> active
//! active  --(complete)--> completed
//! active  --(cancel)--> cancelled
//! pending --(cancel)--> cancelled
//! ```
//!
//! Completed and cancelled are terminal. Identity transitions are accepted
//! as no-ops so that repeating an identical patch stays idempotent.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::pomodoro::{PomodoroSession, SessionState};

/// Rejected lifecycle patch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },

    #[error("started_at can only be set when a session leaves pending")]
    StartedAtBeforeStart,

    #[error("started_at cannot be changed once set")]
    StartedAtImmutable,

    #[error("completed_at can only be set when a session finishes")]
    CompletedAtBeforeFinish,

    #[error("completed_at cannot be changed once set")]
    CompletedAtImmutable,

    #[error("paused_duration_ms cannot decrease from {current} to {requested}")]
    PausedDurationDecrease { current: i64, requested: i64 },

    #[error("paused_duration_ms cannot change after a session finishes")]
    PausedDurationAfterFinish,
}

/// Partial update to a session; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub state: Option<SessionState>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub paused_duration_ms: Option<i64>,
}

/// True when the edge appears in the transition table
pub fn is_legal_transition(from: SessionState, to: SessionState) -> bool {
    use SessionState::*;
    from == to
        || matches!(
            (from, to),
            (Pending, Active) | (Pending, Cancelled) | (Active, Completed) | (Active, Cancelled)
        )
}

/// Apply a patch to a session, enforcing the transition table and the
/// timestamp and paused-time invariants
///
/// Rules:
/// - the requested state must be a declared edge from the current state;
/// - entering `active` sets `started_at` (patch value or `now`);
/// - entering a terminal state sets `completed_at` (patch value or `now`);
/// - timestamps are write-once: re-sending the stored value is accepted,
///   anything else is rejected, and they can never be cleared;
/// - `paused_duration_ms` never decreases, and freezes once the session
///   reaches a terminal state;
/// - every accepted patch refreshes `updated_at`.
pub fn apply_patch(
    session: &PomodoroSession,
    patch: &SessionPatch,
    now: DateTime<Utc>,
) -> Result<PomodoroSession, LifecycleError> {
    let mut updated = session.clone();
    let target = patch.state.unwrap_or(session.state);

    if !is_legal_transition(session.state, target) {
        return Err(LifecycleError::InvalidTransition {
            from: session.state,
            to: target,
        });
    }
    updated.state = target;

    if let Some(started_at) = patch.started_at {
        if target == SessionState::Pending {
            return Err(LifecycleError::StartedAtBeforeStart);
        }
        match session.started_at {
            Some(existing) if existing != started_at => {
                return Err(LifecycleError::StartedAtImmutable);
            }
            _ => updated.started_at = Some(started_at),
        }
    } else if session.state == SessionState::Pending && target == SessionState::Active {
        updated.started_at = Some(now);
    }

    if let Some(completed_at) = patch.completed_at {
        if !target.is_terminal() {
            return Err(LifecycleError::CompletedAtBeforeFinish);
        }
        match session.completed_at {
            Some(existing) if existing != completed_at => {
                return Err(LifecycleError::CompletedAtImmutable);
            }
            _ => updated.completed_at = Some(completed_at),
        }
    } else if target.is_terminal() && !session.state.is_terminal() {
        updated.completed_at = Some(now);
    }

    if let Some(paused) = patch.paused_duration_ms {
        if paused < session.paused_duration_ms {
            return Err(LifecycleError::PausedDurationDecrease {
                current: session.paused_duration_ms,
                requested: paused,
            });
        }
        // terminal sessions are frozen; resending the stored value is fine
        if session.state.is_terminal() && paused != session.paused_duration_ms {
            return Err(LifecycleError::PausedDurationAfterFinish);
        }
        updated.paused_duration_ms = paused;
    }

    updated.updated_at = Some(now);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pomodoro::SessionType;
    use chrono::TimeZone;

    fn pending_session() -> PomodoroSession {
        PomodoroSession {
            id: 1,
            task_id: None,
            session_type: SessionType::Focus,
            duration: 25,
            state: SessionState::Pending,
            started_at: None,
            completed_at: None,
            paused_duration_ms: 0,
            created_at: Utc.with_ymd_and_hms(2026, 8, 28, 9, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    fn active_session() -> PomodoroSession {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 5, 0).unwrap();
        apply_patch(
            &pending_session(),
            &SessionPatch {
                state: Some(SessionState::Active),
                ..Default::default()
            },
            now,
        )
        .unwrap()
    }

    #[test]
    fn test_transition_table() {
        use SessionState::*;
        assert!(is_legal_transition(Pending, Active));
        assert!(is_legal_transition(Pending, Cancelled));
        assert!(is_legal_transition(Active, Completed));
        assert!(is_legal_transition(Active, Cancelled));

        assert!(!is_legal_transition(Pending, Completed));
        assert!(!is_legal_transition(Active, Pending));
        assert!(!is_legal_transition(Completed, Active));
        assert!(!is_legal_transition(Cancelled, Active));
        assert!(!is_legal_transition(Completed, Pending));

        // identity edges are no-ops, not violations
        assert!(is_legal_transition(Active, Active));
        assert!(is_legal_transition(Completed, Completed));
    }

    #[test]
    fn test_activation_sets_started_at() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 5, 0).unwrap();
        let updated = apply_patch(
            &pending_session(),
            &SessionPatch {
                state: Some(SessionState::Active),
                ..Default::default()
            },
            now,
        )
        .unwrap();

        assert_eq!(updated.state, SessionState::Active);
        assert_eq!(updated.started_at, Some(now));
        assert_eq!(updated.completed_at, None);
        assert_eq!(updated.updated_at, Some(now));
    }

    #[test]
    fn test_completion_sets_completed_at() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 30, 0).unwrap();
        let updated = apply_patch(
            &active_session(),
            &SessionPatch {
                state: Some(SessionState::Completed),
                ..Default::default()
            },
            now,
        )
        .unwrap();

        assert_eq!(updated.state, SessionState::Completed);
        assert_eq!(updated.completed_at, Some(now));
    }

    #[test]
    fn test_cancel_from_pending() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 1, 0).unwrap();
        let updated = apply_patch(
            &pending_session(),
            &SessionPatch {
                state: Some(SessionState::Cancelled),
                ..Default::default()
            },
            now,
        )
        .unwrap();

        assert_eq!(updated.state, SessionState::Cancelled);
        // never activated, so started_at stays absent
        assert_eq!(updated.started_at, None);
        assert_eq!(updated.completed_at, Some(now));
    }

    #[test]
    fn test_terminal_state_rejects_reactivation() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 30, 0).unwrap();
        let completed = apply_patch(
            &active_session(),
            &SessionPatch {
                state: Some(SessionState::Completed),
                ..Default::default()
            },
            now,
        )
        .unwrap();

        let err = apply_patch(
            &completed,
            &SessionPatch {
                state: Some(SessionState::Active),
                ..Default::default()
            },
            now,
        )
        .unwrap_err();

        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: SessionState::Completed,
                to: SessionState::Active,
            }
        );
    }

    #[test]
    fn test_pending_cannot_complete_directly() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 1, 0).unwrap();
        let err = apply_patch(
            &pending_session(),
            &SessionPatch {
                state: Some(SessionState::Completed),
                ..Default::default()
            },
            now,
        )
        .unwrap_err();

        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
    }

    #[test]
    fn test_started_at_rejected_while_pending() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 1, 0).unwrap();
        let err = apply_patch(
            &pending_session(),
            &SessionPatch {
                started_at: Some(now),
                ..Default::default()
            },
            now,
        )
        .unwrap_err();

        assert_eq!(err, LifecycleError::StartedAtBeforeStart);
    }

    #[test]
    fn test_started_at_cannot_change_once_set() {
        let session = active_session();
        let other = Utc.with_ymd_and_hms(2026, 8, 28, 10, 0, 0).unwrap();
        let err = apply_patch(
            &session,
            &SessionPatch {
                started_at: Some(other),
                ..Default::default()
            },
            other,
        )
        .unwrap_err();

        assert_eq!(err, LifecycleError::StartedAtImmutable);
    }

    #[test]
    fn test_resending_stored_started_at_is_accepted() {
        let session = active_session();
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 10, 0, 0).unwrap();
        let updated = apply_patch(
            &session,
            &SessionPatch {
                started_at: session.started_at,
                ..Default::default()
            },
            now,
        )
        .unwrap();

        assert_eq!(updated.started_at, session.started_at);
    }

    #[test]
    fn test_completed_at_requires_terminal_target() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 30, 0).unwrap();
        let err = apply_patch(
            &active_session(),
            &SessionPatch {
                completed_at: Some(now),
                ..Default::default()
            },
            now,
        )
        .unwrap_err();

        assert_eq!(err, LifecycleError::CompletedAtBeforeFinish);
    }

    #[test]
    fn test_explicit_completed_at_is_used() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 30, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2026, 8, 27, 22, 0, 0).unwrap();
        let updated = apply_patch(
            &active_session(),
            &SessionPatch {
                state: Some(SessionState::Completed),
                completed_at: Some(yesterday),
                ..Default::default()
            },
            now,
        )
        .unwrap();

        assert_eq!(updated.completed_at, Some(yesterday));
    }

    #[test]
    fn test_paused_duration_accumulates() {
        let session = active_session();
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 10, 0).unwrap();

        let updated = apply_patch(
            &session,
            &SessionPatch {
                paused_duration_ms: Some(30_000),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        assert_eq!(updated.paused_duration_ms, 30_000);
        // pause accounting does not change the state
        assert_eq!(updated.state, SessionState::Active);

        let err = apply_patch(
            &updated,
            &SessionPatch {
                paused_duration_ms: Some(10_000),
                ..Default::default()
            },
            now,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::PausedDurationDecrease {
                current: 30_000,
                requested: 10_000,
            }
        );
    }

    #[test]
    fn test_paused_duration_frozen_after_finish() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 30, 0).unwrap();
        let paused = apply_patch(
            &active_session(),
            &SessionPatch {
                paused_duration_ms: Some(30_000),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        let completed = apply_patch(
            &paused,
            &SessionPatch {
                state: Some(SessionState::Completed),
                ..Default::default()
            },
            now,
        )
        .unwrap();

        // an identity transition must not reopen the pause accounting
        let err = apply_patch(
            &completed,
            &SessionPatch {
                state: Some(SessionState::Completed),
                paused_duration_ms: Some(60_000),
                ..Default::default()
            },
            now,
        )
        .unwrap_err();
        assert_eq!(err, LifecycleError::PausedDurationAfterFinish);

        // resending the stored value stays idempotent
        let unchanged = apply_patch(
            &completed,
            &SessionPatch {
                paused_duration_ms: Some(30_000),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        assert_eq!(unchanged.paused_duration_ms, 30_000);
    }

    #[test]
    fn test_identical_patch_is_idempotent() {
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 10, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 8, 28, 9, 11, 0).unwrap();
        let patch = SessionPatch {
            state: Some(SessionState::Active),
            paused_duration_ms: Some(5_000),
            ..Default::default()
        };

        let first = apply_patch(&active_session(), &patch, now).unwrap();
        let second = apply_patch(&first, &patch, later).unwrap();

        assert_eq!(second.state, first.state);
        assert_eq!(second.started_at, first.started_at);
        assert_eq!(second.completed_at, first.completed_at);
        assert_eq!(second.paused_duration_ms, first.paused_duration_ms);
        // updated_at refreshes monotonically
        assert_eq!(second.updated_at, Some(later));
    }

    #[test]
    fn test_empty_patch_refreshes_updated_at_only() {
        let session = active_session();
        let now = Utc.with_ymd_and_hms(2026, 8, 28, 9, 10, 0).unwrap();
        let updated = apply_patch(&session, &SessionPatch::default(), now).unwrap();

        assert_eq!(updated.state, session.state);
        assert_eq!(updated.started_at, session.started_at);
        assert_eq!(updated.paused_duration_ms, session.paused_duration_ms);
        assert_eq!(updated.updated_at, Some(now));
    }
}
