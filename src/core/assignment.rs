//! Exam assignment workflow
//!
//! Hands the next unreported exam to an authenticated reviewer, taking the
//! reporting lock. Per exam the states are `Idle` (not reporting, not
//! approved) → `Reporting` → `Approved` (terminal); this workflow owns the
//! `Idle → Reporting` transition.

use crate::auth::TokenVerifier;
use crate::domain::result::Result;
use crate::domain::{EcgExam, LaudoError};
use crate::repositories::{ExamGuard, ExamRepository, GuardedWrite, UserRepository};
use chrono::{SubsecRound, Utc};
use std::sync::Arc;

/// Upper bound on reselect attempts after lost compare-and-swap races
const MAX_ASSIGN_ATTEMPTS: usize = 5;

/// Orchestrates acquiring the reporting lock on the next available exam
#[derive(Clone)]
pub struct AssignmentWorkflow {
    users: UserRepository,
    exams: ExamRepository,
    tokens: Arc<dyn TokenVerifier>,
}

impl AssignmentWorkflow {
    pub fn new(
        users: UserRepository,
        exams: ExamRepository,
        tokens: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            users,
            exams,
            tokens,
        }
    }

    /// Returns the next exam to review, locked for the caller
    ///
    /// `Ok(None)` is the valid "nothing to review" outcome. An exam that
    /// is already in `Reporting` state is returned as-is with no write:
    /// the re-fetch is idempotent and keeps the original
    /// `reporting_started_at`. A fresh exam is locked with a conditional
    /// write; losing that race re-selects instead of clobbering the
    /// winner's lock.
    pub async fn next_exam(&self, token: Option<&str>) -> Result<Option<EcgExam>> {
        let user = super::authenticate(&self.users, self.tokens.as_ref(), token).await?;

        for attempt in 1..=MAX_ASSIGN_ATTEMPTS {
            let Some(mut exam) = self.exams.get_next_unreported().await else {
                tracing::debug!(reviewer = %user.email, "No unreported exam available");
                return Ok(None);
            };

            if exam.is_reporting {
                tracing::info!(
                    exam_id = %exam.id,
                    reviewer = %user.email,
                    "Resuming in-progress exam"
                );
                return Ok(Some(exam));
            }

            // Whole seconds: the record codec persists epoch seconds, and
            // the exam handed back must equal what was stored.
            exam.begin_reporting(Utc::now().trunc_subsecs(0))?;
            match self.exams.update_guarded(&exam, ExamGuard::NotReporting).await {
                GuardedWrite::Applied => {
                    tracing::info!(
                        exam_id = %exam.id,
                        reviewer = %user.email,
                        "Exam assigned for reporting"
                    );
                    return Ok(Some(exam));
                }
                GuardedWrite::Conflict => {
                    tracing::debug!(
                        exam_id = %exam.id,
                        attempt,
                        "Assignment race lost, reselecting"
                    );
                    continue;
                }
                GuardedWrite::Failed => {
                    // The caller must not believe they hold the exam if
                    // the lock write did not land.
                    return Err(LaudoError::Unprocessable(
                        "could not start reporting the ECG exam".to_string(),
                    ));
                }
            }
        }

        Err(LaudoError::Unprocessable(
            "could not acquire an exam after repeated conflicts".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryTable;
    use crate::domain::classification::{Gender, UserRole};
    use crate::domain::User;
    use chrono::DateTime;

    struct StaticVerifier(Option<String>);

    impl TokenVerifier for StaticVerifier {
        fn verify(&self, _token: &str) -> Option<String> {
            self.0.clone()
        }
    }

    fn at(secs: i64) -> chrono::DateTime<chrono::Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn exam(id: &str, made_at_secs: i64) -> EcgExam {
        EcgExam::new(
            id,
            format!("s3://ecg-exams/{id}.dat"),
            at(made_at_secs),
            Gender::Other,
            "1980-01-01",
            "10mm/mV",
            "25mm/s",
        )
        .unwrap()
    }

    async fn workflow_with(exams: &[EcgExam]) -> (AssignmentWorkflow, ExamRepository) {
        let store = Arc::new(MemoryTable::new());
        let users = UserRepository::new(store.clone());
        let repo = ExamRepository::new(store);

        users
            .create(&User::new(
                "Dr. Reviewer",
                "reviewer@example.com",
                "pw",
                UserRole::Doctor,
                at(0),
            ))
            .await;
        for exam in exams {
            assert!(repo.create(exam).await);
        }

        let verifier = Arc::new(StaticVerifier(Some("reviewer@example.com".to_string())));
        (
            AssignmentWorkflow::new(users, repo.clone(), verifier),
            repo,
        )
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (workflow, _) = workflow_with(&[]).await;
        let result = workflow.next_exam(None).await;
        assert!(matches!(result, Err(LaudoError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unauthorized() {
        let store = Arc::new(MemoryTable::new());
        let workflow = AssignmentWorkflow::new(
            UserRepository::new(store.clone()),
            ExamRepository::new(store),
            Arc::new(StaticVerifier(Some("ghost@example.com".to_string()))),
        );
        let result = workflow.next_exam(Some("token")).await;
        assert!(matches!(result, Err(LaudoError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_empty_exam_set_is_not_an_error() {
        let (workflow, _) = workflow_with(&[]).await;
        let assigned = workflow.next_exam(Some("token")).await.unwrap();
        assert!(assigned.is_none());
    }

    #[tokio::test]
    async fn test_assignment_takes_the_lock() {
        let (workflow, repo) = workflow_with(&[exam("exam-1", 100)]).await;

        let assigned = workflow.next_exam(Some("token")).await.unwrap().unwrap();
        assert!(assigned.is_reporting);
        assert!(assigned.reporting_started_at.is_some());

        let stored = repo.get_by_id("exam-1").await.unwrap();
        assert!(stored.is_reporting);
    }

    #[tokio::test]
    async fn test_second_call_is_idempotent() {
        let (workflow, repo) = workflow_with(&[exam("exam-1", 100)]).await;

        let first = workflow.next_exam(Some("token")).await.unwrap().unwrap();
        let started_at = repo
            .get_by_id("exam-1")
            .await
            .unwrap()
            .reporting_started_at;

        let second = workflow.next_exam(Some("token")).await.unwrap().unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.reporting_started_at, started_at);

        // No extra write: the stored lock timestamp is unchanged.
        let stored = repo.get_by_id("exam-1").await.unwrap();
        assert_eq!(stored.reporting_started_at, started_at);
    }
}
