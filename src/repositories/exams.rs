//! Exam repository
//!
//! Owns reads and writes of exam records over the storage trait. Nothing
//! here raises across the boundary: operations report success flags or
//! empty results and log the underlying fault; workflows translate a
//! non-success into the appropriate typed failure.

use crate::adapters::storage::{StorageTable, WriteCondition};
use crate::domain::record::{make_key, EXAM_KEY_PREFIX};
use crate::domain::{EcgExam, StorageError};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Scan ordering over the exam's acquisition time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Field guard for a conditional exam replace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamGuard {
    /// Write only while `is_reporting` is still false (assignment CAS)
    NotReporting,
    /// Write only while `approved` is still false (approval CAS)
    NotApproved,
}

impl ExamGuard {
    fn condition(self) -> WriteCondition {
        match self {
            ExamGuard::NotReporting => WriteCondition::field_is("is_reporting", false),
            ExamGuard::NotApproved => WriteCondition::field_is("approved", false),
        }
    }
}

/// Outcome of a guarded exam write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedWrite {
    /// The conditional replace landed
    Applied,
    /// A concurrent writer transitioned the guarded field first
    Conflict,
    /// Backend fault; details were logged
    Failed,
}

/// Repository for [`EcgExam`] records
#[derive(Clone)]
pub struct ExamRepository {
    store: Arc<dyn StorageTable>,
}

impl ExamRepository {
    pub fn new(store: Arc<dyn StorageTable>) -> Self {
        Self { store }
    }

    /// Point lookup; `None` both for a missing record and a logged fault
    pub async fn get_by_id(&self, exam_id: &str) -> Option<EcgExam> {
        let pk = make_key(EXAM_KEY_PREFIX, exam_id);
        match self.store.get_item(&pk).await {
            Ok(Some(record)) => match EcgExam::from_record(record) {
                Ok(exam) => Some(exam),
                Err(error) => {
                    tracing::error!(exam_id, %error, "Stored exam record is malformed");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                tracing::error!(exam_id, %error, "Failed to read exam");
                None
            }
        }
    }

    /// Inserts a new exam; a duplicate identifier is a logged non-success
    pub async fn create(&self, exam: &EcgExam) -> bool {
        match self
            .store
            .put_item(exam.to_record(), WriteCondition::NotExists)
            .await
        {
            Ok(()) => true,
            Err(StorageError::ConditionFailed) => {
                tracing::warn!(exam_id = %exam.id, "Exam already exists, create skipped");
                false
            }
            Err(error) => {
                tracing::error!(exam_id = %exam.id, %error, "Failed to create exam");
                false
            }
        }
    }

    /// Full-record replace, last writer wins
    ///
    /// Workflow transitions must use [`Self::update_guarded`] instead; this
    /// path remains for administrative rewrites.
    pub async fn update(&self, exam: &EcgExam) -> bool {
        match self
            .store
            .put_item(exam.to_record(), WriteCondition::None)
            .await
        {
            Ok(()) => true,
            Err(error) => {
                tracing::error!(exam_id = %exam.id, %error, "Failed to update exam");
                false
            }
        }
    }

    /// Conditional full-record replace guarding the field being transitioned
    pub async fn update_guarded(&self, exam: &EcgExam, guard: ExamGuard) -> GuardedWrite {
        match self.store.put_item(exam.to_record(), guard.condition()).await {
            Ok(()) => GuardedWrite::Applied,
            Err(StorageError::ConditionFailed) => {
                tracing::debug!(exam_id = %exam.id, ?guard, "Guarded exam write lost the race");
                GuardedWrite::Conflict
            }
            Err(error) => {
                tracing::error!(exam_id = %exam.id, %error, "Failed guarded exam write");
                GuardedWrite::Failed
            }
        }
    }

    /// Selects the next exam to review
    ///
    /// Among unapproved exams an in-progress one (interrupted review) is
    /// preferred over an idle one; within either class the earliest
    /// acquisition time wins. `None` means nothing is eligible.
    pub async fn get_next_unreported(&self) -> Option<EcgExam> {
        let exams = self.scan_exams().await;

        exams
            .into_iter()
            .filter(|exam| !exam.approved)
            .min_by_key(|exam| (!exam.is_reporting, exam.made_at))
    }

    /// Paginated scan ordered by acquisition time
    pub async fn list(
        &self,
        limit: usize,
        offset: usize,
        approved: Option<bool>,
        order: SortOrder,
    ) -> Vec<EcgExam> {
        let mut exams: Vec<EcgExam> = self
            .scan_exams()
            .await
            .into_iter()
            .filter(|exam| approved.map_or(true, |wanted| exam.approved == wanted))
            .collect();

        exams.sort_by_key(|exam| exam.made_at);
        if order == SortOrder::Descending {
            exams.reverse();
        }

        exams.into_iter().skip(offset).take(limit).collect()
    }

    /// Counts exams matching the filter, with inclusive `made_at` bounds
    pub async fn count(
        &self,
        approved: Option<bool>,
        date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> usize {
        self.scan_exams()
            .await
            .into_iter()
            .filter(|exam| approved.map_or(true, |wanted| exam.approved == wanted))
            .filter(|exam| {
                date_range.map_or(true, |(from, to)| {
                    exam.made_at >= from && exam.made_at <= to
                })
            })
            .count()
    }

    async fn scan_exams(&self) -> Vec<EcgExam> {
        let prefix = format!("{EXAM_KEY_PREFIX}#");
        let records = match self.store.scan(&prefix).await {
            Ok(records) => records,
            Err(error) => {
                tracing::error!(%error, "Failed to scan exams");
                return Vec::new();
            }
        };

        records
            .into_iter()
            .filter_map(|record| match EcgExam::from_record(record) {
                Ok(exam) => Some(exam),
                Err(error) => {
                    // One malformed record must not hide the rest.
                    tracing::error!(%error, "Skipping malformed exam record");
                    None
                }
            })
            .collect()
    }
}
