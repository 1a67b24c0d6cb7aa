//! Report approval workflow
//!
//! Closes out an exam: designates a principal report, marks the exam
//! approved, clears the reporting lock. Approval is single-shot and
//! non-overwritable; concurrent approvers of the same exam are serialized
//! by the guarded write, never by wall-clock luck.

use crate::auth::TokenVerifier;
use crate::domain::result::Result;
use crate::domain::{EcgReport, EcgReportSegmentation, LaudoError, ReportClassification};
use crate::repositories::{ExamGuard, ExamRepository, GuardedWrite, UserRepository};
use chrono::{SubsecRound, Utc};
use std::sync::Arc;

/// Input of one approval call
///
/// Either `report_id` references a report already attached to the exam,
/// or `classification` (with optional `segmentation`) describes a new one.
#[derive(Debug, Clone)]
pub struct ApproveReportCommand {
    pub exam_id: String,
    pub report_id: Option<String>,
    pub classification: Option<ReportClassification>,
    pub segmentation: Option<EcgReportSegmentation>,
}

/// Orchestrates selecting/creating a report and approving it as principal
#[derive(Clone)]
pub struct ApprovalWorkflow {
    users: UserRepository,
    exams: ExamRepository,
    tokens: Arc<dyn TokenVerifier>,
}

impl ApprovalWorkflow {
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

    /// Approves an exam with the resolved report
    ///
    /// The side effect is exactly one guarded full-record replace; callers
    /// re-fetch state separately, so success carries no payload.
    pub async fn approve(&self, token: Option<&str>, command: ApproveReportCommand) -> Result<()> {
        let user = super::authenticate(&self.users, self.tokens.as_ref(), token).await?;

        let mut exam = self
            .exams
            .get_by_id(&command.exam_id)
            .await
            .ok_or_else(|| LaudoError::Unprocessable("exam not found".to_string()))?;

        if exam.approved || exam.principal_report.is_some() {
            return Err(LaudoError::Unprocessable(
                "exam already has a principal report".to_string(),
            ));
        }

        // Whole seconds, matching the persisted epoch-second precision
        let now = Utc::now().trunc_subsecs(0);
        let report = match &command.report_id {
            Some(report_id) => exam
                .reports
                .iter()
                .find(|report| &report.id == report_id)
                .cloned()
                .ok_or_else(|| LaudoError::Unprocessable("report not found".to_string()))?,
            None => {
                let classification = command.classification.ok_or_else(|| {
                    LaudoError::Unprocessable("report classification is required".to_string())
                })?;
                if let Some(segmentation) = &command.segmentation {
                    segmentation.validate()?;
                }
                let report =
                    EcgReport::new(classification, command.segmentation, user.email.clone(), now);
                exam.reports.push(report.clone());
                report
            }
        };

        exam.approve_with(report, now)?;

        match self.exams.update_guarded(&exam, ExamGuard::NotApproved).await {
            GuardedWrite::Applied => {
                tracing::info!(
                    exam_id = %exam.id,
                    approver = %user.email,
                    "Exam approved with principal report"
                );
                Ok(())
            }
            GuardedWrite::Conflict => Err(LaudoError::Unprocessable(
                "exam already has a principal report".to_string(),
            )),
            GuardedWrite::Failed => Err(LaudoError::Unprocessable(
                "could not persist the approved exam".to_string(),
            )),
        }
    }
}
