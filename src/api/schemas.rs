//! Request and response bodies of the HTTP surface

use crate::domain::{EcgExam, EcgReportSegmentation, ReportClassification, User};
use serde::{Deserialize, Serialize};

/// Credentials submitted on login
///
/// The field is called `username` on the wire but carries the e-mail
/// address, which is the account identifier everywhere else.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Authenticated caller profile, without the password
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub name: String,
    pub email: String,
    /// Formatted `DD/MM/YYYY HH:MM:SS` for direct display
    pub created_at: String,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            created_at: user.created_at.format("%d/%m/%Y %H:%M:%S").to_string(),
        }
    }
}

/// Body of the report approval endpoint
///
/// Carries either `report_id` (approve an existing report) or `report`
/// plus optional `report_segmentation` (create and approve a new one).
#[derive(Debug, Deserialize)]
pub struct EcgReportRequest {
    pub exam_id: String,
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default)]
    pub report: Option<ReportClassification>,
    #[serde(default)]
    pub report_segmentation: Option<EcgReportSegmentation>,
}

/// `exam` is null when the review queue is empty
#[derive(Debug, Serialize)]
pub struct NextExamResponse {
    pub exam: Option<EcgExam>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body; the generic shape keeps internal detail out of responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub details: String,
}
