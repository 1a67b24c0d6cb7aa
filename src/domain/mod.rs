//! Domain models and types
//!
//! The domain layer holds the entities of the review workflow (exam,
//! report, segmentation, user), the closed diagnostic vocabularies, the
//! flat persistence representation they map to, and the error taxonomy.
//! State transitions live on the entities; orchestration lives in
//! [`crate::core`].

pub mod classification;
pub mod errors;
pub mod exam;
pub mod record;
pub mod report;
pub mod result;
pub mod user;

// Re-export commonly used types for convenience
pub use classification::{Gender, ReportClassification, SegmentationCategory, UserRole};
pub use errors::{LaudoError, StorageError};
pub use exam::EcgExam;
pub use record::{Record, Value};
pub use report::{EcgReport, EcgReportApproval, EcgReportSegmentation};
pub use result::Result;
pub use user::User;
