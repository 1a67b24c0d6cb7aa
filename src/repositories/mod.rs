//! Repositories over the storage collaborator

pub mod exams;
pub mod users;

pub use exams::{ExamGuard, ExamRepository, GuardedWrite, SortOrder};
pub use users::UserRepository;
