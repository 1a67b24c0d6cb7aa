//! Result type alias using [`LaudoError`]

use super::errors::LaudoError;

/// Result type alias for fallible operations in this crate
pub type Result<T> = std::result::Result<T, LaudoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::LaudoError;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(LaudoError::Unauthorized);
        assert!(result.is_err());
    }
}
