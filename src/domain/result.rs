//! Result type alias for PharmaStore

use super::errors::PharmaError;

/// Result type alias for PharmaStore operations
///
/// # Examples
///
/// ```
/// use pharmastore::domain::result::Result;
/// use pharmastore::domain::errors::PharmaError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PharmaError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PharmaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(PharmaError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
