//! Result type alias for phi-redact

use super::errors::RedactorError;

/// Result type alias for phi-redact operations
///
/// # Examples
///
/// ```
/// use phi_redact::domain::result::Result;
/// use phi_redact::domain::errors::RedactorError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RedactorError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RedactorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<usize> {
            Ok(64)
        }

        let value = inner()?;
        assert_eq!(value, 64);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(RedactorError::Validation("test error".to_string()));
        assert!(result.is_err());
    }
}
