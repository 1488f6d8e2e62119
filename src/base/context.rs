//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting pattern and configuration errors into context-rich
//! `GuardError` variants.

use crate::base::guarderror::GuardError;

/// Extension trait for adding category context to regex compilation results.
pub trait PatternResultExt<T> {
    /// Attach the name of the category whose pattern failed to compile.
    ///
    /// # Example
    /// ```ignore
    /// use cookieguard::base::context::PatternResultExt;
    ///
    /// let re = Regex::new("^(analytics").pattern_context("analytics")?;
    /// // Error: "Invalid pattern for cookie category analytics: ..."
    /// ```
    fn pattern_context(self, category: &str) -> Result<T, GuardError>;
}

impl<T> PatternResultExt<T> for Result<T, regex::Error> {
    fn pattern_context(self, category: &str) -> Result<T, GuardError> {
        self.map_err(|e| GuardError::InvalidPattern {
            category: category.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Extension trait for adding context to configuration parsing results.
pub trait ConfigResultExt<T> {
    /// Name the configuration source that failed to parse.
    fn config_context(self, source: &str) -> Result<T, GuardError>;
}

impl<T> ConfigResultExt<T> for Result<T, serde_json::Error> {
    fn config_context(self, source: &str) -> Result<T, GuardError> {
        self.map_err(|e| GuardError::InvalidConfig(format!("{}: {}", source, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_context() {
        let result = regex::Regex::new("^(analytics");
        let err = result.pattern_context("analytics").unwrap_err();

        match err {
            GuardError::InvalidPattern { category, .. } => {
                assert_eq!(category, "analytics");
            }
            _ => panic!("Expected InvalidPattern"),
        }
    }

    #[test]
    fn test_config_context() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err = result.config_context("guard.json").unwrap_err();

        match err {
            GuardError::InvalidConfig(message) => {
                assert!(message.starts_with("guard.json: "));
            }
            _ => panic!("Expected InvalidConfig"),
        }
    }
}
