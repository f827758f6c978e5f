use thiserror::Error;

/// Error returned by the strict schema entry points.
///
/// Only host misuse reaches this: syntactically invalid JSON handed to
/// [`crate::Schema::from_json`]. Shape problems inside valid JSON never
/// error, they degrade to empty lists.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_displays_cause() {
        let err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let wrapped = SchemaError::from(err);
        assert!(wrapped.to_string().starts_with("invalid schema JSON:"));
    }
}
