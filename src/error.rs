//! Error types for the beam solver

use thiserror::Error;

/// Main error type for beam operations
#[derive(Error, Debug)]
pub enum BeamError {
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid restraint '{token}' for {channel} channel: {reason}")]
    InvalidRestraint {
        channel: String,
        token: String,
        reason: String,
    },

    #[error("Invalid load expression '{expr}': {reason}")]
    InvalidExpression { expr: String, reason: String },

    #[error("Coordinate {coordinate} for {item} is not a point on the beam [0, {span}]")]
    OutOfBounds {
        item: String,
        coordinate: f64,
        span: f64,
    },

    #[error("Coordinate {0} already has a support associated with it")]
    DuplicateSupport(f64),

    #[error("Beam is unstable: {0}")]
    Unstable(String),

    #[error("Singular {0} system - supports do not give a unique solution")]
    SingularSystem(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Beam not analysed - run analyse() first")]
    NotAnalyzed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BeamError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BeamError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutOfBounds error
    pub fn out_of_bounds(item: impl Into<String>, coordinate: f64, span: f64) -> Self {
        BeamError::OutOfBounds {
            item: item.into(),
            coordinate,
            span,
        }
    }

    /// Short error code for front ends that map errors to input guidance
    pub fn error_code(&self) -> &'static str {
        match self {
            BeamError::InvalidInput { .. } => "INVALID_INPUT",
            BeamError::InvalidRestraint { .. } => "INVALID_RESTRAINT",
            BeamError::InvalidExpression { .. } => "INVALID_EXPRESSION",
            BeamError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            BeamError::DuplicateSupport(_) => "DUPLICATE_SUPPORT",
            BeamError::Unstable(_) => "UNSTABLE",
            BeamError::SingularSystem(_) => "SINGULAR_SYSTEM",
            BeamError::AnalysisFailed(_) => "ANALYSIS_FAILED",
            BeamError::NotAnalyzed => "NOT_ANALYZED",
            BeamError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

/// Result type for beam operations
pub type BeamResult<T> = Result<T, BeamError>;

/// Reject NaN and infinite values
pub(crate) fn ensure_finite(field: &str, value: f64) -> BeamResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BeamError::invalid_input(field, format!("{} is not a finite number", value)))
    }
}

/// Reject negative coordinates
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> BeamResult<f64> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(BeamError::invalid_input(field, format!("{} must not be negative", value)));
    }
    Ok(value)
}

/// Reject zero and negative magnitudes
pub(crate) fn ensure_positive(field: &str, value: f64) -> BeamResult<f64> {
    ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(BeamError::invalid_input(field, format!("{} must be strictly positive", value)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validators() {
        assert!(ensure_finite("force", f64::NAN).is_err());
        assert!(ensure_non_negative("coordinate", -1.0).is_err());
        assert_eq!(ensure_non_negative("coordinate", 0.0).unwrap(), 0.0);
        assert!(ensure_positive("span", 0.0).is_err());
        assert_eq!(ensure_positive("span", 2.5).unwrap(), 2.5);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(BeamError::DuplicateSupport(1.0).error_code(), "DUPLICATE_SUPPORT");
        assert_eq!(BeamError::NotAnalyzed.error_code(), "NOT_ANALYZED");
        let err = BeamError::out_of_bounds("support", 12.0, 10.0);
        assert!(err.to_string().contains("12"));
    }
}
