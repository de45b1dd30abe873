use thiserror::Error;

/// Validation and contract errors exposed by `fairmark-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("property id cannot be empty")]
    EmptyPropertyId,
    #[error("price must be a positive amount of currency minor units")]
    MissingOrZeroPrice,
    #[error("total_area must be a finite value greater than zero")]
    InvalidArea,

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },

    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("unknown characteristic category '{value}'")]
    UnknownCategory { value: String },
    #[error("characteristic value for '{category}' cannot be empty")]
    EmptyCharacteristicValue { category: &'static str },

    #[error("confidence level must be 0.90, 0.95 or 0.99: {value}")]
    UnsupportedConfidenceLevel { value: f64 },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("coefficient {coefficient} for '{value}' is outside the '{category}' bound [{lower}, {upper}]")]
    CoefficientOutOfBounds {
        category: &'static str,
        value: String,
        coefficient: f64,
        lower: f64,
        upper: f64,
    },
    #[error("bound [{lower}, {upper}] is not a valid positive interval")]
    InvalidBound { lower: f64, upper: f64 },
    #[error("outlier threshold must be positive: {value}")]
    InvalidOutlierThreshold { value: f64 },
    #[error("minimum kept sample must be at least 2: {value}")]
    InvalidSampleFloor { value: usize },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Hard request-level failures.
///
/// Everything else degrades into diagnostics on a successful
/// [`AnalysisResult`](crate::AnalysisResult); only a structurally unusable
/// request surfaces here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("analysis request must include at least one comparable")]
    EmptyComparables,

    #[error("target property failed the input contract: {0}")]
    InvalidTarget(#[source] ValidationError),

    #[error("analysis configuration is invalid: {0}")]
    InvalidConfig(#[source] ValidationError),
}

impl AnalysisError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyComparables => "analysis.empty_comparables",
            Self::InvalidTarget(_) => "analysis.invalid_target",
            Self::InvalidConfig(_) => "analysis.invalid_config",
        }
    }
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
