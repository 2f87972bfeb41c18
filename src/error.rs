// 🚨 Error Types - Reconstruction and regression failures
// Every variant names the field/year (or rule) that triggered it

use thiserror::Error;

/// Fatal errors raised while rebuilding the annual series.
///
/// None of these are recoverable inside the pipeline: they mean the raw
/// input does not have the minimum shape the fill rules assume.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconstructionError {
    /// Input-shape: the economic series has no rows for the country
    #[error("no economic observations for country '{country}'")]
    CountryNotFound { country: String },

    /// Input-shape: the same year appears twice in one raw source
    #[error("year {year} appears more than once in the {source_name} series")]
    DuplicateYear { source_name: &'static str, year: i32 },

    /// Input-shape: an anchor required by a fill rule is absent
    #[error("{rule}: required anchor missing ({detail})")]
    AnchorMissing { rule: &'static str, detail: String },

    /// A base field is still empty after every fill rule ran
    #[error("{field} is missing for year {year} after reconstruction")]
    MissingValue { field: &'static str, year: i32 },

    /// Domain: non-positive value where a positive one is required
    #[error("{field} must be strictly positive in year {year}, got {value}")]
    Domain {
        field: &'static str,
        year: i32,
        value: f64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failures of the least-squares routine, surfaced to the caller unmodified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OlsError {
    #[error("design matrix has {rows} rows but response has {len} values")]
    DimensionMismatch { rows: usize, len: usize },

    #[error("{observations} observations are not enough to estimate {parameters} parameters")]
    InsufficientObservations {
        observations: usize,
        parameters: usize,
    },

    /// X'X could not be inverted (perfect multicollinearity)
    #[error("X'X is singular; regressors are perfectly collinear")]
    Singular,

    #[error("distribution error: {0}")]
    Distribution(String),
}

pub type ReconstructionResult<T> = std::result::Result<T, ReconstructionError>;
