/// A query parameter that cannot be turned into a directive.
///
/// Every variant names the offending field so it can be reported back to the
/// client as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid operator `{key}` on field `{field}`")]
    UnknownOperator { field: String, key: String },

    #[error("operator `{key}` on field `{field}` must have a single value")]
    RepeatedOperator { field: String, key: String },

    #[error("operator `{key}` on field `{field}` cannot be nested")]
    NestedOperator { field: String, key: String },

    #[error("select cannot mix included and excluded fields (`{field}`)")]
    MixedProjection { field: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::UnknownOperator { field, .. }
            | ValidationError::RepeatedOperator { field, .. }
            | ValidationError::NestedOperator { field, .. }
            | ValidationError::MixedProjection { field } => field,
        }
    }
}
