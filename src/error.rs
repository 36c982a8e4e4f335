use thiserror::Error;

/// Failures the generator can report before emitting any text.
///
/// These are local precondition violations; nothing is retried and no
/// partial output is ever produced alongside one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// Two used elements derive the same Java field name
    #[error("elements `{first}` and `{second}` both derive field name `{name}`")]
    InvalidFieldName {
        name: String,
        first: String,
        second: String,
    },

    /// Naming selector outside the known set
    #[error("unrecognized field naming policy `{0}` (expected `raw`, `camel` or `prefixed`)")]
    UnrecognizedNamingPolicy(String),

    /// An EditText selected for validation has no usable hint
    /// (only reported when the session demands strict hints)
    #[error("EditText `{0}` is selected for validation but has no usable hint")]
    EmptyHintForValidatedField(String),
}
