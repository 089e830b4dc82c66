//! Errors from editing or populating the tunables store

/// Parameter store failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Name longer than [`super::PARAM_NAME_LEN`]
    NameTooLong,
    /// No parameter registered under this name
    Unknown,
    /// Value type differs from the registered default
    TypeMismatch,
    /// All [`super::MAX_PARAMS`] slots are taken
    StoreFull,
    /// Dashboard edits are refused for this parameter
    ReadOnly,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ParameterError::NameTooLong => "parameter name too long",
            ParameterError::Unknown => "unknown parameter",
            ParameterError::TypeMismatch => "parameter type mismatch",
            ParameterError::StoreFull => "parameter store full",
            ParameterError::ReadOnly => "parameter is read-only",
        };
        f.write_str(msg)
    }
}
