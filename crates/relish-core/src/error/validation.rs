use super::Error;

/// Error when a merged filter references a field the resource does not allow
/// filtering on, or a request clause fails validation.
#[derive(Debug)]
pub(super) struct ValidationError {
    pub(super) detail: Box<str>,
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.detail)
    }
}

impl Error {
    pub fn validation(detail: impl Into<Box<str>>) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            detail: detail.into(),
        }))
    }

    /// Creates the validation error for a filter on a disallowed field.
    pub fn filter_not_allowed(field: &str) -> Error {
        Error::validation(format!("filter on '{field}' not allowed"))
    }
}
