use super::Error;

/// Error when the schema fails validation at build time.
#[derive(Debug)]
pub(super) struct InvalidSchemaError {
    pub(super) detail: Box<str>,
}

impl std::error::Error for InvalidSchemaError {}

impl core::fmt::Display for InvalidSchemaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.detail)
    }
}

impl Error {
    pub fn invalid_schema(detail: impl Into<Box<str>>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchemaError {
            detail: detail.into(),
        }))
    }
}
