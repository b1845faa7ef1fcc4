use super::Error;

/// Error when an attribute path names a field or relationship hop that does
/// not exist on the model being walked.
#[derive(Debug)]
pub(super) struct UnknownAttributeError {
    pub(super) model: Box<str>,
    pub(super) attribute: Box<str>,
}

impl std::error::Error for UnknownAttributeError {}

impl core::fmt::Display for UnknownAttributeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown attribute `{}` on model `{}`",
            self.attribute, self.model
        )
    }
}

impl Error {
    pub fn unknown_attribute(model: impl Into<Box<str>>, attribute: impl Into<Box<str>>) -> Error {
        Error::from(super::ErrorKind::UnknownAttribute(UnknownAttributeError {
            model: model.into(),
            attribute: attribute.into(),
        }))
    }
}
