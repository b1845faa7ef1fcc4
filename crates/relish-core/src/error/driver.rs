use super::Error;

/// Error reported by a driver while executing an operation.
#[derive(Debug)]
pub(super) struct DriverError {
    pub(super) detail: Box<str>,
}

impl std::error::Error for DriverError {}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "driver error: {}", self.detail)
    }
}

impl Error {
    pub fn driver(detail: impl Into<Box<str>>) -> Error {
        Error::from(super::ErrorKind::Driver(DriverError {
            detail: detail.into(),
        }))
    }
}
