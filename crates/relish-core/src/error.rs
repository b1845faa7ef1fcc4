mod adhoc;
mod connection_pool;
mod driver;
mod immutable_field;
mod invalid_schema;
mod parse;
mod record_not_found;
mod unknown_attribute;
mod validation;

use adhoc::AdhocError;
use connection_pool::ConnectionPoolError;
use driver::DriverError;
use immutable_field::ImmutableFieldError;
use invalid_schema::InvalidSchemaError;
use parse::ParseError;
use record_not_found::RecordNotFoundError;
use std::sync::Arc;
use unknown_attribute::UnknownAttributeError;
use validation::ValidationError;

/// Return early with a formatted [`Error`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Create a formatted [`Error`] in place.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Relish.
///
/// Errors carry a kind and an optional cause chain. [`Error::status`] maps
/// the kind to the HTTP-style status the data layer surfaces to its host.
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    ConnectionPool(ConnectionPoolError),
    Driver(DriverError),
    ImmutableField(ImmutableFieldError),
    InvalidSchema(InvalidSchemaError),
    Parse(ParseError),
    RecordNotFound(RecordNotFoundError),
    UnknownAttribute(UnknownAttributeError),
    Validation(ValidationError),
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, ending with the root cause.
    pub fn context(self, consequent: Error) -> Error {
        Error {
            inner: Arc::new(ErrorInner {
                kind: match Arc::try_unwrap(consequent.inner) {
                    Ok(inner) => inner.kind,
                    Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
                },
                cause: Some(self),
            }),
        }
    }

    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(match args.as_str() {
            Some(s) => s.to_string(),
            None => args.to_string(),
        })))
    }

    /// The HTTP-style status this error maps to: `400` for client mistakes,
    /// `500` for everything else.
    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Parse(_)
            | ErrorKind::UnknownAttribute(_)
            | ErrorKind::Validation(_)
            | ErrorKind::ImmutableField(_) => 400,
            _ => 500,
        }
    }

    /// True if the error should surface as a client (4xx) error.
    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }

    pub fn is_parse(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse(_))
    }

    pub fn is_unknown_attribute(&self) -> bool {
        matches!(self.kind(), ErrorKind::UnknownAttribute(_))
    }

    pub fn is_record_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::RecordNotFound(_))
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            ConnectionPool(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            ImmutableField(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            Parse(err) => core::fmt::Display::fmt(err, f),
            RecordNotFound(err) => core::fmt::Display::fmt(err, f),
            UnknownAttribute(err) => core::fmt::Display::fmt(err, f),
            Validation(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Arc::new(ErrorInner { kind, cause: None }),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = Error::from_args(format_args!("root cause"));
        let top = Error::from_args(format_args!("top context"));

        let chained = root.context(top);
        assert_eq!(chained.to_string(), "top context: root cause");
    }

    #[test]
    fn parse_error_is_client_error() {
        let err = Error::parse("unable to parse `where` clause");
        assert_eq!(err.status(), 400);
        assert!(err.is_parse());
        assert_eq!(err.to_string(), "parse error: unable to parse `where` clause");
    }

    #[test]
    fn unknown_attribute_is_client_error() {
        let err = Error::unknown_attribute("Invoice", "ownre");
        assert_eq!(err.status(), 400);
        assert!(err.is_unknown_attribute());
        assert_eq!(
            err.to_string(),
            "unknown attribute `ownre` on model `Invoice`"
        );
    }

    #[test]
    fn record_not_found_is_internal() {
        let err = Error::record_not_found("object not existent");
        assert_eq!(err.status(), 500);
        assert!(!err.is_client_error());
    }

    #[test]
    fn immutable_field_message() {
        let err = Error::immutable_field("id");
        assert_eq!(err.status(), 400);
        assert!(err.to_string().contains("immutable"));
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
        assert_eq!(our_err.status(), 500);
    }
}
