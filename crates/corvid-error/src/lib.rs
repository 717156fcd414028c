use std::fmt::{self, Debug, Display};

pub use self::ext::ResultExt;

mod ext;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[macro_export]
macro_rules! bail {
    ($(type = $type:expr,)? $msg:expr) => {
        return Err($crate::corvid_error!($(type = $type,)? $msg))
    };
}

#[macro_export]
macro_rules! corvid_error {
    (type = $type:expr, $msg:expr) => {
        $crate::Error::msg($msg).with_error_type($type)
    };
    ($msg:expr) => {
        $crate::corvid_error!(type = $crate::ErrorType::Other(None), $msg)
    };
}

/// Classification of an error, independent of its origin
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorType {
    /// A referenced account does not exist
    NotFound,

    /// The requested operation is not allowed in the current state
    /// (self-targeting, muting without a relationship, ...)
    InvalidOperation(Option<String>),

    /// Concurrent creation of the same record
    Conflict,

    /// The caller identity is missing
    Unauthorized,

    Other(Option<String>),
}

#[derive(Debug)]
pub struct Error {
    ty: ErrorType,
    inner: eyre::Report,
}

impl Error {
    #[inline]
    pub fn new<E>(ty: ErrorType, err: E) -> Self
    where
        E: Into<eyre::Report>,
    {
        Self {
            ty,
            inner: err.into(),
        }
    }

    #[inline]
    pub fn msg<M>(msg: M) -> Self
    where
        M: Debug + Display + Send + Sync + 'static,
    {
        eyre::Report::msg(msg).into()
    }

    #[must_use]
    pub fn error_type(&self) -> &ErrorType {
        &self.ty
    }

    #[must_use]
    pub fn error(&self) -> &eyre::Report {
        &self.inner
    }

    #[must_use]
    pub fn into_error(self) -> eyre::Report {
        self.inner
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.ty == ErrorType::Conflict
    }

    #[must_use]
    pub fn with_error_type(self, ty: ErrorType) -> Self {
        Self { ty, ..self }
    }
}

impl<T> From<T> for Error
where
    T: Into<eyre::Report>,
{
    fn from(value: T) -> Self {
        Self {
            ty: ErrorType::Other(None),
            inner: value.into(),
        }
    }
}

impl From<Error> for BoxError {
    fn from(value: Error) -> Self {
        BoxError::from(value.inner)
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <eyre::Report as fmt::Display>::fmt(&self.inner, f)
    }
}

#[cfg(test)]
mod test {
    use crate::{bail, Error, ErrorType, Result, ResultExt};

    fn refuse() -> Result<()> {
        bail!(type = ErrorType::InvalidOperation(None), "accounts cannot follow themselves");
    }

    #[test]
    fn bail_attaches_type() {
        let err = refuse().unwrap_err();
        assert_eq!(
            *err.error_type(),
            ErrorType::InvalidOperation(None)
        );
        assert_eq!(err.to_string(), "accounts cannot follow themselves");
    }

    #[test]
    fn foreign_errors_default_to_other() {
        let err: Error = "nope".parse::<u32>().unwrap_err().into();
        assert_eq!(*err.error_type(), ErrorType::Other(None));
    }

    #[test]
    fn retag_result() {
        let res: Result<u32> = "nope"
            .parse::<u32>()
            .with_error_type(ErrorType::Conflict);
        assert!(res.unwrap_err().is_conflict());
    }
}
