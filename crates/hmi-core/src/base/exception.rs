use std::error::Error as StdError;
use std::fmt;

use crate::base::error_info::{ErrorInfo, ErrorKind, ToErrorInfo};

/// Carrier binding an [`ErrorInfo`] to a human-readable message.
///
/// Constructed from any error value that can describe itself (`Display`) and
/// convert itself into an `ErrorInfo` ([`ToErrorInfo`]). The original value is
/// kept, so callers can still `downcast_ref` to the concrete type, and its
/// `source()` chain is exposed through this carrier's own `source()`.
pub struct ErrorException {
    message: String,
    info: ErrorInfo,
    origin: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

/// Shorthand for results carrying an [`ErrorException`]
pub type Result<T> = std::result::Result<T, ErrorException>;

impl ErrorException {
    /// Wrap an error value, computing its structured payload
    pub fn new<E>(error: E) -> Self
    where
        E: ToErrorInfo + StdError + Send + Sync + 'static,
    {
        Self {
            message: error.to_string(),
            info: error.error_info(),
            origin: Some(Box::new(error)),
        }
    }

    /// Build an exception directly from a payload, with no typed origin
    pub fn from_info(info: ErrorInfo) -> Self {
        Self {
            message: info.message().to_string(),
            info,
            origin: None,
        }
    }

    /// Shorthand for `from_info(ErrorInfo::new(kind, message))`
    pub fn with_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::from_info(ErrorInfo::new(kind, message))
    }

    /// Structured payload for programmatic handling
    pub fn info(&self) -> &ErrorInfo {
        &self.info
    }

    pub fn kind(&self) -> &ErrorKind {
        self.info.kind()
    }

    /// Human-facing message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Borrow the original error value if it is of type `E`
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.origin.as_deref().and_then(|origin| origin.downcast_ref::<E>())
    }

    /// Payloads of this exception and every nested exception in its source
    /// chain, outermost first.
    pub fn causes(&self) -> Vec<&ErrorInfo> {
        let mut infos = vec![&self.info];
        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            if let Some(nested) = err.downcast_ref::<ErrorException>() {
                infos.push(&nested.info);
            }
            current = err.source();
        }
        infos
    }

    /// Payload of the innermost nested exception (or this one's)
    pub fn root_info(&self) -> &ErrorInfo {
        self.causes().last().copied().unwrap_or(&self.info)
    }
}

impl fmt::Debug for ErrorException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorException")
            .field("message", &self.message)
            .field("info", &self.info)
            .field("origin", &self.origin)
            .finish()
    }
}

impl fmt::Display for ErrorException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for ErrorException {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        // The origin is the same failure as `self`, so skip to its cause.
        self.origin.as_deref().and_then(|origin| origin.source())
    }
}

impl<E> From<E> for ErrorException
where
    E: ToErrorInfo + StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        ErrorException::new(error)
    }
}
