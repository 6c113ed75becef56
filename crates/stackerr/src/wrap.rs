use crate::error::{BoxError, Error};

// ── Option forms ──────────────────────────────────────────────────
//
// Wrapping no error yields no error.

/// Attach the caller's stack to `err`.
#[inline(never)]
pub fn with_stack<E: Into<BoxError>>(err: Option<E>) -> Option<Error> {
    let err = err?;
    Some(Error::with_stack_at(err.into(), 1))
}

/// Attach a message to `err`. No stack is captured.
pub fn with_message<E: Into<BoxError>>(err: Option<E>, message: impl Into<String>) -> Option<Error> {
    let err = err?;
    Some(Error::with_message(err, message))
}

/// Attach a code and message to `err`. No stack is captured.
pub fn with_code<E: Into<BoxError>>(
    err: Option<E>,
    code: i32,
    message: impl Into<String>,
) -> Option<Error> {
    let err = err?;
    Some(Error::with_code(err, code, message))
}

/// Attach the caller's stack and a message to `err`.
#[inline(never)]
pub fn wrap<E: Into<BoxError>>(err: Option<E>, message: impl Into<String>) -> Option<Error> {
    let err = err?;
    Some(Error::wrap_at(err.into(), message.into(), 1))
}

/// Attach the caller's stack, a code and a message to `err`.
#[inline(never)]
pub fn wrap_c<E: Into<BoxError>>(
    err: Option<E>,
    code: i32,
    message: impl Into<String>,
) -> Option<Error> {
    let err = err?;
    Some(Error::wrap_c_at(err.into(), code, message.into(), 1))
}

// ── ResultExt — annotation during propagation ─────────────────────

/// Extension trait for annotating the error side of any `Result`.
///
/// `Ok` values pass through untouched and capture nothing.
///
/// ```
/// use stackerr::{parse_coder, Coder, ResultExt};
///
/// fn read() -> stackerr::Result<String> {
///     std::fs::read_to_string("/definitely/not/here").wrap_c(1_000_404, "reading settings")
/// }
///
/// let err = read().unwrap_err();
/// assert_eq!(err.code(), Some(1_000_404));
/// assert_eq!(parse_coder(&err).code(), 0); // not registered
/// ```
pub trait ResultExt<T> {
    /// Attach the caller's stack.
    fn with_stack(self) -> Result<T, Error>;

    /// Attach a message, no stack.
    fn with_message(self, message: impl Into<String>) -> Result<T, Error>;

    /// Attach a lazily built message, no stack.
    fn with_message_with<F, M>(self, f: F) -> Result<T, Error>
    where
        F: FnOnce() -> M,
        M: Into<String>;

    /// Attach a code and message, no stack.
    fn with_code(self, code: i32, message: impl Into<String>) -> Result<T, Error>;

    /// Attach the caller's stack and a message.
    fn wrap(self, message: impl Into<String>) -> Result<T, Error>;

    /// Attach the caller's stack and a lazily built message.
    fn wrap_with<F, M>(self, f: F) -> Result<T, Error>
    where
        F: FnOnce() -> M,
        M: Into<String>;

    /// Attach the caller's stack, a code and a message.
    fn wrap_c(self, code: i32, message: impl Into<String>) -> Result<T, Error>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[inline(never)]
    fn with_stack(self) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::with_stack_at(e.into(), 1)),
        }
    }

    fn with_message(self, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::with_message(e, message)),
        }
    }

    fn with_message_with<F, M>(self, f: F) -> Result<T, Error>
    where
        F: FnOnce() -> M,
        M: Into<String>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::with_message(e, f())),
        }
    }

    fn with_code(self, code: i32, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::with_code(e, code, message)),
        }
    }

    #[inline(never)]
    fn wrap(self, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::wrap_at(e.into(), message.into(), 1)),
        }
    }

    #[inline(never)]
    fn wrap_with<F, M>(self, f: F) -> Result<T, Error>
    where
        F: FnOnce() -> M,
        M: Into<String>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::wrap_at(e.into(), f().into(), 1)),
        }
    }

    #[inline(never)]
    fn wrap_c(self, code: i32, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::wrap_c_at(e.into(), code, message.into(), 1)),
        }
    }
}
