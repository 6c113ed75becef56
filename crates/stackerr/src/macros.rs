/// Construct a root [`Error`](crate::Error) from a format string.
///
/// ```
/// let port = 8080;
/// let err = stackerr::errorf!("port {} in use", port);
/// assert_eq!(err.to_string(), "port 8080 in use");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::Error::new(::std::format!($($arg)*))
    };
}

/// [`with_message`](crate::with_message) with a formatted message.
///
/// ```ignore
/// with_messagef!(maybe_err, "reading {}", path)
/// ```
#[macro_export]
macro_rules! with_messagef {
    ($err:expr, $($arg:tt)*) => {
        $crate::with_message($err, ::std::format!($($arg)*))
    };
}

/// [`wrap`](crate::wrap) with a formatted message.
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $($arg:tt)*) => {
        $crate::wrap($err, ::std::format!($($arg)*))
    };
}

/// [`wrap_c`](crate::wrap_c) with a formatted message.
///
/// ```ignore
/// wrap_cf!(maybe_err, ERR_INVALID_JSON, "decoding {}", path)
/// ```
#[macro_export]
macro_rules! wrap_cf {
    ($err:expr, $code:expr, $($arg:tt)*) => {
        $crate::wrap_c($err, $code, ::std::format!($($arg)*))
    };
}

/// Early-return a coded error if a condition is false.
///
/// ```ignore
/// ensure!(user_id > 0, ERR_INVALID_INPUT, "bad user id {}", user_id);
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $code:expr, $($arg:tt)*) => {
        if !$cond {
            return ::std::result::Result::Err(
                $crate::Error::coded($code, ::std::format!($($arg)*)).into(),
            );
        }
    };
}
