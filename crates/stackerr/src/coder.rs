//! Error code metadata.
//!
//! # Code Ranges
//!
//! | Range   | Purpose                                       |
//! |---------|-----------------------------------------------|
//! | `0`     | [`UNKNOWN_CODE`] — reserved fallback          |
//! | `1+`    | Application codes, registered at startup      |
//!
//! Applications usually declare their coders as constants:
//!
//! ```rust
//! use stackerr::{Coder, DefaultCoder};
//!
//! const ERR_NOT_FOUND: DefaultCoder =
//!     DefaultCoder::new_static(100404, 404, "Resource not found", "");
//!
//! assert_eq!(ERR_NOT_FOUND.http_status(), 404);
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Code reserved for the unknown coder.
pub const UNKNOWN_CODE: i32 = 0;

/// HTTP status used when a coder does not name one.
pub const DEFAULT_HTTP_STATUS: u16 = 500;

/// Fallback classification for errors with no registered code.
pub const UNKNOWN: DefaultCoder = DefaultCoder::new_static(
    UNKNOWN_CODE,
    DEFAULT_HTTP_STATUS,
    "An internal server error occurred",
    "",
);

/// Describes an error code.
pub trait Coder: fmt::Debug + Send + Sync {
    /// The integer code.
    fn code(&self) -> i32;

    /// HTTP status that should be used for this code.
    fn http_status(&self) -> u16;

    /// External (user) facing error text.
    fn text(&self) -> &str;

    /// Reference documentation for the user.
    fn reference(&self) -> &str;
}

/// The stock [`Coder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultCoder {
    pub code: i32,
    /// `0` reads back as [`DEFAULT_HTTP_STATUS`].
    #[serde(default)]
    pub http: u16,
    pub text: Cow<'static, str>,
    #[serde(default)]
    pub reference: Cow<'static, str>,
}

impl DefaultCoder {
    pub fn new(
        code: i32,
        http: u16,
        text: impl Into<Cow<'static, str>>,
        reference: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            code,
            http,
            text: text.into(),
            reference: reference.into(),
        }
    }

    /// Const constructor for coders declared as constants.
    pub const fn new_static(
        code: i32,
        http: u16,
        text: &'static str,
        reference: &'static str,
    ) -> Self {
        Self {
            code,
            http,
            text: Cow::Borrowed(text),
            reference: Cow::Borrowed(reference),
        }
    }
}

impl Coder for DefaultCoder {
    fn code(&self) -> i32 {
        self.code
    }

    fn http_status(&self) -> u16 {
        if self.http == 0 {
            DEFAULT_HTTP_STATUS
        } else {
            self.http
        }
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for DefaultCoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
